//! Sonarr v3 series, seasons and episode files.
//!
//! `Series` and its nested records keep every field they do not model in an
//! `extra` map so a series fetched from Sonarr can be sent back with `PUT`
//! unchanged apart from the fields this crate edits.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientResult;
use crate::rest::{ApiClient, RestResource, send_expecting};

/// Series record as returned by `GET /series`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Sonarr-local identifier.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// TVDB identifier used to correlate with Overseerr.
    #[serde(default)]
    pub tvdb_id: i64,
    /// Size reported by older API versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_on_disk: Option<u64>,
    /// Aggregate statistics reported by current API versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SeriesStatistics>,
    /// Seasons in the order Sonarr lists them.
    #[serde(default)]
    pub seasons: Vec<Season>,
    /// Fields not modelled above, preserved for round-trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One season of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    /// Season number; `0` holds specials.
    pub season_number: i32,
    /// Whether Sonarr searches for missing episodes of this season.
    #[serde(default)]
    pub monitored: bool,
    /// Season statistics, when Sonarr reports them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SeriesStatistics>,
    /// Fields not modelled above, preserved for round-trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Statistics block shared by series and seasons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStatistics {
    /// Number of episodes with a file on disk.
    #[serde(default)]
    pub episode_file_count: u32,
    /// Bytes on disk.
    #[serde(default)]
    pub size_on_disk: u64,
    /// Fields not modelled above, preserved for round-trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Episode file as returned by `GET /episodefile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeFile {
    /// Sonarr-local file identifier.
    pub id: i64,
    /// Owning series.
    #[serde(default)]
    pub series_id: i64,
    /// Season the file belongs to.
    #[serde(default)]
    pub season_number: i32,
    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Path relative to the series folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkEpisodeFileDelete<'a> {
    episode_file_ids: &'a [i64],
}

impl Series {
    /// Bytes on disk, preferring the statistics block over the legacy field.
    #[must_use]
    pub fn size_on_disk_bytes(&self) -> u64 {
        self.statistics
            .as_ref()
            .map(|stats| stats.size_on_disk)
            .or(self.size_on_disk)
            .unwrap_or(0)
    }

    /// Seasons that occupy space on disk, in listing order.
    #[must_use]
    pub fn seasons_on_disk(&self) -> Vec<&Season> {
        self.seasons
            .iter()
            .filter(|season| season.size_on_disk_bytes() > 0)
            .collect()
    }

    /// Mark `season_number` unmonitored. Returns `false` when the series has
    /// no such season.
    pub fn unmonitor_season(&mut self, season_number: i32) -> bool {
        let Some(season) = self
            .seasons
            .iter_mut()
            .find(|season| season.season_number == season_number)
        else {
            return false;
        };
        season.monitored = false;
        true
    }
}

impl Season {
    /// Bytes on disk for this season.
    #[must_use]
    pub fn size_on_disk_bytes(&self) -> u64 {
        self.statistics
            .as_ref()
            .map_or(0, |stats| stats.size_on_disk)
    }
}

/// Client for a Sonarr instance.
#[derive(Debug, Clone)]
pub struct SonarrClient {
    api: ApiClient,
    series: RestResource<Series>,
    episode_files: RestResource<EpisodeFile>,
}

impl SonarrClient {
    /// Wrap an authenticated transport.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            series: RestResource::new(api.clone(), "series")
                .with_delete_query("deleteFiles", "true")
                .expect_delete(&[StatusCode::OK])
                .expect_update(&[StatusCode::ACCEPTED]),
            episode_files: RestResource::new(api.clone(), "episodefile"),
            api,
        }
    }

    /// Every series known to Sonarr.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decoding failures.
    pub async fn list_series(&self) -> ClientResult<Vec<Series>> {
        self.series.list_all().await
    }

    /// Series that currently occupy space on disk.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decoding failures.
    pub async fn series_on_disk(&self) -> ClientResult<Vec<Series>> {
        let mut series = self.list_series().await?;
        series.retain(|entry| entry.size_on_disk_bytes() > 0);
        Ok(series)
    }

    /// Delete a series together with its files.
    ///
    /// # Errors
    ///
    /// Returns a transport failure or a status error when Sonarr does not
    /// answer `200 OK`.
    pub async fn delete_series(&self, id: i64) -> ClientResult<()> {
        self.series.delete_by_id(id).await
    }

    /// Write a series back, e.g. after changing season monitoring.
    ///
    /// # Errors
    ///
    /// Returns a transport failure or a status error when Sonarr does not
    /// answer `202 Accepted`.
    pub async fn update_series(&self, series: &Series) -> ClientResult<()> {
        self.series.update_by_id(series.id, series).await
    }

    /// Episode files of a series, optionally narrowed to one season.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decoding failures.
    pub async fn episode_files(
        &self,
        series_id: i64,
        season_number: Option<i32>,
    ) -> ClientResult<Vec<EpisodeFile>> {
        let mut files = self
            .episode_files
            .list_where(&[("seriesId", series_id.to_string())])
            .await?;
        if let Some(season_number) = season_number {
            files.retain(|file| file.season_number == season_number);
        }
        Ok(files)
    }

    /// Delete episode files in one bulk call.
    ///
    /// # Errors
    ///
    /// Returns a transport failure or a status error when Sonarr does not
    /// answer `200 OK`.
    pub async fn delete_episode_files(&self, files: &[EpisodeFile]) -> ClientResult<()> {
        let ids: Vec<i64> = files.iter().map(|file| file.id).collect();
        let url = self.api.endpoint(&["episodefile", "bulk"])?;
        let operation = format!("DELETE {}", url.path());
        let builder = self
            .api
            .request(Method::DELETE, url)
            .json(&BulkEpisodeFileDelete {
                episode_file_ids: &ids,
            });
        send_expecting(&operation, builder, &[StatusCode::OK]).await?;
        Ok(())
    }
}
