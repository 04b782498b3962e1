//! Radarr v3 movie collection.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;
use crate::rest::{ApiClient, RestResource};

/// Movie record as returned by `GET /movie`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Radarr-local identifier.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Title in the original release language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    /// TMDB identifier used to correlate with Overseerr.
    #[serde(default)]
    pub tmdb_id: i64,
    /// Release year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Movie folder on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Size reported by older API versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_on_disk: Option<u64>,
    /// Aggregate statistics reported by current API versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<MovieStatistics>,
    /// Imported movie file, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_file: Option<MovieFile>,
}

/// Per-movie statistics block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieStatistics {
    /// Number of imported files.
    #[serde(default)]
    pub movie_file_count: u32,
    /// Bytes on disk across all files.
    #[serde(default)]
    pub size_on_disk: u64,
}

/// Imported file backing a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieFile {
    /// Radarr-local file identifier.
    pub id: i64,
    /// Absolute path of the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// File path relative to the movie folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
}

impl Movie {
    /// Bytes on disk, preferring the statistics block over the legacy field.
    #[must_use]
    pub fn size_on_disk_bytes(&self) -> u64 {
        self.statistics
            .map(|stats| stats.size_on_disk)
            .or(self.size_on_disk)
            .unwrap_or(0)
    }

    /// Path of the imported file, falling back to the movie folder.
    #[must_use]
    pub fn file_path(&self) -> Option<&str> {
        self.movie_file
            .as_ref()
            .and_then(|file| file.path.as_deref())
            .or(self.path.as_deref())
    }
}

/// Client for a Radarr instance.
#[derive(Debug, Clone)]
pub struct RadarrClient {
    movies: RestResource<Movie>,
}

impl RadarrClient {
    /// Wrap an authenticated transport.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            movies: RestResource::new(api, "movie")
                .with_delete_query("deleteFiles", "true")
                .expect_delete(&[StatusCode::OK]),
        }
    }

    /// Every movie known to Radarr, including ones without files.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decoding failures.
    pub async fn list_movies(&self) -> ClientResult<Vec<Movie>> {
        self.movies.list_all().await
    }

    /// Movies that currently occupy space on disk.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decoding failures.
    pub async fn movies_on_disk(&self) -> ClientResult<Vec<Movie>> {
        let mut movies = self.list_movies().await?;
        movies.retain(|movie| movie.size_on_disk_bytes() > 0);
        Ok(movies)
    }

    /// Delete a movie together with its files.
    ///
    /// # Errors
    ///
    /// Returns a transport failure or a status error when Radarr does not
    /// answer `200 OK`.
    pub async fn delete_movie(&self, id: i64) -> ClientResult<()> {
        self.movies.delete_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::rest::HEADER_API_KEY;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;
    use url::Url;

    fn client_for(server: &MockServer) -> RadarrClient {
        let base = Url::parse(&format!("{}/api/v3", server.base_url())).expect("valid URL");
        RadarrClient::new(ApiClient::new(base, "radarr-key", Duration::from_secs(5)).expect("client"))
    }

    #[test]
    fn size_prefers_statistics_then_legacy_field() {
        let movie: Movie = serde_json::from_value(json!({
            "id": 1, "title": "A", "tmdbId": 10,
            "sizeOnDisk": 5, "statistics": { "sizeOnDisk": 7 }
        }))
        .expect("decode");
        assert_eq!(movie.size_on_disk_bytes(), 7);

        let legacy: Movie = serde_json::from_value(json!({
            "id": 2, "title": "B", "sizeOnDisk": 5
        }))
        .expect("decode");
        assert_eq!(legacy.size_on_disk_bytes(), 5);

        let bare: Movie = serde_json::from_value(json!({ "id": 3, "title": "C" })).expect("decode");
        assert_eq!(bare.size_on_disk_bytes(), 0);
        assert_eq!(bare.tmdb_id, 0);
    }

    #[test]
    fn file_path_falls_back_to_folder() {
        let movie: Movie = serde_json::from_value(json!({
            "id": 1, "title": "A", "path": "/movies/A",
            "movieFile": { "id": 9, "path": "/movies/A/a.mkv", "size": 3 }
        }))
        .expect("decode");
        assert_eq!(movie.file_path(), Some("/movies/A/a.mkv"));

        let folder_only: Movie =
            serde_json::from_value(json!({ "id": 2, "title": "B", "path": "/movies/B" }))
                .expect("decode");
        assert_eq!(folder_only.file_path(), Some("/movies/B"));
    }

    #[tokio::test]
    async fn movies_on_disk_drops_empty_entries() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v3/movie")
                .header(HEADER_API_KEY, "radarr-key");
            then.status(200).json_body(json!([
                { "id": 1, "title": "Big", "tmdbId": 10, "statistics": { "sizeOnDisk": 3_221_225_472_u64 } },
                { "id": 2, "title": "Missing", "tmdbId": 11, "statistics": { "sizeOnDisk": 0 } },
                { "id": 3, "title": "Legacy", "tmdbId": 12, "sizeOnDisk": 1024 }
            ]));
        });

        let movies = client_for(&server).movies_on_disk().await.expect("list succeeds");

        mock.assert();
        let titles: Vec<&str> = movies.iter().map(|movie| movie.title.as_str()).collect();
        assert_eq!(titles, vec!["Big", "Legacy"]);
    }

    #[tokio::test]
    async fn delete_movie_removes_files() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE)
                .path("/api/v3/movie/1")
                .query_param("deleteFiles", "true")
                .header(HEADER_API_KEY, "radarr-key");
            then.status(200);
        });

        client_for(&server).delete_movie(1).await.expect("delete succeeds");
        mock.assert();
    }

    #[tokio::test]
    async fn delete_movie_surfaces_unexpected_status() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/api/v3/movie/5");
            then.status(404).body("{\"message\":\"NotFound\"}");
        });

        let err = client_for(&server)
            .delete_movie(5)
            .await
            .expect_err("404 is a failure");
        assert!(matches!(
            err,
            ClientError::Status { status, .. } if status == StatusCode::NOT_FOUND
        ));
        assert!(err.to_string().contains("NotFound"));
    }
}
