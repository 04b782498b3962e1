//! Overseerr v1 media and request collections.
//!
//! Both collections are offset-paginated (`take`/`skip`) and sorted by the
//! date they were added.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;
use crate::rest::{ApiClient, DEFAULT_PAGE_SIZE, RestResource};

/// Media record tracked by Overseerr.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Overseerr-local identifier.
    pub id: i64,
    /// TMDB identifier, set for movies and most series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<i64>,
    /// TVDB identifier, set for series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb_id: Option<i64>,
    /// `movie` or `tv`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Availability status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

impl Media {
    /// Identifier matching Radarr's `tmdbId` or Sonarr's `tvdbId`, depending
    /// on the media type.
    #[must_use]
    pub fn external_id(&self) -> Option<i64> {
        match self.media_type.as_deref() {
            Some("tv") => self.tvdb_id,
            _ => self.tmdb_id,
        }
    }

    /// Identifier to match against a catalog of `media_type` records: TVDB
    /// for `tv`, TMDB otherwise.
    ///
    /// Records typed differently yield `None`. Untyped records use the id
    /// space of the requested type, never the other one.
    #[must_use]
    pub fn external_id_for(&self, media_type: &str) -> Option<i64> {
        if self
            .media_type
            .as_deref()
            .is_some_and(|kind| kind != media_type)
        {
            return None;
        }
        if media_type == "tv" {
            self.tvdb_id
        } else {
            self.tmdb_id
        }
    }
}

/// User who filed a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestUser {
    /// Overseerr user identifier.
    #[serde(default)]
    pub id: i64,
    /// Name shown in the Overseerr UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// A user's request for a piece of media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRequest {
    /// Overseerr-local request identifier.
    pub id: i64,
    /// Approval status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    /// Whether the 4K variant was requested.
    #[serde(default)]
    pub is4k: bool,
    /// Creation timestamp as sent by Overseerr (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Requested media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    /// Requesting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<RequestUser>,
}

/// Client for an Overseerr instance.
#[derive(Debug, Clone)]
pub struct OverseerrClient {
    media: RestResource<Media>,
    requests: RestResource<MediaRequest>,
}

impl OverseerrClient {
    /// Wrap an authenticated transport.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            media: RestResource::new(api.clone(), "media")
                .paginated(DEFAULT_PAGE_SIZE)
                .with_list_query("sort", "added")
                .expect_delete(&[StatusCode::NO_CONTENT]),
            requests: RestResource::new(api, "request")
                .paginated(DEFAULT_PAGE_SIZE)
                .with_list_query("sort", "added")
                .expect_delete(&[StatusCode::NO_CONTENT]),
        }
    }

    /// Every tracked media record, across all pages.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decoding failures.
    pub async fn list_media(&self) -> ClientResult<Vec<Media>> {
        self.media.list_all().await
    }

    /// Delete a media record and the requests attached to it.
    ///
    /// # Errors
    ///
    /// Returns a transport failure or a status error when Overseerr does not
    /// answer `204 No Content`.
    pub async fn delete_media(&self, id: i64) -> ClientResult<()> {
        self.media.delete_by_id(id).await
    }

    /// Every request, across all pages.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and decoding failures.
    pub async fn list_requests(&self) -> ClientResult<Vec<MediaRequest>> {
        self.requests.list_all().await
    }

    /// Delete a single request.
    ///
    /// # Errors
    ///
    /// Returns a transport failure or a status error when Overseerr does not
    /// answer `204 No Content`.
    pub async fn delete_request(&self, id: i64) -> ClientResult<()> {
        self.requests.delete_by_id(id).await
    }
}
