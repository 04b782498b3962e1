#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Typed HTTP clients for Radarr, Sonarr and Overseerr.
//!
//! Layout:
//! - `rest.rs`: `ApiClient` (authenticated transport) and the generic
//!   `RestResource<T>` every service client is assembled from
//! - `radarr.rs`, `sonarr.rs`, `overseerr.rs`: wire models and service clients
//! - `error.rs`: `ClientError`

pub mod error;
pub mod overseerr;
pub mod radarr;
pub mod rest;
pub mod sonarr;

pub use error::{ClientError, ClientResult};
pub use overseerr::{Media, MediaRequest, OverseerrClient, RequestUser};
pub use radarr::{Movie, MovieFile, MovieStatistics, RadarrClient};
pub use rest::{ApiClient, DEFAULT_PAGE_SIZE, HEADER_API_KEY, PageInfo, Pagination, RestResource};
pub use sonarr::{EpisodeFile, Season, Series, SeriesStatistics, SonarrClient};
