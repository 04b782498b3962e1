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

//! File-backed configuration for the arrsweep CLI.
//!
//! Layout: `model.rs` (typed settings and override resolution), `loader.rs`
//! (locating and parsing the TOML file), `error.rs` (`ConfigError`).

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_ENV_VAR, CONFIG_FILE_NAME, default_config_path, load, load_from};
pub use model::{
    ArrSweepConfig, DEFAULT_TIMEOUT_SECS, ResolvedService, Service, ServiceOverrides,
    ServiceSettings,
};
