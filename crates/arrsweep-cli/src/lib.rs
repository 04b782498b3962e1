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
#![allow(clippy::redundant_pub_crate)]

//! Interactive CLI that sweeps large media out of Radarr and Sonarr and
//! clears the matching Overseerr requests.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `commands/`: command handlers and service adapters grouped by media kind
//! - `workflow/`: the interactive select-confirm-delete flows
//! - `resolver.rs`: correlates catalog items with tracked requests
//! - `console.rs`: prompt/print abstraction and colour theme
//! - `client.rs`: errors and the per-run service context
//! - `output.rs`: renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod console;
pub(crate) mod output;
pub(crate) mod resolver;
pub(crate) mod workflow;

pub use cli::run;
