//! Interactive select-confirm-delete flows.
//!
//! # Design
//! - Catalogs (Radarr, Sonarr) and the request tracker (Overseerr) sit behind
//!   small traits so the flows can be driven by in-memory fakes in tests.
//! - Only the initial catalog and request fetches are fatal; every later
//!   call failure is printed and the batch moves on.
//! - Deletion order is always request tracker first, catalog second.

mod search;
mod seasons;

use std::cmp::Reverse;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::client::{CliError, CliResult};
use crate::console::{Console, Tone};
use crate::output::format_gb;
use crate::resolver::TrackedRequest;

pub(crate) use search::{process_selections, search_and_delete};
pub(crate) use seasons::{SeasonCatalog, prune_season, series_item};

/// A locally stored media item offered for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CatalogItem {
    pub(crate) id: i64,
    pub(crate) external_id: i64,
    pub(crate) title: String,
    pub(crate) size_bytes: u64,
}

/// Collection manager holding media files (Radarr, Sonarr).
#[async_trait]
pub(crate) trait Catalog: Send + Sync {
    /// Singular lowercase noun for one item, e.g. `movie`.
    fn noun(&self) -> &'static str;
    /// Plural form of [`Catalog::noun`].
    fn plural(&self) -> &'static str;
    /// Product name used in messages.
    fn service_name(&self) -> &'static str;
    /// Items that occupy space on disk, in fetch order.
    async fn list_all(&self) -> anyhow::Result<Vec<CatalogItem>>;
    /// Delete an item together with its files.
    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()>;
}

/// Service tracking user requests for media (Overseerr).
#[async_trait]
pub(crate) trait RequestTracker: Send + Sync {
    /// Product name used in messages.
    fn service_name(&self) -> &'static str;
    /// Every tracked request, in fetch order.
    async fn list_all(&self) -> anyhow::Result<Vec<TrackedRequest>>;
    /// Delete a tracked request.
    async fn delete_by_id(&self, id: i64) -> anyhow::Result<()>;
}

/// Outcome counters for one workflow run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WorkflowReport {
    pub(crate) deleted: usize,
    pub(crate) requests_deleted: usize,
    pub(crate) skipped: usize,
    pub(crate) unresolved: usize,
    pub(crate) failed: usize,
}

impl WorkflowReport {
    pub(crate) fn log(&self, workflow: &str) {
        tracing::info!(
            workflow,
            deleted = self.deleted,
            requests_deleted = self.requests_deleted,
            skipped = self.skipped,
            unresolved = self.unresolved,
            failed = self.failed,
            "workflow finished"
        );
    }
}

/// Ordinals accepted from a selection line plus the tokens that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Selections {
    pub(crate) ordinals: Vec<usize>,
    pub(crate) rejected: Vec<String>,
}

/// Parse a comma-separated selection line against `count` displayed items.
///
/// A blank line selects nothing. Every other token must be an integer in
/// `1..=count`; anything else lands in `rejected`. Accepted ordinals keep the
/// operator's order, duplicates included.
pub(crate) fn parse_selections(input: &str, count: usize) -> Selections {
    let mut selections = Selections::default();
    let line = input.trim();
    if line.is_empty() {
        return selections;
    }
    for token in line.split(',').map(str::trim) {
        match token.parse::<usize>() {
            Ok(ordinal) if (1..=count).contains(&ordinal) => selections.ordinals.push(ordinal),
            _ => selections.rejected.push(token.to_string()),
        }
    }
    selections
}

/// Parse a single ordinal in `0..=count`; `0` is the caller's escape value.
pub(crate) fn parse_single(input: &str, count: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|ordinal| *ordinal <= count)
}

/// Only `y` (any case, surrounding whitespace ignored) confirms.
pub(crate) fn is_affirmative(answer: &str) -> bool {
    answer.trim().to_lowercase() == "y"
}

/// Stable sort by size, largest first.
pub(crate) fn sort_by_size_desc<T>(items: &mut [T], size: impl Fn(&T) -> u64) {
    items.sort_by_key(|item| Reverse(size(item)));
}

/// Largest-first view of `items`, after skipping `skip` and keeping at most
/// `limit`.
pub(crate) fn display_window(
    mut items: Vec<CatalogItem>,
    skip: usize,
    limit: usize,
) -> Vec<CatalogItem> {
    sort_by_size_desc(&mut items, |item| item.size_bytes);
    items.into_iter().skip(skip).take(limit).collect()
}

pub(crate) fn show_numbered<'a>(
    console: &mut dyn Console,
    heading: &str,
    rows: impl Iterator<Item = (&'a str, u64)>,
) {
    console.say(Tone::Heading, heading);
    for (index, (title, size)) in rows.enumerate() {
        console.say(
            Tone::Plain,
            &format!("{}: {title} ({})", index + 1, format_gb(size)),
        );
    }
}

pub(crate) fn read_line(console: &mut dyn Console, tone: Tone, prompt: &str) -> CliResult<String> {
    console
        .ask(tone, prompt)
        .map_err(|err| CliError::failure(anyhow!("failed to read input: {err}")))
}

/// Ask a y/N question. A failed read is reported and counts as a decline so
/// the rest of the batch still runs.
pub(crate) fn confirm(console: &mut dyn Console, prompt: &str) -> bool {
    match console.ask(Tone::Warning, prompt) {
        Ok(answer) => is_affirmative(&answer),
        Err(err) => {
            console.say(Tone::Failure, &format!("Failed to read confirmation: {err}"));
            false
        }
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
