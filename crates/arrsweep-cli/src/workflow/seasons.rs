//! Delete a single season of a series, or the whole series.

use arrsweep_clients::{EpisodeFile, Season, Series};
use async_trait::async_trait;

use crate::client::{CliError, CliResult};
use crate::console::{Console, Tone};
use crate::output::format_gb;

use super::{
    Catalog, CatalogItem, RequestTracker, WorkflowReport, confirm, parse_single,
    process_selections, read_line, show_numbered, sort_by_size_desc,
};

/// Catalog that can also address individual seasons (Sonarr).
#[async_trait]
pub(crate) trait SeasonCatalog: Catalog {
    /// Series that occupy space on disk, in fetch order.
    async fn list_series(&self) -> anyhow::Result<Vec<Series>>;
    /// Episode files belonging to one season.
    async fn season_files(
        &self,
        series_id: i64,
        season_number: i32,
    ) -> anyhow::Result<Vec<EpisodeFile>>;
    /// Delete episode files in one call.
    async fn delete_files(&self, files: &[EpisodeFile]) -> anyhow::Result<()>;
    /// Write a modified series back.
    async fn update_series(&self, series: &Series) -> anyhow::Result<()>;
}

/// Catalog view of a series; TVDB ids link series to tracked requests.
pub(crate) fn series_item(series: &Series) -> CatalogItem {
    CatalogItem {
        id: series.id,
        external_id: series.tvdb_id,
        title: series.title.clone(),
        size_bytes: series.size_on_disk_bytes(),
    }
}

/// Pick a series, then a season to delete and unmonitor. Choosing season `0`
/// deletes the whole series through the regular selection flow.
pub(crate) async fn prune_season<C, T>(
    catalog: &C,
    tracker: &T,
    console: &mut dyn Console,
    limit: usize,
) -> CliResult<WorkflowReport>
where
    C: SeasonCatalog + ?Sized,
    T: RequestTracker + ?Sized,
{
    let mut series = catalog.list_series().await.map_err(|err| {
        CliError::failure(err.context(format!(
            "failed to fetch series from {}",
            catalog.service_name()
        )))
    })?;
    sort_by_size_desc(&mut series, Series::size_on_disk_bytes);
    series.truncate(limit);
    if series.is_empty() {
        console.say(Tone::Plain, "No series with files on disk to show.");
        return Ok(WorkflowReport::default());
    }
    show_numbered(
        console,
        "Series:",
        series
            .iter()
            .map(|entry| (entry.title.as_str(), entry.size_on_disk_bytes())),
    );

    let line = read_line(
        console,
        Tone::Prompt,
        "Select series number to view seasons (0 to cancel): ",
    )?;
    let Some(choice) = parse_single(&line, series.len()) else {
        console.say(Tone::Warning, &format!("Invalid selection: {}", line.trim()));
        return Ok(WorkflowReport::default());
    };
    let Some(selected) = choice.checked_sub(1).and_then(|index| series.get(index)) else {
        console.say(Tone::Plain, "No series selected. Exiting.");
        return Ok(WorkflowReport::default());
    };

    console.say(Tone::Plain, &format!("Selected series: {}", selected.title));
    let seasons = selected.seasons_on_disk();
    console.say(Tone::Heading, "Seasons:");
    if seasons.is_empty() {
        console.say(Tone::Plain, "No seasons with files on disk.");
    }
    for (index, season) in seasons.iter().enumerate() {
        console.say(
            Tone::Plain,
            &format!(
                "{}: Season {} ({})",
                index + 1,
                season.season_number,
                format_gb(season.size_on_disk_bytes())
            ),
        );
    }

    let line = read_line(
        console,
        Tone::Prompt,
        "Select season number to delete or enter 0 to delete the entire series: ",
    )?;
    let Some(choice) = parse_single(&line, seasons.len()) else {
        console.say(Tone::Warning, &format!("Invalid selection: {}", line.trim()));
        return Ok(WorkflowReport::default());
    };
    let Some(season) = choice.checked_sub(1).and_then(|index| seasons.get(index)) else {
        let item = series_item(selected);
        return process_selections(catalog, tracker, console, &[&item]).await;
    };

    Ok(delete_season(catalog, console, selected, season).await)
}

async fn delete_season<C>(
    catalog: &C,
    console: &mut dyn Console,
    series: &Series,
    season: &Season,
) -> WorkflowReport
where
    C: SeasonCatalog + ?Sized,
{
    let mut report = WorkflowReport::default();
    let number = season.season_number;
    let title = &series.title;
    let service = catalog.service_name();

    let prompt = format!(
        "Are you sure you want to delete Season {number} of '{title}' ({})? (y/N): ",
        format_gb(season.size_on_disk_bytes())
    );
    if !confirm(console, &prompt) {
        console.say(
            Tone::Plain,
            &format!("Skipped deletion of Season {number} of '{title}'."),
        );
        report.skipped += 1;
        return report;
    }

    let files = match catalog.season_files(series.id, number).await {
        Ok(files) => files,
        Err(err) => {
            console.say(
                Tone::Failure,
                &format!("Failed to fetch episode files for Season {number} of '{title}': {err:#}"),
            );
            report.failed += 1;
            return report;
        }
    };

    if files.is_empty() {
        console.say(
            Tone::Plain,
            &format!("No episode files found for Season {number} of '{title}'; nothing to delete."),
        );
    } else if let Err(err) = catalog.delete_files(&files).await {
        console.say(
            Tone::Failure,
            &format!("Failed to delete Season {number} of '{title}' from {service}: {err:#}"),
        );
        report.failed += 1;
        return report;
    } else {
        tracing::info!(series_id = series.id, season = number, files = files.len(), "season deleted");
        console.say(
            Tone::Success,
            &format!("Season {number} of '{title}' was successfully deleted from {service}."),
        );
        report.deleted += 1;
    }

    let mut updated = series.clone();
    updated.unmonitor_season(number);
    match catalog.update_series(&updated).await {
        Ok(()) => console.say(
            Tone::Success,
            &format!("Season {number} of '{title}' was successfully unmonitored in {service}."),
        ),
        Err(err) => {
            console.say(
                Tone::Failure,
                &format!(
                    "Failed to unmonitor Season {number} of '{title}'; {service} may download it again: {err:#}"
                ),
            );
            report.failed += 1;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::workflow::fakes::{CallLog, FakeTracker, call_log};
    use anyhow::anyhow;
    use serde_json::json;
    use tokio::sync::Mutex;

    const GIB: u64 = 1_073_741_824;

    struct FakeSonarr {
        series: Vec<Series>,
        files: Vec<EpisodeFile>,
        fail_bulk: bool,
        calls: CallLog,
        updated: Mutex<Vec<Series>>,
    }

    impl FakeSonarr {
        fn new(calls: CallLog) -> Self {
            let show: Series = serde_json::from_value(json!({
                "id": 7,
                "title": "Show",
                "tvdbId": 20,
                "qualityProfileId": 4,
                "statistics": { "sizeOnDisk": 3 * GIB },
                "seasons": [
                    { "seasonNumber": 0, "monitored": false, "statistics": { "sizeOnDisk": 0 } },
                    { "seasonNumber": 1, "monitored": true, "statistics": { "sizeOnDisk": GIB } },
                    { "seasonNumber": 2, "monitored": true, "statistics": { "sizeOnDisk": 2 * GIB } }
                ]
            }))
            .expect("valid series");
            let small: Series = serde_json::from_value(json!({
                "id": 8, "title": "Small", "tvdbId": 21, "statistics": { "sizeOnDisk": GIB / 2 }
            }))
            .expect("valid series");
            Self {
                series: vec![small, show],
                files: vec![
                    EpisodeFile {
                        id: 1,
                        series_id: 7,
                        season_number: 1,
                        size: GIB,
                        relative_path: None,
                    },
                    EpisodeFile {
                        id: 2,
                        series_id: 7,
                        season_number: 2,
                        size: GIB,
                        relative_path: None,
                    },
                    EpisodeFile {
                        id: 3,
                        series_id: 7,
                        season_number: 2,
                        size: GIB,
                        relative_path: None,
                    },
                ],
                fail_bulk: false,
                calls,
                updated: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Catalog for FakeSonarr {
        fn noun(&self) -> &'static str {
            "series"
        }

        fn plural(&self) -> &'static str {
            "series"
        }

        fn service_name(&self) -> &'static str {
            "Sonarr"
        }

        async fn list_all(&self) -> anyhow::Result<Vec<CatalogItem>> {
            self.calls.lock().await.push("catalog.list".to_string());
            Ok(self.series.iter().map(series_item).collect())
        }

        async fn delete_by_id(&self, id: i64) -> anyhow::Result<()> {
            self.calls.lock().await.push(format!("catalog.delete({id})"));
            Ok(())
        }
    }

    #[async_trait]
    impl SeasonCatalog for FakeSonarr {
        async fn list_series(&self) -> anyhow::Result<Vec<Series>> {
            self.calls.lock().await.push("series.list".to_string());
            Ok(self.series.clone())
        }

        async fn season_files(
            &self,
            series_id: i64,
            season_number: i32,
        ) -> anyhow::Result<Vec<EpisodeFile>> {
            self.calls
                .lock()
                .await
                .push(format!("files({series_id},{season_number})"));
            Ok(self
                .files
                .iter()
                .filter(|file| file.series_id == series_id && file.season_number == season_number)
                .cloned()
                .collect())
        }

        async fn delete_files(&self, files: &[EpisodeFile]) -> anyhow::Result<()> {
            let ids: Vec<String> = files.iter().map(|file| file.id.to_string()).collect();
            self.calls
                .lock()
                .await
                .push(format!("bulk_delete({})", ids.join(",")));
            if self.fail_bulk {
                return Err(anyhow!("unexpected status 500"));
            }
            Ok(())
        }

        async fn update_series(&self, series: &Series) -> anyhow::Result<()> {
            self.calls.lock().await.push(format!("update({})", series.id));
            self.updated.lock().await.push(series.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn confirmed_season_is_deleted_then_unmonitored() {
        let calls = call_log();
        let sonarr = FakeSonarr::new(calls.clone());
        let tracker = FakeTracker::new(&[(100, 20)], calls.clone());
        let mut console = ScriptedConsole::new(&["1", "2", "y"]);

        let report = prune_season(&sonarr, &tracker, &mut console, 10)
            .await
            .expect("workflow completes");

        assert_eq!(
            *calls.lock().await,
            vec!["series.list", "files(7,2)", "bulk_delete(2,3)", "update(7)"]
        );
        assert!(console.contains("1: Show (3.00 GB)"));
        assert!(console.contains("2: Season 2 (2.00 GB)"));
        assert!(!console.contains("Season 0"));
        assert!(console.contains("Season 2 of 'Show' was successfully deleted from Sonarr."));
        assert!(console.contains("Season 2 of 'Show' was successfully unmonitored in Sonarr."));

        let updated = sonarr.updated.lock().await;
        let seasons: Vec<(i32, bool)> = updated[0]
            .seasons
            .iter()
            .map(|season| (season.season_number, season.monitored))
            .collect();
        assert_eq!(seasons, vec![(0, false), (1, true), (2, false)]);
        assert_eq!(updated[0].extra.get("qualityProfileId"), Some(&json!(4)));
        assert_eq!(report.deleted, 1);
    }

    #[tokio::test]
    async fn declined_season_is_left_monitored() {
        let calls = call_log();
        let sonarr = FakeSonarr::new(calls.clone());
        let tracker = FakeTracker::new(&[], calls.clone());
        let mut console = ScriptedConsole::new(&["1", "1", "n"]);

        let report = prune_season(&sonarr, &tracker, &mut console, 10)
            .await
            .expect("workflow completes");

        assert_eq!(*calls.lock().await, vec!["series.list"]);
        assert!(console.contains("Skipped deletion of Season 1 of 'Show'."));
        assert!(sonarr.updated.lock().await.is_empty());
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn unreadable_season_confirmation_is_a_decline() {
        let calls = call_log();
        let sonarr = FakeSonarr::new(calls.clone());
        let tracker = FakeTracker::new(&[], calls.clone());
        let mut console = ScriptedConsole::new(&["1", "2"]).failing_at(3);

        let report = prune_season(&sonarr, &tracker, &mut console, 10)
            .await
            .expect("a bad confirmation read is not fatal");

        assert_eq!(*calls.lock().await, vec!["series.list"]);
        assert!(console.contains("Failed to read confirmation"));
        assert!(console.contains("Skipped deletion of Season 2 of 'Show'."));
        assert!(sonarr.updated.lock().await.is_empty());
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn season_zero_deletes_whole_series_with_request_first() {
        let calls = call_log();
        let sonarr = FakeSonarr::new(calls.clone());
        let tracker = FakeTracker::new(&[(100, 20)], calls.clone());
        let mut console = ScriptedConsole::new(&["1", "0", "y"]);

        let report = prune_season(&sonarr, &tracker, &mut console, 10)
            .await
            .expect("workflow completes");

        assert_eq!(
            *calls.lock().await,
            vec![
                "series.list",
                "tracker.list",
                "tracker.delete(100)",
                "catalog.delete(7)"
            ]
        );
        assert!(console.contains("Series 'Show' was successfully deleted from Sonarr."));
        assert_eq!(report.deleted, 1);
        assert_eq!(report.requests_deleted, 1);
    }

    #[tokio::test]
    async fn series_zero_cancels() {
        let calls = call_log();
        let sonarr = FakeSonarr::new(calls.clone());
        let tracker = FakeTracker::new(&[], calls.clone());
        let mut console = ScriptedConsole::new(&["0"]);

        prune_season(&sonarr, &tracker, &mut console, 10)
            .await
            .expect("workflow completes");

        assert!(console.contains("No series selected. Exiting."));
        assert_eq!(*calls.lock().await, vec!["series.list"]);
    }

    #[tokio::test]
    async fn invalid_series_choice_warns_and_ends() {
        let calls = call_log();
        let sonarr = FakeSonarr::new(calls.clone());
        let tracker = FakeTracker::new(&[], calls.clone());
        let mut console = ScriptedConsole::new(&["9"]);

        let report = prune_season(&sonarr, &tracker, &mut console, 10)
            .await
            .expect("invalid input is not fatal");

        assert!(console.contains("Invalid selection: 9"));
        assert_eq!(report, WorkflowReport::default());
    }

    #[tokio::test]
    async fn empty_season_skips_bulk_call_but_unmonitors() {
        let calls = call_log();
        let mut sonarr = FakeSonarr::new(calls.clone());
        sonarr.files.retain(|file| file.season_number != 1);
        let tracker = FakeTracker::new(&[], calls.clone());
        let mut console = ScriptedConsole::new(&["1", "1", "y"]);

        prune_season(&sonarr, &tracker, &mut console, 10)
            .await
            .expect("workflow completes");

        assert_eq!(
            *calls.lock().await,
            vec!["series.list", "files(7,1)", "update(7)"]
        );
        assert!(console.contains("No episode files found for Season 1 of 'Show'; nothing to delete."));
    }

    #[tokio::test]
    async fn failed_bulk_delete_keeps_season_monitored() {
        let calls = call_log();
        let mut sonarr = FakeSonarr::new(calls.clone());
        sonarr.fail_bulk = true;
        let tracker = FakeTracker::new(&[], calls.clone());
        let mut console = ScriptedConsole::new(&["1", "2", "y"]);

        let report = prune_season(&sonarr, &tracker, &mut console, 10)
            .await
            .expect("workflow completes");

        assert!(console.contains("Failed to delete Season 2 of 'Show' from Sonarr: unexpected status 500"));
        assert!(sonarr.updated.lock().await.is_empty());
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn limit_truncates_series_list() {
        let calls = call_log();
        let sonarr = FakeSonarr::new(calls.clone());
        let tracker = FakeTracker::new(&[], calls.clone());
        let mut console = ScriptedConsole::new(&["0"]);

        prune_season(&sonarr, &tracker, &mut console, 1)
            .await
            .expect("workflow completes");

        assert!(console.contains("1: Show (3.00 GB)"));
        assert!(!console.contains("Small"));
    }
}
