//! List, select, confirm and delete catalog items along with their requests.

use crate::client::{CliError, CliResult};
use crate::console::{Console, Tone};
use crate::output::format_gb;
use crate::resolver::{TrackedRequest, resolve};

use super::{
    Catalog, CatalogItem, RequestTracker, WorkflowReport, capitalize, confirm, display_window,
    parse_selections, read_line, show_numbered,
};

/// Run the full search-and-delete flow for one catalog.
pub(crate) async fn search_and_delete<C, T>(
    catalog: &C,
    tracker: &T,
    console: &mut dyn Console,
    skip: usize,
    limit: usize,
) -> CliResult<WorkflowReport>
where
    C: Catalog + ?Sized,
    T: RequestTracker + ?Sized,
{
    let noun = catalog.noun();
    let plural = catalog.plural();
    let items = catalog.list_all().await.map_err(|err| {
        CliError::failure(err.context(format!(
            "failed to fetch {plural} from {}",
            catalog.service_name()
        )))
    })?;
    tracing::debug!(count = items.len(), noun, "fetched catalog");

    let displayed = display_window(items, skip, limit);
    if displayed.is_empty() {
        console.say(
            Tone::Plain,
            &format!("No {plural} with files on disk to show."),
        );
        return Ok(WorkflowReport::default());
    }
    show_numbered(
        console,
        &format!("{}:", capitalize(plural)),
        displayed
            .iter()
            .map(|item| (item.title.as_str(), item.size_bytes)),
    );

    let line = read_line(
        console,
        Tone::Prompt,
        &format!("Select {noun} numbers to delete (comma-separated): "),
    )?;
    let selections = parse_selections(&line, displayed.len());
    for token in &selections.rejected {
        console.say(Tone::Warning, &format!("Invalid selection: {token}"));
    }

    let chosen: Vec<&CatalogItem> = selections
        .ordinals
        .iter()
        .filter_map(|ordinal| displayed.get(ordinal - 1))
        .collect();
    if chosen.is_empty() {
        console.say(Tone::Plain, &format!("No {plural} selected."));
        return Ok(WorkflowReport::default());
    }

    process_selections(catalog, tracker, console, &chosen).await
}

/// Fetch tracked requests once, then confirm and delete each chosen item.
pub(crate) async fn process_selections<C, T>(
    catalog: &C,
    tracker: &T,
    console: &mut dyn Console,
    chosen: &[&CatalogItem],
) -> CliResult<WorkflowReport>
where
    C: Catalog + ?Sized,
    T: RequestTracker + ?Sized,
{
    let requests = tracker.list_all().await.map_err(|err| {
        CliError::failure(err.context(format!(
            "failed to fetch requests from {}",
            tracker.service_name()
        )))
    })?;
    tracing::debug!(count = requests.len(), "fetched tracked requests");

    let mut report = WorkflowReport::default();
    for item in chosen {
        process_item(catalog, tracker, console, &requests, item, &mut report).await;
    }
    Ok(report)
}

async fn process_item<C, T>(
    catalog: &C,
    tracker: &T,
    console: &mut dyn Console,
    requests: &[TrackedRequest],
    item: &CatalogItem,
    report: &mut WorkflowReport,
) where
    C: Catalog + ?Sized,
    T: RequestTracker + ?Sized,
{
    let title = &item.title;
    let prompt = format!(
        "Are you sure you want to delete '{title}' ({})? (y/N): ",
        format_gb(item.size_bytes)
    );
    if !confirm(console, &prompt) {
        console.say(Tone::Plain, &format!("Skipped deletion of '{title}'."));
        report.skipped += 1;
        return;
    }

    let tracker_name = tracker.service_name();
    match resolve(item.external_id, requests) {
        Ok(request) => match tracker.delete_by_id(request.id).await {
            Ok(()) => {
                tracing::info!(request_id = request.id, title = %title, "request deleted");
                console.say(
                    Tone::Success,
                    &format!("Request '{title}' was successfully deleted from {tracker_name}."),
                );
                report.requests_deleted += 1;
            }
            Err(err) => {
                console.say(
                    Tone::Failure,
                    &format!("Failed to delete request for '{title}' from {tracker_name}: {err:#}"),
                );
                report.failed += 1;
            }
        },
        Err(not_found) => {
            console.say(
                Tone::Failure,
                &format!("Could not remove '{title}' from {tracker_name}: {not_found}"),
            );
            report.unresolved += 1;
        }
    }

    let noun = catalog.noun();
    let service = catalog.service_name();
    match catalog.delete_by_id(item.id).await {
        Ok(()) => {
            tracing::info!(id = item.id, title = %title, noun, "catalog item deleted");
            console.say(
                Tone::Success,
                &format!(
                    "{} '{title}' was successfully deleted from {service}.",
                    capitalize(noun)
                ),
            );
            report.deleted += 1;
        }
        Err(err) => {
            console.say(
                Tone::Failure,
                &format!("Failed to delete {noun} '{title}' from {service}: {err:#}"),
            );
            report.failed += 1;
        }
    }
}
