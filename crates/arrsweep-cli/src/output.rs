//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use arrsweep_clients::{MediaRequest, Movie};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const BYTES_PER_GB: f64 = 1_073_741_824.0;

/// Size in gigabytes (2^30 bytes) with two decimals, e.g. `3.00 GB`.
#[must_use]
pub(crate) fn format_gb(bytes: u64) -> String {
    format!("{:.2} GB", bytes_to_f64(bytes) / BYTES_PER_GB)
}

fn bytes_to_f64(value: u64) -> f64 {
    let high = u32::try_from(value >> 32).unwrap_or(u32::MAX);
    let low = u32::try_from(value & 0xFFFF_FFFF).unwrap_or(u32::MAX);
    f64::from(high) * 4_294_967_296.0 + f64::from(low)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

pub(crate) fn render_movie_list(movies: &[Movie], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(movies),
        OutputFormat::Table => {
            let rows: Vec<[String; 4]> = movies
                .iter()
                .map(|movie| {
                    [
                        movie.title.clone(),
                        movie.original_title.clone().unwrap_or_default(),
                        format_gb(movie.size_on_disk_bytes()),
                        movie.file_path().unwrap_or("").to_string(),
                    ]
                })
                .collect();
            Ok(render_table(
                ["TITLE", "ORIGINAL TITLE", "SIZE", "PATH"],
                &rows,
            ))
        }
    }
}

pub(crate) fn render_request_list(
    requests: &[MediaRequest],
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(requests),
        OutputFormat::Table => {
            let rows: Vec<[String; 6]> = requests
                .iter()
                .map(|request| {
                    let media = request.media.as_ref();
                    [
                        request.id.to_string(),
                        request_status(request.status).to_string(),
                        media
                            .and_then(|media| media.media_type.clone())
                            .unwrap_or_else(|| "-".to_string()),
                        media
                            .and_then(arrsweep_clients::Media::external_id)
                            .map_or_else(|| "-".to_string(), |id| id.to_string()),
                        request
                            .requested_by
                            .as_ref()
                            .and_then(|user| user.display_name.clone())
                            .unwrap_or_else(|| "-".to_string()),
                        request.created_at.clone().unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect();
            Ok(render_table(
                ["ID", "STATUS", "TYPE", "EXTERNAL ID", "REQUESTED BY", "CREATED"],
                &rows,
            ))
        }
    }
}

/// Overseerr request status codes.
#[must_use]
pub(crate) const fn request_status(status: Option<i32>) -> &'static str {
    match status {
        Some(1) => "pending",
        Some(2) => "approved",
        Some(3) => "declined",
        Some(4) => "failed",
        Some(5) => "completed",
        _ => "unknown",
    }
}

/// Left-aligned columns sized to their widest cell; the last column is not
/// padded.
fn render_table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths = headers.map(|header| header.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &widths, headers.iter().copied());
    for row in rows {
        push_row(&mut out, &widths, row.iter().map(String::as_str));
    }
    out
}

fn push_row<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let mut line = String::new();
    for (index, (cell, width)) in cells.zip(widths).enumerate() {
        if index + 1 == widths.len() {
            line.push_str(cell);
        } else {
            line.push_str(&format!("{cell:<width$}  "));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
