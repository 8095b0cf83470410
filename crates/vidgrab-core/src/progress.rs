//! Machine-readable progress reporting from yt-dlp

use std::path::PathBuf;

/// Marker that starts every line produced by [`PROGRESS_TEMPLATE`]
pub const PROGRESS_PREFIX: &str = "vidgrab|";

/// Handed to `--progress-template`; fields are `|`-separated and the filename comes last
/// since it may itself contain separators.
pub const PROGRESS_TEMPLATE: &str = "download:vidgrab|%(progress.status)s|%(progress._percent_str)s|%(progress._speed_str)s|%(progress._eta_str)s|%(progress.filename)s";

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Downloading {
        percent: Option<f32>,
        speed: Option<String>,
        eta: Option<String>,
    },
    Finished {
        filename: Option<PathBuf>,
    },
}

impl ProgressEvent {
    pub fn speed_str(&self) -> &str {
        match self {
            ProgressEvent::Downloading { speed: Some(s), .. } => s,
            _ => "N/A",
        }
    }

    pub fn eta_str(&self) -> &str {
        match self {
            ProgressEvent::Downloading { eta: Some(e), .. } => e,
            _ => "N/A",
        }
    }
}

fn field(raw: &str) -> Option<String> {
    let value = raw.trim();
    match value {
        "" | "NA" | "N/A" | "None" => None,
        v if v.starts_with("Unknown") => None,
        v => Some(v.to_string()),
    }
}

/// Parse one stdout line from yt-dlp. Lines not produced by the template yield `None`.
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let rest = line.trim_end_matches(['\r', '\n']).strip_prefix(PROGRESS_PREFIX)?;
    let mut parts = rest.splitn(5, '|');

    let status = parts.next()?.trim();
    let percent = parts.next().and_then(field);
    let speed = parts.next().and_then(field);
    let eta = parts.next().and_then(field);
    let filename = parts.next().and_then(field).map(PathBuf::from);

    match status {
        "downloading" => Some(ProgressEvent::Downloading {
            percent: percent.and_then(|p| p.trim_end_matches('%').trim().parse().ok()),
            speed,
            eta,
        }),
        "finished" => Some(ProgressEvent::Finished { filename }),
        _ => None,
    }
}
