//! Error types for vidgrab-core

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("yt-dlp not found. Install with: pip install yt-dlp (or brew install yt-dlp)")]
    EngineNotFound,

    #[error("yt-dlp failed with exit code {code:?}: {message}")]
    EngineFailed { code: Option<i32>, message: String },

    #[error("Invalid or unsupported URL: {0}")]
    InvalidUrl(String),

    #[error("Video unavailable or private: {0}")]
    Unavailable(String),

    #[error("Video is not available in your country: {0}")]
    GeoRestricted(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse yt-dlp output: {0}")]
    InfoParse(String),

    #[error("No format information available")]
    NoFormats,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("invalid quality '{0}': expected best, worst, or a height such as 720")]
    InvalidQuality(String),

    #[error("playlist start index must be 1 or greater")]
    InvalidPlaylistStart,
}

fn error_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^ERROR:\s*(.+)$").expect("valid regex"))
}

/// Lines yt-dlp prefixed with `ERROR:`, without the prefix.
pub fn engine_error_lines(stderr: &str) -> Vec<String> {
    error_line_re()
        .captures_iter(stderr)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Map a failed yt-dlp run to an [`ExtractError`] from what it printed on stderr.
pub fn classify_failure(url: &str, stderr: &str, code: Option<i32>) -> ExtractError {
    let lower = stderr.to_lowercase();

    if lower.contains("is not a valid url") || lower.contains("unsupported url") {
        return ExtractError::InvalidUrl(url.to_string());
    }
    if lower.contains("available in your country")
        || lower.contains("from your location")
        || lower.contains("geo restriction")
        || lower.contains("geo-restricted")
    {
        return ExtractError::GeoRestricted(url.to_string());
    }
    if lower.contains("video unavailable")
        || lower.contains("private video")
        || lower.contains("has been removed")
    {
        return ExtractError::Unavailable(url.to_string());
    }

    let message = engine_error_lines(stderr)
        .pop()
        .unwrap_or_else(|| stderr.trim().lines().last().unwrap_or("").to_string());

    if lower.contains("unable to download webpage")
        || lower.contains("urlopen error")
        || lower.contains("connection reset")
        || lower.contains("timed out")
        || lower.contains("name or service not known")
    {
        return ExtractError::Network(message);
    }

    ExtractError::EngineFailed { code, message }
}
