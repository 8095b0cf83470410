//! External tool discovery

use crate::config::Config;
use crate::extractor::Extractor;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DependencyStatus {
    pub name: &'static str,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
    /// Whether vidgrab can run at all without this tool
    pub required: bool,
}

impl DependencyStatus {
    pub fn is_ok(&self) -> bool {
        self.path.is_some() && self.version.is_some()
    }
}

/// FFmpeg is only needed for merging formats and audio extraction.
pub fn check_ffmpeg(config: &Config) -> Option<PathBuf> {
    config.ffmpeg_path().ok()
}

async fn version_of(path: &Path, flag: &str) -> Option<String> {
    let output = Command::new(path).arg(flag).output().await.ok()?;
    if !output.status.success() {
        debug!("{} {} exited with {}", path.display(), flag, output.status);
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout);
    parse_version_line(text.lines().next().unwrap_or(""))
}

/// `yt-dlp --version` prints the bare version; `ffmpeg -version` starts with
/// `ffmpeg version 6.1.1 Copyright ...`.
pub fn parse_version_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.split_whitespace().collect::<Vec<_>>().as_slice() {
        [_, "version", v, ..] => Some(v.to_string()),
        _ => Some(line.to_string()),
    }
}

pub async fn check_all(config: &Config) -> Vec<DependencyStatus> {
    let yt_dlp = config.yt_dlp_path().ok();
    let yt_dlp_version = match &yt_dlp {
        Some(p) => match Extractor::new(p.clone()).version().await {
            Ok(v) => parse_version_line(&v),
            Err(e) => {
                debug!("yt-dlp --version failed: {}", e);
                None
            }
        },
        None => None,
    };

    let ffmpeg = check_ffmpeg(config);
    let ffmpeg_version = match &ffmpeg {
        Some(p) => version_of(p, "-version").await,
        None => None,
    };

    vec![
        DependencyStatus {
            name: "yt-dlp",
            path: yt_dlp,
            version: yt_dlp_version,
            required: true,
        },
        DependencyStatus {
            name: "ffmpeg",
            path: ffmpeg,
            version: ffmpeg_version,
            required: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_line() {
        assert_eq!(parse_version_line("2024.08.06\n"), Some("2024.08.06".to_string()));
        assert_eq!(
            parse_version_line("ffmpeg version 6.1.1 Copyright (c) 2000-2023"),
            Some("6.1.1".to_string())
        );
        assert_eq!(parse_version_line("   "), None);
    }

    #[test]
    fn test_configured_ffmpeg_path_is_used() {
        let mut config = Config::default();
        config.paths.ffmpeg = Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(check_ffmpeg(&config), Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")));
    }

    #[tokio::test]
    async fn test_missing_tools_report_not_ok() {
        let mut config = Config::default();
        config.paths.yt_dlp = Some(PathBuf::from("/nonexistent/yt-dlp"));
        config.paths.ffmpeg = Some(PathBuf::from("/nonexistent/ffmpeg"));

        let statuses = check_all(&config).await;
        assert_eq!(statuses.len(), 2);
        assert!(statuses.iter().all(|s| !s.is_ok()));
        assert!(statuses[0].required);
        assert!(!statuses[1].required);
    }
}
