//! Mapping of vidgrab download settings onto yt-dlp options

use crate::config::Config;
use crate::error::OptionsError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Requested video quality when no explicit format code is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    #[default]
    Best,
    Worst,
    /// Cap on video height in pixels
    MaxHeight(u32),
}

impl FromStr for Quality {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "best" => Ok(Quality::Best),
            "worst" => Ok(Quality::Worst),
            other => {
                let digits = other.strip_suffix('p').unwrap_or(other);
                match digits.parse::<u32>() {
                    Ok(h) if h > 0 => Ok(Quality::MaxHeight(h)),
                    _ => Err(OptionsError::InvalidQuality(trimmed.to_string())),
                }
            }
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Best => write!(f, "best"),
            Quality::Worst => write!(f, "worst"),
            Quality::MaxHeight(h) => write!(f, "{}", h),
        }
    }
}

/// What a download will fetch, resolved from the option precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadMode {
    AudioOnly { codec: String },
    CustomFormat(String),
    Quality(Quality),
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadMode::AudioOnly { codec } => {
                write!(f, "Audio only ({})", codec.to_uppercase())
            }
            DownloadMode::CustomFormat(code) => write!(f, "Custom format ({})", code),
            DownloadMode::Quality(Quality::Best) => write!(f, "Best quality"),
            DownloadMode::Quality(Quality::Worst) => write!(f, "Lowest quality"),
            DownloadMode::Quality(Quality::MaxHeight(h)) => write!(f, "Up to {}p quality", h),
        }
    }
}

/// Options for a single download invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub output_dir: PathBuf,
    pub quality: Quality,
    pub format_code: Option<String>,
    pub audio_only: bool,
    pub subtitles: bool,
    /// 1-based
    pub playlist_start: u32,
    pub no_playlist: bool,
    pub retries: u32,
    pub fragment_retries: u32,
    pub ignore_errors: bool,
    pub audio_codec: String,
    pub audio_quality: String,
    pub subtitle_langs: Vec<String>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl DownloadOptions {
    /// Seed options from configured defaults; CLI flags are applied on top.
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.download.output_dir.clone(),
            quality: Quality::Best,
            format_code: None,
            audio_only: false,
            subtitles: false,
            playlist_start: 1,
            no_playlist: false,
            retries: config.download.retries,
            fragment_retries: config.download.fragment_retries,
            ignore_errors: config.download.ignore_errors,
            audio_codec: config.audio.codec.clone(),
            audio_quality: config.audio.quality.clone(),
            subtitle_langs: config.subtitles.langs.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.playlist_start == 0 {
            return Err(OptionsError::InvalidPlaylistStart);
        }
        Ok(())
    }

    /// Audio-only beats an explicit format code, which beats quality.
    pub fn mode(&self) -> DownloadMode {
        if self.audio_only {
            DownloadMode::AudioOnly {
                codec: self.audio_codec.clone(),
            }
        } else if let Some(code) = self.format_code.as_deref().filter(|c| !c.trim().is_empty()) {
            DownloadMode::CustomFormat(code.trim().to_string())
        } else {
            DownloadMode::Quality(self.quality)
        }
    }

    /// The yt-dlp `-f` selector for this download
    pub fn format_selector(&self) -> String {
        match self.mode() {
            DownloadMode::AudioOnly { .. } => "bestaudio/best".to_string(),
            DownloadMode::CustomFormat(code) => code,
            DownloadMode::Quality(Quality::Best) => "bestvideo+bestaudio/best".to_string(),
            DownloadMode::Quality(Quality::Worst) => "worst".to_string(),
            DownloadMode::Quality(Quality::MaxHeight(h)) => {
                format!("bestvideo[height<={h}]+bestaudio/best[height<={h}]")
            }
        }
    }

    /// Absolute form of `output_dir` for display. The directory itself is
    /// created by `Extractor::download`, so it need not exist yet.
    pub fn resolved_output_dir(&self) -> PathBuf {
        std::path::absolute(&self.output_dir).unwrap_or_else(|_| self.output_dir.clone())
    }

    pub fn output_template(&self) -> String {
        self.output_dir
            .join("%(title)s.%(ext)s")
            .to_string_lossy()
            .into_owned()
    }

    /// Flags that change which items yt-dlp resolves, shared with the info probe.
    pub fn probe_args(&self) -> Vec<String> {
        let mut args = vec![
            "--playlist-start".to_string(),
            self.playlist_start.to_string(),
        ];
        args.push(if self.no_playlist { "--no-playlist" } else { "--yes-playlist" }.to_string());
        if self.ignore_errors {
            args.push("--ignore-errors".to_string());
        }
        args
    }

    /// Full yt-dlp argument list, excluding the URL
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            self.output_template(),
            "-f".to_string(),
            self.format_selector(),
        ];
        args.extend(self.probe_args());
        args.extend([
            "--retries".to_string(),
            self.retries.to_string(),
            "--fragment-retries".to_string(),
            self.fragment_retries.to_string(),
        ]);

        if self.audio_only {
            args.extend([
                "--extract-audio".to_string(),
                "--audio-format".to_string(),
                self.audio_codec.clone(),
                "--audio-quality".to_string(),
                self.audio_quality.clone(),
            ]);
        }

        if self.subtitles {
            args.extend([
                "--write-subs".to_string(),
                "--write-auto-subs".to_string(),
                "--sub-langs".to_string(),
                self.subtitle_langs.join(","),
            ]);
        }

        args
    }
}
