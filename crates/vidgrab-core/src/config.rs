//! Configuration management for vidgrab

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub download: DownloadConfig,
    pub audio: AudioConfig,
    pub subtitles: SubtitlesConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Default output directory
    pub output_dir: PathBuf,
    /// Retry count handed to yt-dlp for whole downloads
    pub retries: u32,
    /// Retry count handed to yt-dlp for fragmented (DASH/HLS) downloads
    pub fragment_retries: u32,
    /// Keep going past failed playlist entries
    pub ignore_errors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Codec for `--audio` extraction
    pub codec: String,
    /// Bitrate in kbps, or a VBR level 0-10
    pub quality: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitlesConfig {
    pub langs: Vec<String>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("downloads"),
            retries: 5,
            fragment_retries: 5,
            ignore_errors: true,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            codec: "mp3".to_string(),
            quality: "192".to_string(),
        }
    }
}

impl Default for SubtitlesConfig {
    fn default() -> Self {
        Self {
            langs: vec!["en".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = Self::default_path() {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::LoadError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        // VIDGRAB_DOWNLOAD__RETRIES=3 -> download.retries
        figment = figment.merge(Env::prefixed("VIDGRAB_").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/vidgrab/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("vidgrab/config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.audio.codec.trim().is_empty() {
            return Err(ConfigError::InvalidValue("audio.codec must not be empty".to_string()));
        }
        if self.subtitles.langs.is_empty() {
            return Err(ConfigError::InvalidValue(
                "subtitles.langs needs at least one language".to_string(),
            ));
        }
        Ok(())
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp")
                .map_err(|_| ConfigError::InvalidValue("yt-dlp not found in PATH".to_string()))
        }
    }

    /// Get FFmpeg path, auto-detecting if not configured
    pub fn ffmpeg_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.ffmpeg {
            Ok(path.clone())
        } else {
            which::which("ffmpeg")
                .map_err(|_| ConfigError::InvalidValue("ffmpeg not found in PATH".to_string()))
        }
    }
}
