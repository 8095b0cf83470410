//! Invocation of yt-dlp for info extraction and downloads

use crate::config::Config;
use crate::error::{classify_failure, engine_error_lines, ExtractError};
use crate::info::MediaInfo;
use crate::options::DownloadOptions;
use crate::progress::{parse_progress_line, ProgressEvent, PROGRESS_TEMPLATE};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Extractor {
    yt_dlp_path: PathBuf,
}

/// Outcome of a download run that produced at least one file or exited cleanly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Streams yt-dlp reported as finished; merged formats count once per stream
    pub finished: usize,
    /// `ERROR:` lines yt-dlp printed for items it skipped
    pub errors: Vec<String>,
}

impl DownloadReport {
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn spawn_error(e: io::Error) -> ExtractError {
    if e.kind() == io::ErrorKind::NotFound {
        ExtractError::EngineNotFound
    } else {
        ExtractError::Io(e)
    }
}

impl Extractor {
    pub fn new(yt_dlp_path: PathBuf) -> Self {
        Self { yt_dlp_path }
    }

    pub fn from_config(config: &Config) -> Result<Self, ExtractError> {
        let path = config
            .yt_dlp_path()
            .map_err(|_| ExtractError::EngineNotFound)?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.yt_dlp_path
    }

    pub async fn version(&self) -> Result<String, ExtractError> {
        let output = Command::new(&self.yt_dlp_path)
            .arg("--version")
            .output()
            .await
            .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(ExtractError::EngineFailed {
                code: output.status.code(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Resolve what a download with `opts` would fetch, without downloading.
    ///
    /// Playlists are resolved flat, so entries carry only ids and titles.
    pub async fn probe(&self, url: &str, opts: &DownloadOptions) -> Result<MediaInfo, ExtractError> {
        let mut args = vec!["--flat-playlist".to_string()];
        args.extend(opts.probe_args());
        self.dump_json(url, &args).await
    }

    /// Full info for `url`, including its format list
    pub async fn info(&self, url: &str) -> Result<MediaInfo, ExtractError> {
        self.dump_json(url, &[]).await
    }

    async fn dump_json(&self, url: &str, extra: &[String]) -> Result<MediaInfo, ExtractError> {
        debug!("Extracting info for: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args(["-J", "--no-warnings", "--no-colors"])
            .args(extra)
            .arg("--")
            .arg(url)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(spawn_error)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let body = stdout.trim();

        // With --ignore-errors a playlist can exit non-zero yet still produce usable JSON.
        if !body.is_empty() && body != "null" {
            match MediaInfo::from_json(body) {
                Ok(info) => {
                    for line in engine_error_lines(&stderr) {
                        warn!("{}", line);
                    }
                    return Ok(info);
                }
                Err(e) if output.status.success() => {
                    return Err(ExtractError::InfoParse(e.to_string()));
                }
                Err(e) => debug!("Discarding unparsable output: {}", e),
            }
        }

        if output.status.success() {
            return Err(ExtractError::InfoParse("yt-dlp returned no info".to_string()));
        }

        debug!("yt-dlp stderr: {}", stderr);
        Err(classify_failure(url, &stderr, output.status.code()))
    }

    /// Download `url`, forwarding progress events as they arrive.
    ///
    /// The yt-dlp process is killed if this future is dropped.
    pub async fn download(
        &self,
        url: &str,
        opts: &DownloadOptions,
        progress: mpsc::Sender<ProgressEvent>,
    ) -> Result<DownloadReport, ExtractError> {
        info!("Downloading: {}", url);
        tokio::fs::create_dir_all(&opts.output_dir).await?;

        let args = opts.to_args();
        debug!("yt-dlp args: {:?}", args);

        let mut child = Command::new(&self.yt_dlp_path)
            .args(&args)
            .args(["--newline", "--no-colors", "--progress-template", PROGRESS_TEMPLATE])
            .arg("--")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("yt-dlp stdout not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("yt-dlp stderr not captured"))?;

        // Titles and filenames are not guaranteed to be UTF-8, so lines are decoded lossily.
        let read_stdout = async {
            let mut finished = 0;
            let mut segments = BufReader::new(stdout).split(b'\n');
            while let Some(raw) = segments.next_segment().await? {
                let line = String::from_utf8_lossy(&raw);
                match parse_progress_line(&line) {
                    Some(event) => {
                        if matches!(event, ProgressEvent::Finished { .. }) {
                            finished += 1;
                        }
                        let _ = progress.send(event).await;
                    }
                    None if !line.trim().is_empty() => debug!("yt-dlp: {}", line),
                    None => {}
                }
            }
            Ok::<usize, io::Error>(finished)
        };

        let read_stderr = async {
            let mut text = String::new();
            let mut segments = BufReader::new(stderr).split(b'\n');
            while let Some(raw) = segments.next_segment().await? {
                let line = String::from_utf8_lossy(&raw);
                let line = line.trim_end_matches('\r');
                if line.starts_with("WARNING:") {
                    warn!("{}", line.trim_start_matches("WARNING:").trim());
                } else {
                    debug!("yt-dlp stderr: {}", line);
                }
                text.push_str(line);
                text.push('\n');
            }
            Ok::<String, io::Error>(text)
        };

        let (finished, stderr_text) = tokio::try_join!(read_stdout, read_stderr)?;
        let status = child.wait().await?;
        debug!("yt-dlp exited with {}", status);

        if !status.success() && finished == 0 {
            return Err(classify_failure(url, &stderr_text, status.code()));
        }

        Ok(DownloadReport {
            finished,
            errors: engine_error_lines(&stderr_text),
        })
    }
}
