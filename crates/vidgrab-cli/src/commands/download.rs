use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::args::DownloadArgs;
use vidgrab_core::progress::ProgressEvent;
use vidgrab_core::{Config, Extractor};

/// Conventional exit status after SIGINT
const EXIT_INTERRUPTED: u8 = 130;

pub async fn run(url: &str, args: &DownloadArgs, config: &Config) -> Result<ExitCode> {
    let opts = args.to_options(config);
    opts.validate()?;

    let extractor = Extractor::from_config(config)?;
    debug!("Using yt-dlp at {}", extractor.path().display());

    let output_dir = opts.resolved_output_dir();

    println!("Mode: {}", opts.mode());
    if opts.subtitles {
        println!("Subtitles: Enabled ({})", opts.subtitle_langs.join(", "));
    }
    println!("Output: {}", output_dir.display());
    println!("URL: {}\n", url);

    // Show what we're about to download
    let probed = tokio::select! {
        res = extractor.probe(url, &opts) => Some(res),
        _ = tokio::signal::ctrl_c() => None,
    };
    let Some(media) = probed else {
        println!("\n\nDownload cancelled by user");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    };
    let media = media?;

    if media.is_playlist() {
        println!(
            "Playlist detected: {} ({} videos)",
            media.display_title(),
            media.entry_count()
        );
        if opts.playlist_start > 1 {
            println!("Starting from video #{}", opts.playlist_start);
        }
        println!();
    } else {
        match media.display_duration() {
            Some(duration) => println!("Single video: {} ({})\n", media.display_title(), duration),
            None => println!("Single video: {}\n", media.display_title()),
        }
    }

    let (tx, mut rx) = mpsc::channel(32);

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}",
        )?
        .progress_chars("=>-"),
    );

    let progress_handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match &event {
                ProgressEvent::Downloading { percent, .. } => {
                    if let Some(p) = percent {
                        pb.set_position(p.clamp(0.0, 100.0) as u64);
                    }
                    pb.set_message(format!("at {} (ETA: {})", event.speed_str(), event.eta_str()));
                }
                ProgressEvent::Finished { filename } => {
                    let name = filename
                        .as_ref()
                        .and_then(|f| f.file_name())
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    pb.println(format!("Download finished, processing... {}", name));
                    pb.reset();
                }
            }
        }
        pb.finish_and_clear();
    });

    let outcome = tokio::select! {
        res = extractor.download(url, &opts, tx) => Some(res),
        _ = tokio::signal::ctrl_c() => None,
    };

    // The sender is gone either way, so the handler drains and exits
    progress_handle.await?;

    let Some(result) = outcome else {
        println!("\n\nDownload cancelled by user");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    };
    let report = result?;
    info!("yt-dlp finished {} stream(s)", report.finished);

    if report.is_partial() {
        println!("\nDownload completed with {} error(s):", report.errors.len());
        for error in &report.errors {
            println!("  {}", error);
        }
    } else {
        println!("\nDownload completed successfully!");
    }

    Ok(ExitCode::SUCCESS)
}
