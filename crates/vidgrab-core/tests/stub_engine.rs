//! Drives `Extractor` against a shell script standing in for yt-dlp.
//!
//! Everything runs inside one test so no other test thread forks while a
//! script is still open for writing.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use vidgrab_core::progress::ProgressEvent;
use vidgrab_core::{deps, Config, DownloadOptions, ExtractError, Extractor};

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[tokio::test]
async fn test_extractor_against_stub_engine() {
    let dir = tempfile::tempdir().unwrap();

    let video = write_script(
        dir.path(),
        "video",
        r#"case "$*" in
  *--version*) echo "2024.08.06" ;;
  *-J*) echo '{"id":"abc","title":"Stub Video","formats":[{"format_id":"18","ext":"mp4","resolution":"640x360"}]}' ;;
  *)
    echo "[youtube] Extracting URL"
    echo "vidgrab|downloading| 50.0%|1.00MiB/s|00:05|out/Stub Video.mp4"
    echo "vidgrab|finished|100.0%|NA|NA|out/Stub Video.mp4"
    ;;
esac"#,
    );

    let playlist = write_script(
        dir.path(),
        "playlist",
        r#"case "$*" in
  *-J*)
    echo '{"id":"PL1","title":"Mix","entries":[{"id":"a"},null,{"id":"c"}]}'
    echo "ERROR: [youtube] b: Private video" >&2
    exit 1 ;;
  *)
    echo "vidgrab|finished|100.0%|NA|NA|out/a.mp4"
    echo "ERROR: [youtube] b: Private video" >&2
    exit 1 ;;
esac"#,
    );

    let failing = write_script(
        dir.path(),
        "failing",
        r#"echo "ERROR: [youtube] zzz: Video unavailable" >&2
exit 1"#,
    );

    let garbage = write_script(dir.path(), "garbage", "echo 'not json'");

    let latin1 = write_script(
        dir.path(),
        "latin1",
        r#"printf 'vidgrab|downloading| 10.0%%|1.00MiB/s|00:01|out/caf\351.mp4\n'
printf 'WARNING: title caf\351 re-encoded\n' >&2
printf 'vidgrab|finished|100.0%%|NA|NA|out/caf\351.mp4\n'"#,
    );

    let opts = DownloadOptions {
        output_dir: dir.path().join("out"),
        ..Default::default()
    };

    // Version and info
    let extractor = Extractor::new(video.clone());
    assert_eq!(extractor.version().await.unwrap(), "2024.08.06");

    let mut config = Config::default();
    config.paths.yt_dlp = Some(video);
    config.paths.ffmpeg = Some(dir.path().join("no-ffmpeg"));
    let statuses = deps::check_all(&config).await;
    assert_eq!(statuses[0].name, "yt-dlp");
    assert_eq!(statuses[0].version.as_deref(), Some("2024.08.06"));
    assert!(statuses[0].is_ok());
    assert!(!statuses[1].is_ok());

    let info = extractor.info("https://youtu.be/abc").await.unwrap();
    assert!(!info.is_playlist());
    assert_eq!(info.display_title(), "Stub Video");
    assert_eq!(info.formats()[0].display_resolution(), "640x360");

    // Download with progress
    let (tx, mut rx) = mpsc::channel(16);
    let report = extractor
        .download("https://youtu.be/abc", &opts, tx)
        .await
        .unwrap();
    assert_eq!(report.finished, 1);
    assert!(!report.is_partial());
    assert!(opts.output_dir.is_dir());

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], ProgressEvent::Downloading { percent: Some(p), .. } if p == 50.0));
    assert!(matches!(events[1], ProgressEvent::Finished { .. }));

    // Playlist with a skipped entry still probes and downloads
    let extractor = Extractor::new(playlist);
    let info = extractor.probe("https://youtube.com/playlist?list=PL1", &opts).await.unwrap();
    assert!(info.is_playlist());
    assert_eq!(info.entry_count(), 3);

    let (tx, _rx) = mpsc::channel(16);
    let report = extractor
        .download("https://youtube.com/playlist?list=PL1", &opts, tx)
        .await
        .unwrap();
    assert_eq!(report.finished, 1);
    assert_eq!(report.errors, vec!["[youtube] b: Private video"]);

    // Hard failures are classified
    let extractor = Extractor::new(failing);
    let err = extractor.info("https://youtu.be/zzz").await.unwrap_err();
    assert!(matches!(err, ExtractError::Unavailable(_)));
    let (tx, _rx) = mpsc::channel(16);
    let err = extractor
        .download("https://youtu.be/zzz", &opts, tx)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::Unavailable(_)));

    // Output that is not UTF-8 is decoded lossily instead of aborting the download
    let extractor = Extractor::new(latin1);
    let (tx, mut rx) = mpsc::channel(16);
    let report = extractor
        .download("https://youtu.be/cafe", &opts, tx)
        .await
        .unwrap();
    assert_eq!(report.finished, 1);
    assert!(!report.is_partial());

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], ProgressEvent::Downloading { percent: Some(p), .. } if p == 10.0));
    assert_eq!(
        events[1],
        ProgressEvent::Finished {
            filename: Some(PathBuf::from("out/caf\u{FFFD}.mp4")),
        }
    );

    // Successful exit with unparsable output
    let extractor = Extractor::new(garbage);
    let err = extractor.info("https://youtu.be/abc").await.unwrap_err();
    assert!(matches!(err, ExtractError::InfoParse(_)));
}
