use anyhow::Result;
use std::process::ExitCode;
use vidgrab_core::{deps, Config};

pub async fn run(config: &Config) -> Result<ExitCode> {
    println!("vidgrab dependency check\n");

    let statuses = deps::check_all(config).await;
    let mut required_ok = true;

    for status in &statuses {
        print!("{:<8} ", format!("{}:", status.name));
        match (&status.path, &status.version) {
            (Some(path), Some(version)) => {
                println!("OK ({}, {})", version, path.display());
            }
            (Some(path), None) => {
                println!("FOUND but failed to get version ({})", path.display());
                required_ok &= !status.required;
            }
            (None, _) => {
                println!("NOT FOUND");
                match status.name {
                    "yt-dlp" => println!("         Install with: pip install yt-dlp (or brew install yt-dlp)"),
                    _ => println!("         Install with: sudo apt install ffmpeg (or brew install ffmpeg)"),
                }
                if !status.required {
                    println!("         Audio extraction and format merging will not work");
                }
                required_ok &= !status.required;
            }
        }
    }

    println!();
    if statuses.iter().all(|s| s.is_ok()) {
        println!("All dependencies OK!");
    } else if required_ok {
        println!("vidgrab will run, but some features are unavailable.");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
