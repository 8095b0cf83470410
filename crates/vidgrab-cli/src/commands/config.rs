use anyhow::Result;
use std::path::Path;
use vidgrab_core::config::Config;

pub fn run(config: &Config, config_path: Option<&Path>) -> Result<()> {
    println!("vidgrab configuration\n");

    if config.paths.yt_dlp.is_none() {
        println!("# paths.yt_dlp: (auto-detect)");
    }
    if config.paths.ffmpeg.is_none() {
        println!("# paths.ffmpeg: (auto-detect)");
    }
    println!("{}", toml::to_string_pretty(config)?);

    // Show config file locations
    println!("Config file locations (in priority order):");
    println!("  1. Environment variables (VIDGRAB_*, `__` between sections, e.g. VIDGRAB_DOWNLOAD__RETRIES)");
    if let Some(p) = config_path {
        println!("  2. {} (specified)", p.display());
    }
    if let Some(p) = Config::default_path() {
        println!("  3. {}", p.display());
    }

    Ok(())
}
