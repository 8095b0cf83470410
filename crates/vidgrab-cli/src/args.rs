use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vidgrab_core::{Config, DownloadOptions, Quality};

const EXAMPLES: &str = "\
Examples:
  vidgrab download \"https://www.youtube.com/watch?v=VIDEO_ID\"
  vidgrab download \"PLAYLIST_URL\" --start 5
  vidgrab download \"VIDEO_URL\" -o ~/Downloads -q 720
  vidgrab download \"VIDEO_URL\" --audio
  vidgrab download \"VIDEO_URL\" -s
  vidgrab list \"VIDEO_URL\"
  vidgrab download \"VIDEO_URL\" -f \"137+140\"
  vidgrab download \"VIDEO_URL\" --no-playlist";

#[derive(Parser, Debug)]
#[command(name = "vidgrab")]
#[command(
    author,
    version,
    about = "Download videos from YouTube, Facebook, and 1000+ other sites"
)]
#[command(after_help = EXAMPLES)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a video, or every video of a playlist
    Download {
        /// Video or playlist URL
        url: String,

        #[command(flatten)]
        options: DownloadArgs,
    },

    /// List the formats available for a video
    List {
        /// Video URL
        url: String,
    },

    /// Check that yt-dlp and FFmpeg are installed
    Doctor,

    /// Show the effective configuration
    Config,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Output directory [default: downloads]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Video quality: best, worst, or a height (720, 1080, ...)
    #[arg(short, long, default_value = "best", value_parser = parse_quality)]
    pub quality: Quality,

    /// Download audio only (MP3 by default)
    #[arg(short, long)]
    pub audio: bool,

    /// Specific format code (see the `list` command)
    #[arg(short, long, value_name = "CODE")]
    pub format: Option<String>,

    /// Download subtitles
    #[arg(short, long)]
    pub subtitle: bool,

    /// Playlist start index
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub start: u32,

    /// Download only the video, not the playlist
    #[arg(long)]
    pub no_playlist: bool,
}

fn parse_quality(s: &str) -> Result<Quality, String> {
    s.parse().map_err(|e: vidgrab_core::error::OptionsError| e.to_string())
}

impl DownloadArgs {
    /// Layer the command-line flags over configured defaults.
    pub fn to_options(&self, config: &Config) -> DownloadOptions {
        let mut opts = DownloadOptions::from_config(config);
        if let Some(ref dir) = self.output {
            opts.output_dir = dir.clone();
        }
        opts.quality = self.quality;
        opts.format_code = self.format.clone();
        opts.audio_only = self.audio;
        opts.subtitles = self.subtitle;
        opts.playlist_start = self.start;
        opts.no_playlist = self.no_playlist;
        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn download_args(argv: &[&str]) -> (String, DownloadArgs) {
        let mut full = vec!["vidgrab", "download"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Download { url, options } => (url, options),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_download_defaults() {
        let (url, args) = download_args(&["https://youtu.be/x"]);
        assert_eq!(url, "https://youtu.be/x");
        assert_eq!(args.quality, Quality::Best);
        assert_eq!(args.start, 1);
        assert!(!args.audio && !args.subtitle && !args.no_playlist);
        assert!(args.output.is_none());
        assert!(args.format.is_none());

        let opts = args.to_options(&Config::default());
        assert_eq!(opts.output_dir, PathBuf::from("downloads"));
        assert_eq!(opts.retries, 5);
    }

    #[test]
    fn test_download_all_flags() {
        let (_, args) = download_args(&[
            "https://youtu.be/x",
            "-o",
            "/tmp/media",
            "-q",
            "720",
            "-a",
            "-f",
            "137+140",
            "-s",
            "--start",
            "3",
            "--no-playlist",
        ]);
        let opts = args.to_options(&Config::default());
        assert_eq!(opts.output_dir, PathBuf::from("/tmp/media"));
        assert_eq!(opts.quality, Quality::MaxHeight(720));
        assert_eq!(opts.format_code.as_deref(), Some("137+140"));
        assert!(opts.audio_only);
        assert!(opts.subtitles);
        assert_eq!(opts.playlist_start, 3);
        assert!(opts.no_playlist);
    }

    #[test]
    fn test_quality_flag_maps_to_height_selector() {
        let (_, args) = download_args(&["https://youtu.be/x", "-q", "720"]);
        assert_eq!(
            args.to_options(&Config::default()).format_selector(),
            "bestvideo[height<=720]+bestaudio/best[height<=720]"
        );
    }

    #[test]
    fn test_configured_output_dir_is_default() {
        let mut config = Config::default();
        config.download.output_dir = PathBuf::from("/srv/videos");
        let (_, args) = download_args(&["https://youtu.be/x"]);
        assert_eq!(args.to_options(&config).output_dir, PathBuf::from("/srv/videos"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["vidgrab", "download", "u", "-q", "hd"]).is_err());
        assert!(Cli::try_parse_from(["vidgrab", "download", "u", "--start", "0"]).is_err());
        assert!(Cli::try_parse_from(["vidgrab", "download"]).is_err());
        assert!(Cli::try_parse_from(["vidgrab", "fetch", "u"]).is_err());
    }

    #[test]
    fn test_list_and_globals() {
        let cli = Cli::try_parse_from(["vidgrab", "list", "https://youtu.be/x", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::List { ref url } if url == "https://youtu.be/x"));
    }
}
