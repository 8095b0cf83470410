//! vidgrab-core: yt-dlp option mapping, invocation, and output parsing

pub mod config;
pub mod deps;
pub mod error;
pub mod extractor;
pub mod info;
pub mod options;
pub mod progress;
pub mod table;

pub use config::Config;
pub use error::{ConfigError, ExtractError, OptionsError};
pub use extractor::{DownloadReport, Extractor};
pub use options::{DownloadMode, DownloadOptions, Quality};
