//! Typed view of the info JSON yt-dlp prints with `-J`

use serde::de::IgnoredAny;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub title: Option<String>,
    /// Seconds; absent for live streams and flat playlists
    #[serde(default)]
    pub duration: Option<f64>,
    /// Present only for playlists; unavailable items come through as `null`
    #[serde(default)]
    pub entries: Option<Vec<IgnoredAny>>,
    #[serde(default)]
    pub formats: Option<Vec<FormatInfo>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatInfo {
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default, deserialize_with = "de_size")]
    pub filesize: Option<u64>,
    #[serde(default, deserialize_with = "de_size")]
    pub filesize_approx: Option<u64>,
    #[serde(default)]
    pub format_note: Option<String>,
}

// Some extractors report sizes as floats.
fn de_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| *v >= 0.0).map(|v| v as u64))
}

impl MediaInfo {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_playlist(&self) -> bool {
        self.entries.is_some()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.as_ref().map_or(0, Vec::len)
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown")
    }

    /// Duration as `m:ss`, or `h:mm:ss` from an hour up
    pub fn display_duration(&self) -> Option<String> {
        let total = self.duration.filter(|d| *d > 0.0)?.round() as u64;
        let (h, m, s) = (total / 3600, total % 3600 / 60, total % 60);
        Some(if h > 0 {
            format!("{}:{:02}:{:02}", h, m, s)
        } else {
            format!("{}:{:02}", m, s)
        })
    }

    pub fn formats(&self) -> &[FormatInfo] {
        self.formats.as_deref().unwrap_or(&[])
    }
}

impl FormatInfo {
    pub fn display_id(&self) -> &str {
        self.format_id.as_deref().unwrap_or("N/A")
    }

    pub fn display_ext(&self) -> &str {
        self.ext.as_deref().unwrap_or("N/A")
    }

    pub fn display_resolution(&self) -> &str {
        match self.resolution.as_deref() {
            Some(res) => res,
            None if self.vcodec.as_deref() == Some("none") => "audio only",
            None => "N/A",
        }
    }

    /// Approximate size wins over the exact one, matching yt-dlp's own table.
    pub fn size_bytes(&self) -> Option<u64> {
        self.filesize_approx.or(self.filesize).filter(|s| *s > 0)
    }

    pub fn display_size(&self) -> String {
        match self.size_bytes() {
            Some(bytes) => format!("{:.1}MB", bytes as f64 / 1024.0 / 1024.0),
            None => "N/A".to_string(),
        }
    }

    pub fn display_note(&self) -> &str {
        self.format_note.as_deref().unwrap_or("")
    }
}
