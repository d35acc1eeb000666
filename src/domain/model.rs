use std::fmt;

use serde::{Deserialize, Serialize};

/// Output format requested from the tool.
///
/// `Mp3` extracts audio, `Best` asks for the best combined streams and any
/// other token defers to the explicit format selector in
/// [`DownloadOptions::quality`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaFormat {
    Mp3,
    Best,
    Other(String),
}

impl MediaFormat {
    pub const CHOICES: [&'static str; 6] = ["mp3", "m4a", "opus", "flac", "mp4", "best"];

    pub fn as_str(&self) -> &str {
        match self {
            MediaFormat::Mp3 => "mp3",
            MediaFormat::Best => "best",
            MediaFormat::Other(token) => token,
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self.as_str(), "mp3" | "m4a" | "opus" | "flac")
    }
}

impl From<String> for MediaFormat {
    fn from(token: String) -> Self {
        match token.as_str() {
            "mp3" => MediaFormat::Mp3,
            "best" => MediaFormat::Best,
            _ => MediaFormat::Other(token),
        }
    }
}

impl From<&str> for MediaFormat {
    fn from(token: &str) -> Self {
        MediaFormat::from(token.to_string())
    }
}

impl From<MediaFormat> for String {
    fn from(format: MediaFormat) -> Self {
        format.as_str().to_string()
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the user chose for one download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOptions {
    pub url: String,
    pub format: MediaFormat,
    pub quality: String,
    pub bitrate: String,
    pub subtitles: bool,
    pub playlist: bool,
    pub notifications: bool,
}

impl DownloadOptions {
    pub fn validated_url(&self) -> Option<url::Url> {
        url::Url::parse(self.url.trim()).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadPhase {
    Idle,
    /// Slot reserved, waiting on the directory picker or the spawn.
    Preparing,
    Running,
    /// Kill signal sent, waiting for the process to exit.
    Finishing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEvent {
    Log(String),
    Progress(f64),
    Finished,
    Error(String),
}

pub const BEST_SELECTOR: &str = "bestvideo+bestaudio/best";

/// One-click quality buttons shown above the advanced fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityPreset {
    Mp3(u16),
    Video(u16),
    Best,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 7] = [
        QualityPreset::Mp3(320),
        QualityPreset::Mp3(192),
        QualityPreset::Mp3(128),
        QualityPreset::Video(1080),
        QualityPreset::Video(720),
        QualityPreset::Video(480),
        QualityPreset::Best,
    ];

    pub fn label(&self) -> String {
        match self {
            QualityPreset::Mp3(kbps) => format!("MP3 {}k", kbps),
            QualityPreset::Video(height) => format!("Video {}p", height),
            QualityPreset::Best => "Best".to_string(),
        }
    }

    pub fn apply(&self, options: &mut DownloadOptions) {
        match self {
            QualityPreset::Mp3(kbps) => {
                options.format = MediaFormat::Mp3;
                options.bitrate = kbps.to_string();
                options.quality = BEST_SELECTOR.to_string();
            }
            QualityPreset::Video(height) => {
                options.format = MediaFormat::Other("mp4".to_string());
                options.quality = format!("bestvideo[height<={}]+bestaudio", height);
            }
            QualityPreset::Best => {
                options.format = MediaFormat::Best;
                options.quality = BEST_SELECTOR.to_string();
            }
        }
    }
}
