use iced::{
    widget::{
        button, column, pick_list, progress_bar, row, scrollable, text, text_input, toggler, Row,
        Space,
    },
    Element, Length,
};

use crate::domain::{DownloadOptions, MediaFormat, QualityPreset, BEST_SELECTOR};
use crate::utils::{count_lines, format_percent};

pub const BITRATES: [&str; 5] = ["320", "256", "192", "128", "96"];

const LOG_CLEARED: &str = "[System] Log cleared\n";

/// Main view state
pub struct DownloadView {
    pub url: String,
    pub format: MediaFormat,
    pub quality: String,
    pub bitrate: String,
    pub subtitles: bool,
    pub playlist: bool,
    pub notifications: bool,
    pub status_message: String,
    pub is_downloading: bool,
    pub progress: f64,
    pub log: String,
    pub log_lines: usize,
    pub version: String,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            url: String::new(),
            format: MediaFormat::Best,
            quality: BEST_SELECTOR.to_string(),
            bitrate: "192".to_string(),
            subtitles: false,
            playlist: false,
            notifications: true,
            status_message: "Ready".to_string(),
            is_downloading: false,
            progress: 0.0,
            log: String::new(),
            log_lines: 0,
            version: "yt-dlp ...".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    PresetSelected(QualityPreset),
    FormatSelected(String),
    QualityChanged(String),
    BitrateSelected(String),
    SubtitlesToggled(bool),
    PlaylistToggled(bool),
    NotificationsToggled(bool),
    DownloadPressed,
    CancelPressed,
    ClearLogPressed,
    OpenFolderPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => self.url = url,
            DownloadMessage::PresetSelected(preset) => {
                let mut options = self.options();
                preset.apply(&mut options);
                self.format = options.format;
                self.quality = options.quality;
                self.bitrate = options.bitrate;
            }
            DownloadMessage::FormatSelected(format) => self.format = MediaFormat::from(format),
            DownloadMessage::QualityChanged(quality) => self.quality = quality,
            DownloadMessage::BitrateSelected(bitrate) => self.bitrate = bitrate,
            DownloadMessage::SubtitlesToggled(on) => self.subtitles = on,
            DownloadMessage::PlaylistToggled(on) => self.playlist = on,
            DownloadMessage::NotificationsToggled(on) => self.notifications = on,
            DownloadMessage::ClearLogPressed => {
                self.log = LOG_CLEARED.to_string();
                self.log_lines = 0;
            }
            DownloadMessage::DownloadPressed
            | DownloadMessage::CancelPressed
            | DownloadMessage::OpenFolderPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn options(&self) -> DownloadOptions {
        DownloadOptions {
            url: self.url.trim().to_string(),
            format: self.format.clone(),
            quality: self.quality.clone(),
            bitrate: self.bitrate.clone(),
            subtitles: self.subtitles,
            playlist: self.playlist,
            notifications: self.notifications,
        }
    }

    pub fn append_log(&mut self, text: &str) {
        self.log.push_str(text);
        self.log_lines += count_lines(text);
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.progress = progress;
        self.status_message = format!("Downloading: {}", format_percent(progress));
    }

    pub fn reset_progress(&mut self) {
        self.progress = 0.0;
        self.status_message = "Ready".to_string();
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let presets = Row::with_children(QualityPreset::ALL.iter().map(|preset| {
            button(text(preset.label()).size(13))
                .on_press(DownloadMessage::PresetSelected(*preset))
                .padding([6, 10])
                .into()
        }))
        .spacing(6);

        let selected_format = MediaFormat::CHOICES
            .iter()
            .find(|choice| **choice == self.format.as_str())
            .copied();
        let selected_bitrate = BITRATES
            .iter()
            .find(|choice| **choice == self.bitrate)
            .copied();

        let mut format_row = row![
            text("Format:").size(14),
            pick_list(MediaFormat::CHOICES, selected_format, |choice: &'static str| {
                DownloadMessage::FormatSelected(choice.to_string())
            }),
        ]
        .spacing(10);
        // Bitrate only matters when extracting audio.
        if self.format.is_audio() {
            format_row = format_row.push(text("Bitrate:").size(14)).push(pick_list(
                BITRATES,
                selected_bitrate,
                |choice: &'static str| DownloadMessage::BitrateSelected(choice.to_string()),
            ));
        }

        let idle = !self.is_downloading;

        let url_input = text_input("https://...", &self.url).padding(10);
        let url_input = if idle {
            url_input.on_input(DownloadMessage::UrlChanged)
        } else {
            url_input
        };

        column![
            row![
                text("yt-dlp Downloader").size(32),
                Space::new().width(Length::Fill),
                text(&self.version).size(14),
            ],
            Space::new().height(Length::Fixed(10.0)),
            text("URL:").size(16),
            url_input,
            presets,
            format_row,
            text_input("Format selector", &self.quality)
                .on_input(DownloadMessage::QualityChanged)
                .padding(8),
            row![
                toggler(self.subtitles)
                    .label("Subtitles (en, de)")
                    .on_toggle(DownloadMessage::SubtitlesToggled),
                toggler(self.playlist)
                    .label("Whole playlist")
                    .on_toggle(DownloadMessage::PlaylistToggled),
                toggler(self.notifications)
                    .label("Notify when done")
                    .on_toggle(DownloadMessage::NotificationsToggled),
            ]
            .spacing(20),
            row![
                button("Download")
                    .on_press_maybe(idle.then_some(DownloadMessage::DownloadPressed))
                    .padding([10, 20]),
                button("Cancel")
                    .on_press_maybe(self.is_downloading.then_some(DownloadMessage::CancelPressed))
                    .padding([10, 20]),
                button("Open Folder")
                    .on_press(DownloadMessage::OpenFolderPressed)
                    .padding([10, 20]),
            ]
            .spacing(10),
            row![
                progress_bar(0.0..=100.0, self.progress as f32),
                text(format_percent(self.progress)).size(14),
            ]
            .spacing(10),
            text(&self.status_message).size(14),
            row![
                text(format!("{} lines", self.log_lines)).size(12),
                Space::new().width(Length::Fill),
                button(text("Clear log").size(12)).on_press(DownloadMessage::ClearLogPressed),
            ],
            scrollable(text(&self.log).size(12)).height(Length::Fill),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_updates_fields() {
        let mut view = DownloadView::default();
        view.update(DownloadMessage::PresetSelected(QualityPreset::Mp3(320)));
        assert_eq!(view.format, MediaFormat::Mp3);
        assert_eq!(view.bitrate, "320");

        view.update(DownloadMessage::PresetSelected(QualityPreset::Video(1080)));
        assert_eq!(view.format.as_str(), "mp4");
        assert_eq!(view.quality, "bestvideo[height<=1080]+bestaudio");
    }

    #[test]
    fn test_options_trim_url() {
        let mut view = DownloadView::default();
        view.update(DownloadMessage::UrlChanged("  https://example.com/v \n".to_string()));
        view.update(DownloadMessage::SubtitlesToggled(true));
        let options = view.options();
        assert_eq!(options.url, "https://example.com/v");
        assert!(options.subtitles);
        assert!(!options.playlist);
    }

    #[test]
    fn test_log_counting_and_clear() {
        let mut view = DownloadView::default();
        view.append_log("[download] 1%\n[download] 2%\n");
        view.append_log("partial");
        assert_eq!(view.log_lines, 2);

        view.update(DownloadMessage::ClearLogPressed);
        assert_eq!(view.log, LOG_CLEARED);
        assert_eq!(view.log_lines, 0);
    }

    #[test]
    fn test_progress_status() {
        let mut view = DownloadView::default();
        view.set_progress(42.26);
        assert_eq!(view.status_message, "Downloading: 42.3%");
        view.reset_progress();
        assert_eq!(view.progress, 0.0);
    }
}
