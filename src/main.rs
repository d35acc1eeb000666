mod app;
mod application;
mod bridge;
mod domain;
mod tool;
mod ui;
mod utils;

use iced::{window, Size};
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    iced::application(app::boot, app::update, app::view)
        .title("yt-dlp Downloader")
        .window(window::Settings {
            size: Size::new(1100.0, 750.0),
            min_size: Some(Size::new(900.0, 650.0)),
            ..Default::default()
        })
        .run()
}
