use std::sync::Arc;

use futures::StreamExt;
use iced::Task;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::application::{DesktopNotifier, DownloadCoordinator, RfdPicker};
use crate::bridge::{Bridge, EventHub, StartResponse, VersionResponse};
use crate::tool::{PercentParser, ToolClient, ToolConfig};
use crate::ui::{DownloadMessage, DownloadView};

pub struct DownloadApp {
    view: DownloadView,
    bridge: Bridge,
}

impl DownloadApp {
    pub fn new(bridge: Bridge) -> Self {
        Self {
            view: DownloadView::default(),
            bridge,
        }
    }
}

impl Drop for DownloadApp {
    fn drop(&mut self) {
        self.bridge.remove_listeners();
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    VersionLoaded(VersionResponse),
    /// Final result of a start request
    DownloadCompleted(StartResponse),
    Log(String),
    /// Percentage as reported by the tool (0 to 100)
    Progress(f64),
    Finished,
    Error(String),
}

pub fn boot() -> (DownloadApp, Task<Message>) {
    let config = ToolConfig::default();
    tracing::info!(binary = %config.binary_path.display(), "using yt-dlp");

    let events = Arc::new(EventHub::new());
    let coordinator = DownloadCoordinator::new(
        ToolClient::new(config),
        events.clone(),
        Arc::new(RfdPicker),
        Arc::new(DesktopNotifier),
        Arc::new(PercentParser),
    );
    let bridge = Bridge::new(Arc::new(coordinator), events);

    let version = {
        let bridge = bridge.clone();
        Task::perform(
            async move { bridge.get_version().await },
            Message::VersionLoaded,
        )
    };

    let tasks = Task::batch([
        version,
        listen(bridge.on_log(), Message::Log),
        listen(bridge.on_progress(), Message::Progress),
        listen(bridge.on_finished(), |()| Message::Finished),
        listen(bridge.on_error(), Message::Error),
    ]);

    (DownloadApp::new(bridge), tasks)
}

// Turn a bridge subscription into a task that ends when the listener is removed.
fn listen<T: Send + 'static>(
    rx: UnboundedReceiver<T>,
    to_message: impl Fn(T) -> Message + Send + 'static,
) -> Task<Message> {
    Task::stream(
        futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|value| (value, rx))
        })
        .map(to_message),
    )
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::DownloadPressed => return start_download(app),
                DownloadMessage::CancelPressed => {
                    if app.bridge.cancel_download().cancelled {
                        app.view.append_log("[System] Download cancelled by user\n");
                        app.view.status_message = "Cancelled".to_string();
                    }
                }
                DownloadMessage::OpenFolderPressed => {
                    let opened = dirs::download_dir()
                        .map(|dir| app.bridge.open_folder(&dir).success)
                        .unwrap_or(false);
                    if !opened {
                        app.view.status_message = "Could not open the downloads folder".to_string();
                    }
                }
                _ => {}
            }
        }
        Message::VersionLoaded(response) => {
            app.view.version = format!("yt-dlp {}", response.version);
        }
        Message::DownloadCompleted(response) => {
            app.view.is_downloading = false;
            match response {
                StartResponse::Success { .. } => {
                    app.view.status_message = "Download completed successfully!".to_string();
                }
                StartResponse::Failure { error, .. } => {
                    app.view.append_log(&format!("[Error] {}\n", error));
                    app.view.status_message = format!("Download failed: {}", error);
                }
            }
        }
        Message::Log(text) => app.view.append_log(&text),
        Message::Progress(progress) => app.view.set_progress(progress),
        Message::Finished => {
            app.view.set_progress(100.0);
            app.view.status_message = "Download complete".to_string();
            app.view.append_log("\n[System] Download completed successfully!\n");
        }
        Message::Error(error) => {
            app.view.append_log(&format!("\n[Error] {}\n", error));
            app.view.status_message = "Download failed".to_string();
        }
    }
    Task::none()
}

fn start_download(app: &mut DownloadApp) -> Task<Message> {
    if app.view.is_downloading {
        app.view.status_message = "A download is already in progress".to_string();
        return Task::none();
    }

    let options = app.view.options();
    if options.url.is_empty() {
        app.view.status_message = "Please enter a URL".to_string();
        return Task::none();
    }
    if options.validated_url().is_none() {
        app.view.status_message = "Please enter a valid URL".to_string();
        return Task::none();
    }

    app.view.reset_progress();
    app.view.append_log(&format!("[System] Starting download from: {}\n", options.url));
    app.view.status_message = "Starting download...".to_string();
    app.view.is_downloading = true;

    tracing::debug!(url = %options.url, format = %options.format, "download requested");
    let bridge = app.bridge.clone();
    Task::perform(
        async move { bridge.start_download(options).await },
        Message::DownloadCompleted,
    )
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
