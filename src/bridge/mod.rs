//! Request/response and event relay between the UI and the download
//! coordinator. Holds no download state of its own.

pub mod events;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::application::{platform, DownloadCoordinator};
use crate::domain::{AppError, DownloadOptions};

pub use events::EventHub;

/// Result of a start request, shaped as `{success}` or `{error, details?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartResponse {
    Success {
        success: bool,
    },
    Failure {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl From<Result<(), AppError>> for StartResponse {
    fn from(result: Result<(), AppError>) -> Self {
        match result {
            Ok(()) => StartResponse::Success { success: true },
            Err(e) => StartResponse::Failure {
                error: e.to_string(),
                details: e.details().map(str::to_string),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenFolderResponse {
    pub success: bool,
}

#[derive(Clone)]
pub struct Bridge {
    coordinator: Arc<DownloadCoordinator>,
    events: Arc<EventHub>,
}

impl Bridge {
    pub fn new(coordinator: Arc<DownloadCoordinator>, events: Arc<EventHub>) -> Self {
        Self {
            coordinator,
            events,
        }
    }

    pub async fn start_download(&self, options: DownloadOptions) -> StartResponse {
        self.coordinator.start(options).await.into()
    }

    pub fn cancel_download(&self) -> CancelResponse {
        CancelResponse {
            cancelled: self.coordinator.cancel(),
        }
    }

    pub async fn get_version(&self) -> VersionResponse {
        VersionResponse {
            version: self.coordinator.version().await,
        }
    }

    pub fn open_folder(&self, path: &Path) -> OpenFolderResponse {
        OpenFolderResponse {
            success: platform::open_folder(path),
        }
    }

    pub fn on_log(&self) -> UnboundedReceiver<String> {
        self.events.on_log()
    }

    pub fn on_progress(&self) -> UnboundedReceiver<f64> {
        self.events.on_progress()
    }

    pub fn on_finished(&self) -> UnboundedReceiver<()> {
        self.events.on_finished()
    }

    pub fn on_error(&self) -> UnboundedReceiver<String> {
        self.events.on_error()
    }

    pub fn remove_listeners(&self) {
        self.events.remove_all_listeners();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::download_coordinator::tests::{coordinator, options};
    use serde_json::json;

    fn bridge(binary: std::path::PathBuf, save_dir: Option<std::path::PathBuf>) -> Bridge {
        let (coordinator, events, _) = coordinator(binary, save_dir);
        Bridge::new(Arc::new(coordinator), events)
    }

    #[test]
    fn test_start_response_wire_shape() {
        let ok = StartResponse::from(Ok(()));
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({ "success": true }));

        let busy = StartResponse::from(Err(AppError::AlreadyRunning));
        assert_eq!(
            serde_json::to_value(&busy).unwrap(),
            json!({ "error": "Another download is already in progress" })
        );

        let failed = StartResponse::from(Err(AppError::NonZeroExit {
            code: Some(1),
            details: "network error".to_string(),
        }));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "error": "Download failed with code 1", "details": "network error" })
        );
    }

    #[test]
    fn test_cancel_when_idle() {
        let bridge = bridge("yt-dlp".into(), None);
        let response = bridge.cancel_download();
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({ "cancelled": false })
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancel_while_running() {
        use crate::application::download_coordinator::tests::wait_until;
        use crate::domain::DownloadPhase;
        use crate::tool::client::tests::fake_tool;

        let dir = tempfile::tempdir().unwrap();
        let bin = fake_tool(dir.path(), "exec sleep 30");
        let bridge = bridge(bin, Some(dir.path().to_path_buf()));

        let running = {
            let bridge = bridge.clone();
            tokio::spawn(async move { bridge.start_download(options("best")).await })
        };
        wait_until(|| bridge.coordinator.phase() == DownloadPhase::Running).await;

        assert_eq!(
            serde_json::to_value(bridge.cancel_download()).unwrap(),
            json!({ "cancelled": true })
        );
        match running.await.unwrap() {
            StartResponse::Failure { error, .. } => {
                assert!(error.starts_with("Download failed with code"))
            }
            other => panic!("unexpected response: {:?}", other),
        }
        assert!(!bridge.cancel_download().cancelled);
    }

    #[tokio::test]
    async fn test_missing_tool_through_bridge() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge(dir.path().join("yt-dlp.exe"), Some(dir.path().to_path_buf()));

        assert_eq!(
            bridge.get_version().await,
            VersionResponse {
                version: "Not found".to_string()
            }
        );
        match bridge.start_download(options("mp3")).await {
            StartResponse::Failure { error, details } => {
                assert!(error.starts_with("yt-dlp.exe not found"));
                assert_eq!(details, None);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_open_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge("yt-dlp".into(), None);
        assert!(!bridge.open_folder(&dir.path().join("missing")).success);
    }

    #[test]
    fn test_remove_listeners() {
        let bridge = bridge("yt-dlp".into(), None);
        let _log = bridge.on_log();
        let _progress = bridge.on_progress();
        let _finished = bridge.on_finished();
        let _error = bridge.on_error();
        assert_eq!(bridge.events.listener_count(), 4);

        bridge.remove_listeners();
        assert_eq!(bridge.events.listener_count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_finished_then_version() {
        use crate::tool::client::tests::fake_tool;

        let dir = tempfile::tempdir().unwrap();
        let bin = fake_tool(
            dir.path(),
            "if [ \"$1\" = \"--version\" ]; then echo 2024.08.06; exit 0; fi\necho '[download] 100%'",
        );
        let bridge = bridge(bin, Some(dir.path().to_path_buf()));
        let mut finished = bridge.on_finished();

        assert_eq!(
            bridge.start_download(options("best")).await,
            StartResponse::Success { success: true }
        );
        assert!(finished.try_recv().is_ok());
        assert_eq!(bridge.get_version().await.version, "2024.08.06");
    }
}
