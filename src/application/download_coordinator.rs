use std::path::Path;
use std::process::ExitStatus;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::oneshot;

use crate::{
    application::{
        download_slot::{DownloadSlot, SlotLease},
        platform::{DirectoryPicker, Notifier},
    },
    bridge::EventHub,
    domain::{AppError, DownloadEvent, DownloadOptions, DownloadPhase},
    tool::{build_args, ProgressParser, ToolClient, ToolError},
};

pub const NOTIFICATION_TITLE: &str = "Download Complete";
pub const NOTIFICATION_BODY: &str = "Your video/audio has been downloaded successfully!";

/// Owns the download slot and supervises the yt-dlp process.
pub struct DownloadCoordinator {
    tool: ToolClient,
    slot: DownloadSlot,
    events: Arc<EventHub>,
    picker: Arc<dyn DirectoryPicker>,
    notifier: Arc<dyn Notifier>,
    parser: Arc<dyn ProgressParser>,
}

impl DownloadCoordinator {
    pub fn new(
        tool: ToolClient,
        events: Arc<EventHub>,
        picker: Arc<dyn DirectoryPicker>,
        notifier: Arc<dyn Notifier>,
        parser: Arc<dyn ProgressParser>,
    ) -> Self {
        Self {
            tool,
            slot: DownloadSlot::new(),
            events,
            picker,
            notifier,
            parser,
        }
    }

    pub fn phase(&self) -> DownloadPhase {
        self.slot.phase()
    }

    pub fn is_downloading(&self) -> bool {
        self.slot.is_downloading()
    }

    /// Run one download to completion.
    ///
    /// Resolves once the process has exited (or failed to start). Every
    /// failure is returned, never raised: the caller decides how to show it.
    pub async fn start(&self, options: DownloadOptions) -> Result<(), AppError> {
        let lease = self.slot.try_acquire()?;

        if options.validated_url().is_none() {
            return Err(AppError::InvalidUrl);
        }

        let Some(save_dir) = self.picker.pick_directory().await else {
            tracing::info!("directory selection cancelled");
            return Err(AppError::NoDirectorySelected);
        };

        if let Err(ToolError::NotFound(binary)) = self.tool.ensure_installed() {
            tracing::warn!(path = %self.tool.binary().display(), "yt-dlp binary missing");
            return Err(AppError::ToolNotFound { binary });
        }

        let args = build_args(&options, &save_dir, self.tool.config());
        tracing::info!(url = %options.url, dir = %save_dir.display(), "starting download");

        let child = match self.tool.spawn(&args) {
            Ok(child) => child,
            Err(e) => {
                let message = e.to_string();
                tracing::error!(error = %message, "failed to launch yt-dlp");
                drop(lease);
                self.events.emit(DownloadEvent::Error(message.clone()));
                return Err(AppError::ProcessSpawn(message));
            }
        };

        let kill = lease.mark_running();
        let (status, stderr) = self.supervise(child, kill).await;
        lease.mark_finishing();
        self.complete(lease, status, stderr, &options, &save_dir)
    }

    /// Kill the running download, if any.
    ///
    /// Emits nothing itself: the killed process exits through the same
    /// completion path as any other failure.
    pub fn cancel(&self) -> bool {
        let cancelled = self.slot.cancel();
        if cancelled {
            tracing::info!("download cancelled");
        }
        cancelled
    }

    pub async fn version(&self) -> String {
        self.tool.version().await
    }

    async fn supervise(
        &self,
        mut child: Child,
        mut kill: oneshot::Receiver<()>,
    ) -> (std::io::Result<ExitStatus>, String) {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let exit = async {
            tokio::select! {
                status = child.wait() => status,
                Ok(()) = &mut kill => {
                    if let Err(e) = child.start_kill() {
                        tracing::warn!(error = %e, "failed to kill yt-dlp");
                    }
                    child.wait().await
                }
            }
        };

        let (status, (), errors) = tokio::join!(
            exit,
            self.pump_stdout(stdout),
            self.pump_stderr(stderr)
        );
        (status, errors)
    }

    async fn pump_stdout(&self, stdout: Option<impl AsyncRead + Unpin>) {
        let Some(stdout) = stdout else { return };

        read_chunks(stdout, |text| {
            let progress = self.parser.parse(&text);
            self.events.emit(DownloadEvent::Log(text));
            if let Some(value) = progress {
                self.events.emit(DownloadEvent::Progress(value));
            }
        })
        .await;
    }

    /// Forward stderr to the log and collect it for the failure report.
    async fn pump_stderr(&self, stderr: Option<impl AsyncRead + Unpin>) -> String {
        let mut collected = String::new();
        let Some(stderr) = stderr else {
            return collected;
        };

        read_chunks(stderr, |text| {
            collected.push_str(&text);
            self.events.emit(DownloadEvent::Log(text));
        })
        .await;
        collected
    }

    fn complete(
        &self,
        lease: SlotLease,
        status: std::io::Result<ExitStatus>,
        stderr: String,
        options: &DownloadOptions,
        save_dir: &Path,
    ) -> Result<(), AppError> {
        lease.release();

        match status {
            Ok(status) if status.success() => {
                tracing::info!(dir = %save_dir.display(), "download finished");
                self.events.emit(DownloadEvent::Finished);
                if options.notifications {
                    self.notifier.notify(NOTIFICATION_TITLE, NOTIFICATION_BODY);
                }
                Ok(())
            }
            Ok(status) => {
                tracing::warn!(code = ?status.code(), "yt-dlp exited with failure");
                self.events.emit(DownloadEvent::Error(stderr.clone()));
                Err(AppError::NonZeroExit {
                    code: status.code(),
                    details: stderr,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "lost track of yt-dlp process");
                let message = e.to_string();
                self.events.emit(DownloadEvent::Error(message.clone()));
                Err(AppError::ProcessSpawn(message))
            }
        }
    }
}

// Line-buffered reads; invalid UTF-8 is replaced rather than dropped.
async fn read_chunks(reader: impl AsyncRead + Unpin, mut on_chunk: impl FnMut(String)) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => on_chunk(String::from_utf8_lossy(&buf).into_owned()),
            Err(e) => {
                tracing::warn!(error = %e, "stopped reading yt-dlp output");
                break;
            }
        }
    }
}
