use std::path::{Path, PathBuf};

use futures::future::BoxFuture;

/// Asks the user where downloads should go.
pub trait DirectoryPicker: Send + Sync {
    /// `None` when the user dismissed the dialog.
    fn pick_directory(&self) -> BoxFuture<'_, Option<PathBuf>>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Native folder dialog.
#[derive(Debug, Default, Clone, Copy)]
pub struct RfdPicker;

impl DirectoryPicker for RfdPicker {
    fn pick_directory(&self) -> BoxFuture<'_, Option<PathBuf>> {
        Box::pin(async {
            rfd::AsyncFileDialog::new()
                .set_title("Select Download Directory")
                .set_can_create_directories(true)
                .pick_folder()
                .await
                .map(|handle| handle.path().to_path_buf())
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    /// Shown from the blocking pool when called inside a runtime.
    fn notify(&self, title: &str, body: &str) {
        let mut notification = notify_rust::Notification::new();
        notification.summary(title).body(body);

        run_detached(move || {
            if let Err(e) = notification.show() {
                tracing::warn!(error = %e, "desktop notification failed");
            }
        });
    }
}

fn run_detached(job: impl FnOnce() + Send + 'static) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => drop(handle.spawn_blocking(job)),
        Err(_) => job(),
    }
}

/// Open an existing directory in the system file browser.
pub fn open_folder(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }

    match open::that(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to open folder");
            false
        }
    }
}
