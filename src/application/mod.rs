pub mod download_coordinator;
pub mod download_slot;
pub mod platform;

pub use download_coordinator::DownloadCoordinator;
pub use platform::{DesktopNotifier, RfdPicker};
