pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{
    DownloadEvent, DownloadOptions, DownloadPhase, MediaFormat, QualityPreset, BEST_SELECTOR,
};
