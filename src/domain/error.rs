use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please enter a valid URL")]
    InvalidUrl,

    #[error("Another download is already in progress")]
    AlreadyRunning,

    #[error("No directory selected")]
    NoDirectorySelected,

    #[error("{binary} not found in bin folder. Please download it from https://github.com/yt-dlp/yt-dlp")]
    ToolNotFound { binary: String },

    #[error("{0}")]
    ProcessSpawn(String),

    #[error("Download failed with code {}", exit_code_label(.code))]
    NonZeroExit { code: Option<i32>, details: String },
}

impl AppError {
    /// Diagnostic text captured from the tool, if any.
    pub fn details(&self) -> Option<&str> {
        match self {
            AppError::NonZeroExit { details, .. } => Some(details),
            _ => None,
        }
    }
}

// A process terminated by a signal has no exit code.
fn exit_code_label(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "null".to_string())
}
