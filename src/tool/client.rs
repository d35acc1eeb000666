use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::{Child, Command};

use super::models::ToolConfig;

pub const VERSION_NOT_FOUND: &str = "Not found";

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ToolError>;

/// Thin wrapper around the yt-dlp executable.
#[derive(Debug, Clone)]
pub struct ToolClient {
    config: ToolConfig,
}

impl ToolClient {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn binary(&self) -> &Path {
        &self.config.binary_path
    }

    pub fn is_installed(&self) -> bool {
        self.config.binary_path.is_file()
    }

    pub fn ensure_installed(&self) -> Result<()> {
        if self.is_installed() {
            Ok(())
        } else {
            Err(ToolError::NotFound(self.config.binary_name()))
        }
    }

    /// Start the tool with piped output. The child is killed if its handle
    /// is dropped before it exits.
    pub fn spawn(&self, args: &[OsString]) -> Result<Child> {
        self.ensure_installed()?;

        let child = Command::new(&self.config.binary_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        Ok(child)
    }

    /// `yt-dlp --version`, trimmed. Falls back to [`VERSION_NOT_FOUND`].
    pub async fn version(&self) -> String {
        if !self.is_installed() {
            return VERSION_NOT_FOUND.to_string();
        }

        let output = Command::new(&self.config.binary_path)
            .arg("--version")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        match output {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to run version probe");
                VERSION_NOT_FOUND.to_string()
            }
        }
    }
}
