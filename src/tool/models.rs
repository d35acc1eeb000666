use std::path::PathBuf;

/// Environment variable that overrides the bundled binary location.
pub const TOOL_PATH_ENV: &str = "YT_DLP_PATH";

pub const TOOL_BINARY: &str = if cfg!(target_os = "windows") {
    "yt-dlp.exe"
} else {
    "yt-dlp"
};

/// Configuration for the tool client
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub binary_path: PathBuf,
    /// Upper bound on the title part of output file names.
    pub title_max_len: usize,
    pub subtitle_languages: Vec<String>,
}

impl ToolConfig {
    pub fn with_binary(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            ..Self::default()
        }
    }

    /// File name used in user-facing messages.
    pub fn binary_name(&self) -> String {
        self.binary_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| TOOL_BINARY.to_string())
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        let binary_path = std::env::var_os(TOOL_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| bundled_bin_dir().join(TOOL_BINARY));

        Self {
            binary_path,
            title_max_len: 100,
            subtitle_languages: vec!["en".to_string(), "de".to_string()],
        }
    }
}

// `bin/` next to the executable, or relative to the working directory.
fn bundled_bin_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("bin")))
        .unwrap_or_else(|| PathBuf::from("bin"))
}
