pub mod args;
pub mod client;
pub mod models;
pub mod progress;

pub use args::build_args;
pub use client::{ToolClient, ToolError};
pub use models::ToolConfig;
pub use progress::{PercentParser, ProgressParser};
