/// Number of complete lines in a chunk of log text.
pub fn count_lines(text: &str) -> usize {
    text.matches('\n').count()
}

/// Status-line rendering of a progress value.
pub fn format_percent(progress: f64) -> String {
    format!("{:.1}%", progress)
}
