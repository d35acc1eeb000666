use std::sync::LazyLock;

use regex::Regex;

/// Extracts a completion percentage from a chunk of tool output.
///
/// yt-dlp does not version its progress text, so the controller only talks
/// to this trait and the heuristic can be replaced on its own.
pub trait ProgressParser: Send + Sync {
    fn parse(&self, chunk: &str) -> Option<f64>;
}

// Matches e.g. `[download]  42.5% of 10.00MiB at 1.00MiB/s ETA 00:05`
static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)%").expect("percent pattern is valid"));

/// First `<number>%` token in the chunk. Values are passed through as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PercentParser;

impl ProgressParser for PercentParser {
    fn parse(&self, chunk: &str) -> Option<f64> {
        let caps = PERCENT.captures(chunk)?;
        caps.get(1)?.as_str().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_download_line() {
        let line = "[download]  42.5% of 10.00MiB at 1.00MiB/s ETA 00:05\n";
        assert_eq!(PercentParser.parse(line), Some(42.5));
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(PercentParser.parse("10% then 20%"), Some(10.0));
    }

    #[test]
    fn test_integer_and_out_of_range() {
        assert_eq!(PercentParser.parse("[download] 100% done"), Some(100.0));
        assert_eq!(PercentParser.parse("odd 250%"), Some(250.0));
    }

    #[test]
    fn test_no_percent_token() {
        assert_eq!(PercentParser.parse("[youtube] Extracting URL"), None);
        assert_eq!(PercentParser.parse("% alone"), None);
        assert_eq!(PercentParser.parse(""), None);
    }
}
