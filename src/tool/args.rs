use std::ffi::OsString;
use std::path::Path;

use crate::domain::{DownloadOptions, MediaFormat, BEST_SELECTOR};

use super::models::ToolConfig;

/// Build the yt-dlp argument vector for one download into `save_dir`.
///
/// Pure: identical inputs give identical vectors. Exactly one of the
/// mp3 / best / explicit-selector branches adds format flags, and the URL is
/// always the last argument.
pub fn build_args(
    options: &DownloadOptions,
    save_dir: &Path,
    config: &ToolConfig,
) -> Vec<OsString> {
    let template = format!("%(title).{}s.%(ext)s", config.title_max_len);

    let mut args: Vec<OsString> = vec![
        "--newline".into(),
        "--progress".into(),
        "-o".into(),
        save_dir.join(template).into_os_string(),
        "--add-metadata".into(),
        "--embed-thumbnail".into(),
        "--no-warnings".into(),
    ];

    match &options.format {
        MediaFormat::Mp3 => {
            args.extend(
                ["-x", "--audio-format", "mp3", "--audio-quality"]
                    .into_iter()
                    .map(OsString::from),
            );
            args.push(options.bitrate.as_str().into());
        }
        MediaFormat::Best => {
            args.push("-f".into());
            args.push(BEST_SELECTOR.into());
        }
        MediaFormat::Other(_) => {
            args.push("-f".into());
            args.push(options.quality.as_str().into());
        }
    }

    if options.subtitles {
        args.push("--write-subs".into());
        args.push("--sub-lang".into());
        args.push(config.subtitle_languages.join(",").into());
        args.push("--embed-subs".into());
    }

    if options.playlist {
        args.push("--yes-playlist".into());
    }

    args.push(options.url.trim().into());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn options(format: MediaFormat) -> DownloadOptions {
        DownloadOptions {
            url: "https://example.com/v".to_string(),
            format,
            quality: "bestvideo[height<=720]+bestaudio".to_string(),
            bitrate: "192".to_string(),
            subtitles: false,
            playlist: false,
            notifications: false,
        }
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    fn count_format_flags(args: &[String]) -> usize {
        args.iter()
            .filter(|a| a.as_str() == "-f" || a.as_str() == "-x")
            .count()
    }

    #[test]
    fn test_common_prefix_and_url_last() {
        let dir = PathBuf::from("downloads");
        let args = strings(&build_args(
            &options(MediaFormat::Best),
            &dir,
            &ToolConfig::default(),
        ));

        assert_eq!(&args[..2], ["--newline", "--progress"]);
        assert_eq!(args[2], "-o");
        assert_eq!(
            args[3],
            dir.join("%(title).100s.%(ext)s").to_string_lossy()
        );
        assert_eq!(&args[4..7], ["--add-metadata", "--embed-thumbnail", "--no-warnings"]);
        assert_eq!(args.last().map(String::as_str), Some("https://example.com/v"));
    }

    #[test]
    fn test_mp3_uses_bitrate() {
        let args = strings(&build_args(
            &options(MediaFormat::Mp3),
            Path::new("out"),
            &ToolConfig::default(),
        ));
        assert_eq!(
            &args[7..12],
            ["-x", "--audio-format", "mp3", "--audio-quality", "192"]
        );
        assert_eq!(count_format_flags(&args), 1);
        assert!(!args.contains(&"bestvideo[height<=720]+bestaudio".to_string()));
    }

    #[test]
    fn test_best_ignores_quality() {
        let args = strings(&build_args(
            &options(MediaFormat::Best),
            Path::new("out"),
            &ToolConfig::default(),
        ));
        assert_eq!(&args[7..9], ["-f", "bestvideo+bestaudio/best"]);
        assert_eq!(count_format_flags(&args), 1);
    }

    #[test]
    fn test_other_format_passes_selector_through() {
        let args = strings(&build_args(
            &options(MediaFormat::from("m4a")),
            Path::new("out"),
            &ToolConfig::default(),
        ));
        assert_eq!(&args[7..9], ["-f", "bestvideo[height<=720]+bestaudio"]);
        assert!(!args.contains(&"--audio-quality".to_string()));
        assert_eq!(count_format_flags(&args), 1);
    }

    #[test]
    fn test_subtitles_and_playlist() {
        let mut opts = options(MediaFormat::Best);
        opts.subtitles = true;
        opts.playlist = true;
        let args = strings(&build_args(&opts, Path::new("out"), &ToolConfig::default()));

        assert_eq!(
            &args[9..],
            [
                "--write-subs",
                "--sub-lang",
                "en,de",
                "--embed-subs",
                "--yes-playlist",
                "https://example.com/v"
            ]
        );
    }

    #[test]
    fn test_url_passed_trimmed() {
        let mut opts = options(MediaFormat::Best);
        opts.url = " https://example.com/v\n".to_string();
        let args = strings(&build_args(&opts, Path::new("out"), &ToolConfig::default()));
        assert_eq!(args.last().map(String::as_str), Some("https://example.com/v"));
    }

    #[test]
    fn test_deterministic() {
        let mut opts = options(MediaFormat::Mp3);
        opts.subtitles = true;
        let config = ToolConfig::default();
        assert_eq!(
            build_args(&opts, Path::new("a"), &config),
            build_args(&opts, Path::new("a"), &config)
        );
    }
}
