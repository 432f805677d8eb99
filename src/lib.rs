pub mod api;
pub mod config;
pub mod description;
pub mod format;
pub mod locale;
pub mod model;
pub mod output;
pub mod thumbnail;

use once_cell::sync::Lazy;
use regex::Regex;

pub use description::{Format, PhasedDescription, TimestampEntry, annotate, parse_time_string};

static BARE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap());

static VIDEO_URL_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // youtube.com/watch?v=ID
        r"youtube\.com/watch\?.*v=([a-zA-Z0-9_-]{11})",
        // youtu.be/ID
        r"youtu\.be/([a-zA-Z0-9_-]{11})",
        // youtube.com/{embed,shorts,live}/ID
        r"youtube\.com/(?:embed|shorts|live)/([a-zA-Z0-9_-]{11})",
        // instance-local /watch/ID and /watch?v=ID
        r"^(?:https?://[^/]+)?/watch(?:/|\?.*v=)([a-zA-Z0-9_-]{11})",
    ]
    .iter()
    .map(|re| Regex::new(re).unwrap())
    .collect()
});

/// Extract a video ID from a bare ID, a YouTube URL or an instance watch URL
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    if BARE_ID_RE.is_match(input) {
        return Some(input.to_string());
    }

    VIDEO_URL_RES
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_video_id() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=120"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_embed_shorts_live_urls() {
        for url in [
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ",
        ] {
            assert_eq!(extract_video_id(url), Some("dQw4w9WgXcQ".to_string()), "{url}");
        }
    }

    #[test]
    fn test_instance_watch_urls() {
        assert_eq!(
            extract_video_id("https://inv.example/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(extract_video_id("/watch/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_invalid_url() {
        assert_eq!(extract_video_id("not-a-valid-id"), None);
        assert_eq!(extract_video_id("https://example.com/video/123"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(extract_video_id("  dQw4w9WgXcQ  "), Some("dQw4w9WgXcQ".to_string()));
    }
}
