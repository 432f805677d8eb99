use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

const COMPACT_UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];

/// Remove HTML tags, leaving their text content
pub fn strip_tags(text: &str) -> Cow<'_, str> {
    TAG_RE.replace_all(text, "")
}

/// Cut `text` to at most `max` characters, appending `...` when shortened
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Group digits in thousands: `1234567` -> `1,234,567`
pub fn number_with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Short count such as `1.5K`, `2M` or `3.4B`.
///
/// One decimal is kept below 100 of a unit and dropped above it. Values are
/// truncated, never rounded up into the next unit.
pub fn compact_number(n: u64) -> String {
    for (scale, suffix) in COMPACT_UNITS {
        if n < scale {
            continue;
        }
        if n >= scale * 100 {
            return format!("{}{suffix}", n / scale);
        }
        let tenths = n / (scale / 10);
        return match tenths % 10 {
            0 => format!("{}{suffix}", tenths / 10),
            frac => format!("{}.{frac}{suffix}", tenths / 10),
        };
    }
    n.to_string()
}

/// Video length as `H:MM:SS`, or `M:SS` under an hour
pub fn video_length(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Capitalise each word; `_` and `-` count as word separators
pub fn title_case(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("a <b>bold</b> <a href=\"x\">move</a>"), "a bold move");
        assert_eq!(strip_tags("no tags"), "no tags");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("a longer title here", 8), "a longer...");
        assert_eq!(truncate("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_number_with_commas() {
        assert_eq!(number_with_commas(0), "0");
        assert_eq!(number_with_commas(999), "999");
        assert_eq!(number_with_commas(1000), "1,000");
        assert_eq!(number_with_commas(1234567), "1,234,567");
    }

    #[test]
    fn test_compact_number() {
        assert_eq!(compact_number(999), "999");
        assert_eq!(compact_number(1500), "1.5K");
        assert_eq!(compact_number(1_234_567), "1.2M");
        assert_eq!(compact_number(2_000_000), "2M");
        assert_eq!(compact_number(999_999), "999K");
        assert_eq!(compact_number(3_400_000_000), "3.4B");
    }

    #[test]
    fn test_video_length() {
        assert_eq!(video_length(0), "0:00");
        assert_eq!(video_length(187), "3:07");
        assert_eq!(video_length(3875), "1:04:35");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("upload_date"), "Upload Date");
        assert_eq!(title_case("music  videos"), "Music Videos");
        assert_eq!(title_case("view-count"), "View Count");
    }
}
