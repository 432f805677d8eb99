use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use eyre::{Result, bail, eyre};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::format::strip_tags;

static ANCHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<a href="([^"]*)"([^>]*)>"#).unwrap());

static TARGET_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\s)target\s*=").unwrap());

static LEGACY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<a href="[^"]*" data-onclick="jump_to_time" data-jump-time="([^"]*)">([^<]*)</a>\s*(.*)"#).unwrap()
});

static ALTERNATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<a href="[^"]*[?&;]t=(\d+)s[^"]*"[^>]*>\s*<span[^>]*>([^<]*)</span>\s*</a>\s*<span[^>]*>(.*)</span>"#)
        .unwrap()
});

/// Markup convention used by the upstream that rendered a description
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `data-jump-time` attribute anchors followed by the chapter title
    #[default]
    Legacy,
    /// `t=<seconds>s` query anchors wrapping a label span, followed by a title span
    Alternate,
}

impl Format {
    fn classify(self, line: &str) -> LineClass<'_> {
        match self {
            Format::Legacy => classify_legacy(line),
            Format::Alternate => classify_alternate(line),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Legacy => write!(f, "legacy"),
            Format::Alternate => write!(f, "alternate"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Format::Legacy),
            "alternate" => Ok(Format::Alternate),
            other => Err(format!("unknown description format: {other} (expected legacy or alternate)")),
        }
    }
}

/// A seek point extracted from a description line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampEntry {
    pub title: String,
    /// Offset in seconds; `None` when the upstream time field could not be parsed
    pub time: Option<u64>,
    #[serde(rename = "timePretty")]
    pub time_pretty: String,
}

impl TimestampEntry {
    pub fn is_malformed(&self) -> bool {
        self.time.is_none()
    }
}

/// Description body with its timestamp lines split out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasedDescription {
    pub description: String,
    pub timestamps: Vec<TimestampEntry>,
}

enum LineClass<'a> {
    Timestamp(TimestampEntry),
    Anchor(String),
    Plain(&'a str),
}

/// Split timestamp lines out of an HTML description and decorate the remaining links.
///
/// Never fails: a line that cannot be classified is kept as plain text, and a
/// timestamp whose time field does not parse is kept with `time: None`.
pub fn annotate(content: &str, format: Format) -> PhasedDescription {
    let mut retained: Vec<Cow<'_, str>> = Vec::new();
    let mut timestamps = Vec::new();

    for line in content.split('\n') {
        match format.classify(line) {
            LineClass::Timestamp(entry) => timestamps.push(entry),
            LineClass::Anchor(rewritten) => retained.push(Cow::Owned(rewritten)),
            LineClass::Plain(line) => retained.push(Cow::Borrowed(line)),
        }
    }

    debug!(
        "Annotated description ({format}): {} lines kept, {} timestamps",
        retained.len(),
        timestamps.len()
    );

    PhasedDescription {
        description: retained.join("\n"),
        timestamps,
    }
}

fn classify_legacy(line: &str) -> LineClass<'_> {
    match LEGACY_RE.captures(line) {
        Some(caps) => LineClass::Timestamp(timestamp_entry(&caps[1], &caps[2], &caps[3])),
        None => classify_links(line),
    }
}

fn classify_alternate(line: &str) -> LineClass<'_> {
    // Upstream markup leaves the title span open at the line break.
    let closed = format!("{line}</span>");
    match ALTERNATE_RE.captures(&closed) {
        Some(caps) => LineClass::Timestamp(timestamp_entry(&caps[1], &caps[2], &caps[3])),
        None => classify_links(line),
    }
}

fn classify_links(line: &str) -> LineClass<'_> {
    if ANCHOR_RE.is_match(line) {
        LineClass::Anchor(decorate_anchors(line))
    } else {
        LineClass::Plain(line)
    }
}

fn timestamp_entry(time: &str, clock: &str, title: &str) -> TimestampEntry {
    let time = match parse_time_string(time) {
        Ok(seconds) => Some(seconds),
        Err(e) => {
            debug!("Malformed timestamp time field: {e}");
            None
        }
    };

    let title = strip_tags(title).replace(['\n', '\r'], "");
    let title = html_escape::decode_html_entities(&title).trim().to_string();

    TimestampEntry {
        title,
        time,
        time_pretty: clock.trim().to_string(),
    }
}

fn decorate_anchors(line: &str) -> String {
    ANCHOR_RE
        .replace_all(line, |caps: &regex::Captures| {
            let attrs = &caps[2];
            if TARGET_ATTR_RE.is_match(attrs) {
                return caps[0].to_string();
            }
            let href = localize_href(&caps[1]);
            format!(r#"<a href="{href}"{attrs} target="_blank" rel="noopener noreferrer" class="link">"#)
        })
        .into_owned()
}

/// Point YouTube watch and channel links at the equivalent instance routes.
///
/// Anything that does not parse as an absolute URL is returned unchanged.
fn localize_href(href: &str) -> Cow<'_, str> {
    let Ok(url) = Url::parse(&html_escape::decode_html_entities(href)) else {
        return Cow::Borrowed(href);
    };

    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").or_else(|| host.strip_prefix("m.")).unwrap_or(host);
    if host != "youtube.com" && host != "youtu.be" {
        return Cow::Borrowed(href);
    }

    let local = if let Some(channel) = url.path().strip_prefix("/channel/") {
        format!("/channel/{channel}")
    } else if let Some(id) = crate::extract_video_id(url.as_str()) {
        match url.query_pairs().find(|(k, _)| k == "t") {
            Some((_, t)) => format!("/watch/{id}?t={t}"),
            None => format!("/watch/{id}"),
        }
    } else {
        return Cow::Borrowed(href);
    };

    Cow::Owned(html_escape::encode_double_quoted_attribute(&local).into_owned())
}

/// Convert `h:mm:ss`, `m:ss` or plain seconds into a number of seconds.
///
/// Two-part strings are read as minutes and seconds.
pub fn parse_time_string(value: &str) -> Result<u64> {
    let parts = value
        .trim()
        .split(':')
        .map(|p| {
            p.trim()
                .parse::<u64>()
                .map_err(|e| eyre!("invalid time component {p:?} in {value:?}: {e}"))
        })
        .collect::<Result<Vec<_>>>()?;

    if parts.len() > 3 {
        bail!("unsupported time format: {value:?}");
    }

    parts
        .iter()
        .try_fold(0u64, |acc, part| acc.checked_mul(60)?.checked_add(*part))
        .ok_or_else(|| eyre!("time out of range: {value:?}"))
}
