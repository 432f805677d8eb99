use std::fmt::Write;

use eyre::Result;
use serde::Serialize;
use url::Url;

use crate::description::PhasedDescription;
use crate::format::{compact_number, number_with_commas, strip_tags, title_case, truncate, video_length};
use crate::model::{Channel, CommentsPage, Feed, SearchItem, Subscription, Video, VideoDetails};
use crate::thumbnail;

const DESCRIPTION_PREVIEW_CHARS: usize = 200;
const COMMENT_PREVIEW_CHARS: usize = 400;

/// Video record with its annotated description, as emitted by `ivx video --format json`
#[derive(Debug, Serialize)]
pub struct VideoWithChapters<'a> {
    #[serde(flatten)]
    pub video: &'a VideoDetails,
    pub chapters: &'a PhasedDescription,
}

/// Pretty-printed JSON for any API payload
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render a video list, one three-line entry per video
pub fn render_videos(videos: &[Video], instance: &Url) -> String {
    videos
        .iter()
        .enumerate()
        .map(|(i, v)| render_video_entry(i + 1, v, instance))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_video_entry(index: usize, video: &Video, instance: &Url) -> String {
    let length = if video.live_now {
        "LIVE".to_string()
    } else {
        video_length(video.length_seconds)
    };

    let mut out = format!("{index}. {} ({length})\n", video.title);
    let mut meta = vec![video.author.clone(), format!("{} views", compact_number(video.view_count))];
    if !video.published_text.is_empty() {
        meta.push(video.published_text.clone());
    }
    let _ = writeln!(out, "   {}", meta.join(" | "));
    if let Ok(watch) = instance.join(&format!("watch?v={}", video.video_id)) {
        let _ = writeln!(out, "   {watch}");
    }
    if let Some(image) = video.thumbnail() {
        let _ = writeln!(out, "   {}", thumbnail::resolve_url(&image.url, instance));
    }
    out
}

/// Render a single video with its chapter list
pub fn render_video(video: &VideoDetails, phased: &PhasedDescription) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", video.title);
    let _ = writeln!(
        out,
        "{} ({}) | {} views | {} likes | {}",
        video.author,
        video.sub_count_text,
        number_with_commas(video.view_count),
        number_with_commas(video.like_count),
        video_length(video.length_seconds),
    );
    if !video.published_text.is_empty() {
        let _ = writeln!(out, "Published {}", video.published_text);
    }
    if !video.genre.is_empty() {
        let _ = writeln!(out, "Genre: {}", title_case(&video.genre));
    }

    out.push('\n');
    out.push_str(&render_phased(phased));

    if !video.recommended_videos.is_empty() {
        let _ = writeln!(out, "\nRecommended:");
        for rec in &video.recommended_videos {
            let _ = writeln!(
                out,
                "  {} ({}) by {} [{}]",
                rec.title,
                video_length(rec.length_seconds),
                rec.author,
                rec.video_id
            );
        }
    }
    out
}

/// Render description text followed by its chapters
pub fn render_phased(phased: &PhasedDescription) -> String {
    let mut out = html_to_text(&phased.description);
    if !out.is_empty() {
        out.push('\n');
    }

    if !phased.timestamps.is_empty() {
        let width = phased.timestamps.iter().map(|t| t.time_pretty.len()).max().unwrap_or(0);
        let _ = writeln!(out, "\nChapters:");
        for entry in &phased.timestamps {
            let marker = if entry.is_malformed() { " (invalid time)" } else { "" };
            let _ = writeln!(out, "  {:<width$}  {}{marker}", entry.time_pretty, entry.title);
        }
    }
    out
}

pub fn render_comments(page: &CommentsPage) -> String {
    let mut out = String::new();
    if let Some(count) = page.comment_count {
        let _ = writeln!(out, "{} comments\n", number_with_commas(count));
    }
    for comment in &page.comments {
        let owner = if comment.author_is_channel_owner { " [owner]" } else { "" };
        let edited = if comment.is_edited { " (edited)" } else { "" };
        let _ = writeln!(
            out,
            "{}{owner} | {}{edited} | {} likes",
            comment.author,
            comment.published_text,
            compact_number(comment.like_count)
        );
        let _ = writeln!(out, "  {}", truncate(&comment.content, COMMENT_PREVIEW_CHARS).replace('\n', "\n  "));
        if let Some(replies) = &comment.replies {
            let _ = writeln!(out, "  {} replies", replies.reply_count);
        }
        out.push('\n');
    }
    if let Some(continuation) = &page.continuation {
        let _ = writeln!(out, "Next page: --continuation {continuation}");
    }
    out
}

pub fn render_channel(channel: &Channel, instance: &Url) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", channel.author, channel.author_id);
    let _ = writeln!(
        out,
        "{} subscribers | {} views",
        compact_number(channel.sub_count),
        number_with_commas(channel.total_views)
    );
    if let Some(avatar) = thumbnail::best_image(&channel.author_thumbnails, 176, 176) {
        let _ = writeln!(out, "{}", thumbnail::resolve_url(&avatar.url, instance));
    }
    if !channel.description.is_empty() {
        let _ = writeln!(out, "\n{}", truncate(&channel.description, DESCRIPTION_PREVIEW_CHARS));
    }
    if !channel.latest_videos.is_empty() {
        let _ = writeln!(out, "\nLatest videos:\n");
        out.push_str(&render_videos(&channel.latest_videos, instance));
    }
    out
}

pub fn render_search(items: &[SearchItem], instance: &Url) -> String {
    let mut out = String::new();
    let mut index = 0;
    for item in items {
        match item {
            SearchItem::Video(video) => {
                index += 1;
                out.push_str(&render_video_entry(index, video, instance));
            }
            SearchItem::Channel(channel) => {
                index += 1;
                let _ = writeln!(
                    out,
                    "{index}. [channel] {} ({})\n   {} subscribers | {} videos",
                    channel.author,
                    channel.author_id,
                    compact_number(channel.sub_count),
                    channel.video_count
                );
            }
            SearchItem::Playlist(playlist) => {
                index += 1;
                let _ = writeln!(
                    out,
                    "{index}. [playlist] {} ({})\n   {} | {} videos",
                    playlist.title, playlist.playlist_id, playlist.author, playlist.video_count
                );
            }
            SearchItem::Other => continue,
        }
        out.push('\n');
    }
    out
}

pub fn render_subscriptions(subscriptions: &[Subscription]) -> String {
    subscriptions
        .iter()
        .map(|s| format!("{} ({})", s.author, s.author_id))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_feed(feed: &Feed, instance: &Url) -> String {
    let mut out = String::new();
    if !feed.notifications.is_empty() {
        let _ = writeln!(out, "New ({}):\n", feed.notifications.len());
        out.push_str(&render_videos(&feed.notifications, instance));
        out.push('\n');
    }
    out.push_str(&render_videos(&feed.videos, instance));
    out
}

fn html_to_text(html: &str) -> String {
    html_escape::decode_html_entities(&strip_tags(html)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::{Format, TimestampEntry, annotate};
    use crate::model::{Comment, PlaylistResult};
    use crate::thumbnail::Image;

    fn instance() -> Url {
        Url::parse("https://inv.example/").unwrap()
    }

    fn sample_video() -> Video {
        Video {
            title: "Rust in 100 Seconds".to_string(),
            video_id: "5C_HPTJg5ek".to_string(),
            author: "Fireship".to_string(),
            author_id: "UCsBjURrPoezykLs9EqgamOA".to_string(),
            video_thumbnails: vec![Image {
                quality: Some("high".to_string()),
                url: "/vi/5C_HPTJg5ek/hqdefault.jpg".to_string(),
                width: 480,
                height: 360,
            }],
            description: String::new(),
            view_count: 2_500_000,
            published: 0,
            published_text: "3 years ago".to_string(),
            length_seconds: 149,
            live_now: false,
        }
    }

    #[test]
    fn test_render_videos() {
        let output = render_videos(&[sample_video()], &instance());
        assert_eq!(
            output,
            "1. Rust in 100 Seconds (2:29)\n   Fireship | 2.5M views | 3 years ago\n   https://inv.example/watch?v=5C_HPTJg5ek\n   https://inv.example/vi/5C_HPTJg5ek/hqdefault.jpg\n"
        );
    }

    #[test]
    fn test_render_videos_empty() {
        assert_eq!(render_videos(&[], &instance()), "");
    }

    #[test]
    fn test_render_phased() {
        let phased = PhasedDescription {
            description: "Links: <a href=\"https://example.com\">example &amp; co</a>".to_string(),
            timestamps: vec![
                TimestampEntry {
                    title: "Intro".to_string(),
                    time: Some(0),
                    time_pretty: "0:00".to_string(),
                },
                TimestampEntry {
                    title: "Deep dive".to_string(),
                    time: None,
                    time_pretty: "10:00".to_string(),
                },
            ],
        };
        assert_eq!(
            render_phased(&phased),
            "Links: example & co\n\nChapters:\n  0:00   Intro\n  10:00  Deep dive (invalid time)\n"
        );
    }

    #[test]
    fn test_render_phased_from_annotate() {
        let phased = annotate("Just text", Format::Legacy);
        assert_eq!(render_phased(&phased), "Just text\n");
    }

    #[test]
    fn test_render_search_skips_unknown() {
        let items = vec![
            SearchItem::Other,
            SearchItem::Playlist(PlaylistResult {
                title: "Code Report".to_string(),
                playlist_id: "PL1".to_string(),
                playlist_thumbnail: None,
                author: "Fireship".to_string(),
                author_id: "UC1".to_string(),
                video_count: 12,
            }),
        ];
        assert_eq!(
            render_search(&items, &instance()),
            "1. [playlist] Code Report (PL1)\n   Fireship | 12 videos\n\n"
        );
    }

    #[test]
    fn test_render_comments() {
        let page = CommentsPage {
            comment_count: Some(1500),
            video_id: "5C_HPTJg5ek".to_string(),
            comments: vec![Comment {
                author: "@someone".to_string(),
                author_id: "UC2".to_string(),
                author_thumbnails: vec![],
                content: "Great\nvideo".to_string(),
                content_html: String::new(),
                published_text: "1 day ago".to_string(),
                like_count: 42,
                comment_id: "Ugz".to_string(),
                is_edited: true,
                author_is_channel_owner: false,
                replies: None,
            }],
            continuation: Some("abc".to_string()),
        };
        assert_eq!(
            render_comments(&page),
            "1,500 comments\n\n@someone | 1 day ago (edited) | 42 likes\n  Great\n  video\n\nNext page: --continuation abc\n"
        );
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&vec![Subscription {
            author: "Fireship".to_string(),
            author_id: "UC1".to_string(),
        }])
        .unwrap();
        assert!(json.contains("\"authorId\": \"UC1\""));
    }
}
