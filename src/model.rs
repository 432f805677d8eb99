use serde::{Deserialize, Serialize};

use crate::description::{self, Format, PhasedDescription};
use crate::thumbnail::{self, Image};

/// Thumbnail bounds used for list views
pub const LIST_THUMBNAIL_WIDTH: u32 = 480;
pub const LIST_THUMBNAIL_HEIGHT: u32 = 360;

/// Video as it appears in trending, popular, search and feed lists
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub title: String,
    pub video_id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub video_thumbnails: Vec<Image>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub published: i64,
    #[serde(default)]
    pub published_text: String,
    #[serde(default)]
    pub length_seconds: u64,
    #[serde(default)]
    pub live_now: bool,
}

impl Video {
    pub fn thumbnail(&self) -> Option<&Image> {
        thumbnail::best_image(&self.video_thumbnails, LIST_THUMBNAIL_WIDTH, LIST_THUMBNAIL_HEIGHT)
    }
}

/// Full record from `/api/v1/videos/{id}`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub title: String,
    pub video_id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub author_thumbnails: Vec<Image>,
    #[serde(default)]
    pub video_thumbnails: Vec<Image>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_html: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub published_text: String,
    #[serde(default)]
    pub length_seconds: u64,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub sub_count_text: String,
    #[serde(default)]
    pub live_now: bool,
    #[serde(default)]
    pub recommended_videos: Vec<RecommendedVideo>,
}

impl VideoDetails {
    /// Split the HTML description into body text and chapter timestamps
    pub fn phased(&self, format: Format) -> PhasedDescription {
        description::annotate(&self.description_html, format)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedVideo {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub video_thumbnails: Vec<Image>,
    #[serde(default)]
    pub length_seconds: u64,
    #[serde(default)]
    pub view_count_text: String,
}

/// One page of comments from `/api/v1/comments/{id}`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsPage {
    #[serde(default)]
    pub comment_count: Option<u64>,
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub continuation: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub author_thumbnails: Vec<Image>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_html: String,
    #[serde(default)]
    pub published_text: String,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_id: String,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default)]
    pub author_is_channel_owner: bool,
    #[serde(default)]
    pub replies: Option<Replies>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Replies {
    pub reply_count: u64,
    pub continuation: String,
}

/// Channel page from `/api/v1/channels/{id}`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub author: String,
    pub author_id: String,
    #[serde(default)]
    pub author_thumbnails: Vec<Image>,
    #[serde(default)]
    pub author_banners: Vec<Image>,
    #[serde(default)]
    pub sub_count: u64,
    #[serde(default)]
    pub total_views: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_html: String,
    #[serde(default)]
    pub latest_videos: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResult {
    pub author: String,
    pub author_id: String,
    #[serde(default)]
    pub author_thumbnails: Vec<Image>,
    #[serde(default)]
    pub sub_count: u64,
    #[serde(default)]
    pub video_count: u64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResult {
    pub title: String,
    pub playlist_id: String,
    #[serde(default)]
    pub playlist_thumbnail: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub video_count: u64,
}

/// Mixed search result, discriminated by the `type` field
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchItem {
    Video(Video),
    Channel(ChannelResult),
    Playlist(PlaylistResult),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub author: String,
    pub author_id: String,
}

/// Subscription feed from `/api/v1/auth/feed`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Feed {
    #[serde(default)]
    pub notifications: Vec<Video>,
    #[serde(default)]
    pub videos: Vec<Video>,
}
