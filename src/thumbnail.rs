use serde::{Deserialize, Serialize};
use url::Url;

/// Image variant as listed by the API (video thumbnails, avatars, banners)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Image {
    #[serde(default)]
    pub quality: Option<String>,
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Pick the widest image that fits inside `max_width` x `max_height`.
///
/// Falls back to the smallest image when nothing fits.
pub fn best_image(images: &[Image], max_width: u32, max_height: u32) -> Option<&Image> {
    images
        .iter()
        .filter(|i| i.width <= max_width && i.height <= max_height)
        .max_by_key(|i| i.width)
        .or_else(|| images.iter().min_by_key(|i| i.width))
}

/// Make an image URL absolute against the API instance
pub fn resolve_url(url: &str, instance: &Url) -> String {
    if let Some(rest) = url.strip_prefix("//") {
        format!("https://{rest}")
    } else if url.starts_with('/') {
        instance
            .join(url)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| url.to_string())
    } else {
        url.to_string()
    }
}
