use std::fmt;
use std::str::FromStr;

use eyre::{Result, bail, eyre};
use log::debug;
use once_cell::sync::OnceCell;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::model::{Channel, CommentsPage, Feed, SearchItem, Subscription, Video, VideoDetails};

const USER_AGENT: &str = concat!("ivx/", env!("CARGO_PKG_VERSION"));

static GLOBAL: OnceCell<Client> = OnceCell::new();

/// Non-success HTTP response from the instance
#[derive(Debug, thiserror::Error)]
#[error("API returned {status} for {url}: {body}")]
pub struct StatusError {
    pub status: StatusCode,
    pub url: Url,
    pub body: String,
}

/// Whether a failed request is worth repeating: timeouts, connection
/// failures, 5xx and 429. Client errors and decode failures are final.
pub fn is_transient(err: &eyre::Report) -> bool {
    let retryable = |status: StatusCode| status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;

    if let Some(e) = err.downcast_ref::<StatusError>() {
        return retryable(e.status);
    }
    if let Some(e) = err.downcast_ref::<reqwest::Error>() {
        return e.is_timeout() || e.is_connect() || e.status().is_some_and(retryable);
    }
    false
}

/// Install the process-wide client. Fails if one is already installed.
pub fn init(client: Client) -> Result<&'static Client> {
    GLOBAL
        .set(client)
        .map_err(|_| eyre!("API client already initialized"))?;
    global()
}

/// The client installed by [`init`]
pub fn global() -> Result<&'static Client> {
    GLOBAL.get().ok_or_else(|| eyre!("API client not initialized"))
}

macro_rules! query_enum {
    ($name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($value => Ok($name::$variant),)+
                    other => Err(format!(
                        "unknown value {other:?}, expected one of: {}",
                        [$($value),+].join(", ")
                    )),
                }
            }
        }
    };
}

query_enum!(TrendingCategory {
    Music => "music",
    Gaming => "gaming",
    News => "news",
    Movies => "movies",
});

query_enum!(CommentSort {
    Top => "top",
    New => "new",
});

query_enum!(SearchSort {
    Relevance => "relevance",
    Rating => "rating",
    UploadDate => "upload_date",
    ViewCount => "view_count",
});

query_enum!(SearchKind {
    All => "all",
    Video => "video",
    Channel => "channel",
    Playlist => "playlist",
});

/// Optional search filters
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub page: Option<u32>,
    pub sort: Option<SearchSort>,
    pub kind: Option<SearchKind>,
}

/// REST client for one API instance
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    instance: Url,
    token: Option<String>,
    locale: Option<String>,
}

impl Client {
    pub fn new(instance: &str) -> Result<Self> {
        let mut instance = Url::parse(instance).map_err(|e| eyre!("invalid instance URL {instance:?}: {e}"))?;
        if instance.cannot_be_a_base() {
            bail!("instance URL cannot be used as a base: {instance}");
        }
        // relative joins (thumbnails, watch links) must stay under a sub-path
        if !instance.path().ends_with('/') {
            let path = format!("{}/", instance.path());
            instance.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            instance,
            token: None,
            locale: None,
        })
    }

    /// Bearer token for the authenticated endpoints
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Locale sent as `hl` on every request
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn instance(&self) -> &Url {
        &self.instance
    }

    /// Token for the `auth/*` endpoints, or an error naming where to set it
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| eyre!("no API token configured (set `token` in the config file or IVX_TOKEN)"))
    }

    pub async fn trending(&self, region: Option<&str>, category: Option<TrendingCategory>) -> Result<Vec<Video>> {
        let mut query = Vec::new();
        if let Some(region) = region {
            query.push(("region", region));
        }
        if let Some(category) = category {
            query.push(("type", category.as_str()));
        }
        self.get(&["trending"], &query, false).await
    }

    pub async fn popular(&self) -> Result<Vec<Video>> {
        self.get(&["popular"], &[], false).await
    }

    pub async fn video(&self, video_id: &str) -> Result<VideoDetails> {
        self.get(&["videos", video_id], &[], false).await
    }

    pub async fn comments(
        &self,
        video_id: &str,
        sort: Option<CommentSort>,
        continuation: Option<&str>,
    ) -> Result<CommentsPage> {
        let mut query = Vec::new();
        if let Some(sort) = sort {
            query.push(("sort_by", sort.as_str()));
        }
        if let Some(continuation) = continuation {
            query.push(("continuation", continuation));
        }
        self.get(&["comments", video_id], &query, false).await
    }

    pub async fn channel(&self, channel_id: &str) -> Result<Channel> {
        self.get(&["channels", channel_id], &[], false).await
    }

    pub async fn search(&self, q: &str, options: &SearchOptions) -> Result<Vec<SearchItem>> {
        let page = options.page.map(|p| p.to_string());
        let mut query = vec![("q", q)];
        if let Some(page) = page.as_deref() {
            query.push(("page", page));
        }
        if let Some(sort) = options.sort {
            query.push(("sort_by", sort.as_str()));
        }
        if let Some(kind) = options.kind {
            query.push(("type", kind.as_str()));
        }
        self.get(&["search"], &query, false).await
    }

    pub async fn subscriptions(&self) -> Result<Vec<Subscription>> {
        self.get(&["auth", "subscriptions"], &[], true).await
    }

    pub async fn feed(&self) -> Result<Feed> {
        self.get(&["auth", "feed"], &[], true).await
    }

    /// Build `<instance>/api/v1/<segments>?<query>&hl=<locale>`
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.instance.clone();
        url.path_segments_mut()
            .map_err(|_| eyre!("instance URL cannot be used as a base: {}", self.instance))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);

        let locale = self.locale.as_deref().map(|l| ("hl", l));
        let pairs: Vec<_> = query.iter().copied().chain(locale).collect();
        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, &str)], auth: bool) -> Result<T> {
        let url = self.endpoint(segments, query)?;
        debug!("GET {url}");

        let mut request = self.http.get(url.clone()).header("User-Agent", USER_AGENT);
        if auth {
            request = request.bearer_auth(self.require_token()?);
        }

        let resp = request.send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(StatusError { status, url, body }.into());
        }

        Ok(resp.json().await?)
    }
}
