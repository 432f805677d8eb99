use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ivx::Format;
use ivx::api::{CommentSort, SearchKind, SearchSort, TrendingCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ivx",
    about = "Client for Invidious-style video APIs",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// API instance base URL (overrides IVX_INSTANCE and the config file)
    #[arg(long, global = true)]
    pub instance: Option<String>,

    /// Output format: text (default), json
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Interface locale sent to the API, e.g. de or pt-BR
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Show instance, locale and request details
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Trending videos
    Trending {
        /// Two-letter region code
        #[arg(short, long)]
        region: Option<String>,

        /// music, gaming, news or movies
        #[arg(short, long)]
        category: Option<TrendingCategory>,
    },

    /// Popular videos on the instance
    Popular,

    /// Video details with chapter timestamps
    Video {
        /// Video URL or ID
        video: String,

        /// Description markup: legacy or alternate
        #[arg(long)]
        description_format: Option<Format>,
    },

    /// Comments for a video
    Comments {
        /// Video URL or ID
        video: String,

        /// top or new
        #[arg(short, long)]
        sort: Option<CommentSort>,

        /// Continuation token from a previous page
        #[arg(long)]
        continuation: Option<String>,
    },

    /// Channel details and latest videos
    Channel {
        /// Channel ID (UC...)
        id: String,
    },

    /// Search videos, channels and playlists
    Search {
        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,

        /// Result page, starting at 1
        #[arg(short, long)]
        page: Option<u32>,

        /// relevance, rating, upload_date or view_count
        #[arg(short, long)]
        sort: Option<SearchSort>,

        /// all, video, channel or playlist
        #[arg(short = 't', long = "type")]
        kind: Option<SearchKind>,
    },

    /// Channels the token's account is subscribed to
    Subscriptions,

    /// Subscription feed for the token's account
    Feed,

    /// Extract chapter timestamps from an HTML description (file or stdin)
    Describe {
        /// Description file; reads stdin if omitted
        path: Option<PathBuf>,

        /// Description markup: legacy or alternate
        #[arg(long)]
        description_format: Option<Format>,
    },
}
