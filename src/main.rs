use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use eyre::{Result, WrapErr, eyre};
use log::{debug, info};
use serde::Serialize;

use ivx::api::{self, Client, SearchOptions};
use ivx::config::Config;
use ivx::output::{self, VideoWithChapters};

mod cli;

use cli::{Cli, Command, OutputFormat};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ivx.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ivx")
        .join("logs")
}

fn build_after_help() -> String {
    let config_path = ivx::config::config_path();
    let config_line = if config_path.exists() {
        format!("  \x1b[32m✅\x1b[0m {}", config_path.display())
    } else {
        format!("  \x1b[31m❌\x1b[0m {} (not found, using defaults)", config_path.display())
    };

    let log_path = log_dir().join("ivx.log");

    format!(
        "\nCONFIG:\n{config_line}\n\nLogs are written to: {}",
        log_path.display()
    )
}

/// Retry an async operation with exponential backoff. Only transient
/// failures are retried; anything else is returned on the first attempt.
async fn retry<F, Fut, T>(max_attempts: u32, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..max_attempts {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                if !api::is_transient(&e) {
                    return Err(e);
                }
                if attempt + 1 < max_attempts {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    debug!("Attempt {} failed: {e}, retrying in {delay:?}", attempt + 1);
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| eyre!("no attempts made")))
}

fn render<T: Serialize + ?Sized>(format: OutputFormat, value: &T, text: impl FnOnce(&T) -> String) -> Result<String> {
    match format {
        OutputFormat::Json => output::render_json(value),
        OutputFormat::Text => Ok(text(value)),
    }
}

fn parse_output_format(value: &str) -> Option<OutputFormat> {
    <OutputFormat as clap::ValueEnum>::from_str(value.trim(), true).ok()
}

fn video_id_arg(input: &str) -> Result<String> {
    ivx::extract_video_id(input).ok_or_else(|| {
        eyre!(
            "could not extract video ID from: {input}\n\nSupported formats:\n  https://www.youtube.com/watch?v=ID\n  https://youtu.be/ID\n  https://<instance>/watch?v=ID\n  <11-character video ID>"
        )
    })
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display())),
        None => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

async fn run(command: Command, config: &Config, format: OutputFormat) -> Result<String> {
    let client = api::global()?;
    let instance = client.instance();

    match command {
        Command::Trending { region, category } => {
            let region = region.or_else(|| config.region.clone());
            let region = region.as_deref();
            let videos = retry(3, || client.trending(region, category)).await?;
            render(format, videos.as_slice(), |v| output::render_videos(v, instance))
        }
        Command::Popular => {
            let videos = retry(3, || client.popular()).await?;
            render(format, videos.as_slice(), |v| output::render_videos(v, instance))
        }
        Command::Video {
            video,
            description_format,
        } => {
            let video_id = video_id_arg(&video)?;
            let id = video_id.as_str();
            let details = retry(3, || client.video(id)).await?;
            let phased = details.phased(description_format.unwrap_or_else(|| config.description_format()));
            match format {
                OutputFormat::Json => output::render_json(&VideoWithChapters {
                    video: &details,
                    chapters: &phased,
                }),
                OutputFormat::Text => Ok(output::render_video(&details, &phased)),
            }
        }
        Command::Comments {
            video,
            sort,
            continuation,
        } => {
            let video_id = video_id_arg(&video)?;
            let id = video_id.as_str();
            let continuation = continuation.as_deref();
            let page = retry(3, || client.comments(id, sort, continuation)).await?;
            render(format, &page, output::render_comments)
        }
        Command::Channel { id } => {
            let id = id.as_str();
            let channel = retry(3, || client.channel(id)).await?;
            render(format, &channel, |c| output::render_channel(c, instance))
        }
        Command::Search {
            query,
            page,
            sort,
            kind,
        } => {
            let q = query.join(" ");
            let q = q.as_str();
            let options = SearchOptions { page, sort, kind };
            let options = &options;
            let items = retry(3, || client.search(q, options)).await?;
            render(format, items.as_slice(), |i| output::render_search(i, instance))
        }
        Command::Subscriptions => {
            client.require_token()?;
            let subscriptions = retry(3, || client.subscriptions()).await?;
            render(format, subscriptions.as_slice(), output::render_subscriptions)
        }
        Command::Feed => {
            client.require_token()?;
            let feed = retry(3, || client.feed()).await?;
            render(format, &feed, |f| output::render_feed(f, instance))
        }
        Command::Describe {
            path,
            description_format,
        } => {
            let content = read_input(path.as_ref())?;
            let phased = ivx::annotate(
                &content,
                description_format.unwrap_or_else(|| config.description_format()),
            );
            render(format, &phased, output::render_phased)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_default();

    // CLI flags take priority over the environment and the config file
    let instance = config.instance(cli.instance.as_deref());
    let locale = config.locale(cli.locale.as_deref());
    let format = cli
        .format
        .or_else(|| config.default_format.as_deref().and_then(parse_output_format))
        .unwrap_or(OutputFormat::Text);

    let mut client = Client::new(&instance)?.with_locale(locale);
    if let Some(token) = config.token() {
        client = client.with_token(token);
    }
    api::init(client)?;

    if cli.verbose {
        let config_path = ivx::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!(
            "Instance: {instance}\nLocale: {locale} ({})",
            ivx::locale::display_name(locale).unwrap_or("unknown")
        );
    }

    let rendered = run(cli.command, &config, format).await?;
    println!("{}", rendered.trim_end());

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use ivx::api::StatusError;
    use reqwest::StatusCode;
    use url::Url;

    fn status_error(status: StatusCode) -> eyre::Report {
        StatusError {
            status,
            url: Url::parse("https://inv.example/api/v1/videos/missing").unwrap(),
            body: "not found".to_string(),
        }
        .into()
    }

    #[tokio::test]
    async fn test_retry_returns_client_errors_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry(3, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(status_error(StatusCode::NOT_FOUND))
        })
        .await;

        assert!(result.unwrap_err().to_string().contains("404"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_gives_up_on_plain_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry(3, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(eyre!("failed to decode response"))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_repeats_server_errors() {
        let calls = AtomicU32::new(0);
        let result = retry(2, || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(status_error(StatusCode::SERVICE_UNAVAILABLE))
            } else {
                Ok("ok")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_exhausts_attempts_on_server_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry(2, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(status_error(StatusCode::TOO_MANY_REQUESTS))
        })
        .await;

        assert!(result.unwrap_err().to_string().contains("429"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("json"), Some(OutputFormat::Json));
        assert_eq!(parse_output_format(" JSON "), Some(OutputFormat::Json));
        assert_eq!(parse_output_format("Text"), Some(OutputFormat::Text));
        assert_eq!(parse_output_format("xml"), None);
    }
}
