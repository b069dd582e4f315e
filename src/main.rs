use discord_bot::RedditEmbedHandler;
use reddit_client::RedditApiClient;
use redditembed_core::{BotConfig, CoreError, ErrorReporter, DEFAULT_LOG_FILTER};
use serenity::model::gateway::GatewayIntents;
use serenity::Client;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use video_fetch::{FfmpegRemuxer, Remuxer, VideoFetcher};

const CONFIG_ENV: &str = "REDDITEMBED_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn build_remuxer(config: &BotConfig) -> Result<Arc<dyn Remuxer>, CoreError> {
    let remuxer = match config.video.ffmpeg_path.clone() {
        Some(path) => FfmpegRemuxer::new(path),
        None => FfmpegRemuxer::from_path().ok_or_else(|| CoreError::NotFound {
            resource: "ffmpeg binary on PATH".to_string(),
        })?,
    };
    tracing::info!("Using remuxer at {}", remuxer.binary_path().display());
    Ok(Arc::new(remuxer))
}

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    let reporter = ErrorReporter::new("startup");
    let config_path =
        std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = match BotConfig::load(&config_path) {
        Ok(config) => {
            init_logging(&config.log_filter);
            config
        }
        Err(e) => {
            init_logging(DEFAULT_LOG_FILTER);
            let e = CoreError::from(e);
            reporter.report_error(&e);
            return Err(e);
        }
    };

    tracing::info!("Starting redditembed with config {}", config_path);

    let reddit = Arc::new(RedditApiClient::new(&config.reddit)?);
    let remuxer = build_remuxer(&config).map_err(|e| {
        reporter.report_error(&e);
        e
    })?;
    let videos = Arc::new(VideoFetcher::new(
        &config.video,
        reddit.user_agent(),
        remuxer,
    )?);
    let handler = RedditEmbedHandler::new(reddit, videos);

    let mut client = Client::builder(&config.discord.token, GatewayIntents::non_privileged())
        .event_handler(handler)
        .await
        .map_err(|e| CoreError::Discord {
            message: format!("Failed to build client: {e}"),
        })?;

    client.start().await.map_err(|e| {
        let e = CoreError::Discord {
            message: e.to_string(),
        };
        reporter.report_error(&e);
        e
    })
}
