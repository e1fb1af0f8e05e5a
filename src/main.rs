use std::io;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use ratatui::text::Text;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use oxiline::application::services::{PipelineServices, RenderPipeline, TextFormatter};
use oxiline::domain::entities::Embed;
use oxiline::infrastructure::{
    AppConfig, CliArgs, ImageCrateDecoder, MemoryResponseCache, ReqwestFetcher, SongLinkClient,
    StorageManager,
};
use oxiline::presentation::terminal::write_text;
use oxiline::presentation::{EmbedCard, MessageView};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = StorageManager::new()?.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn build_pipeline(config: &AppConfig) -> Result<(RenderPipeline, Arc<MemoryResponseCache>)> {
    let settings = &config.pipeline;
    let cache = Arc::new(MemoryResponseCache::new(settings.response_cache_capacity));
    let fetcher = Arc::new(ReqwestFetcher::new(settings.fetch_timeout())?);
    let tracks = SongLinkClient::new(
        fetcher.clone(),
        settings.track_resolver_endpoint.clone(),
        settings.track_platform.clone(),
        settings.fetch_timeout(),
    );

    let services = PipelineServices {
        fetcher,
        cache: cache.clone(),
        tracks: Arc::new(tracks),
        decoder: Arc::new(ImageCrateDecoder::new()),
        formatter: Arc::new(TextFormatter::new()),
    };
    Ok((RenderPipeline::new(services, settings), cache))
}

async fn render_message(
    pipeline: Arc<RenderPipeline>,
    config: &AppConfig,
    args: &CliArgs,
    message: &str,
) -> Result<()> {
    let mut view = MessageView::new(pipeline, &config.pipeline, Handle::current())
        .with_members(Arc::new(args.member_directory()));
    if let Some(channel) = &args.channel {
        view = view.with_channel(channel.clone());
    }

    view.set_source(message);
    if view.next_update().await.is_none() {
        warn!("Render job ended without a result");
    }

    let line = view.to_line();
    write_text(&mut io::stdout().lock(), &Text::from(line))?;
    Ok(())
}

fn render_embed(config: &AppConfig, args: &CliArgs) -> Result<()> {
    let Some(path) = &args.embed else {
        return Ok(());
    };
    let raw = std::fs::read_to_string(path)?;
    let embed: Embed = serde_json::from_str(&raw)?;

    let card = EmbedCard::from_embed(&embed, &TextFormatter::new(), &config.embed);
    write_text(&mut io::stdout().lock(), &card.to_text())?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = oxiline::VERSION, "Starting {}", oxiline::NAME);

    if args.message.is_none() && args.embed.is_none() {
        return Err(eyre!("nothing to render, pass message text or --embed"));
    }

    if let Some(message) = &args.message {
        let (pipeline, cache) = build_pipeline(&config)?;
        render_message(Arc::new(pipeline), &config, &args, message).await?;
        debug!(stats = %cache.stats(), "Response cache at shutdown");
    }
    render_embed(&config, &args)
}
