//! Anime catalog CLI.
//!
//! Renders the catalog pages to HTML, runs the featured slideshow and
//! manages the response cache.

use anyhow::{Context, Result};
use catalog::{
    render_document, AutoAdvance, BrowseAction, BrowsePage, BrowseState, DetailsPage,
    DetailsState, HomeAction, HomePage, HomeState, PageContext, PageView, SliderState,
    UpcomingPage, UpcomingState,
};
use clap::{Parser, Subcommand};
use jikan_client::api::{Anime, PaginatedResponse};
use jikan_client::{CachedFetcher, Endpoint, JikanClient, TtlCache};
use shared::{Config, LogConfig, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write the rendered page here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Featured slider, top list and this season's top anime
    Home {
        /// Search instead of showing the top list
        #[arg(long)]
        search: Option<String>,
    },

    /// Browse by genre or search the catalog
    Browse {
        /// Genre ID to browse
        #[arg(long, conflicts_with = "search")]
        genre: Option<u32>,

        /// Search query
        #[arg(long)]
        search: Option<String>,

        /// Result page
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Details of one anime, by ID or by a query string such as `?id=21`
    Details { target: String },

    /// Anime of the upcoming season
    Upcoming,

    /// Cycle through the featured anime, logging each slide
    Slideshow {
        /// Stop after this many seconds; runs until Ctrl-C when omitted
        #[arg(long)]
        seconds: Option<u64>,

        /// Run the home page carousel (several slides at once) instead of
        /// the standalone slider
        #[arg(long)]
        home: bool,
    },

    /// Inspect or clear the response cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommand {
    /// Remove one entry, or everything when no key is given
    Clear { key: Option<String> },

    /// Entry count, expired entries and stored size
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let mut log_config = LogConfig::from_settings(&config.logging, &config.log_dir(), "anime-catalog");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!("Anime catalog starting");
    info!(config_file = %args.config.display(), "Loaded configuration");

    // Initialize cache storage
    let store_path = config.store_path();
    info!(store_path = %store_path.display(), "Opening cache store");
    let store = SqliteStore::open(&store_path).context("Failed to open cache store")?;
    let cache = TtlCache::new(Arc::new(store), config.cache.ttl(), config.cache.enabled);
    info!(
        enabled = cache.is_enabled(),
        ttl_secs = cache.ttl().as_secs(),
        "Response cache ready"
    );

    // Initialize API client
    let client = JikanClient::from_config(&config.api).context("Failed to create Jikan client")?;
    let retry = client.retry_policy();
    info!(
        base_url = %config.api.base_url,
        max_attempts = retry.attempts(),
        retry_delay_ms = retry.delay.as_millis() as u64,
        "API client ready"
    );

    let ctx = PageContext::new(CachedFetcher::new(client, cache), config.catalog.clone());

    let view = match args.command {
        Command::Home { search } => home(&ctx, search).await,
        Command::Browse {
            genre,
            search,
            page,
        } => browse(&ctx, genre, search, page).await,
        Command::Details { target } => details(&ctx, &target).await,
        Command::Upcoming => upcoming(&ctx).await,
        Command::Slideshow { seconds, home } => return slideshow(&ctx, seconds, home).await,
        Command::Cache { action } => return manage_cache(&ctx, action),
    };

    write_page(&view, args.output.as_ref())
}

async fn home(ctx: &PageContext, search: Option<String>) -> PageView {
    let page = HomePage::new(ctx);
    let mut state = HomeState::new();
    page.load(&mut state).await;

    if let Some(query) = search {
        page.dispatch(&mut state, HomeAction::SearchInput(query)).await;
    }
    page.view(&state)
}

async fn browse(
    ctx: &PageContext,
    genre: Option<u32>,
    search: Option<String>,
    page_number: u32,
) -> PageView {
    let page = BrowsePage::new(ctx);
    let mut state = BrowseState::new();
    page.load_categories(&mut state).await;

    let action = match (genre, search) {
        (Some(genre_id), _) => Some(BrowseAction::SelectGenre(genre_id)),
        (None, Some(query)) => Some(BrowseAction::Search(query)),
        (None, None) => None,
    };

    if let Some(action) = action {
        state.apply(action);
        state.pagination.go_to(page_number);
        page.reload(&mut state).await;
    }
    page.view(&state)
}

async fn details(ctx: &PageContext, target: &str) -> PageView {
    let mut state = match target.trim().parse::<u32>() {
        Ok(id) => DetailsState::new(Some(id)),
        Err(_) => DetailsState::from_query(target),
    };

    let page = DetailsPage::new(ctx);
    page.load(&mut state).await;
    page.view(&state)
}

async fn upcoming(ctx: &PageContext) -> PageView {
    let page = UpcomingPage::new(ctx);
    let mut state = UpcomingState::default();
    page.load(&mut state).await;
    page.view(&state)
}

async fn slideshow(ctx: &PageContext, seconds: Option<u64>, home: bool) -> Result<()> {
    let (slides, visible, mut slider) = if home {
        let page = HomePage::new(ctx);
        let mut state = HomeState::new();
        page.load(&mut state).await;
        if let Some(message) = state.featured.error() {
            anyhow::bail!("Failed to load featured anime: {}", message);
        }

        let slider = page.auto_advance(&state);
        let slides = state.featured.ready().cloned().unwrap_or_default();
        (slides, ctx.config.slider.home_visible_slides.max(1), slider)
    } else {
        let endpoint = Endpoint::Featured {
            limit: ctx.config.featured_limit,
        };
        let featured: PaginatedResponse<Anime> = ctx
            .fetcher
            .fetch(&endpoint)
            .await
            .context("Failed to load featured anime")?;

        let interval = Duration::from_millis(ctx.config.slider.standalone_interval_ms);
        let slider = AutoAdvance::new(SliderState::new(featured.data.len()), interval);
        (featured.data, 1, slider)
    };

    if slides.is_empty() {
        warn!("No featured anime to show");
        return Ok(());
    }

    let mut index_rx = slider.subscribe();
    let positions = slider.snapshot().positions();
    info!(slides = slides.len(), visible, positions, "Slideshow starting");
    log_slides(&slides, 0, visible);
    slider.start();

    let deadline = async {
        match seconds {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
            }
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = index_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let index = *index_rx.borrow_and_update();
                log_slides(&slides, index, visible);
            }
        }
    }

    slider.stop();
    info!("Slideshow stopped");
    Ok(())
}

/// Log the slides visible from `index` on
fn log_slides(slides: &[Anime], index: usize, visible: usize) {
    for anime in slides.iter().skip(index).take(visible) {
        info!(index, mal_id = anime.mal_id, title = %anime.title, "Slide");
    }
}

fn manage_cache(ctx: &PageContext, action: CacheCommand) -> Result<()> {
    let cache = ctx.fetcher.cache();

    match action {
        CacheCommand::Clear { key: Some(key) } => {
            info!(key = %key, "Clearing cache entry");
            cache.clear(&key).context("Failed to clear cache entry")?;
        }
        CacheCommand::Clear { key: None } => {
            info!("Clearing cache");
            cache.clear_all().context("Failed to clear cache")?;
        }
        CacheCommand::Stats => {
            let stats = cache.stats().context("Failed to get cache stats")?;
            info!(
                entries = stats.total_entries,
                expired = stats.expired_entries,
                size_bytes = stats.total_size_bytes,
                "Cache statistics"
            );
            println!(
                "entries: {}\nexpired: {}\nsize_bytes: {}",
                stats.total_entries, stats.expired_entries, stats.total_size_bytes
            );
        }
    }
    Ok(())
}

fn write_page(view: &PageView, output: Option<&PathBuf>) -> Result<()> {
    if let Some(message) = &view.error {
        warn!(page = %view.title, error = %message, "Page rendered with an error");
    }

    let html = render_document(view);
    match output {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Page written");
        }
        None => print!("{}", html),
    }
    Ok(())
}
