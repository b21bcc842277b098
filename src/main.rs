//! reviews-feed - Entry Point
//!
//! Pages through a reviews source, lays every row out at a given width and
//! prints the result. Optionally expands one row and resolves images through
//! the two-tier cache.

use clap::Parser;
use reviews_feed::config::{self, ResolvedConfig};
use reviews_feed::image_cache::ImageCache;
use reviews_feed::model::AppError;
use reviews_feed::provider;
use reviews_feed::state::{ReviewListStore, StoreEvent};
use reviews_feed::view_state::cell_config::Avatar;
use reviews_feed::view_state::layout_params::LayoutParams;
use reviews_feed::view_state::list_view::ReviewListView;
use reviews_feed::view_state::pagination::PaginationTrigger;
use reviews_feed::view_state::text::GlyphMeasurer;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::broadcast;
use tracing::{error, info};

/// reviews-feed - paginated review list with cell layout and image cache
#[derive(Parser, Debug)]
#[command(name = "reviews-feed")]
#[command(version)]
#[command(about = "Page through reviews and print laid-out rows")]
pub struct Args {
    /// Local JSON file holding the whole review collection
    #[arg(long, conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Reviews endpoint (queried with ?offset=&limit=)
    #[arg(long)]
    pub url: Option<String>,

    /// Number of pages to load
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Reviews per page (overrides config)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Cell width in points
    #[arg(long, default_value_t = 375.0)]
    pub width: f64,

    /// Expand the row at this index before printing
    #[arg(long)]
    pub expand: Option<usize>,

    /// Resolve avatars and photos through the image cache
    #[arg(long)]
    pub fetch_images: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Defaults → Config File → Env Vars → CLI Args
fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    let config_file = config::load_config_with_precedence(args.config.clone())?;
    let merged = config::merge_config(config_file);
    let with_env = config::apply_env_overrides(merged);
    Ok(config::apply_cli_overrides(
        with_env,
        args.page_size,
        args.url.clone(),
        args.file.clone(),
    ))
}

fn drain(
    events: &mut broadcast::Receiver<StoreEvent>,
    view: &mut ReviewListView,
    store: &ReviewListStore,
) {
    for event in view.drain(events, store) {
        if let StoreEvent::LoadFailed { offset, reason } = event {
            eprintln!("failed to load page at offset {offset}: {reason}");
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let config = resolve_config(&args)?;
    reviews_feed::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let provider = provider::from_config(&config)?.ok_or(AppError::MissingSource)?;
    let store = ReviewListStore::new(provider, config.page_size);
    let mut events = store.subscribe();
    let mut view = ReviewListView::new(
        args.width,
        PaginationTrigger::new(config.screens_to_load_next_page),
    );

    for _ in 0..args.pages {
        let loaded = store.load_next_page().await;
        drain(&mut events, &mut view, &store);
        if !loaded {
            break;
        }
    }

    if let Some(index) = args.expand {
        match store.item(index) {
            Some(item) => {
                store.request_expand(item.id);
                drain(&mut events, &mut view, &store);
            }
            None => eprintln!("no row at index {index}"),
        }
    }

    let cache = if args.fetch_images {
        Some(ImageCache::from_config(&config)?)
    } else {
        None
    };

    let params = LayoutParams::default();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for (index, item) in store.items().iter().enumerate() {
        let frames = item.frames(args.width, &params, &GlyphMeasurer);
        writeln!(
            out,
            "{index:>4}  y={:<7} h={:<5} {}  {}",
            view.row_offset(index),
            view.row_height(index).unwrap_or_default(),
            item.rating.glyphs,
            item.username.text,
        )?;
        writeln!(
            out,
            "      photos={} lines={} {}",
            frames.photos.len(),
            if item.layout.is_expanded() {
                "all".to_string()
            } else {
                item.layout.line_limit.to_string()
            },
            if frames.needs_expand() {
                item.show_more.text.as_str()
            } else {
                ""
            },
        )?;

        if let Some(cache) = &cache {
            let photos = item.load_photos(cache).await;
            let avatar = item.load_avatar(cache).await;
            writeln!(
                out,
                "      avatar={} photos_loaded={}/{}",
                if matches!(avatar, Avatar::Loaded(_)) {
                    "loaded"
                } else {
                    "placeholder"
                },
                photos.len(),
                item.photo_urls.len(),
            )?;
        }
    }
    drain(&mut events, &mut view, &store);

    let snapshot = store.snapshot();
    writeln!(
        out,
        "{}  (loaded {}, content height {}pt{})",
        view.count_label().unwrap_or_else(|| "no reviews".to_string()),
        snapshot.item_count,
        view.content_height(),
        if snapshot.has_more { ", more available" } else { "" },
    )?;

    if let Some(cache) = &cache {
        let stats = cache.stats();
        writeln!(
            out,
            "images: memory_hits={} disk_hits={} network_loads={} failures={}",
            stats.memory_hits, stats.disk_hits, stats.network_loads, stats.failures
        )?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "reviews-feed failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
