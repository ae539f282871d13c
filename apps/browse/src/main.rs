use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use client_core::{
    config::SETTINGS_FILE, load_settings_from, HistoryNavigator, HttpTransport, PointerEvents,
    SearchScreen,
};
use shared::domain::{CollectionKind, SortTab};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TabArg {
    Routes,
    Collections,
}

impl From<TabArg> for CollectionKind {
    fn from(value: TabArg) -> Self {
        match value {
            TabArg::Routes => CollectionKind::Routes,
            TabArg::Collections => CollectionKind::Collections,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Sort,
    Filter,
}

impl From<SortArg> for SortTab {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Sort => SortTab::Sort,
            SortArg::Filter => SortTab::Filter,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Browse routes and curated collections")]
struct Args {
    #[arg(long, default_value = SETTINGS_FILE)]
    config: PathBuf,
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long, value_enum, default_value_t = TabArg::Routes)]
    tab: TabArg,
    #[arg(long, value_enum)]
    sort: Option<SortArg>,
    /// 0 leaves detail requests unbounded.
    #[arg(long)]
    max_concurrent_details: Option<usize>,
    /// Identifier of an item to open after loading, matched against the listed ids first.
    #[arg(long)]
    open: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings_from(&args.config);
    if let Some(url) = args.api_base_url {
        settings.api_base_url = url;
    }
    if let Some(limit) = args.max_concurrent_details {
        settings.max_concurrent_details = (limit > 0).then_some(limit);
    }

    let transport = HttpTransport::with_timeout(settings.request_timeout())?;
    let navigator = Arc::new(HistoryNavigator::new());
    let pointer = PointerEvents::new();
    let mut screen = SearchScreen::mount(
        &settings,
        Arc::new(transport),
        navigator.clone(),
        &pointer,
    )
    .context("failed to mount search screen")?;

    screen.load().await;
    screen.select_collection_type(args.tab.into());
    if let Some(sort) = args.sort {
        screen.select_sort_tab(sort.into());
    }

    let state = screen.view_state();
    let panel = match state.active_sort_tab {
        None => "closed",
        Some(SortTab::Sort) => "sort",
        Some(SortTab::Filter) => "filter",
    };
    println!("[{}] sort/filter panel: {panel}", state.active_collection);

    for kind in CollectionKind::ALL {
        if let Some(err) = screen.last_error(kind) {
            eprintln!("{kind} unavailable: {err}");
        }
    }

    let visible = screen.visible_records();
    if visible.is_empty() {
        println!("no {} to show", state.active_collection);
    }
    for record in visible.iter() {
        println!("{}\t{}\t{}", record.id, record.name, record.description);
    }

    if let Some(raw) = args.open {
        let id = visible.resolve_identifier(&raw);
        if visible.find(&id).is_none() {
            warn!(%id, "opening an item that is not in the visible list");
        }
        screen.select_item(&id);
        if let Some(path) = navigator.current() {
            println!("opened {path}");
        }
    }

    screen.teardown();
    Ok(())
}
