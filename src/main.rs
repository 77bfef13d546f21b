mod app;
mod config;
mod index;
mod util;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::{AppArgs, GraphApp};
use config::load_graph_config;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Content index JSON file: a map from item id to { title, links, tags }.
    index: PathBuf,

    /// Item id to focus the neighborhood on; defaults to the first id in the
    /// index.
    #[arg(long)]
    focus: Option<String>,

    /// JSON config file overriding the default graph settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON theme file overriding the default style tokens.
    #[arg(long)]
    theme: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_graph_config(args.config.as_deref()).context("failed to load graph config")?;

    let app_args = AppArgs {
        index_path: args.index,
        focus: args.focus,
        config,
        theme_path: args.theme,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "notegraph",
        options,
        Box::new(move |cc| Ok(Box::new(GraphApp::new(cc, app_args)))),
    )
    .map_err(|error| anyhow::anyhow!("failed to run notegraph: {error}"))
}
