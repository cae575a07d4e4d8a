mod action;
mod app;
mod cli;
mod components;
mod config;
mod connector;
mod diff;
mod event;
mod frame;
mod highlight;
mod logging;
mod state;
mod sync;
mod theme;
mod tui;

use anyhow::Result;
use clap::Parser;

use crate::app::{App, Source};
use crate::cli::Cli;
use crate::highlight::resolve_grammar;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restore so the user gets their shell back
        let _ = tui::restore();
        default_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok();
    install_panic_hook();

    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_file.as_deref())?;

    // Load config, apply CLI overrides (CLI wins)
    let mut config = config::load_config();
    if let Some(ref theme_name) = cli.theme {
        config.set_theme(theme_name);
    }
    if let Some(marker) = cli.marker {
        config.marker = marker.into();
    }
    if cli.no_connectors {
        config.connectors = false;
    }
    if let Some(cells) = cli.max_cells {
        config.max_table_cells = cells.max(1);
    }

    let original = Source::new(cli.original);
    let modified = Source::new(cli.modified);
    if original.is_stdin() && modified.is_stdin() {
        eprintln!("twindiff: only one of the two inputs can be `-`");
        std::process::exit(2);
    }
    let named = if modified.is_stdin() { &original } else { &modified };
    let grammar = resolve_grammar(cli.language.as_deref(), named.path());

    // Read both inputs before the terminal switches to raw mode
    let mut app = App::new(original, modified, grammar, config)?;

    let mut terminal = tui::init()?;
    let result = app.run(&mut terminal).await;
    tui::restore()?;

    if let Err(ref e) = result {
        tracing::error!("exited with error: {e:#}");
        eprintln!("twindiff: {e:#}");
    }

    result
}
