//! Token Field demo - Main Entry Point
//!
//! Opens a window with a single token field bound to a variable catalog.
//!
//! Usage: `tokenfield-rs [--catalog <catalog.toml>] [--settings <widget.toml>]`
//! (see `--help`).
//!
//! Without arguments the last catalog is reused, or a built-in sample.
//! Set `TOKENFIELD_LOG_DIR` to also write a daily log file there.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tokenfield_rs::{
    config::{AppState, BindingCatalog, WidgetSettings},
    frontend::TokenFieldApp,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Token Field demo
#[derive(Parser, Debug)]
#[command(name = "tokenfield-rs", version, about = "Token-aware text input demo")]
struct Args {
    /// Binding catalog (TOML with [variables] and [paths] tables)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Widget display settings (TOML)
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging();

    tracing::info!("Starting Token Field demo");

    let mut app_state = AppState::load_or_default();

    let (catalog, catalog_path) = match load_catalog(args.catalog.as_deref(), &app_state) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::warn!("{:#}", e);
            (BindingCatalog::sample(), None)
        }
    };
    if catalog_path.is_some() {
        app_state.last_catalog_path = catalog_path.clone();
    }

    let settings = args
        .settings
        .map(WidgetSettings::load_or_default)
        .unwrap_or_default();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 560.0])
            .with_min_inner_size([480.0, 320.0])
            .with_title("Token Field"),
        ..Default::default()
    };

    eframe::run_native(
        "Token Field",
        native_options,
        Box::new(|cc| {
            if app_state.dark_mode {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }

            Ok(Box::new(TokenFieldApp::new(
                cc,
                app_state,
                settings,
                catalog,
                catalog_path,
            )))
        }),
    )
}

/// Catalog from the command line, else the last one used, else the sample
fn load_catalog(
    arg: Option<&std::path::Path>,
    app_state: &AppState,
) -> anyhow::Result<(BindingCatalog, Option<PathBuf>)> {
    let path = match arg.or_else(|| app_state.get_last_catalog()) {
        Some(path) => path.to_path_buf(),
        None => {
            tracing::info!("No catalog given, using the sample catalog");
            return Ok((BindingCatalog::sample(), None));
        }
    };

    let catalog = BindingCatalog::load(&path)
        .with_context(|| format!("Could not load catalog {}", path.display()))?;
    Ok((catalog, Some(path)))
}

fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tokenfield_rs=debug"));

    match std::env::var_os("TOKENFIELD_LOG_DIR") {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "tokenfield.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            None
        }
    }
}
