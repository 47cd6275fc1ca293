//! Mermpad - A terminal Mermaid diagram editor with live preview.
//!
//! # Usage
//!
//! ```bash
//! mermpad
//! mermpad --debounce-ms 500
//! mermpad --force-half-cell
//! ```

use anyhow::{Context, Result};
use clap::Parser;

use mermpad::app::{App, DEFAULT_DEBOUNCE_MS};

/// A terminal Mermaid diagram editor with live preview
#[derive(Parser, Debug)]
#[command(name = "mermpad", version, about, long_about = None)]
struct Cli {
    /// Quiet period after the last keystroke before re-rendering, in ms
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_DEBOUNCE_MS)]
    debounce_ms: u64,

    /// Force image rendering to use half-cell fallback mode
    #[arg(long)]
    force_half_cell: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Run the application
    let mut app = App::new()
        .with_debounce_ms(cli.debounce_ms)
        .with_force_half_cell(cli.force_half_cell);

    app.run().context("Application error")
}
