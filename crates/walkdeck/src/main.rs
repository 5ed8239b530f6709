mod app;
mod cli;
mod commands;
mod config;
mod deck;
mod images;
mod media;
mod player;
mod tap;
mod theme;
mod timeline;
mod watcher;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("walkdeck={level}")));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    cli.run()
}
