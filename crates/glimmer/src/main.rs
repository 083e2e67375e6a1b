mod app;
mod cli;
mod color;
mod commands;
mod config;
mod deck;
mod error;
mod input;
mod render;
mod sampler;
mod slideshow;
mod theme;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli.run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
