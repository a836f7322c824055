mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{catalog, grid, replay, tile_url};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "tilescope=info,warn",
        _ => "tilescope=debug,info",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Commands::Catalog(args) => catalog::run(&cli, args),
        Commands::Grid(args) => grid::run(&cli, args),
        Commands::TileUrl(args) => tile_url::run(&cli, args),
        Commands::Replay(args) => replay::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
