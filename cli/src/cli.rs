use std::path::PathBuf;

use tilescope::TilePattern;

/// Overlay/basemap viewer tooling
#[derive(clap::Parser, Debug)]
#[command(name = "tilescope", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Load a layer catalog and list its groups
    Catalog(CatalogArgs),

    /// Print the overlay tiling scheme
    Grid(GridArgs),

    /// Build the URL of one overlay tile
    TileUrl(TileUrlArgs),

    /// Replay recorded viewer events against a headless map
    Replay(ReplayArgs),
}

#[derive(clap::Args, Debug)]
pub struct CatalogArgs {
    /// Catalog file path or http(s) URL
    pub location: String,

    /// Print grouped catalog as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct GridArgs {
    /// Viewer config whose grid to print (Web Mercator otherwise)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print the grid descriptor as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct TileUrlArgs {
    /// Overlay source base URL
    pub source: String,

    /// zyx, zxy, or a template such as "{z}/{x}/{y}.png"
    #[arg(short, long, default_value = "zyx")]
    pub pattern: TilePattern,

    /// Level of detail
    #[arg(short, long)]
    pub z: u32,

    /// Tile column (or use --lon/--lat)
    #[arg(short, long, requires = "y", conflicts_with_all = ["lon", "lat"])]
    pub x: Option<i64>,

    /// Tile row (or use --lon/--lat)
    #[arg(short, long, requires = "x")]
    pub y: Option<i64>,

    /// Longitude of a point inside the tile
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Latitude of a point inside the tile
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct ReplayArgs {
    /// JSON array of events
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub events: PathBuf,

    /// Viewer config (defaults built in)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override the config's catalog location
    #[arg(long)]
    pub catalog: Option<String>,

    /// Basemap ids that load asynchronously and wait for a basemap_ready event
    #[arg(long = "deferred")]
    pub deferred: Vec<String>,
}
