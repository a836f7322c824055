use anyhow::Result;
use tilescope::{tilegrid::TileGridDescriptor, ViewerConfig};

use crate::cli::{Cli, GridArgs};

pub fn run(_cli: &Cli, args: &GridArgs) -> Result<()> {
    let grid = match &args.config {
        Some(path) => ViewerConfig::from_json_file(path)?.grid(),
        None => TileGridDescriptor::web_mercator(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
        return Ok(());
    }

    let origin = grid.origin();
    println!("wkid {}  dpi {}  tiles {}x{}  origin ({}, {})",
        grid.wkid(), grid.dpi(), grid.cols(), grid.rows(), origin.x, origin.y);
    println!("{:>5}  {:>22}  {:>20}", "level", "resolution", "scale");
    for lod in grid.lods() {
        println!("{:>5}  {:>22}  {:>20}", lod.level, lod.resolution, lod.scale);
    }
    Ok(())
}
