use anyhow::{anyhow, bail, Result};
use geo::Point;
use tilescope::tilegrid::{mercator, TileGridDescriptor, TileIndex};

use crate::cli::{Cli, TileUrlArgs};

pub fn run(cli: &Cli, args: &TileUrlArgs) -> Result<()> {
    let tile = match (args.x, args.y, args.lon, args.lat) {
        (Some(col), Some(row), _, _) => TileIndex { level: args.z, col, row },
        (_, _, Some(lon), Some(lat)) => {
            let xy = mercator::project(Point::new(lon, lat))
                .ok_or_else(|| anyhow!("({lon}, {lat}) is outside the Web Mercator range"))?;
            TileGridDescriptor::web_mercator().tile_at(args.z, xy)
                .ok_or_else(|| anyhow!("level {} is not part of the grid", args.z))?
        }
        _ => bail!("pass either --x/--y or --lon/--lat"),
    };

    if cli.verbose > 0 {
        eprintln!("[tile-url] pattern={} level={} col={} row={}", args.pattern, tile.level, tile.col, tile.row);
    }
    println!("{}", args.pattern.tile_url(&args.source, tile));
    Ok(())
}
