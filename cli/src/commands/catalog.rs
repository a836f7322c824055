use anyhow::Result;
use tilescope::{catalog_source, try_load_groups};

use crate::cli::{CatalogArgs, Cli};

pub fn run(cli: &Cli, args: &CatalogArgs) -> Result<()> {
    let source = catalog_source(&args.location)?;
    if cli.verbose > 0 { eprintln!("[catalog] {}", source.describe()); }

    let groups = try_load_groups(source.as_ref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    for group in &groups {
        println!("{} ({})", group.category, group.layers.len());
        for layer in &group.layers {
            println!("  {:<32} {}", layer.display_name, layer.source_url);
        }
    }
    Ok(())
}
