use anyhow::{Context, Result};
use tilescope::{catalog_source, Event, MapEngine, MemEngine, TransitionTicket, Viewer, ViewerConfig};
use tracing::warn;

use crate::cli::{Cli, ReplayArgs};

pub fn run(cli: &Cli, args: &ReplayArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_json_file(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(location) = &args.catalog { config.catalog = location.clone(); }

    let text = std::fs::read_to_string(&args.events)
        .with_context(|| format!("Failed to read events file: {}", args.events.display()))?;
    let events: Vec<Event> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of events", args.events.display()))?;

    let mut engine = MemEngine::new(config.center_point(), config.zoom);
    for id in &args.deferred { engine = engine.with_deferred_basemap(id.clone()); }

    let mut viewer = Viewer::new(engine, &config)?;
    let groups = viewer.load_catalog(catalog_source(&config.catalog)?.as_ref());
    if cli.verbose > 0 { eprintln!("[replay] {} groups from {}", groups, config.catalog); }

    let mut rejected = 0;
    for event in &events {
        // The headless engine finishes its own asynchronous work when the event says so.
        let result = match event {
            Event::BasemapReady { id } => {
                viewer.engine_mut().mark_ready(id);
                viewer.apply(event)
            }
            Event::TransitionSettled { ticket, error: None } => {
                let ticket = TransitionTicket(*ticket);
                let outcome = viewer.engine_mut().settle_zoom(ticket);
                viewer.on_transition_settled(ticket, outcome);
                Ok(())
            }
            _ => viewer.apply(event),
        };
        if let Err(e) = result {
            warn!(?event, "event rejected: {e:#}");
            rejected += 1;
        }
    }

    let engine = viewer.engine();
    let basemaps = viewer.basemaps();
    println!("events:   {} applied, {} rejected", events.len() - rejected, rejected);
    println!("basemap:  {} ({:?}, slider {}, applied {})",
        basemaps.active().id,
        basemaps.lifecycle(),
        basemaps.slider(),
        engine.basemap_opacity().map_or_else(|| "-".to_string(), |o| o.display()));
    println!("zoom:     {}", engine.view().zoom);
    for group in viewer.groups() {
        let overlays = viewer.overlays();
        let opacity = overlays.opacity(&group.category).map(|o| o.display()).unwrap_or_default();
        match overlays.active(&group.category) {
            Some(layer) => println!("overlay:  {} [{}] {} ({})", group.category, opacity, layer.url_template, layer.handle),
            None => println!("overlay:  {} [{}] -", group.category, opacity),
        }
    }
    println!("readout:  {}", viewer.readout().unwrap_or("-"));
    Ok(())
}
