use std::{mem, sync::Arc};

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use tilegrid::TileGridDescriptor;
use tracing::debug;

use crate::{
    common::Opacity,
    engine::{LayerHandle, MapEngine, TileLayerSpec},
};
use super::{OverlayGroup, PatternRules};

const CROSS_ORIGIN: &str = "anonymous";

/// The one layer a group currently has attached to the map.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveOverlayLayer {
    pub handle: LayerHandle,
    pub source_url: String,
    pub url_template: String,
    pub opacity: Opacity,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum GroupState {
    #[default]
    Empty,
    Active(ActiveOverlayLayer),
}

impl GroupState {
    pub fn active(&self) -> Option<&ActiveOverlayLayer> {
        match self {
            GroupState::Active(layer) => Some(layer),
            GroupState::Empty => None,
        }
    }
}

#[derive(Debug)]
struct GroupSlot {
    group: OverlayGroup,
    state: GroupState,
    slider: Opacity,
}

/// Per-category overlay slots, each holding at most one attached layer.
///
/// Every transition detaches the previous layer before anything new is
/// attached, so a group never has two layers on the map, not even briefly.
#[derive(Debug)]
pub struct OverlayRegistry {
    grid: Arc<TileGridDescriptor>,
    patterns: PatternRules,
    default_opacity: Opacity,
    slots: IndexMap<String, GroupSlot, ahash::RandomState>,
}

impl OverlayRegistry {
    pub fn new(grid: Arc<TileGridDescriptor>, patterns: PatternRules, default_opacity: Opacity) -> Self {
        Self { grid, patterns, default_opacity, slots: IndexMap::default() }
    }

    /// Swap in a freshly loaded catalog. Every group is cleared first.
    /// Repeated categories are merged in order.
    pub fn replace_groups(&mut self, groups: Vec<OverlayGroup>, engine: &mut impl MapEngine) {
        self.clear_all(engine);
        self.slots.clear();
        for group in groups {
            match self.slots.get_mut(&group.category) {
                Some(slot) => slot.group.layers.extend(group.layers),
                None => {
                    let slot = GroupSlot { group, state: GroupState::Empty, slider: self.default_opacity };
                    self.slots.insert(slot.group.category.clone(), slot);
                }
            }
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = &OverlayGroup> + '_ {
        self.slots.values().map(|slot| &slot.group)
    }

    pub fn group(&self, category: &str) -> Option<&OverlayGroup> {
        self.slots.get(category).map(|slot| &slot.group)
    }

    pub fn state(&self, category: &str) -> Option<&GroupState> {
        self.slots.get(category).map(|slot| &slot.state)
    }

    pub fn active(&self, category: &str) -> Option<&ActiveOverlayLayer> {
        self.state(category).and_then(GroupState::active)
    }

    /// Current slider value of a group.
    pub fn opacity(&self, category: &str) -> Option<Opacity> {
        self.slots.get(category).map(|slot| slot.slider)
    }

    /// Number of overlay layers attached across all groups.
    pub fn attached_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.state.active().is_some()).count()
    }

    fn slot_mut(&mut self, category: &str) -> Result<&mut GroupSlot> {
        self.slots.get_mut(category).ok_or_else(|| anyhow!("unknown overlay group: {category}"))
    }

    fn detach(slot: &mut GroupSlot, engine: &mut impl MapEngine) {
        if let GroupState::Active(layer) = mem::take(&mut slot.state) {
            debug!(group = %slot.group.category, handle = %layer.handle, "detaching overlay");
            engine.remove_layer(layer.handle);
        }
    }

    /// Make `source_url` the group's layer, or empty the group with `None`.
    ///
    /// Unknown groups and sources outside the group are errors and leave the
    /// group as it was.
    pub fn select_layer(&mut self, category: &str, source_url: Option<&str>, engine: &mut impl MapEngine) -> Result<&GroupState> {
        let slot = self.slots.get_mut(category).ok_or_else(|| anyhow!("unknown overlay group: {category}"))?;
        let descriptor = match source_url {
            Some(url) => Some(slot.group.find(url).cloned()
                .ok_or_else(|| anyhow!("{url} is not a layer of group {category}"))?),
            None => None,
        };

        Self::detach(slot, engine);
        let Some(descriptor) = descriptor else { return Ok(&slot.state) };

        let url_template = self.patterns.resolve(&descriptor.source_url).apply(&descriptor.source_url);
        let spec = TileLayerSpec {
            url_template: url_template.clone(),
            tile_info: Arc::clone(&self.grid),
            wkid: self.grid.wkid(),
            cross_origin: CROSS_ORIGIN,
            opacity: slot.slider,
        };
        let handle = engine.add_layer(&spec);
        debug!(group = category, %handle, url = %url_template, "attached overlay");

        slot.state = GroupState::Active(ActiveOverlayLayer {
            handle,
            source_url: descriptor.source_url,
            url_template,
            opacity: slot.slider,
        });
        Ok(&slot.state)
    }

    /// Move a group's slider; non-numeric input (NaN) falls back to the default.
    /// Only an attached layer is touched, so an empty group stays empty.
    pub fn set_opacity(&mut self, category: &str, value: f64, engine: &mut impl MapEngine) -> Result<Opacity> {
        let fallback = self.default_opacity;
        let slot = self.slot_mut(category)?;
        slot.slider = Opacity::new(value, fallback);
        if let GroupState::Active(layer) = &mut slot.state {
            layer.opacity = slot.slider;
            engine.set_layer_opacity(layer.handle, slot.slider);
        }
        Ok(slot.slider)
    }

    /// Detach the group's layer, if any. Clearing an empty group is a no-op.
    pub fn clear(&mut self, category: &str, engine: &mut impl MapEngine) -> Result<()> {
        Self::detach(self.slot_mut(category)?, engine);
        Ok(())
    }

    pub fn clear_all(&mut self, engine: &mut impl MapEngine) {
        for slot in self.slots.values_mut() {
            Self::detach(slot, engine);
        }
    }
}
