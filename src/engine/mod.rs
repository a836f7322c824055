mod engine;
mod mem;

pub use engine::{
    EngineError, LayerHandle, MapEngine, Readiness, ScreenPoint, TileLayerSpec, TransitionTicket, ViewState,
};
pub use mem::{MemEngine, MemLayer};
