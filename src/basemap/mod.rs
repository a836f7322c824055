mod basemap;
mod controller;

pub use basemap::Basemap;
pub use controller::{ActiveBasemap, BasemapController, Lifecycle};
