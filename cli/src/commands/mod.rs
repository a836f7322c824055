pub mod catalog;
pub mod grid;
pub mod replay;
pub mod tile_url;
