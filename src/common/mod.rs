mod format;
mod opacity;

pub use format::format_lon_lat;
pub use opacity::Opacity;
