mod entry;
mod load;
mod source;

pub use entry::{group_entries, parse_catalog, CatalogEntry};
pub use load::{load_groups, try_load_groups};
pub use source::{catalog_source, CatalogSource, FileCatalog, MemCatalog};

#[cfg(feature = "download")]
pub use source::HttpCatalog;
