use std::path::PathBuf;

use anyhow::{Context, Result};
#[cfg(not(feature = "download"))]
use anyhow::bail;

/// Where the layer catalog comes from. Fetches are one-shot.
pub trait CatalogSource {
    fn fetch(&self) -> Result<Vec<u8>>;

    /// Location for log messages.
    fn describe(&self) -> String;
}

/// Catalog read from a local JSON file.
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

impl CatalogSource for FileCatalog {
    fn fetch(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path)
            .with_context(|| format!("failed to read catalog {}", self.path.display()))
    }

    fn describe(&self) -> String { self.path.display().to_string() }
}

/// Catalog already in memory, e.g. fetched by the browser.
#[derive(Default, Clone)]
pub struct MemCatalog {
    bytes: Vec<u8>,
}

impl MemCatalog {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self { Self { bytes: bytes.into() } }
}

impl CatalogSource for MemCatalog {
    fn fetch(&self) -> Result<Vec<u8>> { Ok(self.bytes.clone()) }

    fn describe(&self) -> String { format!("<{} bytes in memory>", self.bytes.len()) }
}

/// Catalog served over HTTP(S).
#[cfg(feature = "download")]
pub struct HttpCatalog {
    url: String,
}

#[cfg(feature = "download")]
impl HttpCatalog {
    pub fn new(url: impl Into<String>) -> Self { Self { url: url.into() } }
}

#[cfg(feature = "download")]
impl CatalogSource for HttpCatalog {
    fn fetch(&self) -> Result<Vec<u8>> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("tilescope/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let resp = client.get(&self.url).send()
            .with_context(|| format!("GET {}", self.url))?
            .error_for_status()
            .with_context(|| format!("GET {} returned error status", self.url))?;

        Ok(resp.bytes().with_context(|| format!("reading body of {}", self.url))?.to_vec())
    }

    fn describe(&self) -> String { self.url.clone() }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Source for a catalog location: HTTP(S) URLs are fetched, anything else is a file path.
pub fn catalog_source(location: &str) -> Result<Box<dyn CatalogSource>> {
    if is_remote(location) {
        #[cfg(feature = "download")]
        return Ok(Box::new(HttpCatalog::new(location)));
        #[cfg(not(feature = "download"))]
        bail!("cannot fetch {location}: built without the `download` feature");
    }
    Ok(Box::new(FileCatalog::new(location)))
}
