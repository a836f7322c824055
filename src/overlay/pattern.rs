use std::{fmt, str::FromStr};

use anyhow::{bail, Error, Result};
use serde::{Deserialize, Serialize};
use tilegrid::TileIndex;

/// How a tile source lays out level, column and row in its URLs.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TilePattern {
    /// `{z}/{y}/{x}`: WMTS-style row before column.
    #[default]
    Zyx,
    /// `{z}/{x}/{y}`: slippy-map (XYZ) order.
    Zxy,
    /// Any other suffix containing `{z}`, `{x}` and `{y}`, e.g. `{z}/{x}/{y}.png`.
    Template(String),
}

impl TilePattern {
    pub fn suffix(&self) -> &str {
        match self {
            TilePattern::Zyx => "{z}/{y}/{x}",
            TilePattern::Zxy => "{z}/{x}/{y}",
            TilePattern::Template(template) => template,
        }
    }

    /// URL template for tiles of `source_url`.
    pub fn apply(&self, source_url: &str) -> String {
        format!("{}/{}", source_url.trim_end_matches('/'), self.suffix().trim_start_matches('/'))
    }

    /// Concrete URL of one tile of `source_url`.
    pub fn tile_url(&self, source_url: &str, tile: TileIndex) -> String {
        self.apply(source_url)
            .replace("{z}", &tile.level.to_string())
            .replace("{x}", &tile.col.to_string())
            .replace("{y}", &tile.row.to_string())
    }
}

impl FromStr for TilePattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zyx" | "z/y/x" | "{z}/{y}/{x}" => return Ok(TilePattern::Zyx),
            "zxy" | "z/x/y" | "{z}/{x}/{y}" => return Ok(TilePattern::Zxy),
            _ => {}
        }
        if ["{z}", "{x}", "{y}"].iter().any(|placeholder| !s.contains(placeholder)) {
            bail!("tile pattern {s:?} must be zyx, zxy, or a template containing {{z}}, {{x}} and {{y}}");
        }
        Ok(TilePattern::Template(s.trim().to_string()))
    }
}

impl TryFrom<String> for TilePattern {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<TilePattern> for String {
    fn from(pattern: TilePattern) -> String { pattern.to_string() }
}

impl fmt::Display for TilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TilePattern::Zyx => f.write_str("zyx"),
            TilePattern::Zxy => f.write_str("zxy"),
            TilePattern::Template(template) => f.write_str(template),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    /// Source URLs starting with this prefix use `pattern`.
    pub prefix: String,
    pub pattern: TilePattern,
}

/// Per-source tile patterns. The first rule whose prefix matches wins; other
/// sources use `default`.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatternRules {
    #[serde(default)]
    pub default: TilePattern,
    #[serde(default)]
    pub rules: Vec<PatternRule>,
}

impl PatternRules {
    pub fn new(default: TilePattern) -> Self { Self { default, rules: Vec::new() } }

    pub fn with_rule(mut self, prefix: impl Into<String>, pattern: TilePattern) -> Self {
        self.rules.push(PatternRule { prefix: prefix.into(), pattern });
        self
    }

    pub fn resolve(&self, source_url: &str) -> &TilePattern {
        self.rules.iter()
            .find(|rule| source_url.starts_with(&rule.prefix))
            .map_or(&self.default, |rule| &rule.pattern)
    }
}
