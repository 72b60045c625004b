use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, FetchError, Result};
use crate::hierarchy::SortOrder;

/// Golden ratio, the default target aspect ratio of squarify rows.
pub const PHI: f64 = 1.618_033_988_749_895;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TilingRule {
    #[default]
    Squarify,
    /// Reuse the row structure of the previous layout when the tree shape is unchanged.
    Resquarify,
}

impl std::str::FromStr for TilingRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "squarify" => Ok(TilingRule::Squarify),
            "resquarify" => Ok(TilingRule::Resquarify),
            other => Err(Error::invalid(format!("unknown tiling rule {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TreemapConfig {
    pub tiling: TilingRule,
    pub sort: SortOrder,
    /// Target aspect ratio for squarify rows, at least 1.
    pub ratio: f64,
    /// Gap between sibling tiles, in pixels.
    pub padding: f64,
    /// Inset between a group's border and its children.
    pub padding_outer: f64,
    /// Size the canvas from the viewport instead of `width`/`height`.
    pub responsive: bool,
    pub width: f64,
    pub height: f64,
    pub round: bool,
}

impl Default for TreemapConfig {
    fn default() -> Self {
        Self {
            tiling: TilingRule::Squarify,
            sort: SortOrder::Value,
            ratio: PHI,
            padding: 0.0,
            padding_outer: 0.0,
            responsive: true,
            width: 960.0,
            height: 570.0,
            round: false,
        }
    }
}

impl TreemapConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let fetch = |source: FetchError| Error::FetchFailure {
            path: path.to_path_buf(),
            source,
        };
        let text = std::fs::read_to_string(path).map_err(|e| fetch(e.into()))?;
        let config: TreemapConfig = serde_json::from_str(&text).map_err(|e| fetch(e.into()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.ratio.is_finite() && self.ratio >= 1.0) {
            return Err(Error::invalid(format!("ratio must be >= 1, got {}", self.ratio)));
        }
        for (name, v) in [("padding", self.padding), ("padding-outer", self.padding_outer)] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::invalid(format!("{name} must be >= 0, got {v}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: TreemapConfig =
            serde_json::from_str(r#"{"tiling":"resquarify","padding":2}"#).unwrap();
        assert_eq!(cfg.tiling, TilingRule::Resquarify);
        assert_eq!(cfg.padding, 2.0);
        assert_eq!(cfg.ratio, PHI);
        assert!(cfg.responsive);
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = TreemapConfig {
            padding: -1.0,
            ..TreemapConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = TreemapConfig {
            ratio: 0.5,
            ..TreemapConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn parses_tiling_rule() {
        assert_eq!("resquarify".parse::<TilingRule>().unwrap(), TilingRule::Resquarify);
        assert!("slice".parse::<TilingRule>().is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("treemap.json");
        std::fs::write(&path, r#"{"sort":"height-then-value","round":true}"#).unwrap();
        let cfg = TreemapConfig::from_path(&path).unwrap();
        assert_eq!(cfg.sort, SortOrder::HeightThenValue);
        assert!(cfg.round);
    }
}
