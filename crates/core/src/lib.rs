pub mod color;
pub mod config;
pub mod context;
pub mod datasets;
pub mod error;
pub mod export;
pub mod hierarchy;
pub mod human;
pub mod label;
pub mod legend;
pub mod loader;
pub mod logging;
pub mod model;
pub mod scene;
pub mod svg;
pub mod tooltip;
pub mod treemap;

pub use config::{TilingRule, TreemapConfig};
pub use context::RenderContext;
pub use error::{Error, Result};
pub use hierarchy::SortOrder;
pub use model::*;
pub use scene::Scene;
pub use treemap::{layout, Layout, PositionedNode, Rect};
