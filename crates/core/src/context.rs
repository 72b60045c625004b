use crate::config::TreemapConfig;
use crate::error::{Error, Result};

/// Canvas width below which labels use the small font.
pub const NARROW_BREAKPOINT: f64 = 600.0;

/// Everything a layout and a draw need, fixed for one render.
///
/// A resize or a settings change builds a new context; nothing mutates an
/// existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    width: f64,
    height: f64,
    config: TreemapConfig,
}

impl RenderContext {
    pub fn new(width: f64, height: f64, config: TreemapConfig) -> Result<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(Error::invalid(format!(
                "canvas must be positive, got {width}x{height}"
            )));
        }
        config.validate()?;
        Ok(Self {
            width,
            height,
            config,
        })
    }

    /// Canvas sized for a viewport: 90% of its width and 60% of its height
    /// when responsive, the configured size otherwise.
    pub fn for_viewport(viewport_w: f64, viewport_h: f64, config: TreemapConfig) -> Result<Self> {
        let (w, h) = if config.responsive {
            (viewport_w * 0.9, viewport_h * 0.6)
        } else {
            (config.width, config.height)
        };
        Self::new(w, h, config)
    }

    pub fn with_config(&self, config: TreemapConfig) -> Result<Self> {
        Self::new(self.width, self.height, config)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn config(&self) -> &TreemapConfig {
        &self.config
    }

    pub fn max_font_size(&self) -> f64 {
        if self.config.responsive && self.width < NARROW_BREAKPOINT {
            10.0
        } else {
            14.0
        }
    }
}
