use serde::Serialize;

use crate::color::{Color, ColorScale};
use crate::treemap::Rect;

pub const ITEM_WIDTH: f64 = 120.0;
pub const ROW_HEIGHT: f64 = 25.0;
pub const SWATCH: f64 = 18.0;
pub const MAX_WIDTH: f64 = 600.0;
/// Gap between the treemap and the legend.
pub const TOP_GAP: f64 = 20.0;
/// Extra space below the treemap besides the legend rows.
pub const MARGIN: f64 = 40.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LegendItem {
    pub category: String,
    pub color: Color,
    pub swatch: Rect,
    /// Baseline origin of the label.
    pub label_x: f64,
    pub label_y: f64,
}

/// Legend grid centered below the treemap, in canvas coordinates.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Legend {
    pub items: Vec<LegendItem>,
    pub rows: usize,
    /// Height of the legend rows alone.
    pub height: f64,
}

impl Legend {
    pub fn layout(scale: &ColorScale, canvas_width: f64, canvas_height: f64) -> Legend {
        let width = MAX_WIDTH.min(canvas_width * 0.9);
        let per_row = ((width / ITEM_WIDTH).floor() as usize).max(1);
        let origin_x = (canvas_width - width) / 2.0;
        let origin_y = canvas_height + TOP_GAP;

        let items: Vec<LegendItem> = scale
            .domain()
            .iter()
            .enumerate()
            .filter_map(|(i, category)| {
                let color = scale.get(category)?;
                let x = origin_x + (i % per_row) as f64 * ITEM_WIDTH;
                let y = origin_y + (i / per_row) as f64 * ROW_HEIGHT;
                Some(LegendItem {
                    category: category.clone(),
                    color,
                    swatch: Rect::new(x, y, x + SWATCH, y + SWATCH),
                    label_x: x + SWATCH + 7.0,
                    label_y: y + 15.0,
                })
            })
            .collect();

        let rows = items.len().div_ceil(per_row);
        Legend {
            items,
            rows,
            height: rows as f64 * ROW_HEIGHT,
        }
    }

    /// Full drawing height: treemap, gap and legend.
    pub fn canvas_height(&self, treemap_height: f64) -> f64 {
        treemap_height + self.height + MARGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(n: usize) -> ColorScale {
        let names: Vec<String> = (0..n).map(|i| format!("cat{i}")).collect();
        ColorScale::from_categories(names.iter().map(String::as_str))
    }

    #[test]
    fn wraps_at_five_items_on_wide_canvas() {
        let legend = Legend::layout(&scale(7), 1000.0, 500.0);
        assert_eq!(legend.rows, 2);
        assert_eq!(legend.height, 50.0);
        let first = &legend.items[0];
        assert_eq!(first.swatch, Rect::new(200.0, 520.0, 218.0, 538.0));
        assert_eq!((first.label_x, first.label_y), (225.0, 535.0));
        let sixth = &legend.items[5];
        assert_eq!(sixth.swatch.x0, 200.0);
        assert_eq!(sixth.swatch.y0, 545.0);
        assert_eq!(legend.canvas_height(500.0), 590.0);
    }

    #[test]
    fn narrow_canvas_keeps_one_item_per_row() {
        let legend = Legend::layout(&scale(3), 100.0, 50.0);
        assert_eq!(legend.rows, 3);
    }

    #[test]
    fn empty_domain_has_no_rows() {
        let legend = Legend::layout(&ColorScale::default(), 800.0, 400.0);
        assert_eq!(legend.rows, 0);
        assert_eq!(legend.height, 0.0);
    }
}
