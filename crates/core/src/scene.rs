use serde::Serialize;

use crate::color::{Color, ColorScale};
use crate::context::RenderContext;
use crate::datasets::Heading;
use crate::label::{fit_label, FittedLabel};
use crate::legend::Legend;
use crate::model::NodeId;
use crate::tooltip::TileMeta;
use crate::treemap::{Layout, PositionedNode, Rect};

/// Inset of a tile label from the tile's top-left corner.
pub const LABEL_OFFSET: (f64, f64) = (5.0, 15.0);

#[derive(Clone, Debug, Serialize)]
pub struct Tile {
    pub id: NodeId,
    pub rect: Rect,
    pub fill: Color,
    pub label: FittedLabel,
    pub meta: TileMeta,
}

/// Everything a drawing surface needs for one render.
#[derive(Clone, Debug, Serialize)]
pub struct Scene {
    pub heading: Option<Heading>,
    pub width: f64,
    pub height: f64,
    /// Treemap plus legend.
    pub canvas_height: f64,
    pub tiles: Vec<Tile>,
    pub legend: Legend,
}

impl Scene {
    pub fn build(layout: &Layout, ctx: &RenderContext) -> Scene {
        let mut colors = ColorScale::default();
        let max_font = ctx.max_font_size();

        let tiles: Vec<Tile> = layout
            .leaves()
            .map(|leaf| {
                let category = category_of(layout, leaf);
                let fill = colors.color(&category);
                let label = fit_label(&leaf.name, leaf.rect.width(), leaf.rect.height(), max_font);
                Tile {
                    id: leaf.id,
                    rect: leaf.rect,
                    fill,
                    label,
                    meta: TileMeta {
                        name: leaf.name.clone(),
                        category,
                        value: leaf.value,
                    },
                }
            })
            .collect();

        let legend = Legend::layout(&colors, layout.width, layout.height);
        Scene {
            heading: None,
            width: layout.width,
            height: layout.height,
            canvas_height: legend.canvas_height(layout.height),
            tiles,
            legend,
        }
    }

    pub fn with_heading(mut self, heading: impl Into<Heading>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn tile_at(&self, x: f64, y: f64) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.rect.contains(x, y))
    }

    pub fn tile(&self, id: NodeId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }
}

/// Leaves without a category are colored by their group.
fn category_of(layout: &Layout, leaf: &PositionedNode) -> String {
    match (&leaf.category, leaf.parent) {
        (Some(c), _) => c.clone(),
        (None, Some(parent)) => layout.get(parent).name.clone(),
        (None, None) => leaf.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::CATEGORY10;
    use crate::config::TreemapConfig;
    use crate::hierarchy::SortOrder;
    use crate::model::{Node, Tree};

    fn scene() -> Scene {
        let root = Node::group(
            "Movies",
            vec![
                Node::group("Drama", vec![Node::leaf("Titanic", "Drama", 600.0)]),
                Node::group(
                    "Action",
                    vec![Node::leaf("Avatar", "Action", 700.0), Node::leaf("Jaws", "Action", 100.0)],
                ),
                Node::group("Other", vec![Node {
                    name: "Untitled".into(),
                    value: Some(50.0),
                    ..Node::default()
                }]),
            ],
        );
        let tree = Tree::from_node(&root, SortOrder::Value).unwrap();
        let ctx = RenderContext::new(800.0, 400.0, TreemapConfig::default()).unwrap();
        let layout = Layout::compute(&tree, &ctx, None).unwrap();
        Scene::build(&layout, &ctx)
    }

    #[test]
    fn colors_follow_layout_order() {
        let scene = scene();
        let names: Vec<&str> = scene.tiles.iter().map(|t| t.meta.name.as_str()).collect();
        assert_eq!(names, ["Avatar", "Jaws", "Titanic", "Untitled"]);
        assert_eq!(scene.tiles[0].fill, CATEGORY10[0]);
        assert_eq!(scene.tiles[1].fill, CATEGORY10[0]);
        assert_eq!(scene.tiles[2].fill, CATEGORY10[1]);
        assert_eq!(scene.tiles[3].meta.category, "Other");
        let legend: Vec<&str> = scene.legend.items.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(legend, ["Action", "Drama", "Other"]);
    }

    #[test]
    fn labels_fit_their_tiles() {
        for tile in scene().tiles {
            assert!(tile.label.approx_width() <= tile.rect.width() + 1e-9);
            assert!(tile.label.font_size <= 14.0);
        }
    }

    #[test]
    fn canvas_grows_by_legend() {
        let scene = scene().with_heading(crate::datasets::DatasetId::Movies);
        assert_eq!(scene.canvas_height, 400.0 + 25.0 + 40.0);
        assert_eq!(scene.heading.unwrap().title, "Movie Sales");
    }

    #[test]
    fn finds_tile_under_point() {
        let scene = scene();
        let first = &scene.tiles[0];
        let hit = scene.tile_at(first.rect.x0 + 1.0, first.rect.y0 + 1.0).unwrap();
        assert_eq!(hit.meta.name, "Avatar");
        assert_eq!(scene.tile(hit.id).map(|t| t.id), Some(first.id));
        assert!(scene.tile_at(-1.0, 10.0).is_none());
    }
}
