//! SVG rendering of a [`Scene`].

use std::path::Path;

use ::svg::node::element as svg_element;
use ::svg::node::Text as SvgText;
use ::svg::{Document, Node as _};

use crate::error::{ExportError, Result};
use crate::scene::{Scene, Tile, LABEL_OFFSET};

/// Space above the treemap for the title and description.
const HEADING_HEIGHT: f64 = 60.0;

pub fn render(scene: &Scene) -> Document {
    let top = if scene.heading.is_some() { HEADING_HEIGHT } else { 0.0 };
    let total_height = scene.canvas_height + top;

    let mut doc = Document::new()
        .set("viewBox", format!("0 0 {} {}", scene.width, total_height))
        .set("width", scene.width)
        .set("height", total_height)
        .set("font-family", "sans-serif");

    if let Some(heading) = &scene.heading {
        doc = doc
            .add(
                svg_element::Text::new("")
                    .set("id", "title")
                    .set("x", scene.width / 2.0)
                    .set("y", 28.0)
                    .set("text-anchor", "middle")
                    .set("font-size", 24.0)
                    .add(SvgText::new(heading.title.as_str())),
            )
            .add(
                svg_element::Text::new("")
                    .set("id", "description")
                    .set("x", scene.width / 2.0)
                    .set("y", 50.0)
                    .set("text-anchor", "middle")
                    .set("font-size", 14.0)
                    .add(SvgText::new(heading.description.as_str())),
            );
    }

    let mut map = svg_element::Group::new()
        .set("id", "treemap")
        .set("transform", format!("translate(0, {top})"));
    for tile in &scene.tiles {
        map = map.add(render_tile(tile));
    }

    let mut legend = svg_element::Group::new()
        .set("id", "legend")
        .set("transform", format!("translate(0, {top})"));
    for item in &scene.legend.items {
        legend = legend
            .add(
                svg_element::Rectangle::new()
                    .set("class", "legend-item")
                    .set("x", item.swatch.x0)
                    .set("y", item.swatch.y0)
                    .set("width", item.swatch.width())
                    .set("height", item.swatch.height())
                    .set("fill", item.color.to_string()),
            )
            .add(
                svg_element::Text::new("")
                    .set("x", item.label_x)
                    .set("y", item.label_y)
                    .set("font-size", 12.0)
                    .add(SvgText::new(item.category.as_str())),
            );
    }

    doc.add(map).add(legend)
}

fn render_tile(tile: &Tile) -> svg_element::Group {
    let r = tile.rect;
    let rect = svg_element::Rectangle::new()
        .set("class", "tile")
        .set("width", r.width())
        .set("height", r.height())
        .set("fill", tile.fill.to_string())
        .set("data-name", tile.meta.name.as_str())
        .set("data-category", tile.meta.category.as_str())
        .set("data-value", tile.meta.value);

    // Native hover tooltip.
    let mut title = svg_element::Element::new("title");
    title.append(SvgText::new(tile.meta.text()));

    let mut group = svg_element::Group::new()
        .set("transform", format!("translate({},{})", r.x0, r.y0))
        .add(rect)
        .add(title);

    if !tile.label.text.is_empty() {
        group = group.add(
            svg_element::Text::new("")
                .set("x", LABEL_OFFSET.0)
                .set("y", LABEL_OFFSET.1)
                .set("font-size", tile.label.font_size)
                .set("fill", "white")
                .set("pointer-events", "none")
                .add(SvgText::new(tile.label.text.as_str())),
        );
    }
    group
}

pub fn to_string(scene: &Scene) -> String {
    render(scene).to_string()
}

pub fn save(scene: &Scene, path: &Path) -> Result<()> {
    std::fs::write(path, to_string(scene)).map_err(ExportError::from)?;
    tracing::info!(path = %path.display(), tiles = scene.tiles.len(), "svg written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreemapConfig;
    use crate::context::RenderContext;
    use crate::datasets::DatasetId;
    use crate::model::Node;
    use crate::treemap::layout;

    fn scene() -> Scene {
        let root = Node::group(
            "Games",
            vec![Node::group(
                "Wii",
                vec![Node::leaf("Wii Sports", "Wii", 82.53), Node::leaf("Mario & Sonic", "Wii", 8.0)],
            )],
        );
        let layout = layout(&root, 640.0, 320.0, 1.0).unwrap();
        let ctx = RenderContext::new(640.0, 320.0, TreemapConfig::default()).unwrap();
        Scene::build(&layout, &ctx)
    }

    #[test]
    fn renders_tiles_and_legend() {
        let out = to_string(&scene());
        assert_eq!(out.matches("class=\"tile\"").count(), 2);
        assert_eq!(out.matches("class=\"legend-item\"").count(), 1);
        assert!(out.contains("data-category=\"Wii\""));
        assert!(out.contains("id=\"legend\""));
        assert!(!out.contains("id=\"title\""));
    }

    #[test]
    fn heading_shifts_content_down() {
        let out = to_string(&scene().with_heading(DatasetId::VideoGames));
        assert!(out.contains("Video Game Sales"));
        assert!(out.contains("translate(0, 60)"));
    }

    #[test]
    fn saves_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.svg");
        save(&scene(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("<svg"));
        assert!(text.contains("Wii Sports"));
    }
}
