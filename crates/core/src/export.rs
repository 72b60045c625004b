use crate::config::TreemapConfig;
use crate::error::{ExportError, Result};
use crate::scene::Scene;
use crate::treemap::Layout;

pub fn to_csv(scene: &Scene, mut w: impl std::io::Write) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record([
        "name", "category", "value", "x0", "y0", "x1", "y1", "fill", "label", "font_size",
    ])?;
    for t in &scene.tiles {
        writer.write_record([
            t.meta.name.trim().to_string(),
            t.meta.category.clone(),
            t.meta.value.to_string(),
            t.rect.x0.to_string(),
            t.rect.y0.to_string(),
            t.rect.x1.to_string(),
            t.rect.y1.to_string(),
            t.fill.to_string(),
            t.label.text.clone(),
            t.label.font_size.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json(layout: &Layout, scene: &Scene, config: &TreemapConfig) -> serde_json::Value {
    serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "heading": scene.heading,
        "width": layout.width,
        "height": layout.height,
        "config": config,
        "nodes": layout.nodes.iter().map(|n| serde_json::json!({
            "id": n.id.0,
            "parent": n.parent.as_ref().map(|p| p.0),
            "name": n.name,
            "depth": n.depth,
            "height": n.height,
            "value": n.value,
            "rect": [n.rect.x0, n.rect.y0, n.rect.x1, n.rect.y1],
            "children": n.children.iter().map(|c| c.0).collect::<Vec<_>>()
        })).collect::<Vec<_>>(),
        "tiles": scene.tiles,
        "legend": scene.legend,
    })
}

/// Millimetres per CSS pixel at 96 dpi.
const MM_PER_PX: f64 = 25.4 / 96.0;

pub fn to_pdf(scene: &Scene, out: &std::path::Path) -> Result<()> {
    use printpdf::{BuiltinFont, Color as PdfColor, Mm, PdfDocument, Rect as PdfRect, Rgb};

    let pdf = |e: printpdf::Error| ExportError::Pdf(e.to_string());
    let page_w = scene.width * MM_PER_PX;
    let page_h = scene.canvas_height * MM_PER_PX;
    let mm = |px: f64| Mm((px * MM_PER_PX) as f32);
    // PDF space grows upwards.
    let flip = |px: f64| Mm((page_h - px * MM_PER_PX) as f32);
    let rgb = |c: crate::color::Color| {
        PdfColor::Rgb(Rgb::new(
            c.r as f32 / 255.0,
            c.g as f32 / 255.0,
            c.b as f32 / 255.0,
            None,
        ))
    };

    let title = scene
        .heading
        .as_ref()
        .map(|h| h.title.as_str())
        .unwrap_or("Treemap");
    let (doc, page1, layer1) =
        PdfDocument::new(title, Mm(page_w as f32), Mm(page_h as f32), "Treemap");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf)?;

    for t in &scene.tiles {
        if t.rect.area() <= 0.0 {
            continue;
        }
        layer.set_fill_color(rgb(t.fill));
        layer.add_rect(PdfRect::new(
            mm(t.rect.x0),
            flip(t.rect.y1),
            mm(t.rect.x1),
            flip(t.rect.y0),
        ));
        if !t.label.text.is_empty() {
            layer.set_fill_color(rgb(crate::color::Color::WHITE));
            // Font sizes are in points; 1px = 0.75pt.
            layer.use_text(
                t.label.text.as_str(),
                (t.label.font_size * 0.75) as f32,
                mm(t.rect.x0 + crate::scene::LABEL_OFFSET.0),
                flip(t.rect.y0 + crate::scene::LABEL_OFFSET.1),
                &font,
            );
        }
    }

    for item in &scene.legend.items {
        layer.set_fill_color(rgb(item.color));
        layer.add_rect(PdfRect::new(
            mm(item.swatch.x0),
            flip(item.swatch.y1),
            mm(item.swatch.x1),
            flip(item.swatch.y0),
        ));
        layer.set_fill_color(rgb(crate::color::Color::rgb(0, 0, 0)));
        layer.use_text(
            item.category.as_str(),
            9.0,
            mm(item.label_x),
            flip(item.label_y),
            &font,
        );
    }

    let file = std::fs::File::create(out).map_err(ExportError::from)?;
    let mut buf = std::io::BufWriter::new(file);
    doc.save(&mut buf).map_err(pdf)?;
    tracing::info!(path = %out.display(), "pdf written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RenderContext;
    use crate::hierarchy::SortOrder;
    use crate::model::{Node, Tree};

    fn fixture() -> (Layout, Scene, TreemapConfig) {
        let root = Node::group(
            "Kickstarter",
            vec![
                Node::group("Games", vec![Node::leaf("Pebble Time", "Games", 20.3), Node::leaf("Kingdom Death", "Games", 12.4)]),
                Node::group("Design", vec![Node::leaf("Coolest Cooler", "Design", 13.3)]),
            ],
        );
        let config = TreemapConfig::default();
        let ctx = RenderContext::new(500.0, 300.0, config.clone()).unwrap();
        let tree = Tree::from_node(&root, SortOrder::Value).unwrap();
        let layout = Layout::compute(&tree, &ctx, None).unwrap();
        let scene = Scene::build(&layout, &ctx);
        (layout, scene, config)
    }

    #[test]
    fn csv_has_one_row_per_tile() {
        let (_, scene, _) = fixture();
        let mut buf = Vec::new();
        to_csv(&scene, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("name,category,value"));
        assert!(lines[1].starts_with("Pebble Time,Games,20.3"));
    }

    #[test]
    fn json_lists_nodes_and_tiles() {
        let (layout, scene, config) = fixture();
        let json = to_json(&layout, &scene, &config);
        assert_eq!(json["nodes"].as_array().unwrap().len(), 6);
        assert_eq!(json["tiles"].as_array().unwrap().len(), 3);
        assert_eq!(json["nodes"][0]["parent"], serde_json::Value::Null);
        assert_eq!(json["config"]["tiling"], "squarify");
        assert_eq!(json["tiles"][0]["fill"], "#1f77b4");
    }

    #[test]
    fn pdf_is_written() {
        let (_, scene, _) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.pdf");
        to_pdf(&scene, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
