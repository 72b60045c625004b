use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Stroke, Ui, Vec2};
use treemap_core::color::Color;
use treemap_core::datasets::DatasetId;
use treemap_core::scene::{Scene, LABEL_OFFSET};
use treemap_core::tooltip::{self, FADE_IN_SECS, FADE_OUT_SECS, OPACITY};
use treemap_core::TilingRule;

use crate::state::{AppState, Source};

pub fn draw(app: &mut AppState, ctx: &egui::Context) {
    if app.poll_loads() {
        ctx.request_repaint();
    }
    // Replies arrive on another thread; keep polling while one is outstanding.
    if app.pending.is_some() {
        ctx.request_repaint();
    }

    let screen = ctx.screen_rect().size();
    app.resize(screen.x as f64, screen.y as f64);

    egui::TopBottomPanel::top("top").show(ctx, |ui| {
        top_bar(ui, app);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(err) = &app.error {
            ui.colored_label(Color32::from_rgb(0xd6, 0x27, 0x28), err);
        }
        if app.pending.is_some() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading…");
            });
        }
        if app.scene.is_none() {
            if app.pending.is_none() && app.error.is_none() {
                ui.label("Choose a dataset to start");
            }
            return;
        }
        egui::ScrollArea::both().show(ui, |ui| {
            canvas(ui, app);
        });
    });
}

fn top_bar(ui: &mut Ui, app: &mut AppState) {
    ui.horizontal(|ui| {
        for id in DatasetId::ALL {
            let selected = app.source == Source::Dataset(id);
            if ui.selectable_label(selected, id.title()).clicked() {
                app.load_dataset(id);
            }
        }
        if ui.button("Open File…").clicked() {
            let picked = rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .pick_file();
            if let Some(path) = picked {
                app.open_file(path);
            }
        }
        ui.separator();

        let mut config = app.prefs.config.clone();
        egui::ComboBox::from_label("Tiling")
            .selected_text(match config.tiling {
                TilingRule::Squarify => "Squarify",
                TilingRule::Resquarify => "Resquarify",
            })
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut config.tiling, TilingRule::Squarify, "Squarify");
                ui.selectable_value(&mut config.tiling, TilingRule::Resquarify, "Resquarify");
            });
        ui.add(egui::Slider::new(&mut config.padding, 0.0..=10.0).text("Padding"));
        ui.checkbox(&mut config.responsive, "Responsive");
        ui.checkbox(&mut config.round, "Snap to pixels");
        if config != app.prefs.config {
            app.set_config(config);
        }
        ui.separator();

        if ui.button("Export SVG…").clicked() {
            if let Some(path) = rfd::FileDialog::new().set_file_name("treemap.svg").save_file() {
                match app.export_svg(&path) {
                    Ok(()) => {
                        if let Err(e) = open::that(&path) {
                            tracing::warn!(error = %e, "could not open exported svg");
                        }
                    }
                    Err(e) => app.error = Some(format!("{e:#}")),
                }
            }
        }
    });
}

fn canvas(ui: &mut Ui, app: &mut AppState) {
    let Some(scene) = &app.scene else { return; };

    if let Some(heading) = &scene.heading {
        ui.vertical_centered(|ui| {
            ui.heading(&heading.title);
            ui.label(&heading.description);
        });
        ui.add_space(8.0);
    }

    let size = Vec2::new(scene.width as f32, scene.canvas_height as f32);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let origin = response.rect.min;
    let to_screen = |x: f64, y: f64| origin + Vec2::new(x as f32, y as f32);

    let hovered = response.hover_pos().and_then(|pos| {
        let local = pos - origin;
        let (x, y) = (local.x as f64, local.y as f64);
        scene.tile_at(x, y).map(|t| (t.id, (x, y)))
    });

    for tile in &scene.tiles {
        let rect = Rect::from_min_max(
            to_screen(tile.rect.x0, tile.rect.y0),
            to_screen(tile.rect.x1, tile.rect.y1),
        );
        painter.rect_filled(rect, 0.0, color32(tile.fill, 1.0));
        if hovered.map(|(h, _)| h) == Some(tile.id) {
            painter.rect_stroke(rect, 0.0, Stroke::new(2.0, Color32::WHITE));
        }
        if !tile.label.text.is_empty() {
            painter.with_clip_rect(rect).text(
                rect.min + Vec2::new(LABEL_OFFSET.0 as f32, LABEL_OFFSET.1 as f32),
                Align2::LEFT_BOTTOM,
                &tile.label.text,
                FontId::proportional(tile.label.font_size as f32),
                Color32::WHITE,
            );
        }
    }

    let text_color = ui.visuals().text_color();
    for item in &scene.legend.items {
        let swatch = Rect::from_min_max(
            to_screen(item.swatch.x0, item.swatch.y0),
            to_screen(item.swatch.x1, item.swatch.y1),
        );
        painter.rect_filled(swatch, 0.0, color32(item.color, 1.0));
        painter.text(
            to_screen(item.label_x, item.label_y),
            Align2::LEFT_BOTTOM,
            &item.category,
            FontId::proportional(12.0),
            text_color,
        );
    }

    app.hovered = hovered.map(|(id, _)| id);
    if let Some((id, pointer)) = hovered {
        app.tooltip_tile = Some(id);
        app.pointer = pointer;
    }
    let fade = if app.hovered.is_some() { FADE_IN_SECS } else { FADE_OUT_SECS };
    let alpha = ui
        .ctx()
        .animate_bool_with_time(egui::Id::new("tile-tooltip"), app.hovered.is_some(), fade);
    if let Some(tile) = app.tooltip_tile.and_then(|id| scene.tile(id)) {
        if alpha > 0.0 {
            draw_tooltip(&painter, scene, origin, app.pointer, &tile.meta.text(), alpha * OPACITY);
        }
    }
}

fn draw_tooltip(
    painter: &egui::Painter,
    scene: &Scene,
    origin: Pos2,
    pointer: (f64, f64),
    text: &str,
    alpha: f32,
) {
    let fg = Color32::WHITE.gamma_multiply(alpha);
    let galley = painter.layout_no_wrap(text.to_string(), FontId::proportional(12.0), fg);
    let pad = Vec2::splat(6.0);
    let box_size = galley.size() + pad * 2.0;
    let (left, top) = tooltip::place(
        pointer,
        (box_size.x as f64, box_size.y as f64),
        (scene.width, scene.canvas_height),
    );
    let min = origin + Vec2::new(left as f32, top as f32);
    let frame = Rect::from_min_size(min, box_size);
    painter.rect_filled(frame, 4.0, Color32::from_black_alpha(200).gamma_multiply(alpha));
    painter.galley(min + pad, galley, fg);
}

fn color32(c: Color, alpha: f32) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b).gamma_multiply(alpha)
}
