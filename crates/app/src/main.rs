mod state;
mod ui;

use eframe::egui;
use state::{AppState, Prefs};

struct TreemapApp {
    state: AppState,
}

impl TreemapApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let prefs: Prefs = cc
            .storage
            .and_then(|s| eframe::get_value(s, eframe::APP_KEY))
            .unwrap_or_default();
        let mut state = AppState::new(prefs);
        state.reload();
        Self { state }
    }
}

impl eframe::App for TreemapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::draw(&mut self.state, ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.state.prefs);
    }
}

fn main() -> eframe::Result<()> {
    treemap_core::logging::init("info");
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Treemap",
        options,
        Box::new(|cc| Ok(Box::new(TreemapApp::new(cc)))),
    )
}
