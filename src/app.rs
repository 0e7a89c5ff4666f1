use eframe::egui;

use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SoilViewerApp {
    pub state: AppState,
}

impl SoilViewerApp {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for SoilViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::page_content(ui, &self.state);
        });

        // The frame just drawn shows the spinner; the blocking read runs
        // on the next one.
        if self.state.tick() {
            ctx.request_repaint();
        }
    }
}
