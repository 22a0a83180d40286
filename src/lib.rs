pub mod config;
pub mod poller;
pub mod record;
pub mod store;
pub mod table;

use std::sync::Arc;
use std::time::{Duration, SystemTime};
use chrono::{DateTime, Local};
use eframe::egui;
use egui::RichText;

use crate::config::AppConfig;
use crate::poller::Poller;
use crate::store::RecordStore;
use crate::table::TableView;

/// Repaint cadence of the UI thread. Data only changes when the poller
/// publishes, so this just keeps the "last updated" line fresh.
const REPAINT_INTERVAL: Duration = Duration::from_millis(500);

pub struct PingDashboardApp {
    config: AppConfig,
    endpoint_input: String,
    store: Arc<RecordStore>,
    poller: Option<Poller>,
}

impl PingDashboardApp {
    pub fn new() -> Self {
        let config = AppConfig::load();
        let store = Arc::new(RecordStore::new());
        let poller = Poller::start(
            config.endpoint.clone(),
            Duration::from_millis(config.interval_ms),
            Arc::clone(&store),
        );
        Self {
            endpoint_input: config.endpoint.clone(),
            config,
            store,
            poller: Some(poller),
        }
    }

    /// Switches to the endpoint currently in the input field: persists the
    /// config, stops the running poller, and starts a fresh one against the
    /// same store. A late response from the old poller is discarded by the
    /// store's cycle guard.
    fn apply_endpoint(&mut self) {
        let endpoint = self.endpoint_input.trim().to_string();
        if endpoint.is_empty() || endpoint == self.config.endpoint {
            return;
        }

        if let Some(mut old) = self.poller.take() {
            old.stop();
        }

        self.config.endpoint = endpoint;
        self.config.save();
        self.poller = Some(Poller::start(
            self.config.endpoint.clone(),
            Duration::from_millis(self.config.interval_ms),
            Arc::clone(&self.store),
        ));
    }

    fn draw_table(ui: &mut egui::Ui, view: &TableView) {
        egui::Grid::new("ping_table")
            .striped(true)
            .min_col_width(140.0)
            .show(ui, |ui| {
                for column in table::COLUMNS {
                    ui.label(RichText::new(column).strong());
                }
                ui.end_row();

                for row in &view.rows {
                    ui.label(&row.ip);
                    ui.label(&row.duration);
                    ui.label(&row.last_attempt);
                    ui.end_row();
                }
            });
    }

    fn format_updated_at(updated_at: Option<SystemTime>) -> String {
        match updated_at {
            Some(time) => DateTime::<Local>::from(time).format("%X").to_string(),
            None => "never".to_string(),
        }
    }
}

impl eframe::App for PingDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let snapshot = self.store.snapshot();
        let view = table::project(&snapshot.records);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Ping Dashboard");

            ui.horizontal(|ui| {
                ui.label("Endpoint:");
                let edit = ui.text_edit_singleline(&mut self.endpoint_input);
                let apply = ui.button("Apply").clicked();
                let committed =
                    edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if apply || committed {
                    self.apply_endpoint();
                }
            });

            ui.separator();

            ui.label(format!("Targets: {}", view.rows.len()));
            ui.label(format!(
                "Last updated: {}",
                Self::format_updated_at(snapshot.updated_at)
            ));

            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                Self::draw_table(ui, &view);
            });
        });

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
    }
}
