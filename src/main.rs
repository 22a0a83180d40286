#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use ping_dashboard::PingDashboardApp;

fn main() -> eframe::Result {
    env_logger::init();

    let app = PingDashboardApp::new();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Ping Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
