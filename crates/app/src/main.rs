use std::process;

use eframe::egui;

mod app;
mod headless;

fn main() -> eframe::Result<()> {
    let (console, log_level) = app::setup_tracing();

    tracing::info!("LookDev starting");

    let args: Vec<String> = std::env::args().collect();
    match headless::maybe_run_headless(&args) {
        Ok(true) => return Ok(()),
        Ok(false) => {}
        Err(err) => {
            eprintln!("headless error: {err}");
            process::exit(1);
        }
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };
    eframe::run_native(
        "LookDev",
        native_options,
        Box::new(|cc| Ok(Box::new(app::LookDevApp::new(&cc.egui_ctx, console, log_level)))),
    )
}
