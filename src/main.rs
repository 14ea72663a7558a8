//! SERP Brand Landscape Explorer
//!
//! Desktop dashboard over pre-computed SERP brand classifications.

use anyhow::Result;
use eframe::egui;
use serp_landscape::gui::SerpLandscapeApp;
use serp_landscape::DashboardConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("serp_landscape=info".parse()?),
        )
        .init();

    let config = DashboardConfig::load()?;
    info!("SERP Brand Landscape starting...");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("SERP Brand Landscape"),
        ..Default::default()
    };

    eframe::run_native(
        "SERP Brand Landscape",
        options,
        Box::new(move |cc| Ok(Box::new(SerpLandscapeApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))?;
    Ok(())
}
