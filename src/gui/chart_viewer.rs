//! Chart Viewer Widget
//! Central panel showing the chart and table of the active view.

use crate::charts::{ChartPlotter, REAL_COLOR, SWEEPS_COLOR};
use crate::dashboard::DashboardView;
use crate::stats::{Metric, TableData, ViewResult};
use egui::{Color32, RichText, ScrollArea};

const WARNING_COLOR: Color32 = Color32::from_rgb(243, 156, 18);

/// Scrollable display of the current dashboard view.
#[derive(Default)]
pub struct ChartViewer {
    pub view: Option<DashboardView>,
    /// Flattened table of `view`, cached for drawing and export.
    pub table: TableData,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.table = view.result.to_table();
        self.view = Some(view);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ui.label(
            RichText::new(format!("{} of {} results match the filters", view.matched, view.total))
                .size(11.0)
                .color(Color32::GRAY),
        );
        ui.add_space(5.0);

        ScrollArea::vertical()
            .id_salt("chart_viewer")
            .auto_shrink([false, false])
            .show(ui, |ui| match &view.result {
                ViewResult::Overview(summary) => {
                    ui.heading("🏛️ Classification Share by State");
                    let suffix = match summary.metric {
                        Metric::RawCount => "(Raw Counts)",
                        Metric::PositionWeighted => "(Position-Weighted)",
                    };
                    ui.label(
                        RichText::new(format!("Stacked Share by Classification {suffix}"))
                            .size(14.0)
                            .strong(),
                    );
                    ChartPlotter::draw_state_share(ui, summary);
                    ui.add_space(10.0);
                    ChartPlotter::draw_table(ui, "overview_table", &self.table, 300.0);
                }
                ViewResult::BrandBreakdown(breakdown) => {
                    ui.heading("🏆 Top Brand Mentions");
                    ui.columns(2, |columns| {
                        columns[0].label(
                            RichText::new("Real Money Brands (Top 25)").size(14.0).strong(),
                        );
                        ChartPlotter::draw_brand_chart(
                            &mut columns[0],
                            "real_brands",
                            &breakdown.real,
                            REAL_COLOR,
                        );
                        columns[1].label(
                            RichText::new("Sweepstakes Brands (Top 25)").size(14.0).strong(),
                        );
                        ChartPlotter::draw_brand_chart(
                            &mut columns[1],
                            "sweeps_brands",
                            &breakdown.sweeps,
                            SWEEPS_COLOR,
                        );
                    });
                    ui.add_space(10.0);
                    ui.label(RichText::new("🥇 Combined Leaderboard").size(14.0).strong());
                    ChartPlotter::draw_table(ui, "leaderboard_table", &self.table, 300.0);
                }
                ViewResult::KeywordDetail(detail) => {
                    ui.heading("🔎 Keyword-Level Analysis");
                    ui.label(
                        RichText::new("Weighted Distribution by Keyword (0–100 %)")
                            .size(14.0)
                            .strong(),
                    );
                    ChartPlotter::draw_keyword_share(ui, detail);
                    if detail.rounding_warning {
                        ui.label(
                            RichText::new("⚠ Some keywords exceed 100 % total share due to rounding.")
                                .color(WARNING_COLOR),
                        );
                    }
                    ui.add_space(10.0);
                    ChartPlotter::draw_table(ui, "keyword_table", &self.table, 300.0);
                }
                ViewResult::SerpTable(_) => {
                    ui.heading("🧾 Full SERP Classification Table");
                    ChartPlotter::draw_table(ui, "serp_table", &self.table, 800.0);
                }
            });
    }
}
