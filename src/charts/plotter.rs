//! Chart Plotter Module
//! Interactive bar charts and result tables using egui_plot.

use crate::charts::palette::classification_color;
use crate::data::Classification;
use crate::stats::{BrandCount, KeywordDetail, StateShare, TableData};
use egui::{Color32, RichText, ScrollArea};
use egui_plot::{Bar, BarChart, Legend, Plot};
use std::collections::HashMap;

const TABLE_ROW_HEIGHT: f32 = 18.0;

/// Label for an integer grid mark, empty between categories.
pub(crate) fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Build one stacked series per classification over `categories`.
fn stacked_share_charts(
    categories: &[String],
    shares: &HashMap<(String, Classification), f64>,
    horizontal: bool,
) -> Vec<BarChart> {
    let mut charts: Vec<BarChart> = Vec::new();

    for classification in Classification::ALL {
        let color = classification_color(classification);
        let bars: Vec<Bar> = categories
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let share = shares
                    .get(&(category.clone(), classification))
                    .copied()
                    .unwrap_or(0.0);
                Bar::new(i as f64, share)
                    .name(format!("{category} / {classification}: {share:.1}%"))
                    .fill(color)
            })
            .collect();

        let below: Vec<&BarChart> = charts.iter().collect();
        let mut chart = BarChart::new(bars)
            .name(classification.as_str())
            .color(color)
            .width(0.7)
            .stack_on(&below);
        if horizontal {
            chart = chart.horizontal();
        }
        charts.push(chart);
    }

    charts
}

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Stacked share of each classification per state.
    pub fn draw_state_share(ui: &mut egui::Ui, summary: &StateShare) {
        let states = summary.states();
        let shares: HashMap<(String, Classification), f64> = summary
            .rows
            .iter()
            .map(|r| ((r.state.clone(), r.classification), r.share))
            .collect();
        let x_labels = states.clone();

        Plot::new("state_share")
            .height(420.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("State")
            .y_axis_label("Share (%)")
            .include_y(0.0)
            .include_y(100.0)
            .x_axis_formatter(move |mark, _range| category_label(&x_labels, mark.value))
            .show(ui, |plot_ui| {
                for chart in stacked_share_charts(&states, &shares, false) {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    /// Horizontal leaderboard, largest count on top.
    pub fn draw_brand_chart(ui: &mut egui::Ui, id: &str, brands: &[BrandCount], color: Color32) {
        if brands.is_empty() {
            ui.label(RichText::new("No brand mentions").color(Color32::GRAY));
            return;
        }

        // Reverse so the top brand is drawn at the highest y.
        let labels: Vec<String> = brands.iter().rev().map(|b| b.brand.clone()).collect();
        let bars: Vec<Bar> = brands
            .iter()
            .rev()
            .enumerate()
            .map(|(i, b)| {
                Bar::new(i as f64, b.count as f64)
                    .name(format!("{}: {}", b.brand, b.count))
                    .fill(color)
            })
            .collect();

        Plot::new(id)
            .height(500.0)
            .allow_scroll(false)
            .x_axis_label("Mentions")
            .include_x(0.0)
            .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color).width(0.7).horizontal());
            });
    }

    /// Horizontal stacked weighted share per keyword on a 0-100 axis.
    pub fn draw_keyword_share(ui: &mut egui::Ui, detail: &KeywordDetail) {
        let keywords = detail.keywords();
        let shares: HashMap<(String, Classification), f64> = detail
            .rows
            .iter()
            .map(|r| ((r.keyword.clone(), r.classification), r.share))
            .collect();
        let y_labels = keywords.clone();

        Plot::new("keyword_share")
            .height(500.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Weighted Share (%)")
            .include_x(0.0)
            .include_x(100.0)
            .y_axis_formatter(move |mark, _range| category_label(&y_labels, mark.value))
            .show(ui, |plot_ui| {
                for chart in stacked_share_charts(&keywords, &shares, true) {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    /// Striped table with virtualized rows.
    pub fn draw_table(ui: &mut egui::Ui, id: &str, table: &TableData, max_height: f32) {
        if table.is_empty() {
            ui.label(RichText::new("No rows match the current filters").color(Color32::GRAY));
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::both()
                    .id_salt(format!("{id}_scroll"))
                    .max_height(max_height)
                    .auto_shrink([false, true])
                    .show_rows(ui, TABLE_ROW_HEIGHT, table.rows.len(), |ui, row_range| {
                        egui::Grid::new(ui.make_persistent_id(format!("{id}_grid")))
                            .striped(true)
                            .min_col_width(60.0)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for header in &table.headers {
                                    ui.label(RichText::new(header).strong().size(12.0));
                                }
                                ui.end_row();

                                for row in &table.rows[row_range] {
                                    for cell in row {
                                        ui.label(RichText::new(cell).size(12.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_integer_marks() {
        let labels = vec!["CA".to_string(), "NY".to_string()];
        assert_eq!(category_label(&labels, 0.0), "CA");
        assert_eq!(category_label(&labels, 1.0), "NY");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn stacked_series_cover_every_classification() {
        let categories = vec!["CA".to_string()];
        let shares = HashMap::from([(("CA".to_string(), Classification::Real), 100.0)]);
        let charts = stacked_share_charts(&categories, &shares, false);
        assert_eq!(charts.len(), Classification::ALL.len());
    }
}
