//! Control Panel Widget
//! Left side panel with data source, filters, metric and view selection.

use crate::dashboard::DashboardParams;
use crate::data::{normalize_range, MAX_POSITION, MIN_POSITION};
use crate::stats::{Metric, ViewMode};
use egui::{Color32, RichText, ScrollArea};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

/// Left side control panel.
pub struct ControlPanel {
    pub params: DashboardParams,
    pub data_path: Option<PathBuf>,
    /// States offered by the multi-select, with their checked flag.
    pub states: Vec<(String, bool)>,
    pub keyword_text: String,
    pub status: String,
    pub has_data: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            params: DashboardParams::default(),
            data_path: None,
            states: Vec::new(),
            keyword_text: String::new(),
            status: "Ready".to_string(),
            has_data: false,
        }
    }
}

impl ControlPanel {
    pub fn new(params: DashboardParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Replace the offered states. Known states keep their checked flag; new ones start checked.
    pub fn update_states(&mut self, states: Vec<String>) {
        let previous: HashMap<String, bool> = self.states.drain(..).collect();
        self.states = states
            .into_iter()
            .map(|s| {
                let checked = previous.get(&s).copied().unwrap_or(true);
                (s, checked)
            })
            .collect();
        self.sync_state_filter();
    }

    /// All checked means no state filter.
    fn sync_state_filter(&mut self) {
        self.params.filter.states = if self.states.iter().all(|(_, checked)| *checked) {
            None
        } else {
            Some(
                self.states
                    .iter()
                    .filter(|(_, checked)| *checked)
                    .map(|(s, _)| s.clone())
                    .collect::<BTreeSet<_>>(),
            )
        };
    }

    fn sync_keyword_filter(&mut self) {
        let keyword = self.keyword_text.trim();
        self.params.filter.keyword = if keyword.is_empty() {
            None
        } else {
            Some(keyword.to_string())
        };
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let before = self.params.clone();

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🎰 SERP Brand Landscape")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .data_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(if self.has_data {
                        Color32::WHITE
                    } else {
                        Color32::GRAY
                    }));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                        if ui
                            .add_enabled(self.data_path.is_some(), egui::Button::new("⟳"))
                            .on_hover_text("Reload if the file changed")
                            .clicked()
                        {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔍 Filters").size(14.0).strong());
        ui.add_space(5.0);

        let (mut lo, mut hi) = self.params.filter.position_range;
        ui.label("Filter positions");
        ui.add(egui::Slider::new(&mut lo, MIN_POSITION..=MAX_POSITION).text("from"));
        ui.add(egui::Slider::new(&mut hi, MIN_POSITION..=MAX_POSITION).text("to"));
        if (lo, hi) != self.params.filter.position_range {
            // Dragging one bound past the other drags both.
            if lo > hi {
                if lo != self.params.filter.position_range.0 {
                    hi = lo;
                } else {
                    lo = hi;
                }
            }
            self.params.filter.position_range = normalize_range(lo, hi);
        }

        ui.add_space(8.0);
        ui.label("Select States");
        let mut states_changed = false;
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("state_select")
                    .max_height(160.0)
                    .show(ui, |ui| {
                        if self.states.is_empty() {
                            ui.label(RichText::new("No states loaded").color(Color32::GRAY));
                        }
                        for (state, checked) in self.states.iter_mut() {
                            states_changed |= ui.checkbox(checked, state.as_str()).changed();
                        }
                    });
            });
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.states.iter_mut().for_each(|(_, c)| *c = true);
                states_changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                self.states.iter_mut().for_each(|(_, c)| *c = false);
                states_changed = true;
            }
        });
        if states_changed {
            self.sync_state_filter();
        }

        ui.add_space(8.0);
        ui.label("Filter by keyword (optional)");
        if ui.text_edit_singleline(&mut self.keyword_text).changed() {
            self.sync_keyword_filter();
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Metric / View Section =====
        ui.label(RichText::new("📊 Metric").size(14.0).strong());
        for metric in Metric::ALL {
            ui.radio_value(&mut self.params.metric, metric, metric.label());
        }

        ui.add_space(8.0);
        ui.label(RichText::new("🗂 View Mode").size(14.0).strong());
        for view in ViewMode::ALL {
            ui.radio_value(&mut self.params.view, view, view.label());
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Export Section =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.has_data, |ui| {
                let table_button = egui::Button::new(RichText::new("💾 Export Table (CSV)").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(table_button).clicked() {
                    action = ControlPanelAction::ExportTable;
                }

                ui.add_space(6.0);

                let chart_enabled = self.params.view != ViewMode::SerpTable;
                ui.add_enabled_ui(chart_enabled, |ui| {
                    let chart_button =
                        egui::Button::new(RichText::new("🖼 Export Chart (PNG)").size(14.0))
                            .min_size(egui::vec2(200.0, 30.0));
                    if ui.add(chart_button).clicked() {
                        action = ControlPanelAction::ExportChart;
                    }
                });
            });
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") || self.status.starts_with("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        if action == ControlPanelAction::None && self.params != before {
            action = ControlPanelAction::ParamsChanged;
        }
        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Reload,
    ParamsChanged,
    ExportTable,
    ExportChart,
}
