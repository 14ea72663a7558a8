//! SERP Landscape Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::dashboard::{compute_view, DashboardParams};
use crate::data::{export_table_csv, DatasetCache, RecordSet};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use tracing::{error, info, warn};

const EXPORT_WIDTH: u32 = 1400;
const EXPORT_HEIGHT: u32 = 900;

/// CSV loading result from background thread
enum LoadResult {
    Complete {
        path: PathBuf,
        records: Arc<RecordSet>,
    },
    Error(String),
}

/// Load through the shared cache. Runs on the loader thread.
fn load_dataset(cache: &Mutex<DatasetCache>, path: PathBuf) -> LoadResult {
    let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
    match cache.get_or_load(&path) {
        Ok(records) => LoadResult::Complete { path, records },
        Err(e) => LoadResult::Error(e.to_string()),
    }
}

/// The data set on screen and the file it came from.
#[derive(Default)]
struct LoadedData {
    path: Option<PathBuf>,
    records: Option<Arc<RecordSet>>,
}

impl LoadedData {
    /// Switch to a finished load. A failed load keeps the previous file and records.
    fn apply(&mut self, result: LoadResult) -> Result<Arc<RecordSet>, String> {
        match result {
            LoadResult::Complete { path, records } => {
                self.path = Some(path);
                self.records = Some(Arc::clone(&records));
                Ok(records)
            }
            LoadResult::Error(message) => Err(message),
        }
    }
}

/// Main application window.
pub struct SerpLandscapeApp {
    cache: Arc<Mutex<DatasetCache>>,
    loaded: LoadedData,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl SerpLandscapeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            cache: Arc::new(Mutex::new(DatasetCache::new())),
            loaded: LoadedData::default(),
            control_panel: ControlPanel::new(DashboardParams::from_config(&config)),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };

        if config.data_path.is_file() {
            app.start_load(config.data_path);
        } else {
            info!(path = %config.data_path.display(), "Default data file not found, waiting for selection");
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    /// Re-read the current file from disk even if its mtime is unchanged.
    fn handle_reload(&mut self) {
        if self.is_loading {
            return;
        }
        if let Some(path) = self.loaded.path.clone() {
            self.cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .invalidate(&path);
            self.start_load(path);
        }
    }

    /// Load in a background thread. The current view stays up until the load finishes.
    fn start_load(&mut self, path: PathBuf) {
        if self.is_loading {
            return;
        }

        self.control_panel
            .set_status(format!("Loading {}...", path.display()));
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let cache = Arc::clone(&self.cache);
        thread::spawn(move || {
            let _ = tx.send(load_dataset(&cache, path));
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(result) => {
                self.is_loading = false;
                match self.loaded.apply(result) {
                    Ok(records) => self.set_records(records),
                    Err(message) => {
                        error!(error = %message, "CSV load failed");
                        self.control_panel.set_status(format!("Error: {}", message));
                        self.control_panel.has_data = self.loaded.records.is_some();
                        self.refresh();
                    }
                }
                self.control_panel.data_path = self.loaded.path.clone();
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.set_status("Error: loader stopped unexpectedly");
                self.is_loading = false;
            }
        }
    }

    fn set_records(&mut self, records: Arc<RecordSet>) {
        let file = records
            .source()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.control_panel.set_status(format!(
            "Loaded {} rows, {} states from {}",
            records.len(),
            records.states().len(),
            file
        ));
        self.control_panel.has_data = true;
        self.refresh();
    }

    /// Re-run filter and aggregation with the current parameters.
    fn refresh(&mut self) {
        let Some(records) = self.loaded.records.clone() else {
            return;
        };

        let states = self
            .control_panel
            .params
            .filter
            .available_states(records.records());
        self.control_panel.update_states(states);

        let view = compute_view(&records, &self.control_panel.params);
        self.chart_viewer.set_view(view);
    }

    fn pick_save_path(filter_name: &str, extension: &str, file_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(filter_name, &[extension])
            .set_file_name(file_name)
            .save_file()
    }

    fn open_exported(path: &Path) {
        if let Err(e) = open::that(path) {
            warn!(path = %path.display(), error = %e, "Could not open exported file");
        }
    }

    fn handle_export_table(&mut self) {
        if self.chart_viewer.view.is_none() {
            self.control_panel.set_status("Nothing to export");
            return;
        }
        let Some(path) = Self::pick_save_path("CSV", "csv", "serp_view.csv") else {
            return;
        };

        match export_table_csv(&self.chart_viewer.table, &path) {
            Ok(()) => {
                self.control_panel
                    .set_status(format!("Exported {} rows", self.chart_viewer.table.rows.len()));
                Self::open_exported(&path);
            }
            Err(e) => self.control_panel.set_status(format!("Error: {}", e)),
        }
    }

    fn handle_export_chart(&mut self) {
        let Some(view) = &self.chart_viewer.view else {
            self.control_panel.set_status("Nothing to export");
            return;
        };
        let Some(path) = Self::pick_save_path("PNG Image", "png", "serp_chart.png") else {
            return;
        };

        match StaticChartRenderer::render_png(&view.result, &path, EXPORT_WIDTH, EXPORT_HEIGHT) {
            Ok(()) => {
                self.control_panel.set_status("Exported chart");
                Self::open_exported(&path);
            }
            Err(e) => self.control_panel.set_status(format!("Error: {}", e)),
        }
    }
}

impl eframe::App for SerpLandscapeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::ParamsChanged => self.refresh(),
                        ControlPanelAction::ExportTable => self.handle_export_table(),
                        ControlPanelAction::ExportChart => self.handle_export_chart(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Classification, SerpRecord};
    use std::io::Write;

    fn loaded(path: &str) -> LoadedData {
        let records = RecordSet::new(vec![SerpRecord::new(
            "CA",
            "k",
            Some(1),
            Classification::Real,
        )])
        .with_source(path);
        LoadedData {
            path: Some(PathBuf::from(path)),
            records: Some(Arc::new(records)),
        }
    }

    #[test]
    fn failed_load_keeps_previous_file() {
        let mut data = loaded("first.csv");
        let before = data.records.clone().unwrap();

        let err = data
            .apply(LoadResult::Error("Data file not found: second.csv".into()))
            .unwrap_err();
        assert!(err.contains("second.csv"));
        assert_eq!(data.path, Some(PathBuf::from("first.csv")));
        assert!(Arc::ptr_eq(data.records.as_ref().unwrap(), &before));
    }

    #[test]
    fn completed_load_switches_file() {
        let mut data = loaded("first.csv");
        let next = Arc::new(RecordSet::new(Vec::new()).with_source("second.csv"));

        let records = data
            .apply(LoadResult::Complete {
                path: PathBuf::from("second.csv"),
                records: Arc::clone(&next),
            })
            .unwrap();
        assert!(Arc::ptr_eq(&records, &next));
        assert_eq!(data.path, Some(PathBuf::from("second.csv")));
        assert!(data.records.as_ref().unwrap().is_empty());
    }

    #[test]
    fn missing_file_reports_error() {
        let cache = Mutex::new(DatasetCache::new());
        let result = load_dataset(&cache, PathBuf::from("/no/such/file.csv"));

        assert!(matches!(result, LoadResult::Error(_)));
        assert!(cache.lock().unwrap().is_empty());
    }

    #[test]
    fn repeat_load_is_served_from_cache() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(b"state,keyword,position\nCA,k,1\n").unwrap();
        file.flush().unwrap();
        let cache = Mutex::new(DatasetCache::new());

        let LoadResult::Complete { records: first, .. } =
            load_dataset(&cache, file.path().to_path_buf())
        else {
            panic!("expected a loaded file");
        };
        let LoadResult::Complete { records: second, .. } =
            load_dataset(&cache, file.path().to_path_buf())
        else {
            panic!("expected a loaded file");
        };
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.source(), Some(file.path()));

        cache.lock().unwrap().invalidate(file.path());
        assert!(cache.lock().unwrap().is_empty());
    }
}
