//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use eframe::egui::{self, Context};
use parking_lot::RwLock;
use tracing::{error, info};

use sb_data::{CsvSource, ExplorerConfig};
use sb_ui::{apply_theme, orientation_tabs, Theme};
use sb_views::{SunburstView, ViewerContext};

mod demo;

const VIEW_STORAGE_KEY: &str = "sunburst_view";

/// Main application state
struct SunburstApp {
    /// The single sunburst view
    view: SunburstView,

    /// Viewer context shared with the view layer
    viewer_context: ViewerContext,

    /// Tokio runtime for data loading
    runtime: tokio::runtime::Runtime,
}

impl SunburstApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        apply_theme(&cc.egui_ctx, &Theme::default());

        let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");

        let viewer_context = ViewerContext {
            data_source: Arc::new(RwLock::new(None)),
            config: Arc::new(load_config()),
            runtime_handle: runtime.handle().clone(),
        };

        let mut app = Self {
            view: SunburstView::new("Sunburst".to_string()),
            viewer_context,
            runtime,
        };

        if let Some(storage) = cc.storage {
            if let Some(saved) = storage.get_string(VIEW_STORAGE_KEY) {
                match serde_json::from_str(&saved) {
                    Ok(value) => app.view.load_config(value),
                    Err(err) => error!(%err, "ignoring unreadable view config"),
                }
            }
        }

        app.start_demo();
        app
    }

    fn start_demo(&mut self) {
        *self.viewer_context.data_source.write() = Some(Box::new(demo::DemoDataSource::new()));
        self.view.clear_data();
        info!("demo data source loaded");
    }

    fn open_csv(&mut self, path: PathBuf) {
        match self.runtime.block_on(CsvSource::new(path)) {
            Ok(source) => {
                *self.viewer_context.data_source.write() = Some(Box::new(source));
                self.view.clear_data();
            }
            Err(err) => error!(%err, "failed to open csv file"),
        }
    }

    fn menu_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open CSV…").clicked() {
                        ui.close_menu();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("CSV Files", &["csv"])
                            .pick_file()
                        {
                            self.open_csv(path);
                        }
                    }
                    if ui.button("Demo data").clicked() {
                        ui.close_menu();
                        self.start_demo();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.view.config.show_labels, "Labels");
                    ui.checkbox(&mut self.view.config.show_tooltip, "Tooltips");
                });

                ui.separator();

                let labels: Vec<String> = self
                    .viewer_context
                    .config
                    .orientations
                    .iter()
                    .map(|o| o.label.clone())
                    .collect();
                if let Some(next) = orientation_tabs(ui, &labels, self.view.orientation()) {
                    let viewer_context = self.viewer_context.clone();
                    self.view.set_orientation(&viewer_context, next);
                }
            });
        });
    }

    fn status_bar(&self, ctx: &Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let guard = self.viewer_context.data_source.read();
                match guard.as_ref() {
                    Some(source) => {
                        ui.label(source.source_name());
                        if let Ok(rows) = self.runtime.block_on(source.row_count()) {
                            ui.separator();
                            ui.label(format!("{rows} records"));
                        }
                    }
                    None => {
                        ui.label("no data source");
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new("click to zoom in, center to zoom out, shift for slow motion")
                            .color(egui::Color32::from_gray(130)),
                    );
                });
            });
        });
    }
}

impl eframe::App for SunburstApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.menu_bar(ctx);
        self.status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let viewer_context = self.viewer_context.clone();
            self.view.ui(&viewer_context, ui);
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match serde_json::to_string(&self.view.save_config()) {
            Ok(saved) => storage.set_string(VIEW_STORAGE_KEY, saved),
            Err(err) => error!(%err, "failed to persist view config"),
        }
    }
}

/// Load the explorer config from `sunburst.json` next to the binary's
/// working directory, falling back to the built-in defaults.
fn load_config() -> ExplorerConfig {
    let path = PathBuf::from("sunburst.json");
    if path.exists() {
        match ExplorerConfig::load(&path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded explorer config");
                return config;
            }
            Err(err) => error!(%err, "failed to read explorer config, using defaults"),
        }
    }
    ExplorerConfig::default()
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting sunburst explorer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([700.0, 500.0]),
        default_theme: eframe::Theme::Dark,
        ..Default::default()
    };

    eframe::run_native(
        "Sunburst Explorer",
        options,
        Box::new(|cc| Box::new(SunburstApp::new(cc))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {e}"))?;

    Ok(())
}
