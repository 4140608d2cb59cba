use std::collections::VecDeque;
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use lpfsim::config::{AppConfig, CutoffFrequency, CutoffRange};
use lpfsim::constants::{TIME_COLUMN, VOLTAGE_COLUMN};
use lpfsim::data::{DataSource, Signal};
use lpfsim::filter::FilterCache;
use lpfsim::session::{DataState, Session, Status};

const MAX_LOG_LINES: usize = 500;

#[derive(Parser, Debug)]
#[command(name = "lpfsim_gui")]
#[command(about = "Interactive low-pass filter simulator - GUI", long_about = None)]
struct Args {
    /// CSV to open on startup instead of the default URL
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Initial cutoff frequency (e.g., "25", "4hz")
    #[arg(short = 'c', long)]
    cutoff: Option<CutoffFrequency>,

    #[arg(long)]
    wc_min: Option<f64>,

    #[arg(long)]
    wc_max: Option<f64>,

    #[arg(long)]
    rf: Option<f64>,

    #[arg(long)]
    ri: Option<f64>,

    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

enum GuiUpdate {
    Loaded {
        source: DataSource,
        result: lpfsim::Result<Signal>,
    },
    Log(String),
}

struct GuiLogger {
    tx: Sender<GuiUpdate>,
    max_level: log::LevelFilter,
}

impl log::Log for GuiLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let msg = format!("[{}] {}", record.level(), record.args());
            let _ = self.tx.send(GuiUpdate::Log(msg));
        }
    }

    fn flush(&self) {}
}

fn spawn_load(source: DataSource, tx: Sender<GuiUpdate>) {
    thread::spawn(move || {
        let result = Signal::load(&source);
        let _ = tx.send(GuiUpdate::Loaded { source, result });
    });
}

struct LpfGuiApp {
    rx: Receiver<GuiUpdate>,
    tx: Sender<GuiUpdate>,
    session: Session,
    cache: FilterCache,
    path_input: String,
    log_lines: VecDeque<String>,
}

impl LpfGuiApp {
    fn new(
        _cc: &eframe::CreationContext<'_>,
        rx: Receiver<GuiUpdate>,
        tx: Sender<GuiUpdate>,
        session: Session,
    ) -> Self {
        let path_input = match session.source() {
            DataSource::Path(p) => p.display().to_string(),
            _ => String::new(),
        };
        let mut app = Self {
            rx,
            tx,
            session,
            cache: FilterCache::new(),
            path_input,
            log_lines: VecDeque::new(),
        };
        let initial = app.session.source().clone();
        app.start_load(initial);
        app
    }

    fn start_load(&mut self, source: DataSource) {
        if self.session.begin_load(&source) {
            spawn_load(source, self.tx.clone());
        }
    }

    fn drain_updates(&mut self) {
        while let Ok(update) = self.rx.try_recv() {
            match update {
                GuiUpdate::Loaded { source, result } => {
                    let _ = self.session.finish_load(source, result);
                }
                GuiUpdate::Log(line) => {
                    self.log_lines.push_back(line);
                    while self.log_lines.len() > MAX_LOG_LINES {
                        self.log_lines.pop_front();
                    }
                }
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if self.session.is_loading() {
            log::warn!("Dropped {} ignored: a load is already running", file.name);
            return;
        }

        let source = match (file.path, file.bytes) {
            (Some(path), _) => DataSource::Path(path),
            (None, Some(bytes)) => DataSource::Bytes {
                name: file.name,
                bytes: bytes.to_vec(),
            },
            (None, None) => return,
        };

        if !source.has_csv_name() {
            self.session.set_status(Status::Error(format!(
                "Only .csv files are accepted, got {}",
                source
            )));
            return;
        }
        if let DataSource::Path(p) = &source {
            self.path_input = p.display().to_string();
        }
        self.start_load(source);
    }

    fn draw_instructions(&self, ui: &mut egui::Ui) {
        ui.heading("Interactive Low-Pass Filter Simulator");
        ui.label("The default CSV is loaded automatically. You can also open or drop your own.");
        ui.label(
            egui::RichText::new("Your CSV must contain these column names exactly:")
                .color(egui::Color32::LIGHT_GRAY),
        );
        for col in [TIME_COLUMN, VOLTAGE_COLUMN] {
            ui.label(egui::RichText::new(format!("  • {}", col)).monospace());
        }
    }

    fn draw_source_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("CSV file:").color(egui::Color32::LIGHT_GRAY));
            let edit = ui.add(
                egui::TextEdit::singleline(&mut self.path_input)
                    .hint_text("path/to/data.csv (or drop a file)")
                    .desired_width(320.0),
            );
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let load_clicked = ui
                .add_enabled(!self.session.is_loading(), egui::Button::new("Load"))
                .clicked();
            if (load_clicked || submitted) && !self.path_input.trim().is_empty() {
                let source = DataSource::parse(self.path_input.trim());
                self.start_load(source);
            }
            if ui
                .add_enabled(!self.session.is_loading(), egui::Button::new("Use default URL"))
                .clicked()
            {
                let url = self.session.config().source.default_url.clone();
                self.start_load(DataSource::Url(url));
            }
            if self.session.is_loading() {
                ui.spinner();
            }
        });
    }

    fn draw_range_controls(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Adjust Wc Slider Range").strong());
        ui.horizontal(|ui| {
            ui.label("Wc Min Value");
            ui.add(egui::DragValue::new(&mut self.session.pending_min).speed(1.0));
            ui.label("Wc Max Value");
            ui.add(egui::DragValue::new(&mut self.session.pending_max).speed(1.0));
            if ui.button("Update Range").clicked() {
                let _ = self.session.apply_pending_range();
            }
        });

        let range = self.session.range();
        let mut wc = self.session.cutoff();
        let changed = ui
            .add(
                egui::Slider::new(&mut wc, range.min()..=range.max())
                    .step_by(1.0)
                    .text("Cutoff Frequency (Wc)")
                    .suffix(" rad/s"),
            )
            .changed();
        if changed {
            self.session.set_cutoff(wc);
        }
    }

    fn draw_status(&self, ui: &mut egui::Ui) {
        let Some(status) = self.session.status() else {
            return;
        };
        let color = match status {
            Status::Info(_) => egui::Color32::from_rgb(100, 200, 255),
            Status::Success(_) => egui::Color32::from_rgb(100, 255, 100),
            Status::Error(_) => egui::Color32::from_rgb(255, 100, 100),
        };
        ui.label(egui::RichText::new(status.message()).color(color).strong());
    }

    fn draw_plots(&mut self, ui: &mut egui::Ui) {
        let signal = match self.session.data() {
            DataState::Loaded(signal) => signal.clone(),
            DataState::Failed(_) | DataState::NotLoaded => return,
        };

        let vout = match self.session.evaluate(&mut self.cache) {
            Ok(vout) => vout,
            Err(e) => {
                ui.label(
                    egui::RichText::new(format!("Simulation failed: {}", e))
                        .color(egui::Color32::from_rgb(255, 100, 100))
                        .strong(),
                );
                return;
            }
        };

        let plot_height = ((ui.available_height() - 40.0) / 2.0).max(120.0);
        let link_group = ui.id().with("plot_x_link");

        ui.label(
            egui::RichText::new("Input Voltage vs Time")
                .color(egui::Color32::LIGHT_GRAY)
                .small(),
        );
        let input_pts: PlotPoints = signal.points().into_iter().collect();
        Plot::new("input_plot")
            .height(plot_height)
            .y_axis_label("Input Voltage (V)")
            .y_axis_min_width(60.0)
            .link_axis(link_group, [true, false])
            .show_axes([false, true])
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("Vin", input_pts).color(egui::Color32::from_rgb(100, 200, 255)),
                );
            });

        ui.add_space(4.0);
        ui.label(
            egui::RichText::new("Output Voltage vs Time")
                .color(egui::Color32::LIGHT_GRAY)
                .small(),
        );
        let output_pts: PlotPoints = signal
            .time
            .iter()
            .zip(vout.iter())
            .map(|(&t, &v)| [t, v])
            .collect();
        Plot::new("output_plot")
            .height(plot_height)
            .x_axis_label(TIME_COLUMN)
            .y_axis_label("Output Voltage (V)")
            .y_axis_min_width(60.0)
            .link_axis(link_group, [true, false])
            .show_axes([true, true])
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("Vout", output_pts).color(egui::Color32::from_rgb(255, 200, 50)),
                );
            });
    }
}

impl eframe::App for LpfGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_updates();
        self.handle_dropped_files(ctx);
        if self.session.is_loading() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            self.draw_instructions(ui);
            ui.separator();
            self.draw_source_controls(ui);
            ui.separator();
            self.draw_range_controls(ui);
            ui.add_space(2.0);
            self.draw_status(ui);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("debug_log")
            .resizable(true)
            .default_height(120.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Debug Log")
                            .color(egui::Color32::LIGHT_GRAY)
                            .strong(),
                    );
                    if ui.small_button("Clear").clicked() {
                        self.log_lines.clear();
                    }
                    let stats = self.cache.stats();
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!(
                            "cache: {} entries, {} hits, {} misses",
                            stats.entries, stats.hits, stats.misses
                        ))
                        .small()
                        .color(egui::Color32::DARK_GRAY),
                    );
                });
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.log_lines {
                            ui.label(
                                egui::RichText::new(line)
                                    .font(egui::FontId::monospace(11.0))
                                    .color(egui::Color32::from_rgb(180, 180, 180)),
                            );
                        }
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_plots(ui);
        });
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let (tx, rx) = crossbeam_channel::unbounded::<GuiUpdate>();

    let logger = GuiLogger {
        tx: tx.clone(),
        max_level: log_level,
    };
    log::set_boxed_logger(Box::new(logger)).ok();
    log::set_max_level(log_level);

    let mut config = AppConfig::default();
    if let Some(rf) = args.rf {
        config.circuit.rf = rf;
    }
    if let Some(ri) = args.ri {
        config.circuit.ri = ri;
    }
    config.circuit.validate()?;

    if args.wc_min.is_some() || args.wc_max.is_some() {
        let defaults = config.cutoff.range;
        config.cutoff.range = CutoffRange::new(
            args.wc_min.unwrap_or(defaults.min()),
            args.wc_max.unwrap_or(defaults.max()),
        )?;
    }
    if let Some(cutoff) = args.cutoff {
        config.cutoff.initial = cutoff.as_rad_per_sec();
    }

    let mut session = Session::new(config);
    if let Some(path) = args.input {
        session.set_source(DataSource::Path(path));
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([700.0, 500.0])
            .with_title("Interactive Low-Pass Filter Simulator"),
        ..Default::default()
    };

    eframe::run_native(
        "lpfsim",
        native_options,
        Box::new(move |cc| Ok(Box::new(LpfGuiApp::new(cc, rx, tx, session)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
