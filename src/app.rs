use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::{
    path::PathBuf,
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread,
};

use crate::{
    config::Config,
    controller::{FormController, SubmitOutcome},
    models::{OutputFormat, Unit},
    preview::{spawn_load, FileInfo, LoadOutcome},
    submission::{spawn_submission, ManifestSubmitter, SubmissionStatus, Submitter},
    utils::open_folder,
};

const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];
const PREVIEW_MAX: egui::Vec2 = egui::vec2(320.0, 240.0);

pub struct ResizeFormApp {
    pub form: FormController,
    pub output_dir: PathBuf,
    pub preview: Option<egui::TextureHandle>,
    pub load_sender: Sender<LoadOutcome>,
    pub load_receiver: Receiver<LoadOutcome>,
    pub submission_sender: Sender<SubmissionStatus>,
    pub submission_receiver: Receiver<SubmissionStatus>,
    pub worker_thread: Option<thread::JoinHandle<()>>,
    pub last_manifest: Option<PathBuf>,
}

impl ResizeFormApp {
    pub fn new(config: &Config) -> Self {
        let (load_sender, load_receiver) = mpsc::channel();
        let (submission_sender, submission_receiver) = mpsc::channel();

        Self {
            form: FormController::new(config),
            output_dir: config.output_dir(),
            preview: None,
            load_sender,
            load_receiver,
            submission_sender,
            submission_receiver,
            worker_thread: None,
            last_manifest: None,
        }
    }

    fn select(&mut self, info: FileInfo, ctx: &egui::Context) {
        if let Some(ticket) = self.form.select_file(info) {
            tracing::info!(path = %ticket.path.display(), generation = ticket.generation, "loading preview");
            self.preview = None;
            spawn_load(ticket, self.load_sender.clone(), Some(ctx.clone()));
        }
    }

    fn select_path(&mut self, path: PathBuf, reported_mime: &str, ctx: &egui::Context) {
        match FileInfo::inspect(&path) {
            Ok(mut info) => {
                if !reported_mime.is_empty() {
                    info.mime = reported_mime.to_string();
                }
                self.select(info, ctx);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read file");
                self.form.status = format!("Error: {}", e);
            }
        }
    }

    fn browse_for_image(&mut self, ctx: &egui::Context) {
        if let Some(path) = FileDialog::new()
            .add_filter("Image", &IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.select_path(path, "", ctx);
        }
    }

    fn submit(&mut self, ctx: &egui::Context) {
        match self.form.submit() {
            SubmitOutcome::Blocked(message) => {
                MessageDialog::new()
                    .set_level(MessageLevel::Warning)
                    .set_title("Image Resizer")
                    .set_description(message)
                    .set_buttons(MessageButtons::Ok)
                    .show();
            }
            SubmitOutcome::Busy => {}
            SubmitOutcome::Proceed(submission) => {
                let submitter: Arc<dyn Submitter> =
                    Arc::new(ManifestSubmitter::new(self.output_dir.clone()));
                self.worker_thread = Some(spawn_submission(
                    submission,
                    submitter,
                    self.submission_sender.clone(),
                    Some(ctx.clone()),
                ));
            }
        }
    }

    fn drain_background(&mut self, ctx: &egui::Context) {
        while let Ok(outcome) = self.load_receiver.try_recv() {
            match outcome.result {
                Ok(loaded) => {
                    if self.form.finish_load(outcome.generation, loaded.dimensions) {
                        self.preview = Some(ctx.load_texture(
                            "preview",
                            loaded.preview,
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                }
                Err(e) => {
                    self.form.fail_load(outcome.generation, &e.to_string());
                }
            }
        }

        while let Ok(status) = self.submission_receiver.try_recv() {
            if let SubmissionStatus::Done { manifest, .. } = &status {
                self.last_manifest = Some(manifest.clone());
            }
            self.form.finish_submission(&status);
        }

        if let Some(handle) = self.worker_thread.take() {
            if !handle.is_finished() {
                self.worker_thread = Some(handle);
            }
        }
    }

    fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        if hovering && !self.form.drag_over {
            self.form.drag_enter();
        } else if !hovering && self.form.drag_over {
            self.form.drag_leave();
        }

        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(file) = dropped.into_iter().find(|f| f.path.is_some()) {
            if let Some(path) = file.path {
                self.select_path(path, &file.mime, ctx);
            }
        }
    }

    fn upload_area(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let stroke = if self.form.drag_over {
            egui::Stroke::new(2.0, ui.visuals().selection.stroke.color)
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke
        };

        egui::Frame::group(ui.style())
            .stroke(stroke)
            .inner_margin(egui::Margin::symmetric(12.0, 12.0))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.horizontal(|ui| {
                    let browse = egui::Button::new("📂 Browse...");
                    if ui.add_enabled(!self.form.is_processing(), browse).clicked() {
                        self.browse_for_image(ctx);
                    }
                    ui.label("or drop an image here");
                });

                if let Some(info) = self.form.file() {
                    ui.add_space(6.0);
                    ui.strong(&info.name);
                    ui.label(info.details());
                }
                if let Some(size) = self.form.dimensions() {
                    ui.label(format!("Original: {}x{} px", size.width, size.height));
                }

                if let Some(texture) = &self.preview {
                    ui.add_space(6.0);
                    ui.add(egui::Image::new(texture).max_size(PREVIEW_MAX));
                }
            });
    }

    fn dimension_fields(&mut self, ui: &mut egui::Ui) {
        let mut unit = self.form.unit;
        ui.horizontal(|ui| {
            ui.label("Unit:");
            egui::ComboBox::from_id_source("unit_combo")
                .selected_text(unit.as_str())
                .show_ui(ui, |ui| {
                    for option in Unit::ALL {
                        ui.selectable_value(&mut unit, option, option.as_str());
                    }
                });
        });
        if unit != self.form.unit {
            self.form.change_unit(unit);
        }

        ui.horizontal(|ui| {
            ui.label("Width:");
            let width = egui::TextEdit::singleline(&mut self.form.width).desired_width(90.0);
            if ui.add(width).changed() {
                self.form.on_width_edited();
            }

            ui.label("Height:");
            let height = egui::TextEdit::singleline(&mut self.form.height).desired_width(90.0);
            if ui.add(height).changed() {
                self.form.on_height_edited();
            }

            ui.label(self.form.unit.symbol());
        });

        ui.horizontal(|ui| {
            ui.checkbox(&mut self.form.lock_aspect, "Lock aspect ratio");
            if let Some(ratio) = self.form.original_ratio() {
                ui.weak(format!("{:.3}:1", ratio));
            }
        });
    }

    fn output_fields(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Format:");
            egui::ComboBox::from_id_source("format_combo")
                .selected_text(self.form.format.as_str())
                .show_ui(ui, |ui| {
                    for option in OutputFormat::ALL {
                        ui.selectable_value(&mut self.form.format, option, option.as_str());
                    }
                });
        });

        ui.horizontal(|ui| {
            ui.label("Quality:");
            ui.add_enabled(
                self.form.format.uses_quality(),
                egui::Slider::new(&mut self.form.quality, 1..=100),
            );
        });

        ui.horizontal(|ui| {
            ui.label("Output Directory:");
            let browse = egui::Button::new("📂 Browse...");
            if ui.add_enabled(!self.form.is_processing(), browse).clicked() {
                if let Some(path) = FileDialog::new().pick_folder() {
                    self.output_dir = path;
                }
            }
            ui.label(self.output_dir.display().to_string());
        });
    }
}

impl eframe::App for ResizeFormApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_background(ctx);
        self.handle_drag_and_drop(ctx);

        if self.form.is_processing() {
            ctx.request_repaint();
        }

        egui::CentralPanel::default()
            .frame(egui::Frame {
                inner_margin: egui::Margin::symmetric(20.0, 20.0),
                fill: ctx.style().visuals.panel_fill,
                ..Default::default()
            })
            .show(ctx, |ui| {
                self.upload_area(ui, ctx);

                ui.separator();
                self.dimension_fields(ui);

                ui.separator();
                self.output_fields(ui);

                ui.separator();
                ui.label(&self.form.status);

                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    if self.form.is_processing() {
                        ui.add_enabled(false, egui::Button::new("⏳ Processing..."));
                        ui.add(egui::Spinner::new());
                    } else if ui.button("▶ Resize Image").clicked() {
                        self.submit(ctx);
                    }

                    let open_enabled = self.last_manifest.is_some() && self.output_dir.exists();
                    if ui
                        .add_enabled(open_enabled, egui::Button::new("📂 Open Output Folder"))
                        .clicked()
                    {
                        open_folder(&self.output_dir);
                    }
                });
            });
    }
}
