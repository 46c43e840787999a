//! Form state and the handlers that mutate it.
//!
//! [`FormController`] owns everything the resize form remembers between
//! events. The egui view in `app` feeds it user input and background results;
//! nothing here touches a window, so every handler is testable on its own.

use crate::{
    config::Config,
    models::{convert, Dimensions, OutputFormat, Unit},
    preview::{is_image_mime, FileInfo, LoadTicket},
    submission::{FormSubmission, SubmissionStatus},
    utils::{format_for_unit, format_two_decimals, parse_field},
};

pub const NO_FILE_ALERT: &str = "Please select an image to resize.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Processing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Submission cancelled; the message must be shown as a blocking alert.
    Blocked(&'static str),
    /// A submission is already in flight.
    Busy,
    Proceed(FormSubmission),
}

#[derive(Debug)]
pub struct FormController {
    pub unit: Unit,
    previous_unit: Unit,
    pub width: String,
    pub height: String,
    pub lock_aspect: bool,
    original_ratio: Option<f64>,
    pub format: OutputFormat,
    pub quality: u8,
    file: Option<FileInfo>,
    dimensions: Option<Dimensions>,
    generation: u64,
    pub drag_over: bool,
    submit_state: SubmitState,
    pub status: String,
}

impl FormController {
    pub fn new(config: &Config) -> Self {
        Self {
            unit: config.default_unit,
            previous_unit: config.default_unit,
            width: String::new(),
            height: String::new(),
            lock_aspect: config.lock_aspect,
            original_ratio: None,
            format: config.default_format,
            quality: config.quality(),
            file: None,
            dimensions: None,
            generation: 0,
            drag_over: false,
            submit_state: SubmitState::Idle,
            status: "Ready".to_string(),
        }
    }

    #[cfg(test)]
    pub fn previous_unit(&self) -> Unit {
        self.previous_unit
    }

    pub fn original_ratio(&self) -> Option<f64> {
        self.original_ratio
    }

    pub fn file(&self) -> Option<&FileInfo> {
        self.file.as_ref()
    }

    /// Pixel size of the currently previewed image.
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submit_state
    }

    pub fn is_processing(&self) -> bool {
        self.submit_state() == SubmitState::Processing
    }

    /// Re-expresses both fields in `new_unit` when they both hold numbers.
    /// The previous unit always follows the selection.
    pub fn change_unit(&mut self, new_unit: Unit) {
        self.unit = new_unit;
        if new_unit == self.previous_unit {
            return;
        }

        if let (Some(width), Some(height)) = (parse_field(&self.width), parse_field(&self.height)) {
            self.width = format_two_decimals(convert(width, self.previous_unit, new_unit));
            self.height = format_two_decimals(convert(height, self.previous_unit, new_unit));
        } else {
            tracing::debug!(width = %self.width, height = %self.height, "unit changed without numeric fields");
        }

        self.previous_unit = new_unit;
    }

    /// The width field changed; derive height when the aspect is locked.
    pub fn on_width_edited(&mut self) {
        let Some(ratio) = self.locked_ratio() else {
            return;
        };
        if let Some(width) = parse_field(&self.width) {
            self.height = format_for_unit(width / ratio, self.unit);
        }
    }

    /// The height field changed; derive width when the aspect is locked.
    pub fn on_height_edited(&mut self) {
        let Some(ratio) = self.locked_ratio() else {
            return;
        };
        if let Some(height) = parse_field(&self.height) {
            self.width = format_for_unit(height * ratio, self.unit);
        }
    }

    fn locked_ratio(&self) -> Option<f64> {
        if self.lock_aspect {
            self.original_ratio
        } else {
            None
        }
    }

    pub fn drag_enter(&mut self) {
        self.drag_over = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_over = false;
    }

    /// Accepts a chosen or dropped file. Non-image files are ignored and
    /// return `None`; otherwise a ticket for the background load is issued and
    /// any earlier load becomes stale. Selection is refused while a
    /// submission is in flight.
    pub fn select_file(&mut self, info: FileInfo) -> Option<LoadTicket> {
        self.drag_over = false;
        if self.is_processing() {
            tracing::debug!(file = %info.name, "ignoring file selected during submission");
            return None;
        }
        if !is_image_mime(&info.mime) {
            tracing::debug!(file = %info.name, mime = %info.mime, "ignoring non-image file");
            return None;
        }

        self.generation += 1;
        self.original_ratio = None;
        self.dimensions = None;
        self.status = format!("Loading {}...", info.name);

        let ticket = LoadTicket {
            generation: self.generation,
            path: info.path.clone(),
        };
        self.file = Some(info);
        Some(ticket)
    }

    /// Applies decoded dimensions for `generation`. Returns `false` and leaves
    /// the form alone when a newer file has been selected since.
    pub fn finish_load(&mut self, generation: u64, dimensions: Dimensions) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "dropping stale preview");
            return false;
        }

        self.dimensions = Some(dimensions);
        self.original_ratio = dimensions.aspect_ratio();
        self.width = format_for_unit(
            convert(dimensions.width as f64, Unit::Pixel, self.unit),
            self.unit,
        );
        self.height = format_for_unit(
            convert(dimensions.height as f64, Unit::Pixel, self.unit),
            self.unit,
        );
        self.status = format!("Loaded {}x{} px", dimensions.width, dimensions.height);
        true
    }

    /// Records a failed load for `generation`; stale failures are dropped.
    pub fn fail_load(&mut self, generation: u64, message: &str) -> bool {
        if generation != self.generation {
            return false;
        }
        self.status = format!("Error: {}", message);
        true
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        if self.is_processing() {
            return SubmitOutcome::Busy;
        }

        let Some(file) = &self.file else {
            return SubmitOutcome::Blocked(NO_FILE_ALERT);
        };

        let submission = FormSubmission {
            file: file.path.clone(),
            width: self.width.clone(),
            height: self.height.clone(),
            unit: self.unit,
            format: self.format,
            quality: self.quality,
        };

        self.submit_state = SubmitState::Processing;
        self.status = "Processing...".to_string();
        SubmitOutcome::Proceed(submission)
    }

    /// Restores the submit control to its default state.
    pub fn reset(&mut self) {
        self.submit_state = SubmitState::Idle;
    }

    pub fn finish_submission(&mut self, status: &SubmissionStatus) {
        self.reset();
        self.status = match status {
            SubmissionStatus::Done { request, .. } => format!(
                "Queued {} ({}x{} px)",
                request.output_name, request.width, request.height
            ),
            SubmissionStatus::Failed(message) => message.clone(),
        };
    }
}
