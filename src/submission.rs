use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{mpsc::Sender, Arc},
    thread,
};

use crate::{
    error::{Error, Result},
    models::{convert, OutputFormat, Unit},
    utils::parse_field,
};

/// The form as posted: raw field text plus the chosen file.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmission {
    pub file: PathBuf,
    pub width: String,
    pub height: String,
    pub unit: Unit,
    pub format: OutputFormat,
    pub quality: u8,
}

/// A resize job in pixels, ready for an external resizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeRequest {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub quality: u8,
    pub output_name: String,
}

impl ResizeRequest {
    pub fn from_submission(form: &FormSubmission) -> Result<Self> {
        let width = field_to_pixels("width", &form.width, form.unit)?;
        let height = field_to_pixels("height", &form.height, form.unit)?;

        Ok(Self {
            source: form.file.clone(),
            width,
            height,
            format: form.format,
            quality: form.quality.clamp(1, 100),
            output_name: format!("{}.{}", uuid::Uuid::new_v4(), form.format.extension()),
        })
    }
}

/// Parses a posted dimension and truncates it to whole pixels.
fn field_to_pixels(field: &'static str, text: &str, unit: Unit) -> Result<u32> {
    let invalid = || Error::InvalidDimension {
        field,
        value: text.to_string(),
    };
    let value = parse_field(text).ok_or_else(invalid)?;
    let pixels = convert(value, unit, Unit::Pixel).trunc();
    if pixels < 1.0 || pixels > u32::MAX as f64 {
        return Err(invalid());
    }
    Ok(pixels as u32)
}

pub trait Submitter: Send + Sync {
    /// Hands the job off and returns where it was recorded.
    fn submit(&self, request: &ResizeRequest) -> Result<PathBuf>;
}

/// Writes each request as `<output stem>.toml` into a queue directory.
pub struct ManifestSubmitter {
    pub output_dir: PathBuf,
}

impl ManifestSubmitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn manifest_path(&self, request: &ResizeRequest) -> PathBuf {
        let stem = Path::new(&request.output_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| request.output_name.clone());
        self.output_dir.join(format!("{}.toml", stem))
    }
}

impl Submitter for ManifestSubmitter {
    fn submit(&self, request: &ResizeRequest) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let content = toml::to_string_pretty(request)?;

        let mut file = tempfile::NamedTempFile::new_in(&self.output_dir)?;
        file.write_all(content.as_bytes())?;

        let path = self.manifest_path(request);
        file.persist(&path).map_err(|e| Error::Persist {
            path: path.clone(),
            source: e.error,
        })?;
        Ok(path)
    }
}

#[derive(Debug)]
pub enum SubmissionStatus {
    Done {
        request: ResizeRequest,
        manifest: PathBuf,
    },
    Failed(String),
}

pub fn run_submission(form: &FormSubmission, submitter: &dyn Submitter) -> Result<SubmissionStatus> {
    let request = ResizeRequest::from_submission(form)?;
    let manifest = submitter.submit(&request)?;
    tracing::info!(
        source = %request.source.display(),
        width = request.width,
        height = request.height,
        format = request.format.as_str(),
        manifest = %manifest.display(),
        "resize job submitted"
    );
    Ok(SubmissionStatus::Done { request, manifest })
}

pub fn spawn_submission(
    form: FormSubmission,
    submitter: Arc<dyn Submitter>,
    sender: Sender<SubmissionStatus>,
    repaint: Option<egui::Context>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let status = run_submission(&form, submitter.as_ref()).unwrap_or_else(|e| {
            tracing::error!(error = %e, "submission failed");
            SubmissionStatus::Failed(format!("Error: {}", e))
        });
        let _ = sender.send(status);
        if let Some(ctx) = repaint {
            ctx.request_repaint();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{mpsc, Mutex};
    use tempfile::tempdir;

    fn form(width: &str, height: &str, unit: Unit) -> FormSubmission {
        FormSubmission {
            file: PathBuf::from("/photos/cat.png"),
            width: width.to_string(),
            height: height.to_string(),
            unit,
            format: OutputFormat::Png,
            quality: 85,
        }
    }

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<ResizeRequest>>,
    }

    impl Submitter for Recording {
        fn submit(&self, request: &ResizeRequest) -> Result<PathBuf> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(PathBuf::from("recorded"))
        }
    }

    #[test]
    fn physical_units_become_truncated_pixels() {
        let request = ResizeRequest::from_submission(&form("1.5", "2.54", Unit::Centimeter)).unwrap();
        // 1.5 cm = 56.69 px, 2.54 cm = 96 px
        assert_eq!((request.width, request.height), (56, 96));

        let request = ResizeRequest::from_submission(&form("2", "0.5", Unit::Inch)).unwrap();
        assert_eq!((request.width, request.height), (192, 48));
    }

    #[test]
    fn output_name_uses_format_extension() {
        let request = ResizeRequest::from_submission(&form("10", "10", Unit::Pixel)).unwrap();
        assert!(request.output_name.ends_with(".png"));
        assert_eq!(request.output_name.len(), 36 + ".png".len());
    }

    #[test]
    fn unparsable_or_empty_dimensions_are_rejected() {
        let err = ResizeRequest::from_submission(&form("abc", "10", Unit::Pixel)).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { field: "width", .. }));

        let err = ResizeRequest::from_submission(&form("10", "0.4", Unit::Pixel)).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { field: "height", .. }));
    }

    #[test]
    fn manifest_is_written_and_readable() {
        let dir = tempdir().unwrap();
        let submitter = ManifestSubmitter::new(dir.path().join("queue"));
        let request = ResizeRequest::from_submission(&form("640", "480", Unit::Pixel)).unwrap();

        let path = submitter.submit(&request).unwrap();
        assert_eq!(path, submitter.manifest_path(&request));

        let written: ResizeRequest = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, request);

        let leftovers = fs::read_dir(dir.path().join("queue")).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn run_submission_hands_request_to_submitter() {
        let recorder = Recording::default();
        let status = run_submission(&form("300", "200", Unit::Pixel), &recorder).unwrap();

        assert!(matches!(status, SubmissionStatus::Done { .. }));
        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!((seen[0].width, seen[0].height), (300, 200));
    }

    #[test]
    fn worker_reports_failures() {
        let (sender, receiver) = mpsc::channel();
        spawn_submission(
            form("", "", Unit::Pixel),
            Arc::new(Recording::default()),
            sender,
            None,
        )
        .join()
        .unwrap();

        match receiver.recv().unwrap() {
            SubmissionStatus::Failed(message) => assert!(message.starts_with("Error: invalid width")),
            other => panic!("unexpected status: {:?}", other),
        }
    }
}
