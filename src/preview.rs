use image::{GenericImageView, ImageFormat};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc::Sender,
    thread,
};

use crate::{error::Result, models::Dimensions, utils::format_file_size};

/// Longest edge of the preview texture. The reported dimensions are always
/// those of the full image.
const PREVIEW_EDGE: u32 = 512;

#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl FileInfo {
    pub fn inspect(path: &Path) -> Result<Self> {
        let size = fs::metadata(path)?.len();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_for_path(path)
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size,
            mime,
        })
    }

    pub fn details(&self) -> String {
        format!("{} | {}", format_file_size(self.size), self.mime)
    }
}

pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let mime = match ImageFormat::from_path(path).ok()? {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Ico => "image/x-icon",
        ImageFormat::Avif => "image/avif",
        ImageFormat::Pnm => "image/x-portable-anymap",
        ImageFormat::Tga => "image/x-tga",
        ImageFormat::Qoi => "image/x-qoi",
        ImageFormat::Hdr => "image/vnd.radiance",
        ImageFormat::OpenExr => "image/x-exr",
        ImageFormat::Farbfeld => "image/x-farbfeld",
        ImageFormat::Dds => "image/vnd-ms.dds",
        _ => return None,
    };
    Some(mime)
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// A pending load, tagged with the selection it was started for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub path: PathBuf,
}

pub struct LoadedImage {
    pub dimensions: Dimensions,
    pub preview: egui::ColorImage,
}

pub struct LoadOutcome {
    pub generation: u64,
    pub result: Result<LoadedImage>,
}

pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let bytes = fs::read(path)?;
    let image = image::load_from_memory(&bytes)?;
    let (width, height) = image.dimensions();

    let thumb = if width > PREVIEW_EDGE || height > PREVIEW_EDGE {
        image.thumbnail(PREVIEW_EDGE, PREVIEW_EDGE).to_rgba8()
    } else {
        image.to_rgba8()
    };
    let preview = egui::ColorImage::from_rgba_unmultiplied(
        [thumb.width() as usize, thumb.height() as usize],
        thumb.as_raw(),
    );

    Ok(LoadedImage {
        dimensions: Dimensions::new(width, height),
        preview,
    })
}

/// Reads and decodes `ticket.path` off the UI thread. The outcome is sent even
/// on failure; `repaint` is woken so the UI drains it promptly.
pub fn spawn_load(
    ticket: LoadTicket,
    sender: Sender<LoadOutcome>,
    repaint: Option<egui::Context>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let result = load_image(&ticket.path);
        if let Err(e) = &result {
            tracing::warn!(path = %ticket.path.display(), error = %e, "preview load failed");
        }
        let _ = sender.send(LoadOutcome {
            generation: ticket.generation,
            result,
        });
        if let Some(ctx) = repaint {
            ctx.request_repaint();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use tempfile::tempdir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        image::RgbImage::new(width, height)
            .save(&path)
            .expect("failed to write test image");
        path
    }

    #[test]
    fn mime_is_sniffed_from_extension() {
        assert_eq!(mime_for_path(Path::new("a/photo.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("scan.png")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn image_mime_is_prefix_checked() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("image/svg+xml"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime(""));
    }

    #[test]
    fn inspect_reads_name_size_and_type() {
        let dir = tempdir().unwrap();
        let path = write_png(dir.path(), "cat.png", 8, 4);

        let info = FileInfo::inspect(&path).unwrap();
        assert_eq!(info.name, "cat.png");
        assert_eq!(info.mime, "image/png");
        assert_eq!(info.size, fs::metadata(&path).unwrap().len());
        assert!(info.details().ends_with("| image/png"));
    }

    #[test]
    fn inspect_non_image_reports_octet_stream() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("readme.txt");
        fs::write(&path, "hello").unwrap();

        let info = FileInfo::inspect(&path).unwrap();
        assert_eq!(info.size, 5);
        assert!(!is_image_mime(&info.mime));
    }

    #[test]
    fn load_reports_full_dimensions_and_small_preview() {
        let dir = tempdir().unwrap();
        let path = write_png(dir.path(), "wide.png", 1024, 256);

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.dimensions, Dimensions::new(1024, 256));
        assert_eq!(loaded.preview.size, [512, 128]);
    }

    #[test]
    fn load_of_garbage_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        assert!(load_image(&path).is_err());
    }

    #[test]
    fn spawned_load_carries_its_generation() {
        let dir = tempdir().unwrap();
        let path = write_png(dir.path(), "small.png", 3, 2);
        let (sender, receiver) = mpsc::channel();

        spawn_load(
            LoadTicket {
                generation: 7,
                path,
            },
            sender,
            None,
        )
        .join()
        .unwrap();

        let outcome = receiver.recv().unwrap();
        assert_eq!(outcome.generation, 7);
        assert_eq!(outcome.result.unwrap().dimensions, Dimensions::new(3, 2));
    }
}
