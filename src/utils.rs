use std::{path::Path, process::Command};

use crate::models::Unit;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

pub fn open_folder(path: &Path) {
    let command = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    if let Err(e) = Command::new(command).arg(path).spawn() {
        tracing::warn!(path = %path.display(), error = %e, "failed to open folder");
    }
}

/// Reads a dimension field. Blank, non-numeric and non-finite input yield `None`.
pub fn parse_field(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub fn format_two_decimals(value: f64) -> String {
    format!("{:.2}", value)
}

/// Formats a derived dimension: whole pixels, or two decimals for physical units.
pub fn format_for_unit(value: f64, unit: Unit) -> String {
    match unit {
        Unit::Pixel => format!("{:.0}", value.round()),
        Unit::Inch | Unit::Centimeter => format_two_decimals(value),
    }
}

/// Human-readable size at 1024 scale, e.g. `0 Bytes`, `1 KB`, `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut index = 0;
    while value >= 1024.0 && index < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        index += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[index])
}
