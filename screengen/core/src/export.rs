//! Label Export
//!
//! Writes generated images and their surviving annotations to disk.
//!
//! Raw mode, for inspection:
//!
//! - `<name>.png`: the image as rendered
//! - `<name>.txt`: JSON array of `{layer, class, x, y, width, height}`
//! - `<name>_annotated.png`: the image with every label outlined in red
//!
//! Normalized mode, for training:
//!
//! - `<name>.png`: the image resized to a square side
//! - `<name>.txt`: one `"<class_id> <cx> <cy> <w> <h>"` line per label,
//!   normalized by the original canvas size
//!
//! Once per batch, `classes.json` holds the class names indexed by id.
//!
//! The writers here are blocking; the batch runner calls them from the
//! blocking pool.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotation::{Annotation, ClassTable};
use crate::config::ConfigError;
use crate::geometry::{Point, Rect, Size};
use crate::raster::theme::DEBUG_RED;
use crate::raster::{encode_png, Surface};

/// Default side of normalized output images
pub const DEFAULT_OUTPUT_SIZE: u32 = 640;

/// File name of the batch class table
pub const CLASSES_FILE: &str = "classes.json";

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while writing output files
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing a file or creating a directory failed
    #[error("Failed to write {path}: {source}")]
    Io {
        /// Target path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// PNG encoding failed
    #[error("Failed to encode {path}: {source}")]
    Encode {
        /// Target path
        path: PathBuf,
        /// Underlying encoder error
        source: image::ImageError,
    },

    /// JSON serialization failed
    #[error("Failed to serialize {path}: {source}")]
    Json {
        /// Target path
        path: PathBuf,
        /// Underlying serde error
        source: serde_json::Error,
    },

    /// An annotation's class is missing from the class table
    #[error("Class '{0}' is not in the class table")]
    UnknownClass(String),

    /// A normalized label line could not be parsed
    #[error("Malformed label line: {0}")]
    MalformedLine(String),
}

// ============================================================================
// Export Mode
// ============================================================================

/// Output encoding of a batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Original image, JSON labels and a debug overlay
    #[default]
    Raw,
    /// Resized square image and normalized label lines
    #[serde(alias = "yolo")]
    Normalized,
}

impl ExportMode {
    /// Parse `raw`, `normalized` or `yolo`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for any other value.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "normalized" | "yolo" => Ok(Self::Normalized),
            other => Err(ConfigError::Invalid {
                key: "mode",
                value: other.to_string(),
            }),
        }
    }

    /// Stable lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Normalized => "normalized",
        }
    }
}

// ============================================================================
// Raw Mode
// ============================================================================

/// Copy of `surface` with every annotation outlined and named
#[must_use]
pub fn annotated_image(surface: &Surface, annotations: &[Annotation]) -> Surface {
    let mut overlay = surface.clone();
    for annotation in annotations {
        overlay.stroke_rect(&annotation.rect, DEBUG_RED, 2);
        overlay.draw_text(
            annotation.class.as_str(),
            Point::new(annotation.rect.x + 4.0, annotation.rect.y + 4.0),
            DEBUG_RED,
            1,
        );
    }
    overlay
}

/// Write `<name>.png`, `<name>.txt` and `<name>_annotated.png`
///
/// # Errors
///
/// Returns an [`ExportError`] naming the file that could not be written.
pub fn write_raw(
    dir: &Path,
    name: &str,
    surface: &Surface,
    annotations: &[Annotation],
) -> Result<(), ExportError> {
    let image_path = dir.join(format!("{name}.png"));
    write_png(&image_path, surface)?;

    let labels_path = dir.join(format!("{name}.txt"));
    let labels = serde_json::to_string_pretty(annotations).map_err(|source| ExportError::Json {
        path: labels_path.clone(),
        source,
    })?;
    write_file(&labels_path, labels.as_bytes())?;

    let overlay_path = dir.join(format!("{name}_annotated.png"));
    write_png(&overlay_path, &annotated_image(surface, annotations))
}

// ============================================================================
// Normalized Mode
// ============================================================================

/// One normalized label line: class id, center and size relative to `canvas`
#[must_use]
pub fn normalized_line(class_id: usize, rect: &Rect, canvas: Size) -> String {
    let center = rect.center();
    format!(
        "{class_id} {} {} {} {}",
        center.x / canvas.width,
        center.y / canvas.height,
        rect.width / canvas.width,
        rect.height / canvas.height,
    )
}

/// Parse a normalized label line back into canvas coordinates
///
/// # Errors
///
/// Returns [`ExportError::MalformedLine`] unless the line holds an integer id
/// followed by exactly four numbers.
pub fn decode_normalized_line(line: &str, canvas: Size) -> Result<(usize, Rect), ExportError> {
    let malformed = || ExportError::MalformedLine(line.to_string());
    let mut fields = line.split_whitespace();

    let class_id = fields
        .next()
        .and_then(|field| field.parse::<usize>().ok())
        .ok_or_else(malformed)?;
    let numbers = fields
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| malformed())?;
    let [cx, cy, w, h] = numbers[..] else {
        return Err(malformed());
    };

    let (width, height) = (w * canvas.width, h * canvas.height);
    Ok((
        class_id,
        Rect::new(
            cx * canvas.width - width / 2.0,
            cy * canvas.height - height / 2.0,
            width,
            height,
        ),
    ))
}

/// Label file contents for one image
///
/// # Errors
///
/// Returns [`ExportError::UnknownClass`] when an annotation's class has no id.
pub fn normalized_labels(
    annotations: &[Annotation],
    canvas: Size,
    table: &ClassTable,
) -> Result<String, ExportError> {
    let mut out = String::new();
    for annotation in annotations {
        let id = table
            .id_of_class(annotation.class)
            .ok_or_else(|| ExportError::UnknownClass(annotation.class.to_string()))?;
        out.push_str(&normalized_line(id, &annotation.rect, canvas));
        out.push('\n');
    }
    Ok(out)
}

/// Write the square, resized `<name>.png`
///
/// # Errors
///
/// Returns an [`ExportError`] naming the file that could not be written.
pub fn write_normalized_image(
    dir: &Path,
    name: &str,
    surface: &Surface,
    side: u32,
) -> Result<(), ExportError> {
    let path = dir.join(format!("{name}.png"));
    let bytes = encode_png(&surface.resized(side)).map_err(|source| ExportError::Encode {
        path: path.clone(),
        source,
    })?;
    write_file(&path, &bytes)
}

/// Write `<name>.txt` with normalized label lines
///
/// # Errors
///
/// Returns an [`ExportError`] for unknown classes or write failures.
pub fn write_normalized_labels(
    dir: &Path,
    name: &str,
    annotations: &[Annotation],
    canvas: Size,
    table: &ClassTable,
) -> Result<(), ExportError> {
    let contents = normalized_labels(annotations, canvas, table)?;
    write_file(&dir.join(format!("{name}.txt")), contents.as_bytes())
}

/// Write `classes.json` into `dir`
///
/// # Errors
///
/// Returns an [`ExportError`] naming the file that could not be written.
pub fn write_class_table(dir: &Path, table: &ClassTable) -> Result<PathBuf, ExportError> {
    let path = dir.join(CLASSES_FILE);
    let json = table.to_json().map_err(|source| ExportError::Json {
        path: path.clone(),
        source,
    })?;
    write_file(&path, json.as_bytes())?;
    Ok(path)
}

// ============================================================================
// Helpers
// ============================================================================

fn write_png(path: &Path, surface: &Surface) -> Result<(), ExportError> {
    let bytes = surface.encode_png().map_err(|source| ExportError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    write_file(path, &bytes)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
