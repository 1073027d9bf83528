//! Export adapter: turns the page root into a downloadable document.

use folio_core::{NodeId, TreeError, VisualTree};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The rasterizer could not produce a document.
    #[error("Export failed: {0}")]
    ExportFailure(String),
    #[error("Invalid export options: {0}")]
    InvalidOptions(String),
    #[error("Visual tree error: {0}")]
    Tree(#[from] TreeError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Intermediate image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    pub format: ImageFormat,
    /// Encoder quality in `0.0..=1.0`.
    pub quality: f64,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            quality: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Output scale relative to CSS pixels.
    pub scale: f64,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Options handed to the rasterizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub filename: String,
    pub image: ImageOptions,
    pub raster: RasterOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            filename: "myfile.pdf".to_string(),
            image: ImageOptions::default(),
            raster: RasterOptions::default(),
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> ExportResult<()> {
        if self.filename.trim().is_empty() {
            return Err(ExportError::InvalidOptions("filename is empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.image.quality) {
            return Err(ExportError::InvalidOptions(format!(
                "image quality {} is outside 0..=1",
                self.image.quality
            )));
        }
        if !(self.raster.scale > 0.0 && self.raster.scale.is_finite()) {
            return Err(ExportError::InvalidOptions(format!(
                "raster scale {} must be positive",
                self.raster.scale
            )));
        }
        Ok(())
    }

    /// Document title derived from the filename.
    pub fn title(&self) -> String {
        Path::new(&self.filename)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.filename.clone())
    }
}

/// Renders a subtree of a visual tree into document bytes.
pub trait DocumentRasterizer {
    fn render_to_document<'a>(
        &'a self,
        tree: &'a dyn VisualTree,
        root: NodeId,
        options: &'a ExportOptions,
    ) -> BoxFuture<'a, ExportResult<Vec<u8>>>;
}

/// A rendered document ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    /// Write the document to `path`. A directory receives the document
    /// under its own filename. Returns the written path.
    pub fn write_to(&self, path: &Path) -> ExportResult<PathBuf> {
        let target = if path.is_dir() {
            path.join(&self.filename)
        } else {
            path.to_path_buf()
        };
        std::fs::write(&target, &self.bytes)?;
        log::info!("Saved {} ({} bytes)", target.display(), self.bytes.len());
        Ok(target)
    }
}

/// Export everything under `root` as a single document.
///
/// Failures are logged and returned as [`ExportError::ExportFailure`];
/// nothing is retried.
pub async fn export_document<R: DocumentRasterizer + ?Sized>(
    rasterizer: &R,
    tree: &dyn VisualTree,
    root: NodeId,
    options: &ExportOptions,
) -> ExportResult<ExportedDocument> {
    options.validate()?;
    log::info!("Exporting {}", options.filename);

    match rasterizer.render_to_document(tree, root, options).await {
        Ok(bytes) => {
            log::info!("Exported {} ({} bytes)", options.filename, bytes.len());
            Ok(ExportedDocument {
                filename: options.filename.clone(),
                bytes,
            })
        }
        Err(err) => {
            log::error!("Export of {} failed: {}", options.filename, err);
            match err {
                ExportError::ExportFailure(_) => Err(err),
                other => Err(ExportError::ExportFailure(other.to_string())),
            }
        }
    }
}
