//! Folio Render Library
//!
//! Document export for the Folio page builder. The [`DocumentRasterizer`]
//! trait abstracts the backend; [`PdfRasterizer`] writes PDF directly from
//! the visual tree.

mod export;
mod pdf;

pub use export::{
    export_document, BoxFuture, DocumentRasterizer, ExportError, ExportOptions, ExportResult,
    ExportedDocument, ImageFormat, ImageOptions, RasterOptions,
};
pub use pdf::{PdfRasterizer, PX_TO_PT};
