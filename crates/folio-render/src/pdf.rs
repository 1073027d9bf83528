//! PDF rasterizer.
//!
//! Walks the page containers of the visual tree, lays out every block with
//! the core flow metrics and writes the result as a PDF 1.7 file: one A4
//! page per container, standard Helvetica fonts, filled rectangles for
//! separators and `/Link` annotations for anchors.
//!
//! ```text
//! %PDF-1.7
//! 1 0 obj  Catalog
//! 2 0 obj  Pages
//! 3 0 obj  Helvetica          (/F1)
//! 4 0 obj  Helvetica-Bold     (/F2)
//! ...      per page: link annotations, content stream, page
//! ...      Info
//! xref / trailer / %%EOF
//! ```

use crate::export::{BoxFuture, DocumentRasterizer, ExportError, ExportOptions, ExportResult};
use folio_core::layout::{layout_block, page_layout};
use folio_core::{NodeId, PageMetrics, Primitive, TextRun, VisualTree, PAGE_CLASS};
use kurbo::Rect;
use miniz_oxide::deflate::compress_to_vec_zlib;
use peniko::Color;
use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

/// CSS pixels (96 dpi) to PDF points (72 dpi).
pub const PX_TO_PT: f64 = 0.75;

const CATALOG_OBJ: usize = 1;
const PAGES_OBJ: usize = 2;
const REGULAR_FONT_OBJ: usize = 3;
const BOLD_FONT_OBJ: usize = 4;

/// Underline offset below the baseline, in font size units.
const UNDERLINE_OFFSET: f64 = 0.12;
const UNDERLINE_THICKNESS: f64 = 0.06;

/// Writes the page containers below an export root as PDF.
#[derive(Debug, Clone)]
pub struct PdfRasterizer {
    metrics: PageMetrics,
    compress: bool,
}

impl Default for PdfRasterizer {
    fn default() -> Self {
        Self {
            metrics: PageMetrics::default(),
            compress: true,
        }
    }
}

/// Allocated PDF objects; index 0 is the unused free entry.
struct PdfBuilder {
    objects: Vec<Vec<u8>>,
}

impl PdfBuilder {
    fn new() -> Self {
        // 0 = placeholder, 1 = Catalog, 2 = Pages, 3/4 = fonts
        Self {
            objects: vec![Vec::new(); BOLD_FONT_OBJ + 1],
        }
    }

    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }

    fn set(&mut self, id: usize, data: Vec<u8>) {
        self.objects[id] = data;
    }
}

/// Page geometry in points.
struct PageFrame {
    height: f64,
    scale: f64,
}

impl PageFrame {
    fn x(&self, px: f64) -> f64 {
        px * self.scale
    }

    /// Flip a CSS y coordinate into PDF user space.
    fn y(&self, px: f64) -> f64 {
        self.height - px * self.scale
    }

    /// PDF rectangle `[x0 y0 x1 y1]` of a CSS rectangle.
    fn rect(&self, rect: Rect) -> [f64; 4] {
        [self.x(rect.x0), self.y(rect.y1), self.x(rect.x1), self.y(rect.y0)]
    }
}

impl PdfRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(mut self, metrics: PageMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Toggle zlib compression of content streams.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Render every page container below `root`.
    pub fn render(&self, tree: &dyn VisualTree, root: NodeId, options: &ExportOptions) -> ExportResult<Vec<u8>> {
        let containers = tree.find_all_in(Some(root), &format!(".{}", PAGE_CLASS))?;
        if containers.is_empty() {
            return Err(ExportError::ExportFailure("nothing to export: no pages".to_string()));
        }

        let scale = PX_TO_PT * options.raster.scale;
        let frame = PageFrame {
            height: self.metrics.size.height * scale,
            scale,
        };
        let width = self.metrics.size.width * scale;

        let mut builder = PdfBuilder::new();
        builder.set(
            REGULAR_FONT_OBJ,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_vec(),
        );
        builder.set(
            BOLD_FONT_OBJ,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_vec(),
        );

        let mut page_ids = Vec::with_capacity(containers.len());
        for container in containers {
            let mut primitives = Vec::new();
            for placed in page_layout(tree, container, &self.metrics) {
                primitives.extend(layout_block(tree, &placed));
            }

            let annotations: Vec<usize> = primitives
                .iter()
                .filter_map(|primitive| match primitive {
                    Primitive::Text(run) => run.href.as_deref().map(|href| (run, href)),
                    Primitive::Fill { .. } => None,
                })
                .map(|(run, href)| builder.push(Self::link_annotation(&frame, run, href)))
                .collect();

            let content = Self::build_content_stream(&frame, &primitives);
            let content_id = builder.push(self.stream_object(content.as_bytes()));

            let mut page = format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents {} 0 R \
                 /Resources << /Font << /F1 {} 0 R /F2 {} 0 R >> >>",
                PAGES_OBJ, width, frame.height, content_id, REGULAR_FONT_OBJ, BOLD_FONT_OBJ
            );
            if !annotations.is_empty() {
                let refs: Vec<String> = annotations.iter().map(|id| format!("{} 0 R", id)).collect();
                let _ = write!(page, " /Annots [{}]", refs.join(" "));
            }
            page.push_str(" >>");
            page_ids.push(builder.push(page.into_bytes()));
        }

        builder.set(
            CATALOG_OBJ,
            format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_OBJ).into_bytes(),
        );
        let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
        builder.set(
            PAGES_OBJ,
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), page_ids.len())
                .into_bytes(),
        );

        let info = format!(
            "<< /Title ({}) /Producer (Folio) /Creator (Folio) >>",
            escape_pdf_string(&options.title())
        );
        let info_id = builder.push(info.into_bytes());

        log::debug!("Wrote {} PDF pages ({} objects)", page_ids.len(), builder.objects.len() - 1);
        Ok(Self::serialize(&builder, info_id))
    }

    fn stream_object(&self, content: &[u8]) -> Vec<u8> {
        let mut data: Vec<u8> = Vec::new();
        if self.compress {
            let compressed = compress_to_vec_zlib(content, 6);
            let _ = write!(
                data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            data.extend_from_slice(&compressed);
        } else {
            let _ = write!(data, "<< /Length {} >>\nstream\n", content.len());
            data.extend_from_slice(content);
        }
        data.extend_from_slice(b"\nendstream");
        data
    }

    fn build_content_stream(frame: &PageFrame, primitives: &[Primitive]) -> String {
        let mut stream = String::new();
        for primitive in primitives {
            match primitive {
                Primitive::Fill { rect, color } => write_fill(&mut stream, frame, *rect, *color),
                Primitive::Text(run) => write_text(&mut stream, frame, run),
            }
        }
        stream
    }

    fn link_annotation(frame: &PageFrame, run: &TextRun, href: &str) -> Vec<u8> {
        let [x0, y0, x1, y1] = frame.rect(run.bounds());
        format!(
            "<< /Type /Annot /Subtype /Link /Rect [{:.2} {:.2} {:.2} {:.2}] /Border [0 0 0] \
             /A << /S /URI /URI ({}) >> >>",
            x0,
            y0,
            x1,
            y1,
            escape_pdf_string(href)
        )
        .into_bytes()
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(builder: &PdfBuilder, info_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets = vec![0usize; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (id, data) in builder.objects.iter().enumerate().skip(1) {
            offsets[id] = output.len();
            let _ = write!(output, "{} 0 obj\n", id);
            output.extend_from_slice(data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            CATALOG_OBJ,
            info_id,
            xref_offset
        );
        output
    }
}

impl DocumentRasterizer for PdfRasterizer {
    fn render_to_document<'a>(
        &'a self,
        tree: &'a dyn VisualTree,
        root: NodeId,
        options: &'a ExportOptions,
    ) -> BoxFuture<'a, ExportResult<Vec<u8>>> {
        Box::pin(async move { self.render(tree, root, options) })
    }
}

fn set_fill_color(stream: &mut String, color: Color) {
    let rgba = color.to_rgba8();
    let _ = writeln!(
        stream,
        "{:.3} {:.3} {:.3} rg",
        rgba.r as f64 / 255.0,
        rgba.g as f64 / 255.0,
        rgba.b as f64 / 255.0
    );
}

fn write_fill(stream: &mut String, frame: &PageFrame, rect: Rect, color: Color) {
    let [x0, y0, x1, y1] = frame.rect(rect);
    set_fill_color(stream, color);
    let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} re f", x0, y0, x1 - x0, y1 - y0);
}

fn write_text(stream: &mut String, frame: &PageFrame, run: &TextRun) {
    let style = &run.style;
    let baseline = run.origin.y + style.font_size;
    let font = if style.bold { "F2" } else { "F1" };

    let _ = writeln!(stream, "BT");
    set_fill_color(stream, style.color);
    let _ = writeln!(stream, "/{} {:.2} Tf", font, style.font_size * frame.scale);
    if style.letter_spacing != 0.0 {
        let _ = writeln!(stream, "{:.2} Tc", style.letter_spacing * frame.scale);
    }
    let _ = writeln!(stream, "{:.2} {:.2} Td", frame.x(run.origin.x), frame.y(baseline));
    let _ = writeln!(stream, "({}) Tj", escape_pdf_string(&to_win_ansi(&run.text)));
    let _ = writeln!(stream, "ET");

    if style.underline {
        let top = baseline + style.font_size * UNDERLINE_OFFSET;
        let line = Rect::new(
            run.origin.x,
            top,
            run.origin.x + run.width,
            top + style.font_size * UNDERLINE_THICKNESS,
        );
        write_fill(stream, frame, line, style.color);
    }
}

/// Replace characters the standard fonts cannot encode.
fn to_win_ansi(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Escape special characters in a PDF string.
fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}
