//! Flow metrics for pages and blocks.
//!
//! Blocks are laid out in normal vertical flow inside their page and then
//! displaced by their `translate` offset. Text is measured with fixed
//! approximations (average glyph advance, line height) since no font engine
//! is involved at this level.

use crate::items::TextTone;
use crate::tree::{NodeId, VisualTree};
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.2;
/// Average glyph advance as a multiple of the font size.
pub const GLYPH_ADVANCE: f64 = 0.5;
/// Browser default font size in CSS pixels.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Page canvas geometry in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMetrics {
    /// A4 at 96 dpi by default.
    pub size: Size,
    /// Inner padding before the first block.
    pub padding: f64,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            size: Size::new(794.0, 1123.0),
            padding: 38.0,
        }
    }
}

impl PageMetrics {
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size)
    }
}

/// Parse a CSS pixel length (`"12px"`, `"12"`).
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    value
        .strip_suffix("px")
        .unwrap_or(value)
        .trim()
        .parse()
        .ok()
}

/// Parse a `translate(<x>px, <y>px)` transform.
pub fn parse_translate(value: &str) -> Option<Vec2> {
    let inner = value
        .trim()
        .strip_prefix("translate(")?
        .strip_suffix(')')?;
    let (x, y) = inner.split_once(',')?;
    Some(Vec2::new(parse_px(x)?, parse_px(y)?))
}

/// Format an offset as a `translate` transform.
pub fn format_translate(offset: Vec2) -> String {
    format!("translate({}px, {}px)", offset.x, offset.y)
}

/// Parse `#rgb` / `#rrggbb` colors.
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#').filter(|hex| hex.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let (r, g, b) = match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            (expand(0)?, expand(1)?, expand(2)?)
        }
        6 => (channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?),
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, 255))
}

/// Computed text appearance of a text element.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub font_size: f64,
    pub bold: bool,
    pub underline: bool,
    pub uppercase: bool,
    pub letter_spacing: f64,
    pub color: Color,
}

impl TextStyle {
    /// Resolve the style of a text node from its inline style and classes.
    pub fn of<T: VisualTree + ?Sized>(tree: &T, node: NodeId) -> Self {
        let font_size = tree
            .style(node, "font-size")
            .and_then(parse_px)
            .unwrap_or(DEFAULT_FONT_SIZE);
        let bold = match tree.style(node, "font-weight").map(str::trim) {
            Some("bold" | "bolder") => true,
            Some(weight) => weight.parse::<u16>().is_ok_and(|w| w >= 600),
            None => false,
        };
        Self {
            font_size,
            bold,
            underline: tree
                .style(node, "text-decoration")
                .is_some_and(|d| d.contains("underline")),
            uppercase: tree.style(node, "text-transform") == Some("uppercase"),
            letter_spacing: tree
                .style(node, "letter-spacing")
                .and_then(parse_px)
                .unwrap_or(0.0),
            color: TextTone::of(tree, node)
                .unwrap_or(TextTone::Primary)
                .color(),
        }
    }

    /// Height of one line of text.
    pub fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT
    }

    /// Approximate rendered width of a string.
    pub fn measure(&self, text: &str) -> f64 {
        let chars = text.chars().count() as f64;
        chars * (self.font_size * GLYPH_ADVANCE + self.letter_spacing)
    }
}

/// A positioned text line.
#[derive(Debug, Clone)]
pub struct TextRun {
    /// Top-left corner of the line box.
    pub origin: Point,
    pub text: String,
    pub style: TextStyle,
    pub width: f64,
    /// Destination of an anchor element.
    pub href: Option<String>,
}

impl TextRun {
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, Size::new(self.width, self.style.line_height()))
    }
}

/// Drawing primitive produced by block layout, in page pixel coordinates.
#[derive(Debug, Clone)]
pub enum Primitive {
    Text(TextRun),
    Fill { rect: Rect, color: Color },
}

/// Placement of a block within its page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockBox {
    pub node: NodeId,
    /// Position in normal flow, before the offset is applied.
    pub flow_origin: Point,
    /// Displacement from the block's `translate` transform.
    pub offset: Vec2,
    pub size: Size,
}

impl BlockBox {
    /// Rendered top-left corner.
    pub fn origin(&self) -> Point {
        self.flow_origin + self.offset
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size)
    }

    /// Range of offsets that keeps the whole block inside `page`.
    pub fn offset_bounds(&self, page: &PageMetrics) -> Rect {
        let min = Point::ORIGIN - self.flow_origin.to_vec2();
        let max_x = (page.size.width - self.size.width - self.flow_origin.x).max(min.x);
        let max_y = (page.size.height - self.size.height - self.flow_origin.y).max(min.y);
        Rect::new(min.x, min.y, max_x, max_y)
    }
}

/// Place a node's content at `origin`, appending primitives to `out`.
/// Returns the size the node occupies in flow.
fn place<T: VisualTree + ?Sized>(
    tree: &T,
    node: NodeId,
    origin: Point,
    out: &mut Vec<Primitive>,
) -> Size {
    let width = tree.style(node, "width").and_then(parse_px);
    let height = tree.style(node, "height").and_then(parse_px);
    if let (Some(width), Some(height)) = (width, height) {
        if let Some(color) = tree.style(node, "background-color").and_then(parse_hex_color) {
            out.push(Primitive::Fill {
                rect: Rect::from_origin_size(origin, Size::new(width, height)),
                color,
            });
        }
        return Size::new(width, height);
    }

    if let Some(text) = tree.text(node) {
        let style = TextStyle::of(tree, node);
        let text = if style.uppercase {
            text.to_uppercase()
        } else {
            text.to_string()
        };
        let run = TextRun {
            origin,
            width: style.measure(&text),
            href: (tree.tag(node) == Some("a"))
                .then(|| tree.attribute(node, "href"))
                .flatten(),
            text,
            style,
        };
        let size = Size::new(run.width, style.line_height());
        out.push(Primitive::Text(run));
        return size;
    }

    let mut size = Size::ZERO;
    for &child in tree.children(node) {
        let child_size = place(tree, child, origin + Vec2::new(0.0, size.height), out);
        size.width = size.width.max(child_size.width);
        size.height += child_size.height;
    }
    size
}

/// Measure the flow size of a node.
pub fn measure<T: VisualTree + ?Sized>(tree: &T, node: NodeId) -> Size {
    place(tree, node, Point::ORIGIN, &mut Vec::new())
}

/// Lay out every block of a page container.
pub fn page_layout<T: VisualTree + ?Sized>(
    tree: &T,
    page: NodeId,
    metrics: &PageMetrics,
) -> Vec<BlockBox> {
    let mut cursor = Point::new(metrics.padding, metrics.padding);
    let mut boxes = Vec::new();
    for &node in tree.children(page) {
        if !tree.has_class(node, "block") {
            continue;
        }
        let size = measure(tree, node);
        let offset = tree
            .style(node, "transform")
            .and_then(parse_translate)
            .unwrap_or(Vec2::ZERO);
        boxes.push(BlockBox {
            node,
            flow_origin: cursor,
            offset,
            size,
        });
        cursor.y += size.height;
    }
    boxes
}

/// Drawing primitives of one block at its rendered position.
pub fn layout_block<T: VisualTree + ?Sized>(tree: &T, block: &BlockBox) -> Vec<Primitive> {
    let mut out = Vec::new();
    place(tree, block.node, block.origin(), &mut out);
    out
}
