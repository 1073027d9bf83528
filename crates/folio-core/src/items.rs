//! Item factory: typed content fragments for blocks.

use crate::error::{FolioError, FolioResult};
use crate::tree::{NodeId, TreeResult, VisualTree};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder text of freshly created text fragments.
pub const PLACEHOLDER_TEXT: &str = "Enter Text";

/// Every block type offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    PrimaryHeading,
    SecondaryHeading,
    SubHeader,
    JobTitle,
    BodyText,
    BoldText,
    Link,
    BlockTitle,
    TitleWithBody,
    VerticalLine,
    HorizontalLine,
    ShortLine,
}

impl BlockKind {
    /// All block kinds in toolbar order.
    pub fn all() -> &'static [BlockKind] {
        &[
            BlockKind::PrimaryHeading,
            BlockKind::SecondaryHeading,
            BlockKind::SubHeader,
            BlockKind::JobTitle,
            BlockKind::BodyText,
            BlockKind::BoldText,
            BlockKind::Link,
            BlockKind::BlockTitle,
            BlockKind::TitleWithBody,
            BlockKind::VerticalLine,
            BlockKind::HorizontalLine,
            BlockKind::ShortLine,
        ]
    }

    /// Canonical type tag, stored in the block's `data-block-type` attribute.
    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::PrimaryHeading => "primaryHeading",
            BlockKind::SecondaryHeading => "secondaryHeading",
            BlockKind::SubHeader => "subHeader",
            BlockKind::JobTitle => "jobTitle",
            BlockKind::BodyText => "bodyText",
            BlockKind::BoldText => "boldText",
            BlockKind::Link => "link",
            BlockKind::BlockTitle => "blockTitle",
            BlockKind::TitleWithBody => "titleWithBody",
            BlockKind::VerticalLine => "verticalLine",
            BlockKind::HorizontalLine => "horizontalLine",
            BlockKind::ShortLine => "shortLine",
        }
    }

    /// Tag used by the legacy toolbar markup, where it differs from [`tag`](Self::tag).
    fn legacy_tag(self) -> Option<&'static str> {
        match self {
            BlockKind::PrimaryHeading => Some("h1"),
            BlockKind::SecondaryHeading => Some("h3"),
            BlockKind::BodyText => Some("text"),
            BlockKind::BoldText => Some("textBold"),
            BlockKind::TitleWithBody => Some("titleContent"),
            BlockKind::ShortLine => Some("shortVerticalLine"),
            _ => None,
        }
    }

    /// Toolbar button label.
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::PrimaryHeading => "Heading",
            BlockKind::SecondaryHeading => "Subheading",
            BlockKind::SubHeader => "Sub header",
            BlockKind::JobTitle => "Job title",
            BlockKind::BodyText => "Text",
            BlockKind::BoldText => "Bold text",
            BlockKind::Link => "Link",
            BlockKind::BlockTitle => "Section title",
            BlockKind::TitleWithBody => "Title with text",
            BlockKind::VerticalLine => "Wide line",
            BlockKind::HorizontalLine => "Tall line",
            BlockKind::ShortLine => "Short line",
        }
    }

    /// Text style profile, for kinds whose fragment is a single text element.
    pub fn text_profile(self) -> Option<TextProfile> {
        let profile = match self {
            BlockKind::PrimaryHeading => TextProfile::primary(36.0).weight(500),
            BlockKind::SecondaryHeading => TextProfile::primary(21.0).weight(500),
            BlockKind::SubHeader => TextProfile::secondary(14.0),
            BlockKind::JobTitle => TextProfile::secondary(16.0).weight(700),
            BlockKind::BodyText => TextProfile::secondary(12.0),
            BlockKind::BoldText => TextProfile::secondary(12.0).weight(600),
            BlockKind::Link => TextProfile::secondary(12.0).underline(),
            _ => return None,
        };
        Some(profile)
    }

    /// Line orientation, for separator kinds.
    pub fn line_orientation(self) -> Option<LineOrientation> {
        match self {
            BlockKind::VerticalLine => Some(LineOrientation::Vertical),
            BlockKind::HorizontalLine => Some(LineOrientation::Horizontal),
            BlockKind::ShortLine => Some(LineOrientation::Short),
            _ => None,
        }
    }

    pub fn is_link(self) -> bool {
        self == BlockKind::Link
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BlockKind {
    type Err = FolioError;

    /// Accepts canonical tags and the legacy toolbar tags.
    fn from_str(tag: &str) -> FolioResult<Self> {
        BlockKind::all()
            .iter()
            .copied()
            .find(|kind| kind.tag() == tag || kind.legacy_tag() == Some(tag))
            .ok_or_else(|| FolioError::UnknownBlockType(tag.to_string()))
    }
}

/// Text color class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTone {
    Primary,
    Secondary,
}

impl TextTone {
    pub fn class(self) -> &'static str {
        match self {
            TextTone::Primary => "text-primary",
            TextTone::Secondary => "text-secondary",
        }
    }

    pub fn color(self) -> Color {
        match self {
            TextTone::Primary => Color::from_rgba8(33, 37, 41, 255),
            TextTone::Secondary => Color::from_rgba8(84, 91, 98, 255),
        }
    }

    /// Resolve the tone from an element's classes.
    pub fn of<T: VisualTree + ?Sized>(tree: &T, node: NodeId) -> Option<Self> {
        [TextTone::Primary, TextTone::Secondary]
            .into_iter()
            .find(|tone| tree.has_class(node, tone.class()))
    }
}

/// Font size, weight and decoration of a text fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextProfile {
    pub font_size: f64,
    pub font_weight: Option<u16>,
    pub tone: TextTone,
    pub underline: bool,
}

impl TextProfile {
    fn primary(font_size: f64) -> Self {
        Self {
            font_size,
            font_weight: None,
            tone: TextTone::Primary,
            underline: false,
        }
    }

    fn secondary(font_size: f64) -> Self {
        Self {
            tone: TextTone::Secondary,
            ..Self::primary(font_size)
        }
    }

    fn weight(mut self, weight: u16) -> Self {
        self.font_weight = Some(weight);
        self
    }

    fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    fn declarations(&self) -> Vec<(String, String)> {
        let mut style = Vec::new();
        if self.underline {
            style.push(("text-decoration".to_string(), "underline".to_string()));
        }
        style.push(("font-size".to_string(), format!("{}px", self.font_size)));
        if let Some(weight) = self.font_weight {
            style.push(("font-weight".to_string(), weight.to_string()));
        }
        style
    }
}

/// Separator line orientation. Names follow the toolbar: a "vertical" line
/// separates stacked sections and is therefore wide and flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineOrientation {
    Vertical,
    Horizontal,
    Short,
}

impl LineOrientation {
    /// Line size in CSS pixels as (width, height).
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            LineOrientation::Vertical => (700.0, 2.0),
            LineOrientation::Horizontal => (2.0, 950.0),
            LineOrientation::Short => (480.0, 2.0),
        }
    }
}

/// A content fragment as a value tree, ready to be materialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fragment {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub style: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Fragment>,
}

impl Fragment {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    fn style(mut self, property: &str, value: &str) -> Self {
        match self.style.iter_mut().find(|(existing, _)| existing == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.style.push((property.to_string(), value.to_string())),
        }
        self
    }

    fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    fn child(mut self, child: Fragment) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an inline style property.
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(existing, _)| existing == property)
            .map(|(_, value)| value.as_str())
    }

    /// Build this fragment (and its children) in a visual tree.
    pub fn materialize<T: VisualTree + ?Sized>(&self, tree: &mut T) -> TreeResult<NodeId> {
        let node = tree.create_element(&self.tag);
        for class in &self.classes {
            tree.add_class(node, class)?;
        }
        for (name, value) in &self.attributes {
            tree.set_attribute(node, name, value)?;
        }
        for (property, value) in &self.style {
            tree.set_style(node, property, value)?;
        }
        if let Some(text) = &self.text {
            tree.set_text(node, text)?;
        }
        for child in &self.children {
            let child = child.materialize(tree)?;
            tree.append_child(node, child)?;
        }
        Ok(node)
    }
}

fn text_fragment(profile: TextProfile) -> Fragment {
    let fragment = Fragment::new("div")
        .class("text")
        .class(profile.tone.class())
        .attribute("contenteditable", "true")
        .text(PLACEHOLDER_TEXT);
    profile
        .declarations()
        .into_iter()
        .fold(fragment, |fragment, (property, value)| {
            fragment.style(&property, &value)
        })
}

fn link_fragment(profile: TextProfile) -> Fragment {
    Fragment {
        tag: "a".to_string(),
        ..text_fragment(profile)
    }
}

fn line_fragment(orientation: LineOrientation) -> Fragment {
    let (width, height) = orientation.dimensions();
    Fragment::new("div")
        .style("width", &format!("{}px", width))
        .style("height", &format!("{}px", height))
        .style("background-color", "#ddd")
}

/// Build the content fragment for a block kind.
pub fn create_fragment(kind: BlockKind) -> Fragment {
    if let Some(orientation) = kind.line_orientation() {
        return line_fragment(orientation);
    }
    match kind {
        BlockKind::BlockTitle => {
            let heading = create_fragment(BlockKind::SecondaryHeading).style("letter-spacing", "1.3px");
            Fragment::new("div").class("box_underline").child(heading)
        }
        BlockKind::TitleWithBody => {
            let title = create_fragment(BlockKind::BodyText)
                .style("text-transform", "uppercase")
                .style("font-weight", "600")
                .style("font-size", "14px");
            let body = create_fragment(BlockKind::BodyText);
            Fragment::new("div").child(title).child(body)
        }
        _ => match kind.text_profile() {
            Some(profile) if kind.is_link() => link_fragment(profile),
            Some(profile) => text_fragment(profile),
            None => Fragment::new("div"),
        },
    }
}
