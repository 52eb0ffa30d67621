//! Display List for fixed-layout documents
//!
//! Templates describe each page as a flat list of typed draw commands in
//! millimetres, origin at the top-left corner, text `y` on the baseline.
//! The page writer consumes the list without any further layout decisions,
//! so everything here is also what a preview or a test inspects.

use serde::Serialize;

use crate::models::RasterImage;

/// A4 portrait, millimetres
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// 8-bit RGB colour
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }

    /// Components scaled to 0.0..=1.0
    pub fn unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// Horizontal anchoring of a text run relative to its `x`
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Index into `DisplayList::images`
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ImageId(pub usize);

/// A single drawing operation
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// One line of text
    Text {
        x: f32,
        y: f32,
        text: String,
        /// Font size in points
        size: f32,
        color: Color,
        align: TextAlign,
    },

    /// Pre-wrapped lines, first baseline at `y`
    TextBlock {
        x: f32,
        y: f32,
        lines: Vec<String>,
        size: f32,
        line_height: f32,
        color: Color,
    },

    /// Straight stroked segment
    Rule {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        line_width: f32,
        color: Color,
    },

    /// Stroked rectangle outline
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
        color: Color,
    },

    /// Raster stamped into a box (top-left `x`,`y`)
    Image {
        image: ImageId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },

    /// Check mark glyph whose baseline-left corner is at `x`,`y`
    CheckMark {
        x: f32,
        y: f32,
        size: f32,
        color: Color,
    },
}

/// Commands for one page, in paint order
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct RenderPage {
    pub commands: Vec<DrawCommand>,
}

impl RenderPage {
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// All text on the page, one entry per line, in paint order
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for command in &self.commands {
            match command {
                DrawCommand::Text { text, .. } => out.push(text.as_str()),
                DrawCommand::TextBlock { lines, .. } => {
                    out.extend(lines.iter().map(String::as_str))
                }
                _ => {}
            }
        }
        out
    }

    /// Images referenced by this page, first use first
    pub fn image_ids(&self) -> Vec<ImageId> {
        let mut ids = Vec::new();
        for command in &self.commands {
            if let DrawCommand::Image { image, .. } = command {
                if !ids.contains(image) {
                    ids.push(*image);
                }
            }
        }
        ids
    }

    pub fn check_mark_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::CheckMark { .. }))
            .count()
    }
}

/// Top-level display list containing all rendering information
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DisplayList {
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<RenderPage>,

    /// Decoded rasters shared by all pages
    pub images: Vec<RasterImage>,
}

impl DisplayList {
    /// Empty A4 document without pages
    pub fn new() -> Self {
        Self {
            page_width: PAGE_WIDTH_MM,
            page_height: PAGE_HEIGHT_MM,
            pages: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Append a finished page
    pub fn push_page(&mut self, page: RenderPage) {
        self.pages.push(page);
    }

    /// Register a raster so commands can reference it
    pub fn add_image(&mut self, image: RasterImage) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whether any page contains exactly this text line
    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages
            .iter()
            .any(|page| page.texts().iter().any(|text| *text == needle))
    }
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}
