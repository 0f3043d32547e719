/// 8-bit RGB color.
pub type Rgb = [u8; 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleSpec {
    pub font_size: f32, // points
    pub weight: FontWeight,
    pub color: Rgb,
    pub line_height: f32, // multiplier of font_size
}

impl StyleSpec {
    pub fn line_advance(&self) -> f32 {
        self.font_size * self.line_height
    }
}

/// A block of report text located by its title. The introduction has an
/// empty title.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedSection {
    pub title: String,
    pub raw_content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderBlock {
    Paragraph(String),
    BulletItem(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    /// Placement of the logo asset; the image itself is supplied at serialization.
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Text {
        x: f32,
        y: f32, // baseline
        text: String,
        weight: FontWeight,
        font_size: f32,
        color: Rgb,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub(crate) fn has_text(&self) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, DrawOp::Text { .. } | DrawOp::Logo { .. }))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub subject: String,
}

/// A finished, immutable multi-page report.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportDocument {
    pub info: DocumentInfo,
    pub pages: Vec<Page>,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
