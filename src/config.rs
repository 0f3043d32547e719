use crate::model::{FontWeight, Rgb, StyleSpec};

pub const DEFAULT_SECTION_TITLES: [&str; 8] = [
    "Key Commercial Strengths",
    "Potential Markets & Sectors to Target",
    "Ideal Company Profile",
    "Where You Can Add Value",
    "Example Outreach Message",
    "LinkedIn Profile Feedback",
    "Your Potential Impact",
    "Final Thoughts",
];

pub const PLACEHOLDER_TEXT: &str = "Content for this section will be added.";

const DARK_GREEN: Rgb = [13, 64, 38];
const GOLD: Rgb = [242, 204, 51];
const WHITE: Rgb = [255, 255, 255];
const GRAY: Rgb = [128, 128, 128];

#[derive(Clone, Debug)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Distance from the top edge to the first baseline on page one when there is no logo.
    pub first_page_top: f32,
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Vertical space between the top and bottom margins.
    pub fn usable_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4
        Self {
            width: 595.28,
            height: 841.89,
            margin_top: 60.0,
            margin_bottom: 60.0,
            margin_left: 60.0,
            margin_right: 60.0,
            first_page_top: 100.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogoPlacement {
    pub width: f32,
    pub height: f32,
    /// Distance from the top edge of the page to the bottom edge of the logo.
    pub bottom_from_top: f32,
    /// White backing box around the logo.
    pub padding: f32,
    pub gap_below: f32,
}

impl Default for LogoPlacement {
    fn default() -> Self {
        Self {
            width: 150.0,
            height: 150.0,
            bottom_from_top: 220.0,
            padding: 25.0,
            gap_below: 50.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReportStyles {
    pub salutation: StyleSpec,
    pub intro: StyleSpec,
    pub header: StyleSpec,
    pub body: StyleSpec,
    pub footer: StyleSpec,
}

impl ReportStyles {
    /// Recolors the salutation and section headers.
    pub fn with_accent(mut self, accent: Rgb) -> Self {
        self.salutation.color = accent;
        self.header.color = accent;
        self
    }
}

impl Default for ReportStyles {
    fn default() -> Self {
        Self {
            salutation: StyleSpec {
                font_size: 16.0,
                weight: FontWeight::Bold,
                color: GOLD,
                line_height: 1.5,
            },
            intro: StyleSpec {
                font_size: 11.0,
                weight: FontWeight::Regular,
                color: WHITE,
                line_height: 1.2,
            },
            header: StyleSpec {
                font_size: 14.0,
                weight: FontWeight::Bold,
                color: GOLD,
                line_height: 1.3,
            },
            body: StyleSpec {
                font_size: 11.0,
                weight: FontWeight::Regular,
                color: WHITE,
                line_height: 1.3,
            },
            footer: StyleSpec {
                font_size: 10.0,
                weight: FontWeight::Regular,
                color: GRAY,
                line_height: 1.2,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub geometry: PageGeometry,
    pub logo: LogoPlacement,
    pub background: Rgb,
    pub styles: ReportStyles,
    pub section_titles: Vec<String>,
    pub salutation_gap: f32,
    pub intro_gap: f32,
    pub header_gap: f32,
    pub block_gap: f32,
    pub section_gap: f32,
    /// Start the next section on a fresh page when less than this much usable height remains.
    pub min_section_space: f32,
    pub bullet: char,
    pub bullet_indent: f32,
    pub placeholder: String,
    pub footer_note: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            logo: LogoPlacement::default(),
            background: DARK_GREEN,
            styles: ReportStyles::default(),
            section_titles: DEFAULT_SECTION_TITLES.iter().map(|t| t.to_string()).collect(),
            salutation_gap: 20.0,
            intro_gap: 30.0,
            header_gap: 20.0,
            block_gap: 4.0,
            section_gap: 40.0,
            min_section_space: 140.0,
            bullet: '\u{2022}',
            bullet_indent: 15.0,
            placeholder: PLACEHOLDER_TEXT.to_string(),
            footer_note: None,
        }
    }
}

impl ReportConfig {
    pub fn with_section_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.section_titles = titles.into_iter().map(Into::into).collect();
        self
    }
}

/// Parse a 6-digit hex color such as `0D4026` (a leading `#` is accepted).
pub fn parse_hex_color(val: &str) -> Option<Rgb> {
    let val = val.strip_prefix('#').unwrap_or(val);
    if val.len() != 6 || !val.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&val[0..2], 16).ok()?;
    let g = u8::from_str_radix(&val[2..4], 16).ok()?;
    let b = u8::from_str_radix(&val[4..6], 16).ok()?;
    Some([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("0D4026"), Some([13, 64, 38]));
        assert_eq!(parse_hex_color("#f2cc33"), Some([242, 204, 51]));
        assert_eq!(parse_hex_color("auto"), None);
        assert_eq!(parse_hex_color("12345"), None);
        assert_eq!(parse_hex_color("zz0000"), None);
    }

    #[test]
    fn default_geometry_is_a4() {
        let g = PageGeometry::default();
        assert!((g.content_width() - 475.28).abs() < 0.01);
        assert!((g.usable_height() - 721.89).abs() < 0.01);
    }
}
