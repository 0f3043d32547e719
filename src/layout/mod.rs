mod flow;
mod wrap;

pub use flow::PageFlow;
pub use wrap::wrap;

use crate::config::ReportConfig;
use crate::fonts::{FontSet, Measure};
use crate::model::{DocumentInfo, DrawOp, RenderBlock, ReportDocument, StyleSpec};
use crate::text::{BULLET_MARKER, extract_sections, sanitize, structure};

pub const DOCUMENT_TITLE: &str = "Value Add Report";

const LOGO_BACKING: [u8; 3] = [255, 255, 255];

/// Lays a report out onto pages. Holds no state between calls.
pub struct LayoutEngine<'a> {
    config: &'a ReportConfig,
    fonts: &'a FontSet,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a ReportConfig, fonts: &'a FontSet) -> Self {
        Self { config, fonts }
    }

    /// Salutation, introduction, then every configured section in order.
    /// `with_logo` reserves the logo slot at the top of the first page.
    pub fn layout(
        &self,
        client_name: &str,
        client_email: &str,
        report_text: &str,
        with_logo: bool,
    ) -> ReportDocument {
        let t0 = std::time::Instant::now();
        let cfg = self.config;
        let geometry = &cfg.geometry;
        let styles = &cfg.styles;

        let text = sanitize(report_text);
        let name = sanitize(client_name).trim().to_string();
        let email = sanitize(client_email).trim().to_string();
        // Titles must match the sanitized text and draw with the same glyphs.
        let titles: Vec<String> = cfg
            .section_titles
            .iter()
            .map(|t| sanitize(t).trim().to_string())
            .collect();
        let sections = extract_sections(&text, &titles);

        let first_y = if with_logo {
            geometry.height - cfg.logo.bottom_from_top - cfg.logo.gap_below
        } else {
            geometry.height - geometry.first_page_top
        };
        let mut flow = PageFlow::new(geometry, cfg.background, first_y);

        if with_logo {
            let logo = &cfg.logo;
            let x = (geometry.width - logo.width) / 2.0;
            let y = geometry.height - logo.bottom_from_top;
            flow.push_op(DrawOp::Rect {
                x: x - logo.padding,
                y: y - logo.padding,
                width: logo.width + 2.0 * logo.padding,
                height: logo.height + 2.0 * logo.padding,
                color: LOGO_BACKING,
            });
            flow.push_op(DrawOp::Logo {
                x,
                y,
                width: logo.width,
                height: logo.height,
            });
        }

        let left = geometry.margin_left;
        let width = geometry.content_width();

        self.draw_paragraph(&mut flow, &format!("Dear {name},"), &styles.salutation, left, width);
        flow.advance(cfg.salutation_gap);

        // The introduction is a single paragraph regardless of its line breaks.
        let intro = sections.first().map(|s| s.raw_content.as_str()).unwrap_or("");
        if !intro.trim().is_empty() {
            self.draw_paragraph(&mut flow, intro, &styles.intro, left, width);
            flow.advance(cfg.intro_gap);
        }

        let titled = sections.get(1..).unwrap_or_default();
        for (i, section) in titled.iter().enumerate() {
            self.draw_paragraph(&mut flow, &section.title, &styles.header, left, width);
            flow.advance(cfg.header_gap);

            let blocks = structure(&section.raw_content);
            log::debug!("Section {:?}: {} blocks", section.title, blocks.len());
            if blocks.is_empty() {
                self.draw_paragraph(&mut flow, &cfg.placeholder, &styles.body, left, width);
            }
            for (j, block) in blocks.iter().enumerate() {
                if j > 0 {
                    flow.advance(cfg.block_gap);
                }
                match block {
                    RenderBlock::Paragraph(text) => {
                        self.draw_paragraph(&mut flow, text, &styles.body, left, width);
                    }
                    RenderBlock::BulletItem(text) => self.draw_bullet(&mut flow, text),
                }
            }

            flow.advance(cfg.section_gap);
            if i + 1 < titled.len() && flow.remaining() < cfg.min_section_space {
                flow.force_new_page();
            }
        }

        if let Some(note) = cfg.footer_note.as_deref() {
            self.draw_footer(&mut flow, note);
        }

        let pages = flow.finish();
        log::info!(
            "Layout: {} sections, {} pages in {:.1}ms",
            titled.len(),
            pages.len(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );

        ReportDocument {
            info: DocumentInfo {
                title: DOCUMENT_TITLE.to_string(),
                subject: format!("Prepared for {name} <{email}>"),
            },
            pages,
        }
    }

    fn draw_paragraph(
        &self,
        flow: &mut PageFlow,
        text: &str,
        style: &StyleSpec,
        x: f32,
        max_width: f32,
    ) {
        let face = self.fonts.face(style.weight);
        for line in wrap(text, face, style.font_size, max_width) {
            flow.draw_line(x, &line, style);
        }
    }

    /// Bullet glyph at the margin; item text wrapped at the indent.
    fn draw_bullet(&self, flow: &mut PageFlow, text: &str) {
        let cfg = self.config;
        let style = &cfg.styles.body;
        let face = self.fonts.face(style.weight);
        let left = cfg.geometry.margin_left;
        let indent = left + cfg.bullet_indent;

        let mut glyph = String::from(cfg.bullet);
        if face.measure(&glyph, style.font_size).is_err() {
            glyph = BULLET_MARKER.to_string();
        }

        let lines = wrap(
            text,
            face,
            style.font_size,
            cfg.geometry.content_width() - cfg.bullet_indent,
        );
        let mut lines = lines.iter();
        let Some(first) = lines.next() else {
            return;
        };
        flow.draw_spans(&[(left, glyph.as_str()), (indent, first.as_str())], style);
        for line in lines {
            flow.draw_line(indent, line, style);
        }
    }

    /// Centered in the bottom margin of the last page.
    fn draw_footer(&self, flow: &mut PageFlow, note: &str) {
        let cfg = self.config;
        let style = &cfg.styles.footer;
        let note = sanitize(note);
        let note = note.trim();
        let width = match self.fonts.face(style.weight).measure(note, style.font_size) {
            Ok(w) => w,
            Err(e) => {
                log::warn!("Skipping footer note: {e}");
                return;
            }
        };
        flow.push_op(DrawOp::Text {
            x: (cfg.geometry.width - width) / 2.0,
            y: cfg.geometry.margin_bottom / 2.0,
            text: note.to_string(),
            weight: style.weight,
            font_size: style.font_size,
            color: style.color,
        });
    }
}
