use crate::config::PageGeometry;
use crate::model::{DrawOp, Page, Rgb, StyleSpec};

/// Vertical cursor over a growing list of pages.
///
/// Exactly one page is open at a time. When a line would cross the bottom
/// margin the open page is finalized and a fresh one, carrying the same
/// background fill, takes its place with the cursor at the top margin.
pub struct PageFlow<'a> {
    geometry: &'a PageGeometry,
    background: Rgb,
    done: Vec<Page>,
    current: Page,
    cursor_y: f32,
}

impl<'a> PageFlow<'a> {
    /// Opens the first page with the cursor at `first_y`.
    pub fn new(geometry: &'a PageGeometry, background: Rgb, first_y: f32) -> Self {
        Self {
            geometry,
            background,
            done: Vec::new(),
            current: blank_page(geometry, background),
            cursor_y: first_y,
        }
    }

    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    /// Height left above the bottom margin on the open page.
    pub fn remaining(&self) -> f32 {
        self.cursor_y - self.geometry.margin_bottom
    }

    pub fn page_count(&self) -> usize {
        self.done.len() + 1
    }

    /// Start a new page if a line of `line_height` would cross the bottom
    /// margin. A page that holds nothing yet is never replaced, so a line
    /// taller than the usable height cannot produce blank pages.
    pub fn ensure_room(&mut self, line_height: f32) {
        if self.cursor_y - line_height < self.geometry.margin_bottom && self.current.has_text() {
            self.new_page();
        }
    }

    /// Start a new page unless the open one is still empty.
    pub fn force_new_page(&mut self) {
        if self.current.has_text() {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        let next = blank_page(self.geometry, self.background);
        self.done.push(std::mem::replace(&mut self.current, next));
        self.cursor_y = self.geometry.height - self.geometry.margin_top;
    }

    pub fn draw_line(&mut self, x: f32, text: &str, style: &StyleSpec) {
        self.draw_spans(&[(x, text)], style);
    }

    /// Draw several runs sharing one baseline, e.g. a bullet and the first
    /// line of its item, then move the cursor down one line.
    pub fn draw_spans(&mut self, spans: &[(f32, &str)], style: &StyleSpec) {
        let advance = style.line_advance();
        self.ensure_room(advance);
        for &(x, text) in spans {
            self.current.ops.push(DrawOp::Text {
                x,
                y: self.cursor_y,
                text: text.to_string(),
                weight: style.weight,
                font_size: style.font_size,
                color: style.color,
            });
        }
        self.cursor_y -= advance;
    }

    pub fn advance(&mut self, dy: f32) {
        self.cursor_y -= dy;
    }

    /// Add a fixed-position op (logo, footer) to the open page.
    pub fn push_op(&mut self, op: DrawOp) {
        self.current.ops.push(op);
    }

    pub fn finish(mut self) -> Vec<Page> {
        self.done.push(self.current);
        self.done
    }
}

fn blank_page(geometry: &PageGeometry, background: Rgb) -> Page {
    Page {
        width: geometry.width,
        height: geometry.height,
        ops: vec![DrawOp::Rect {
            x: 0.0,
            y: 0.0,
            width: geometry.width,
            height: geometry.height,
            color: background,
        }],
    }
}
