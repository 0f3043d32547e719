#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use value_report_pdf::config::DEFAULT_SECTION_TITLES;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Output directory for generated artifacts: tests/output/<case>/
pub fn output_dir(case: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(case);
    fs::create_dir_all(&dir).ok();
    dir
}

/// A report the way the text provider tends to return it: smart quotes,
/// bullets run together in prose, a dash list, and every default section.
pub fn sample_report() -> String {
    let mut text = String::from(
        "Jane, thank you for sharing your background. Your experience leading \u{201C}commercial\u{201D} \
         teams across three continents stands out \u{2014} here is where we see the most value.\n\n",
    );
    for (i, title) in DEFAULT_SECTION_TITLES.iter().enumerate() {
        text.push_str(title);
        text.push_str(":\n");
        match i % 3 {
            0 => text.push_str(
                "Highlights: \u{2022} Built a \u{20AC}40m partner channel \u{2022} Negotiated multi-year \
                 supply agreements \u{2022} Grew margins by 12% year on year\n",
            ),
            1 => text.push_str(
                "- Mid-market logistics providers expanding into Europe\n\
                 - Private-equity backed manufacturers preparing for exit\n\
                 - Energy transition businesses scaling commercial teams\n",
            ),
            _ => text.push_str(
                "Your track record suggests you can step into a non-executive role quickly. \
                 Boards value operators who have carried a number and built teams from scratch, \
                 and your mix of sales leadership and operational delivery is uncommon.\n",
            ),
        }
        text.push('\n');
    }
    text
}

pub fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

/// Write a small PNG with transparency into the output directory.
pub fn write_logo_png(case: &str) -> PathBuf {
    let path = output_dir(case).join("logo.png");
    let img = image::RgbaImage::from_fn(32, 32, |x, y| {
        let alpha = if (x + y) % 2 == 0 { 255 } else { 0 };
        image::Rgba([242, 204, 51, alpha])
    });
    img.save(&path).expect("write logo fixture");
    path
}

/// A plain PDF with one Helvetica text line per entry, one page per slice,
/// the way a word processor exports a resume.
pub fn resume_pdf(pages: &[&[&str]]) -> Vec<u8> {
    use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

    let mut pdf = Pdf::new();
    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let font_id = Ref::new(3);
    let page_ids: Vec<Ref> = (0..pages.len()).map(|i| Ref::new(4 + 2 * i as i32)).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(pages.len() as i32);
    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    for (lines, &page_id) in pages.iter().zip(&page_ids) {
        let content_id = Ref::new(page_id.get() + 1);
        let mut content = Content::new();
        for (i, line) in lines.iter().enumerate() {
            content
                .begin_text()
                .set_font(Name(b"F1"), 11.0)
                .next_line(72.0, 770.0 - 14.0 * i as f32)
                .show(Str(line.as_bytes()))
                .end_text();
        }
        pdf.stream(content_id, &content.finish());
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, 595.0, 842.0))
            .parent(pages_id)
            .contents(content_id);
        page.resources().fonts().pair(Name(b"F1"), font_id);
    }
    pdf.finish()
}
