mod images;

pub use images::Logo;

use std::collections::{HashMap, HashSet};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::fonts::{FontSet, PdfFont, register_font};
use crate::model::{DrawOp, FontWeight, Page, ReportDocument, Rgb};

const LOGO_NAME: &str = "Im1";
const CREATOR: &str = concat!("value-report-pdf ", env!("CARGO_PKG_VERSION"));

fn set_fill(content: &mut Content, [r, g, b]: Rgb) {
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

fn render_page(
    page: &Page,
    fonts: &HashMap<FontWeight, PdfFont>,
    has_logo: bool,
) -> Content {
    let mut content = Content::new();
    for op in &page.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                set_fill(&mut content, *color);
                content.rect(*x, *y, *width, *height);
                content.fill_nonzero();
            }
            DrawOp::Logo {
                x,
                y,
                width,
                height,
            } => {
                if has_logo {
                    content.save_state();
                    content.transform([*width, 0.0, 0.0, *height, *x, *y]);
                    content.x_object(Name(LOGO_NAME.as_bytes()));
                    content.restore_state();
                }
            }
            DrawOp::Text {
                x,
                y,
                text,
                weight,
                font_size,
                color,
            } => {
                let Some(font) = fonts.get(weight) else {
                    continue;
                };
                set_fill(&mut content, *color);
                content
                    .begin_text()
                    .set_font(Name(font.pdf_name.as_bytes()), *font_size)
                    .next_line(*x, *y)
                    .show(Str(&font.encode(text)))
                    .end_text();
            }
        }
    }
    content
}

/// Serialize a laid-out report. `logo` supplies the image for any logo slot
/// in the document; without it the slot stays empty.
pub fn write(doc: &ReportDocument, fonts: &FontSet, logo: Option<&Logo>) -> Result<Vec<u8>, Error> {
    if doc.pages.is_empty() {
        return Err(Error::Pdf("document has no pages".to_string()));
    }

    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Phase 1: the characters each weight draws decide which fonts to embed
    // and which glyphs a subset keeps.
    let mut used_chars: HashMap<FontWeight, HashSet<char>> = HashMap::new();
    let mut wants_logo = false;
    for op in doc.pages.iter().flat_map(|p| p.ops.iter()) {
        match op {
            DrawOp::Text { text, weight, .. } => {
                used_chars.entry(*weight).or_default().extend(text.chars());
            }
            DrawOp::Logo { .. } => wants_logo = true,
            DrawOp::Rect { .. } => {}
        }
    }

    let mut pdf_fonts: HashMap<FontWeight, PdfFont> = HashMap::new();
    for (i, weight) in [FontWeight::Regular, FontWeight::Bold].into_iter().enumerate() {
        if let Some(chars) = used_chars.get(&weight) {
            let font = register_font(
                &mut pdf,
                fonts.face(weight),
                weight,
                format!("F{}", i + 1),
                &mut alloc,
                chars,
            );
            pdf_fonts.insert(weight, font);
        }
    }
    let t_fonts = t0.elapsed();

    // Phase 2: logo
    let logo_ref = match (wants_logo, logo) {
        (true, Some(logo)) => Some(images::embed_logo(&mut pdf, logo, &mut alloc)),
        (true, None) => {
            log::warn!("Document has a logo slot but no logo was supplied");
            None
        }
        (false, _) => None,
    };
    let t_images = t0.elapsed();

    // Phase 3: page content
    let n = doc.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in doc.pages.iter().enumerate() {
        let raw = render_page(page, &pdf_fonts, logo_ref.is_some()).finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let mut font_pairs: Vec<(&str, Ref)> = pdf_fonts
        .values()
        .map(|f| (f.pdf_name.as_str(), f.font_ref))
        .collect();
    font_pairs.sort_by_key(|&(name, _)| name);

    for (i, page) in doc.pages.iter().enumerate() {
        let mut pdf_page = pdf.page(page_ids[i]);
        pdf_page
            .media_box(Rect::new(0.0, 0.0, page.width, page.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = pdf_page.resources();
        {
            let mut fonts = resources.fonts();
            for (name, font_ref) in &font_pairs {
                fonts.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        if let Some(logo_ref) = logo_ref {
            resources
                .x_objects()
                .pair(Name(LOGO_NAME.as_bytes()), logo_ref);
        }
    }

    pdf.document_info(info_id)
        .title(TextStr(&doc.info.title))
        .subject(TextStr(&doc.info.subject))
        .creator(TextStr(CREATOR));

    let t_assembly = t0.elapsed();
    log::info!(
        "Render phases: font_embed={:.1}ms, images={:.1}ms, assembly={:.1}ms ({n} pages)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_images - t_fonts).as_secs_f64() * 1000.0,
        (t_assembly - t_images).as_secs_f64() * 1000.0,
    );

    Ok(pdf.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentInfo;

    #[test]
    fn empty_document_is_fatal() {
        let doc = ReportDocument {
            info: DocumentInfo::default(),
            pages: Vec::new(),
        };
        let err = write(&doc, &FontSet::builtin(), None).unwrap_err();
        assert!(matches!(err, Error::Pdf(_)));
        assert!(err.to_string().starts_with("failed to generate PDF"));
    }

    #[test]
    fn single_page_serializes() {
        let doc = ReportDocument {
            info: DocumentInfo {
                title: "T".to_string(),
                subject: "S".to_string(),
            },
            pages: vec![Page {
                width: 200.0,
                height: 100.0,
                ops: vec![DrawOp::Text {
                    x: 10.0,
                    y: 50.0,
                    text: "Hi \u{2022}".to_string(),
                    weight: FontWeight::Bold,
                    font_size: 12.0,
                    color: [0, 0, 0],
                }],
            }],
        };
        let bytes = write(&doc, &FontSet::builtin(), None).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Helvetica-Bold"));
        assert!(text.contains("/Count 1"));
    }
}
