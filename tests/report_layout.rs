mod common;

use rayon::prelude::*;

use value_report_pdf::config::{DEFAULT_SECTION_TITLES, PLACEHOLDER_TEXT};
use value_report_pdf::model::{DrawOp, RenderBlock};
use value_report_pdf::text::{extract_sections, sanitize, structure};
use value_report_pdf::{FontSet, LayoutEngine, Logo, ReportConfig, render_report};

#[test]
fn first_drawn_text_is_the_salutation() {
    common::init_logging();
    let config = ReportConfig::default();
    let fonts = FontSet::builtin();
    let doc = LayoutEngine::new(&config, &fonts).layout(
        "Jane Doe",
        "jane@x.com",
        &common::sample_report(),
        false,
    );
    assert!(doc.page_count() >= 1);
    assert_eq!(doc.pages[0].texts().next(), Some("Dear Jane Doe,"));
}

#[test]
fn every_section_header_is_drawn_in_order() {
    let config = ReportConfig::default();
    let fonts = FontSet::builtin();
    let doc = LayoutEngine::new(&config, &fonts).layout(
        "Jane Doe",
        "jane@x.com",
        &common::sample_report(),
        false,
    );
    let texts: Vec<&str> = doc.pages.iter().flat_map(|p| p.texts()).collect();
    let mut last = 0;
    for title in DEFAULT_SECTION_TITLES {
        let pos = texts
            .iter()
            .position(|t| *t == title)
            .unwrap_or_else(|| panic!("missing header {title:?}"));
        assert!(pos >= last, "{title:?} out of order");
        last = pos;
    }
    assert!(!texts.contains(&PLACEHOLDER_TEXT));
}

#[test]
fn every_page_is_filled_and_inside_the_margins() {
    let config = ReportConfig::default();
    let fonts = FontSet::builtin();
    let long = common::sample_report().repeat(3);
    let doc = LayoutEngine::new(&config, &fonts).layout("Jane Doe", "jane@x.com", &long, false);
    assert!(doc.page_count() > 1);
    let g = &config.geometry;
    for page in &doc.pages {
        assert!(matches!(
            page.ops.first(),
            Some(DrawOp::Rect { color, .. }) if *color == config.background
        ));
        assert!(page.texts().next().is_some(), "blank page");
        for op in &page.ops {
            if let DrawOp::Text { y, text, .. } = op {
                assert!(*y >= g.margin_bottom, "{text:?} below the margin");
                assert!(*y <= g.height - g.margin_top, "{text:?} above the margin");
                assert!(text.is_ascii() || text == "\u{2022}", "{text:?}");
            }
        }
    }
}

#[test]
fn run_together_bullets_from_generated_text() {
    let text = sanitize("Key Commercial Strengths: \u{2022} Negotiation \u{2022} Team building");
    let sections = extract_sections(&text, &DEFAULT_SECTION_TITLES);
    assert_eq!(sections.len(), DEFAULT_SECTION_TITLES.len() + 1);
    assert_eq!(
        structure(&sections[1].raw_content),
        [
            RenderBlock::BulletItem("Negotiation".to_string()),
            RenderBlock::BulletItem("Team building".to_string()),
        ]
    );
    assert!(sections[2..].iter().all(|s| s.raw_content.is_empty()));
}

#[test]
fn unstructured_text_degrades_to_placeholders() {
    let config = ReportConfig::default();
    let fonts = FontSet::builtin();
    let doc = LayoutEngine::new(&config, &fonts).layout(
        "Jane Doe",
        "jane@x.com",
        "Sorry, I cannot help with that.",
        false,
    );
    let texts: Vec<&str> = doc.pages.iter().flat_map(|p| p.texts()).collect();
    let placeholders = texts.iter().filter(|t| **t == PLACEHOLDER_TEXT).count();
    assert_eq!(placeholders, DEFAULT_SECTION_TITLES.len());
    // Without the first title there is no introduction either.
    assert!(!texts.contains(&"Sorry, I cannot help with that."));
}

#[test]
fn pdf_output_has_header_and_page_count() {
    common::init_logging();
    let config = ReportConfig::default();
    let fonts = FontSet::builtin();
    let report = common::sample_report();
    let doc = LayoutEngine::new(&config, &fonts).layout("Jane Doe", "jane@x.com", &report, false);
    let bytes = render_report("Jane Doe", "jane@x.com", &report, &config, &fonts, None)
        .expect("render report");

    std::fs::write(common::output_dir("sample").join("report.pdf"), &bytes).ok();
    assert!(bytes.starts_with(b"%PDF-"));
    let count = format!("/Count {}", doc.page_count());
    assert_eq!(common::count_occurrences(&bytes, count.as_bytes()), 1);
    assert_eq!(common::count_occurrences(&bytes, b"/Subtype /Image"), 0);
    assert!(common::count_occurrences(&bytes, b"Value Add Report") >= 1);
}

#[test]
fn logo_is_embedded_once_with_soft_mask() {
    let path = common::write_logo_png("logo");
    let logo = Logo::load(&path).expect("decode logo fixture");
    let config = ReportConfig::default();
    let fonts = FontSet::builtin();
    let bytes = render_report(
        "Jane Doe",
        "jane@x.com",
        &common::sample_report(),
        &config,
        &fonts,
        Some(&logo),
    )
    .expect("render report");
    std::fs::write(common::output_dir("logo").join("report.pdf"), &bytes).ok();
    // The RGB image plus its alpha mask.
    assert_eq!(common::count_occurrences(&bytes, b"/Subtype /Image"), 2);
    assert_eq!(common::count_occurrences(&bytes, b"/SMask"), 1);
}

#[test]
fn missing_logo_is_not_fatal() {
    common::init_logging();
    let logo = Logo::load(std::path::Path::new("tests/output/does-not-exist.png"));
    assert!(logo.is_none());
    let config = ReportConfig::default();
    let fonts = FontSet::builtin();
    let bytes = render_report(
        "Jane Doe",
        "jane@x.com",
        &common::sample_report(),
        &config,
        &fonts,
        logo.as_ref(),
    )
    .expect("render without logo");
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn reports_render_in_parallel() {
    common::init_logging();
    let config = ReportConfig::default();
    let fonts = FontSet::builtin();
    let report = common::sample_report();
    let clients: Vec<String> = (0..8).map(|i| format!("Client Number {i}")).collect();

    let results: Vec<Vec<u8>> = clients
        .par_iter()
        .map(|name| {
            render_report(name, "client@x.com", &report, &config, &fonts, None)
                .expect("render report")
        })
        .collect();

    let sequential = render_report(&clients[3], "client@x.com", &report, &config, &fonts, None)
        .expect("render report");
    assert_eq!(results.len(), clients.len());
    assert!(results.iter().all(|pdf| pdf.starts_with(b"%PDF-")));
    assert_eq!(results[3], sequential);
}
