pub mod config;
mod error;
pub mod fonts;
pub mod generate;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod resume;
pub mod text;

pub use config::ReportConfig;
pub use error::{Error, RenderError};
pub use fonts::{FontSet, Measure};
pub use layout::LayoutEngine;
pub use model::ReportDocument;
pub use pdf::Logo;
pub use resume::ParsedResume;

use std::time::Instant;

/// Lay out `report_text` for a client and serialize it to PDF bytes.
pub fn render_report(
    client_name: &str,
    client_email: &str,
    report_text: &str,
    config: &ReportConfig,
    fonts: &FontSet,
    logo: Option<&Logo>,
) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();

    let doc = LayoutEngine::new(config, fonts).layout(
        client_name,
        client_email,
        report_text,
        logo.is_some(),
    );
    let t_layout = t0.elapsed();

    let bytes = pdf::write(&doc, fonts, logo)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, write={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        doc.page_count(),
        bytes.len(),
    );

    Ok(bytes)
}
