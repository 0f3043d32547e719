//! Turning generated report text into structured, renderable pieces.

mod blocks;
mod sanitize;
mod sections;

pub use blocks::{BULLET_MARKER, structure};
pub use sanitize::sanitize;
pub use sections::extract_sections;
