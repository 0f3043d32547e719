use crate::fonts::Measure;

/// Greedy word wrap: each line takes as many whitespace-separated words as
/// fit within `max_width`. A word wider than the whole line gets a line of
/// its own. Words that cannot be measured are logged and skipped.
pub fn wrap<M: Measure + ?Sized>(
    text: &str,
    measure: &M,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if let Err(e) = measure.measure(word, font_size) {
            log::warn!("Skipping word during wrap: {e}");
            continue;
        }
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        match measure.measure(&candidate, font_size) {
            Ok(w) if w <= max_width => current = candidate,
            _ => lines.push(std::mem::replace(&mut current, word.to_string())),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
