use crate::model::RenderBlock;

pub const BULLET_MARKER: char = '*';

const BULLET_GLYPHS: [char; 6] = [
    '\u{2022}', '\u{2023}', '\u{2043}', '\u{25AA}', '\u{25CF}', '\u{25E6}',
];

/// Map bullet glyphs to `*`. Dashes are left alone: `- ` lines stay prose.
fn normalize_markers(text: &str) -> String {
    text.chars()
        .map(|c| if BULLET_GLYPHS.contains(&c) { BULLET_MARKER } else { c })
        .collect()
}

/// Insert a line break before every bullet marker that sits in the middle of
/// a line, e.g. "Strengths: * one * two". A mid-line marker must be
/// surrounded by whitespace so that `**emphasis**` and `a*b` stay intact.
fn break_before_bullets(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut line_has_text = false;
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '\n' {
            line_has_text = false;
            out.push(ch);
            continue;
        }
        if ch == BULLET_MARKER && line_has_text {
            let prev_ws = i > 0 && chars[i - 1].is_whitespace();
            let next_ws = chars.get(i + 1).is_some_and(|c| c.is_whitespace());
            if prev_ws && next_ws {
                out.push('\n');
            }
        }
        if !ch.is_whitespace() {
            line_has_text = true;
        }
        out.push(ch);
    }
    out
}

fn bullet_body(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(BULLET_MARKER)?;
    if rest.starts_with(BULLET_MARKER) {
        return None;
    }
    Some(rest.trim())
}

/// Turn section text into paragraphs and bullet items, in input order.
/// Blank lines are separators and produce nothing.
pub fn structure(raw_content: &str) -> Vec<RenderBlock> {
    let repaired = break_before_bullets(&normalize_markers(raw_content));
    repaired
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match bullet_body(line) {
            Some("") => None,
            Some(body) => Some(RenderBlock::BulletItem(body.to_string())),
            None => Some(RenderBlock::Paragraph(line.to_string())),
        })
        .collect()
}
