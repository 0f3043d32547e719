use crate::model::ExtractedSection;

fn trim_section_content(raw: &str) -> &str {
    raw.trim_start_matches(|c: char| c == ':' || c.is_whitespace())
        .trim_end()
}

/// Split report text into an introduction followed by one entry per title.
///
/// Titles are matched as plain, case-sensitive substrings in declared order,
/// scanning forward only. The introduction is everything before the first
/// title (empty when that title is absent). A section runs from the end of
/// its title to the next title's occurrence, or to the end of the text when
/// it is the last title or the next one is never found. A missing title
/// yields empty content and leaves the scan position where it was.
pub fn extract_sections<S: AsRef<str>>(text: &str, titles: &[S]) -> Vec<ExtractedSection> {
    let mut sections = Vec::with_capacity(titles.len() + 1);

    let intro = match titles.first() {
        Some(first) => text
            .find(first.as_ref())
            .map(|idx| text[..idx].trim())
            .unwrap_or(""),
        None => text.trim(),
    };
    sections.push(ExtractedSection {
        title: String::new(),
        raw_content: intro.to_string(),
    });

    let mut offset = 0usize;
    for (i, title) in titles.iter().enumerate() {
        let title = title.as_ref();
        let found = if title.is_empty() {
            None
        } else {
            text[offset..].find(title).map(|rel| offset + rel)
        };

        let Some(start) = found else {
            log::debug!("Section {title:?} not found in report text");
            sections.push(ExtractedSection {
                title: title.to_string(),
                raw_content: String::new(),
            });
            continue;
        };

        let content_start = start + title.len();
        let content_end = titles
            .get(i + 1)
            .map(|next| next.as_ref())
            .filter(|next| !next.is_empty())
            .and_then(|next| text[content_start..].find(next))
            .map(|rel| content_start + rel)
            .unwrap_or(text.len());

        sections.push(ExtractedSection {
            title: title.to_string(),
            raw_content: trim_section_content(&text[content_start..content_end]).to_string(),
        });
        offset = content_end;
    }

    sections
}
