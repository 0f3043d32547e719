use unicode_normalization::UnicodeNormalization as _;

/// Replacement for characters with a known ASCII rendering.
fn substitute(ch: char) -> Option<&'static str> {
    let rep = match ch {
        '\n' => return None,
        '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{00A0}' | '\u{2028}' | '\u{2029}' => " ",
        '\u{2010}'..='\u{2015}' | '\u{2212}' => "-",
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => "\"",
        '\u{2026}' => "...",
        '\u{2022}' | '\u{2023}' | '\u{25CF}' | '\u{25E6}' | '\u{25AA}' | '\u{2043}' => "*",
        '\u{2265}' => ">=",
        '\u{2264}' => "<=",
        '\u{00B1}' => "+/-",
        '\u{2260}' => "!=",
        '\u{00D7}' => "x",
        '\u{00F7}' => "/",
        '\u{2192}' => "->",
        '\u{2190}' => "<-",
        '\u{2191}' => "^",
        '\u{2193}' => "v",
        '\u{2194}' => "<->",
        '\u{21D2}' => "=>",
        '\u{20AC}' => "EUR",
        '\u{00A3}' => "GBP",
        '\u{00A5}' => "JPY",
        '\u{20B9}' => "INR",
        '\u{20A9}' => "KRW",
        '\u{20BD}' => "RUB",
        '\u{2122}' => "(TM)",
        '\u{00A9}' => "(C)",
        '\u{00AE}' => "(R)",
        _ => return None,
    };
    Some(rep)
}

fn is_printable_ascii(ch: char) -> bool {
    matches!(ch, ' '..='~' | '\n')
}

/// Reduce arbitrary text to printable ASCII plus `\n`.
///
/// Control characters become spaces, typographic characters and common
/// symbols get their ASCII spelling, accented letters lose their accents
/// through NFKD, and anything still outside ASCII is dropped. CRLF and lone
/// CR line endings become `\n`. Idempotent.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() != Some(&'\n') {
                out.push('\n');
            }
            continue;
        }
        if let Some(rep) = substitute(ch) {
            out.push_str(rep);
            continue;
        }
        if is_printable_ascii(ch) {
            out.push(ch);
            continue;
        }
        for decomposed in std::iter::once(ch).nfkd() {
            if let Some(rep) = substitute(decomposed) {
                out.push_str(rep);
            } else if is_printable_ascii(decomposed) {
                out.push(decomposed);
            }
        }
    }
    out
}
