use regex::RegexBuilder;
use tracing::warn;

use crate::extraction::SkillSet;

pub const HIGHLIGHT_OPEN: &str = "<mark><b>";
pub const HIGHLIGHT_CLOSE: &str = "</b></mark>";

/// Wraps every case-insensitive, word-bounded occurrence of each skill label
/// in `description` with emphasis markup.
///
/// All spans are located on the original text first and the output is built
/// in a single pass, so inserted markup is never matched again. Where spans
/// overlap, the earliest wins, then the longest. The description text itself
/// is HTML-escaped, so a literal `<mark>` in a posting can never be confused
/// with the inserted markers.
pub fn highlight(description: &str, skills: &SkillSet) -> String {
    if skills.is_empty() {
        return html_escape(description);
    }

    let mut spans: Vec<(usize, usize)> = Vec::new();

    for label in skills.iter() {
        let pattern = format!(r"\b{}\b", regex::escape(label));
        let re = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(re) => re,
            Err(e) => {
                warn!("Skipping highlight for skill '{label}': {e}");
                continue;
            }
        };
        spans.extend(re.find_iter(description).map(|m| (m.start(), m.end())));
    }

    spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut out = String::with_capacity(description.len() + spans.len() * 20);
    let mut cursor = 0;
    for (start, end) in spans {
        if start < cursor {
            continue;
        }
        out.push_str(&html_escape(&description[cursor..start]));
        out.push_str(HIGHLIGHT_OPEN);
        out.push_str(&html_escape(&description[start..end]));
        out.push_str(HIGHLIGHT_CLOSE);
        cursor = end;
    }
    out.push_str(&html_escape(&description[cursor..]));
    out
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Removes highlight markup and undoes the escaping.
/// `strip_highlights(&highlight(d, s)) == d` for every description.
#[cfg(test)]
pub fn strip_highlights(marked: &str) -> String {
    marked
        .replace(HIGHLIGHT_OPEN, "")
        .replace(HIGHLIGHT_CLOSE, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
