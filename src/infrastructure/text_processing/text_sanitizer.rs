use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static BROKEN_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<head>\w)-[ \t]*\r?\n[ \t]*(?P<tail>\w)")
        .expect("broken word pattern is valid")
});

const SOFT_HYPHEN: char = '\u{00AD}';

/// Normalizes extracted document text before it is sent to the model.
///
/// Applies NFKC, rejoins words hyphenated across line breaks, drops control
/// characters and soft hyphens, collapses runs of whitespace inside a line and
/// keeps at most one blank line between paragraphs. Tabs survive as column
/// separators.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let normalized: String = raw
        .nfkc()
        .filter(|c| *c != SOFT_HYPHEN && (!c.is_control() || *c == '\n' || *c == '\t'))
        .collect();
    let rejoined = BROKEN_WORD.replace_all(&normalized, "$head$tail");

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in rejoined.lines() {
        let collapsed = collapse_line(line);
        if collapsed.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(collapsed);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs.join("\n\n")
}

/// Single spaces between words, a single tab where the line had any.
fn collapse_line(line: &str) -> String {
    line.split('\t')
        .map(|cell| cell.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join("\t")
}
