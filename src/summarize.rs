// src/summarize.rs
//! Heuristic summaries: plain text, first few sentences.
//!
//! A "sentence" ends at `.`, `!` or `?` followed by whitespace. No attempt is
//! made to handle abbreviations or quotes; the cap boundary may cut mid-thought.

use once_cell::sync::OnceCell;
use regex::Regex;

pub const DEFAULT_SUMMARY_SENTENCES: usize = 2;

/// Shown when a description reduces to nothing.
pub const SUMMARY_PLACEHOLDER: &str = "No summary available.";

/// Decode entities, drop tags, collapse whitespace.
///
/// Entities are decoded first so double-escaped markup (`&lt;p&gt;`) is
/// removed too. A tag must open with a letter, `/` or `!`, so a decoded
/// comparison such as `5 < 10 ... > 3` stays in the text.
pub fn strip_markup(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Block-level tags separate words; everything else just disappears
    static RE_BLOCK: OnceCell<Regex> = OnceCell::new();
    let re_block = RE_BLOCK.get_or_init(|| {
        Regex::new(r"(?i)</?(?:p|br|div|li|ul|ol|h[1-6]|blockquote|tr|td|th|table|hr)\b[^>]*>")
            .unwrap()
    });
    out = re_block.replace_all(&out, " ").to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags =
        RE_TAGS.get_or_init(|| Regex::new(r"(?s)<!--.*?-->|<[/!]?[A-Za-z][^<>]*>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Collapse whitespace (Unicode \s covers NBSP)
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Split already-plain text into sentences. Terminators stay attached.
pub fn split_sentences(text: &str) -> Vec<&str> {
    static RE_BOUNDARY: OnceCell<Regex> = OnceCell::new();
    let re = RE_BOUNDARY.get_or_init(|| Regex::new(r"[.!?]\s+").unwrap());

    let mut out = Vec::new();
    let mut start = 0;
    for m in re.find_iter(text) {
        // terminators are single-byte ASCII
        let end = m.start() + 1;
        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            out.push(sentence);
        }
        start = m.end();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

/// Plain-text summary of at most `max_sentences` sentences. Empty in, empty out.
pub fn summarize(raw: &str, max_sentences: usize) -> String {
    let plain = strip_markup(raw);
    split_sentences(&plain)
        .into_iter()
        .take(max_sentences)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_two_sentences() {
        let s = "One. Two! Three? Four.";
        assert_eq!(summarize(s, 2), "One. Two!");
    }

    #[test]
    fn adjacent_paragraphs_do_not_fuse() {
        let s = "<p>First.</p><p>Second.</p><p>Third.</p>";
        assert_eq!(summarize(s, 2), "First. Second.");
    }

    #[test]
    fn decimal_point_is_not_a_boundary() {
        let s = "Revenue grew 3.5 percent. Margins held.";
        assert_eq!(split_sentences(s), vec!["Revenue grew 3.5 percent.", "Margins held."]);
    }

    #[test]
    fn decoded_comparisons_are_not_tags() {
        let s = "Costs fell 5 &lt; 10 units while sales &gt; forecast. Next.";
        assert_eq!(
            summarize(s, 2),
            "Costs fell 5 < 10 units while sales > forecast. Next."
        );
        assert_eq!(strip_markup("a <!-- note --> b &lt;i&gt;c&lt;/i&gt;"), "a b c");
    }

    #[test]
    fn empty_and_markup_only_inputs_are_empty() {
        assert_eq!(summarize("", 2), "");
        assert_eq!(summarize("<img src=\"x.png\"/> <br/>", 2), "");
    }
}
