//! Highlight markers inside example sentences.
//!
//! Definition prompts ask the provider to wrap the term occurrence in each
//! example with `<b>`/`</b>`. Speech synthesis must never see those markers.

use std::sync::LazyLock;

use regex::Regex;

pub const HIGHLIGHT_OPEN: &str = "<b>";
pub const HIGHLIGHT_CLOSE: &str = "</b>";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

static HIGHLIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<b>(.*?)</b>").expect("valid highlight regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Highlight(&'a str),
}

/// Remove every markup tag, leaving plain text for synthesis
pub fn strip_markup(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

/// Number of complete highlighted spans
pub fn highlight_count(text: &str) -> usize {
    HIGHLIGHT.find_iter(text).count()
}

/// Split a sentence into plain and highlighted pieces, in order
pub fn split_highlights(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in HIGHLIGHT.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Plain(&text[last..whole.start()]));
        }
        segments.push(Segment::Highlight(inner.as_str()));
        last = whole.end();
    }

    if last < text.len() {
        segments.push(Segment::Plain(&text[last..]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_removes_highlight_markers() {
        let plain = strip_markup("I love to <b>run</b> in the morning.");
        assert_eq!(plain, "I love to run in the morning.");
        assert!(!plain.contains('<'));
        assert!(!plain.contains('>'));
    }

    #[test]
    fn test_strip_removes_any_tag() {
        assert_eq!(strip_markup("<i>hola</i> <br/>amigo"), "hola amigo");
        assert_eq!(strip_markup("no markup"), "no markup");
    }

    #[test]
    fn test_highlight_count() {
        assert_eq!(highlight_count("Ella <b>corre</b> rápido."), 1);
        assert_eq!(highlight_count("<b>a</b> y <b>b</b>"), 2);
        assert_eq!(highlight_count("sin marcas"), 0);
        assert_eq!(highlight_count("roto <b>sin cierre"), 0);
    }

    #[test]
    fn test_split_highlights() {
        let segments = split_highlights("Me gusta <b>correr</b> cada día.");
        assert_eq!(
            segments,
            vec![
                Segment::Plain("Me gusta "),
                Segment::Highlight("correr"),
                Segment::Plain(" cada día."),
            ]
        );
    }

    #[test]
    fn test_split_highlight_at_edges() {
        assert_eq!(
            split_highlights("<b>Corre</b>"),
            vec![Segment::Highlight("Corre")]
        );
        assert_eq!(split_highlights(""), Vec::<Segment>::new());
    }
}
