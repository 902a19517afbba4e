//! Greedy word-wrap against the static metric tables.

use crate::layout::font_metrics::FontMetricTable;

/// Splits `text` into lines no wider than `max_width_px`.
///
/// Whitespace runs collapse to single spaces. A word wider than the line is
/// broken at character boundaries; every piece keeps at least one character,
/// so a single glyph wider than the line still overflows. Blank text yields
/// no lines.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    size_px: f32,
    max_width_px: f32,
) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![];
    }

    let space_w = metrics.space_width * size_px;
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in &words {
        let word_w = metrics.measure_px(word, size_px);
        if word_w > max_width_px {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut pieces = break_word(word, metrics, size_px, max_width_px);
            let last = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
            current_width = metrics.measure_px(&last, size_px);
            current = last;
        } else if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + space_w + word_w > max_width_px {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space_w + word_w;
        }
    }
    lines.push(current);
    lines
}

/// Greedily cuts one word into pieces that each fit `max_width_px`.
fn break_word(
    word: &str,
    metrics: &FontMetricTable,
    size_px: f32,
    max_width_px: f32,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0_f32;
    for c in word.chars() {
        let char_w = metrics.char_width(c) * size_px;
        if !piece.is_empty() && width + char_w > max_width_px {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += char_w;
    }
    pieces.push(piece);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{get_metrics, FontFace};

    #[test]
    fn test_wrap_empty_returns_no_lines() {
        let metrics = get_metrics(FontFace::Regular);
        assert!(wrap_text("", metrics, 14.0, 300.0).is_empty());
        assert!(wrap_text("   ", metrics, 14.0, 300.0).is_empty());
    }

    #[test]
    fn test_wrap_single_word_one_line() {
        let metrics = get_metrics(FontFace::Regular);
        assert_eq!(wrap_text("Rust", metrics, 14.0, 300.0), vec!["Rust"]);
    }

    #[test]
    fn test_wrapped_lines_fit_and_keep_every_word() {
        let metrics = get_metrics(FontFace::Regular);
        let text = "Architected a distributed caching layer using Redis and consistent hashing, \
                    reducing p99 latency by 40% under 50k RPS peak load";
        let lines = wrap_text(text, metrics, 14.0, 240.0);
        assert!(lines.len() >= 2, "expected a wrap, got {lines:?}");
        for line in &lines {
            assert!(metrics.measure_px(line, 14.0) <= 240.0, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_overlong_word_is_broken_to_fit() {
        let metrics = get_metrics(FontFace::Regular);
        let long = "x".repeat(80);
        // 'x' is 7px at 14px, so 14 fit in 100px
        let lines = wrap_text(&format!("a {long} b"), metrics, 14.0, 100.0);
        let mut expected = vec!["a".to_string()];
        expected.extend(std::iter::repeat("x".repeat(14)).take(5));
        expected.push(format!("{} b", "x".repeat(10)));
        assert_eq!(lines, expected);
        for line in &lines {
            assert!(metrics.measure_px(line, 14.0) <= 100.0, "line too wide: {line}");
        }
    }

    #[test]
    fn test_broken_url_keeps_every_character() {
        let metrics = get_metrics(FontFace::Regular);
        let url = format!("https://github.com/alexj/{}", "project-".repeat(12));
        let lines = wrap_text(&url, metrics, 14.0, 120.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), url);
    }

    #[test]
    fn test_glyph_wider_than_line_still_emitted() {
        let metrics = get_metrics(FontFace::Bold);
        assert_eq!(wrap_text("WW", metrics, 30.0, 10.0), vec!["W", "W"]);
    }
}
