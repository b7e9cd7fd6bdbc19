//! Text reflow and shrink-to-fit.
//!
//! Exact glyph metrics are unavailable before the scene renders, so widths
//! use an average-character model: `chars * size_pt * width_factor`.
//! Heights follow `lines * size_pt * line_height`. Text that cannot fit its
//! box steps down in size toward a floor; overflow at the floor is accepted
//! rather than shrinking into illegibility.

use serde::{Deserialize, Serialize};

use crate::palette::effective_font_size;

/// Tuning knobs for wrapping and shrinking.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase", default)]
pub struct ReflowOptions {
    /// Smallest size the shrink loop may reach, in points.
    pub min_size_pt: f64,
    /// Size decrement per shrink step, in points.
    pub step_pt: f64,
    /// Line height as a multiple of the point size.
    pub line_height: f64,
    /// Average glyph width as a fraction of the point size.
    pub width_factor: f64,
}

impl Default for ReflowOptions {
    fn default() -> Self {
        ReflowOptions {
            min_size_pt: 8.0,
            step_pt: 1.0,
            line_height: 1.35,
            width_factor: 0.6,
        }
    }
}

/// Outcome of fitting text into a box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFit {
    /// Size the text settled at, in points.
    pub fit_size_pt: f64,
    /// Wrapped lines at the settled size.
    pub lines: Vec<String>,
    /// Size requested before any shrinking.
    pub original_size_pt: f64,
}

impl TextFit {
    /// Wrapped text height under the approximate model.
    #[must_use]
    pub fn height(&self, options: &ReflowOptions) -> f64 {
        wrapped_height(self.lines.len(), self.fit_size_pt, options.line_height)
    }

    /// Lines rejoined with newlines, the form the surface draws.
    #[must_use]
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

/// Approximate single-line width of `char_count` characters at `size_pt`.
#[must_use]
pub fn estimate_width(char_count: usize, size_pt: f64, width_factor: f64) -> f64 {
    count_f64(char_count) * size_pt * width_factor
}

/// Approximate wrapped-text height.
#[must_use]
pub fn wrapped_height(line_count: usize, size_pt: f64, line_height: f64) -> f64 {
    count_f64(line_count) * size_pt * line_height
}

/// Fit text into a box, shrinking from `start_size_pt` toward the floor.
///
/// Whitespace-only text yields no lines. Invalid starting sizes fall back
/// to the 12pt default. A box too small even at the floor keeps the floor
/// size with overflowing lines; one unfittable box never blocks a run.
#[must_use]
pub fn fit_text(
    text: &str,
    width_px: f64,
    height_px: f64,
    start_size_pt: f64,
    options: &ReflowOptions,
) -> TextFit {
    let original = effective_font_size(Some(start_size_pt));
    if text.trim().is_empty() {
        return TextFit {
            fit_size_pt: original,
            lines: Vec::new(),
            original_size_pt: original,
        };
    }

    let step = if options.step_pt.is_finite() && options.step_pt > 0.0 {
        options.step_pt
    } else {
        1.0
    };

    let mut size = original;
    let mut lines = wrap_text(text, width_px, size, options.width_factor);
    while wrapped_height(lines.len(), size, options.line_height) > height_px
        && size > options.min_size_pt
    {
        size = (size - step).max(options.min_size_pt);
        lines = wrap_text(text, width_px, size, options.width_factor);
    }

    TextFit {
        fit_size_pt: size,
        lines,
        original_size_pt: original,
    }
}

/// Greedy word-wrap at a fixed size.
///
/// Paragraph breaks are preserved. Words wider than a full line are split
/// hard at the character that overflows, and the trailing fragment stays
/// open for following words. Non-empty input always yields at least one
/// line.
#[must_use]
pub fn wrap_text(text: &str, width_px: f64, size_pt: f64, width_factor: f64) -> Vec<String> {
    let max_chars = max_chars_per_line(width_px, size_pt, width_factor);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph.trim_end_matches('\r'), max_chars, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, max_chars: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 {
            if current_len + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
                continue;
            }
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if word_len <= max_chars {
            current.push_str(word);
            current_len = word_len;
        } else {
            current_len = hard_split(word, max_chars, lines, &mut current);
        }
    }
    lines.push(current);
}

/// Push full-width chunks of an overlong word; the final chunk becomes the
/// open line and its length is returned.
fn hard_split(
    word: &str,
    max_chars: usize,
    lines: &mut Vec<String>,
    current: &mut String,
) -> usize {
    let chars: Vec<char> = word.chars().collect();
    let mut chunks = chars.chunks(max_chars).peekable();
    while let Some(chunk) = chunks.next() {
        let piece: String = chunk.iter().collect();
        if chunks.peek().is_some() {
            lines.push(piece);
        } else {
            let len = chunk.len();
            *current = piece;
            return len;
        }
    }
    0
}

/// Character budget for one line under the width model, at least 1.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn max_chars_per_line(width_px: f64, size_pt: f64, width_factor: f64) -> usize {
    let per_char = size_pt * width_factor;
    if per_char.is_nan() || per_char <= 0.0 || width_px.is_nan() {
        return 1;
    }
    (width_px / per_char).floor().clamp(1.0, 1_000_000.0) as usize
}

/// Counts in this model stay far below 2^53.
#[allow(clippy::cast_precision_loss)]
fn count_f64(count: usize) -> f64 {
    count as f64
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_packs_greedily() {
        // 10pt * 0.6 = 6px per char; 66px = 11 chars per line
        let lines = wrap_text("hello world foo", 66.0, 10.0, 0.6);
        assert_eq!(lines, vec!["hello world", "foo"]);
    }

    #[test]
    fn test_wrap_preserves_paragraph_breaks() {
        let lines = wrap_text("alpha\n\nbeta", 600.0, 10.0, 0.6);
        assert_eq!(lines, vec!["alpha", "", "beta"]);
    }

    #[test]
    fn test_overlong_word_splits_hard() {
        // 60px at 10pt = 10 chars per line
        let lines = wrap_text("abcdefghijklmnopqrstuvwxy zz", 60.0, 10.0, 0.6);
        assert_eq!(lines, vec!["abcdefghij", "klmnopqrst", "uvwxy zz"]);
    }

    #[test]
    fn test_fit_without_shrink() {
        let fit = fit_text("hi", 100.0, 100.0, 12.0, &ReflowOptions::default());
        assert_eq!(fit.fit_size_pt, 12.0);
        assert_eq!(fit.original_size_pt, 12.0);
        assert_eq!(fit.lines, vec!["hi"]);
    }

    #[test]
    fn test_fit_shrinks_until_height_fits() {
        // At 12pt only one 4-char word fits per 60px line (4 lines, 64.8px);
        // at 11pt two fit (2 lines, 29.7px)
        let fit = fit_text(
            "aaaa aaaa aaaa aaaa",
            60.0,
            50.0,
            12.0,
            &ReflowOptions::default(),
        );
        assert_eq!(fit.fit_size_pt, 11.0);
        assert_eq!(fit.lines, vec!["aaaa aaaa", "aaaa aaaa"]);
        assert_eq!(fit.original_size_pt, 12.0);
    }

    #[test]
    fn test_floor_accepts_overflow() {
        let options = ReflowOptions::default();
        let text = "word ".repeat(200);
        let fit = fit_text(&text, 40.0, 20.0, 14.0, &options);
        assert_eq!(fit.fit_size_pt, options.min_size_pt);
        assert!(fit.height(&options) > 20.0);
        assert!(!fit.lines.is_empty());
    }

    #[test]
    fn test_shrink_monotonic_in_height() {
        let options = ReflowOptions::default();
        let text = "the quick brown fox jumps over the lazy dog";
        let tall = fit_text(text, 80.0, 200.0, 14.0, &options);
        let short = fit_text(text, 80.0, 30.0, 14.0, &options);
        assert!(tall.fit_size_pt >= short.fit_size_pt);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        let fit = fit_text("   \n  ", 100.0, 100.0, f64::NAN, &ReflowOptions::default());
        assert!(fit.lines.is_empty());
        assert_eq!(fit.fit_size_pt, 12.0);
    }

    #[test]
    fn test_estimate_width_model() {
        assert_eq!(estimate_width(10, 12.0, 0.6), 72.0);
        assert_eq!(estimate_width(0, 12.0, 0.6), 0.0);
    }

    #[test]
    fn test_start_below_floor_is_kept() {
        let fit = fit_text("text", 100.0, 1.0, 6.0, &ReflowOptions::default());
        // 6pt starts below the 8pt floor; no shrinking happens
        assert_eq!(fit.fit_size_pt, 6.0);
    }
}
