/// Measures rendered label widths.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> f64;
}

/// Width estimate from per-glyph width classes, in ems of a proportional
/// sans-serif face. Good enough to size pills without a font backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateTextMeasurer;

impl ApproximateTextMeasurer {
    fn glyph_em(c: char) -> f64 {
        match c {
            ' ' => 0.28,
            'i' | 'j' | 'l' | '.' | ',' | '\'' | '!' | '|' | ':' | ';' => 0.26,
            'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' => 0.36,
            'm' | 'w' => 0.84,
            'M' | 'W' | '@' | '%' => 0.92,
            '0'..='9' => 0.56,
            'A'..='Z' => 0.66,
            c if c.is_ascii() => 0.54,
            // CJK, emoji and other wide scripts
            c if c >= '\u{2E80}' => 1.0,
            _ => 0.6,
        }
    }
}

impl TextMeasurer for ApproximateTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(Self::glyph_em).sum::<f64>() * font_size
    }
}

pub const ELLIPSIS: char = '…';

/// A label as displayed inline, with the full text kept for the tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub full: String,
    pub display: String,
    pub truncated: bool,
}

/// Shortens `text` to `max_chars` characters plus an ellipsis when it is
/// longer than that. Counts Unicode scalar values, never splitting one.
pub fn truncate_label(text: &str, max_chars: usize) -> Label {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Label {
            full: text.to_string(),
            display: format!("{}{}", &text[..cut], ELLIPSIS),
            truncated: true,
        },
        None => Label {
            full: text.to_string(),
            display: text.to_string(),
            truncated: false,
        },
    }
}

/// Pill width for a label: measured width plus padding, never below `min_width`.
pub fn pill_width(measurer: &impl TextMeasurer, text: &str, font_size: f64, padding: f64, min_width: f64) -> f64 {
    (measurer.measure(text, font_size) + padding).max(min_width)
}
