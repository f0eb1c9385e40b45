use std::borrow::Cow;

/// Approximate glyph width at the card's label sizes.
pub const APPROX_CHAR_WIDTH: f64 = 6.0;

pub const LINES_PER_HOUR: f64 = 50.0;

const ELLIPSIS: char = '…';

pub fn escape_xml(value: &str) -> Cow<'_, str> {
    if !value
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>' | '"' | '\''))
    {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

pub fn max_chars_for_width(max_px: f64) -> usize {
    if max_px.is_finite() && max_px > 0.0 {
        (max_px / APPROX_CHAR_WIDTH).floor() as usize
    } else {
        0
    }
}

/// Cuts `text` so that `chars * APPROX_CHAR_WIDTH <= max_px`, ending the cut
/// text with an ellipsis. Budgets of one character or less yield "".
pub fn truncate_to_width(text: &str, max_px: f64) -> Cow<'_, str> {
    let max_chars = max_chars_for_width(max_px);
    if text.chars().count() <= max_chars {
        return Cow::Borrowed(text);
    }
    if max_chars <= 1 {
        return Cow::Borrowed("");
    }

    let mut cut: String = text.chars().take(max_chars - 1).collect();
    cut.push(ELLIPSIS);
    Cow::Owned(cut)
}

pub fn estimated_hours(lines: u64) -> f64 {
    lines as f64 / LINES_PER_HOUR
}

/// `"H hrs M mins"`, dropping whichever part is zero.
pub fn format_duration(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round().max(0.0) as u64;
    let (h, m) = (total_minutes / 60, total_minutes % 60);

    match (h, m) {
        (0, m) => format!("{} mins", m),
        (h, 0) => format!("{} hrs", h),
        (h, m) => format!("{} hrs {} mins", h, m),
    }
}

/// `1234567` → `"1,234,567"`.
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

const COMPACT_UNITS: [(f64, &str); 4] = [(1e3, "K"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

/// Short form with at most one fraction digit: `1.2K`, `3M`.
pub fn format_compact(value: u64) -> String {
    let n = value as f64;
    let Some(mut idx) = COMPACT_UNITS.iter().rposition(|(unit, _)| n >= *unit) else {
        return value.to_string();
    };

    let round1 = |v: f64| (v * 10.0).round() / 10.0;
    let mut scaled = round1(n / COMPACT_UNITS[idx].0);
    if scaled >= 1000.0 && idx + 1 < COMPACT_UNITS.len() {
        idx += 1;
        scaled = round1(n / COMPACT_UNITS[idx].0);
    }

    let suffix = COMPACT_UNITS[idx].1;
    if scaled.fract() == 0.0 {
        format!("{:.0}{}", scaled, suffix)
    } else {
        format!("{:.1}{}", scaled, suffix)
    }
}
