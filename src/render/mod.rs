//! SVG card rendering.
//!
//! Every variant is a pure function of [`CardRenderParams`]: no I/O, and an
//! empty [`AggregationResult`] still produces a complete card with no
//! language rows. Canvas height is derived from the row count so content is
//! never clipped.

mod compact;
mod legend;
mod list;
pub mod text;

use std::borrow::Cow;

use crate::languages::language_color;
use crate::models::{AggregatedLanguage, AggregationResult};
use crate::theme::{resolve_theme, Theme};

use self::text::{escape_xml, estimated_hours, format_duration, truncate_to_width};

pub const DEFAULT_TITLE: &str = "Language Stats";
pub const DEFAULT_PERIOD: &str = "All Time";

const FONT_STACK: &str =
    "-apple-system,BlinkMacSystemFont,Segoe UI,Inter,Roboto,Helvetica Neue,Arial,sans-serif";

const GITHUB_MARK: &str = "M12 2a10 10 0 0 0-3.16 19.49c.5.09.68-.22.68-.48 0-.24-.01-.87-.01-1.71-2.78.6-3.37-1.34-3.37-1.34-.46-1.16-1.12-1.47-1.12-1.47-.91-.62.07-.6.07-.6 1 .07 1.53 1.03 1.53 1.03 .9 1.53 2.36 1.09 2.94.83 .09-.65.35-1.09.63-1.34-2.22-.25-4.56-1.11-4.56-4.95 0-1.09.39-1.98 1.03-2.68-.1-.25-.45-1.27.1-2.65 0 0 .84-.27 2.75 1.02A9.56 9.56 0 0 1 12 6.84c.85.01 1.71.12 2.51.35 1.9-1.29 2.74-1.02 2.74-1.02 .55 1.38.2 2.4.1 2.65 .64.7 1.03 1.59 1.03 2.68 0 3.85-2.34 4.7-4.57 4.95 .36.31.67.92.67 1.85 0 1.34-.01 2.42-.01 2.75 0 .27.18.58.69.48A10 10 0 0 0 12 2z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardVariant {
    #[default]
    List,
    Legend,
    Compact,
}

impl CardVariant {
    /// Missing selects `list`; any unrecognised name selects `compact`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            None => CardVariant::List,
            Some(v) if v == "list" => CardVariant::List,
            Some(v) if v == "legend" => CardVariant::Legend,
            Some(_) => CardVariant::Compact,
        }
    }
}

impl std::fmt::Display for CardVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardVariant::List => write!(f, "list"),
            CardVariant::Legend => write!(f, "legend"),
            CardVariant::Compact => write!(f, "compact"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CardRenderParams<'a> {
    pub display_name: &'a str,
    pub stats: &'a AggregationResult,
    pub theme: Option<&'a str>,
    pub variant: CardVariant,
    pub title: Option<&'a str>,
    pub period: Option<&'a str>,
    pub tracked_hours: Option<f64>,
    pub accent: Option<&'a str>,
}

impl<'a> CardRenderParams<'a> {
    pub fn new(display_name: &'a str, stats: &'a AggregationResult) -> Self {
        Self {
            display_name,
            stats,
            theme: None,
            variant: CardVariant::default(),
            title: None,
            period: None,
            tracked_hours: None,
            accent: None,
        }
    }
}

/// Per-render values shared by all variants.
struct CardContext<'a> {
    params: &'a CardRenderParams<'a>,
    theme: &'static Theme,
    accent: Cow<'a, str>,
}

impl CardContext<'_> {
    fn languages(&self) -> &[AggregatedLanguage] {
        &self.params.stats.languages
    }

    fn title(&self) -> Cow<'_, str> {
        escape_xml(self.params.title.unwrap_or(DEFAULT_TITLE))
    }
}

pub fn render_card(params: &CardRenderParams<'_>) -> String {
    let theme = resolve_theme(params.theme);
    let accent = params
        .accent
        .map(escape_xml)
        .unwrap_or(Cow::Borrowed(theme.subtext));

    let ctx = CardContext {
        params,
        theme,
        accent,
    };

    match params.variant {
        CardVariant::List => list::render(&ctx),
        CardVariant::Legend => legend::render(&ctx),
        CardVariant::Compact => compact::render(&ctx),
    }
}

/// Fixed-size card carrying an error message, for failed renders.
pub fn render_error_card(message: &str) -> String {
    let message = truncate_to_width(message, 760.0 - 32.0);
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="760" height="80" viewBox="0 0 760 80"><rect width="100%" height="100%" fill="#fff"/><text x="16" y="48" fill="#ef4444" font-size="14" font-family="{}">Error: {}</text></svg>"##,
        FONT_STACK,
        escape_xml(&message)
    )
}

fn svg_open(width: u32, height: u32, aria_label: Option<&str>) -> String {
    let aria = aria_label
        .map(|label| format!(r#" aria-label="{}""#, escape_xml(label)))
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" role="img"{aria} style="font-family:{font}">
"#,
        w = width,
        h = height,
        aria = aria,
        font = FONT_STACK
    )
}

fn github_mark(x: u32, y: u32, size: u32, fill: &str) -> String {
    format!(
        r#"  <svg x="{}" y="{}" width="{size}" height="{size}" viewBox="0 0 24 24" fill="{}" aria-hidden="true"><path d="{}"/></svg>
"#,
        x,
        y,
        fill,
        GITHUB_MARK,
        size = size
    )
}

/// `"<name><sep><estimated time>"`, unescaped.
fn language_label(language: &AggregatedLanguage, separator: &str) -> String {
    format!(
        "{}{}{}",
        language.name,
        separator,
        format_duration(estimated_hours(language.estimated_lines))
    )
}

/// Truncates to `max_px` first, then escapes, so entities are never split.
fn fit_label(text: &str, max_px: f64) -> String {
    escape_xml(&truncate_to_width(text, max_px)).into_owned()
}

/// Horizontal stacked usage bar, one segment per language. Segments never
/// shrink below `min_segment` so that tiny languages stay visible.
fn stacked_segments(
    languages: &[AggregatedLanguage],
    start_x: f64,
    available: f64,
    min_segment: f64,
    y: u32,
    height: u32,
) -> String {
    let total_percent = match languages.iter().map(|l| l.percent).sum::<f64>() {
        sum if sum > 0.0 => sum,
        _ => 100.0,
    };

    let mut x = start_x;
    let mut out = String::new();
    for language in languages {
        let width = (language.percent / total_percent * available).round().max(min_segment);
        out.push_str(&format!(
            r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="{r}" ry="{r}" fill="{}" />
"#,
            x,
            y,
            width,
            height,
            language_color(&language.name),
            r = height / 2
        ));
        x += width;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_stats() -> AggregationResult {
        let language = |name: &str, bytes: u64, percent: f64, lines: u64| AggregatedLanguage {
            name: name.to_string(),
            bytes,
            percent,
            estimated_lines: lines,
            committed_all_lines: lines / 2,
            committed_user_lines: lines / 4,
        };
        AggregationResult {
            languages: vec![
                language("TypeScript", 8000, 80.0, 190),
                language("JavaScript", 1990, 19.9, 47),
                language("<Weird & Lang>", 10, 0.1, 0),
            ],
            total_estimated_lines: 237,
            total_committed_lines_all: 12_345,
            total_committed_lines_user: 2_000,
            repo_count: 3,
        }
    }

    pub(crate) fn attr<'a>(svg: &'a str, name: &str) -> &'a str {
        let key = format!(" {}=\"", name);
        let start = svg.find(&key).map(|i| i + key.len()).unwrap_or(0);
        let end = svg[start..].find('"').map(|i| start + i).unwrap_or(start);
        &svg[start..end]
    }

    #[test]
    fn variant_parsing() {
        assert_eq!(CardVariant::parse(None), CardVariant::List);
        assert_eq!(CardVariant::parse(Some("list")), CardVariant::List);
        assert_eq!(CardVariant::parse(Some("Legend")), CardVariant::Legend);
        assert_eq!(CardVariant::parse(Some("compact")), CardVariant::Compact);
        assert_eq!(CardVariant::parse(Some("whatever")), CardVariant::Compact);
    }

    #[test]
    fn every_variant_renders_empty_stats() {
        let empty = AggregationResult::default();
        for variant in [CardVariant::List, CardVariant::Legend, CardVariant::Compact] {
            let params = CardRenderParams {
                variant,
                ..CardRenderParams::new("octocat", &empty)
            };
            let svg = render_card(&params);
            assert!(svg.starts_with("<?xml"), "{}", variant);
            assert!(svg.trim_end().ends_with("</svg>"), "{}", variant);
            assert!(!svg.contains("<circle"), "{} should have no rows", variant);
            assert!(attr(&svg, "height").parse::<u32>().unwrap() > 0);
        }
    }

    #[test]
    fn free_text_is_escaped() {
        let stats = sample_stats();
        for variant in [CardVariant::List, CardVariant::Legend, CardVariant::Compact] {
            let params = CardRenderParams {
                variant,
                title: Some("Me & <you>"),
                ..CardRenderParams::new("O'Brien \"dev\"", &stats)
            };
            let svg = render_card(&params);
            assert!(!svg.contains("<Weird"), "{}", variant);
            assert!(!svg.contains("<you>"), "{}", variant);
            assert!(svg.contains("&lt;Weird &amp; Lang&gt;"), "{}", variant);
        }
    }

    #[test]
    fn height_grows_with_rows() {
        let stats = sample_stats();
        let empty = AggregationResult::default();
        for variant in [CardVariant::List, CardVariant::Legend, CardVariant::Compact] {
            let full = render_card(&CardRenderParams {
                variant,
                ..CardRenderParams::new("octocat", &stats)
            });
            let bare = render_card(&CardRenderParams {
                variant,
                ..CardRenderParams::new("octocat", &empty)
            });
            let full_h: u32 = attr(&full, "height").parse().unwrap();
            let bare_h: u32 = attr(&bare, "height").parse().unwrap();
            assert!(full_h > bare_h, "{}", variant);
        }
    }

    #[test]
    fn unknown_theme_uses_light_palette() {
        let stats = sample_stats();
        let svg = render_card(&CardRenderParams {
            theme: Some("does-not-exist"),
            ..CardRenderParams::new("octocat", &stats)
        });
        assert!(svg.contains(r##"fill="#ffffff""##));
    }

    #[test]
    fn error_card_escapes_message() {
        let svg = render_error_card("bad <input>");
        assert!(svg.contains("Error: bad &lt;input&gt;"));
        assert!(svg.contains(r#"width="760""#));
    }
}
