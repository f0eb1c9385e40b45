use super::{fit_label, language_label, stacked_segments, svg_open, CardContext};
use crate::languages::language_color;

const WIDTH: u32 = 500;
const PADDING_X: u32 = 16;
const HEADER_HEIGHT: u32 = 40;
const ROW_HEIGHT: u32 = 22;
const MIN_SEGMENT: f64 = 6.0;
const UNDERLINE_SHARE: f64 = 0.6;

pub(super) fn height(rows: usize) -> u32 {
    HEADER_HEIGHT + 28 + rows as u32 * ROW_HEIGHT + 20
}

pub(super) fn render(ctx: &CardContext<'_>) -> String {
    let theme = ctx.theme;
    let languages = ctx.languages();
    let height = height(languages.len());
    let inner_width = WIDTH - PADDING_X * 2;
    let label_budget = f64::from(inner_width) - 40.0;

    let mut svg = svg_open(WIDTH, height, None);
    svg.push_str(&format!(
        r##"  <defs>
    <filter id="shadow" x="-20%" y="-20%" width="140%" height="140%">
      <feDropShadow dx="0" dy="2" stdDeviation="3" flood-color="#000000" flood-opacity="0.18" />
    </filter>
  </defs>
  <rect width="100%" height="100%" fill="{}" rx="10" ry="10" stroke="{}66" filter="url(#shadow)" />
"##,
        theme.background, ctx.accent
    ));

    // usage bar
    svg.push_str(&format!(
        r#"  <rect x="{}" y="10" width="{}" height="14" rx="7" ry="7" fill="{}22" />
"#,
        PADDING_X, inner_width, theme.subtext
    ));
    svg.push_str(&stacked_segments(
        languages,
        f64::from(PADDING_X + 8),
        f64::from(inner_width - 16),
        MIN_SEGMENT,
        12,
        10,
    ));

    svg.push_str(&format!(
        r#"  <text x="{}" y="30" fill="{}" font-size="16" font-weight="700">{}</text>
"#,
        PADDING_X,
        theme.foreground,
        ctx.title()
    ));

    let underline = (f64::from(inner_width) * UNDERLINE_SHARE).round().max(30.0);
    svg.push_str(&format!(
        r#"  <rect x="{x}" y="36" width="{}" height="6" rx="3" ry="3" fill="{}22" />
  <rect x="{x}" y="36" width="{}" height="6" rx="3" ry="3" fill="{}" />
"#,
        inner_width,
        theme.subtext,
        underline,
        ctx.accent,
        x = PADDING_X
    ));

    for (i, language) in languages.iter().enumerate() {
        let y = HEADER_HEIGHT + 16 + i as u32 * ROW_HEIGHT;
        svg.push_str(&format!(
            r#"  <g>
    <circle cx="{}" cy="{}" r="6" fill="{}" />
    <text x="{}" y="{}" fill="{}" font-size="12">{}</text>
  </g>
"#,
            PADDING_X + 8,
            y + 8,
            language_color(&language.name),
            PADDING_X + 22,
            y + 12,
            theme.foreground,
            fit_label(&language_label(language, " - "), label_budget)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}
