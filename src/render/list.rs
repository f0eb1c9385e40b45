use super::text::{escape_xml, format_grouped};
use super::{fit_label, github_mark, language_label, svg_open, CardContext, DEFAULT_PERIOD};
use crate::languages::language_color;

const WIDTH: u32 = 520;
const PADDING_X: u32 = 16;
const NAME_Y: u32 = 22;
const HEADER_Y: u32 = NAME_Y + 18;
const SUBTITLE_Y: u32 = HEADER_Y + 16;
const ROW_HEIGHT: u32 = 22;
const FOOTER_HEIGHT: u32 = 26;
// separator under the subtitle plus padding
const CONTENT_START_Y: u32 = SUBTITLE_Y + 6 + 10;

pub(super) fn height(rows: usize) -> u32 {
    CONTENT_START_Y + rows as u32 * ROW_HEIGHT + 12 + FOOTER_HEIGHT + 12
}

fn separator(y: u32, color: &str) -> String {
    format!(
        r#"  <rect x="{}" y="{}" width="{}" height="2" rx="1" ry="1" fill="{}33" />
"#,
        PADDING_X,
        y,
        WIDTH - PADDING_X * 2,
        color
    )
}

pub(super) fn render(ctx: &CardContext<'_>) -> String {
    let theme = ctx.theme;
    let languages = ctx.languages();
    let height = height(languages.len());
    let label_budget = f64::from(WIDTH - PADDING_X * 2 - 40);

    let mut svg = svg_open(WIDTH, height, None);
    svg.push_str(&format!(
        r#"  <rect width="100%" height="100%" fill="{}" rx="10" ry="10" stroke="{}44" />
"#,
        theme.background, ctx.accent
    ));

    svg.push_str(&github_mark(PADDING_X, NAME_Y - 14, 18, theme.foreground));
    svg.push_str(&format!(
        r#"  <text x="{}" y="{}" fill="{}" font-size="16" font-weight="700">{}</text>
"#,
        PADDING_X + 24,
        NAME_Y,
        theme.foreground,
        escape_xml(ctx.params.display_name)
    ));
    svg.push_str(&format!(
        r#"  <text x="{}" y="{}" fill="{}" font-size="18" font-weight="700">{}</text>
"#,
        PADDING_X,
        HEADER_Y,
        theme.foreground,
        ctx.title()
    ));
    svg.push_str(&format!(
        r#"  <text x="{}" y="{}" fill="{}" font-size="12">Total LOC: {}</text>
"#,
        PADDING_X,
        SUBTITLE_Y,
        theme.subtext,
        format_grouped(ctx.params.stats.total_estimated_lines)
    ));
    svg.push_str(&separator(SUBTITLE_Y + 6, theme.subtext));

    for (i, language) in languages.iter().enumerate() {
        let y = CONTENT_START_Y + i as u32 * ROW_HEIGHT;
        svg.push_str(&format!(
            r#"  <g>
    <circle cx="{}" cy="{}" r="6" fill="{}" />
    <text x="{}" y="{}" fill="{}" font-size="13">{}</text>
  </g>
"#,
            PADDING_X + 8,
            y + 8,
            language_color(&language.name),
            PADDING_X + 22,
            y + 12,
            theme.foreground,
            fit_label(&language_label(language, " — "), label_budget)
        ));
    }

    svg.push_str(&separator(height - FOOTER_HEIGHT - 10, theme.subtext));
    svg.push_str(&format!(
        r#"  <text x="{}" y="{}" fill="{}" font-size="12">Tracking period: {}</text>
</svg>
"#,
        PADDING_X,
        height - 16,
        theme.subtext,
        escape_xml(ctx.params.period.unwrap_or(DEFAULT_PERIOD))
    ));
    svg
}

#[cfg(test)]
mod tests {
    use super::super::tests::{attr, sample_stats};
    use super::super::{render_card, CardRenderParams};
    use super::*;

    #[test]
    fn height_is_computed_from_rows() {
        assert_eq!(height(0), 122);
        assert_eq!(height(3), 122 + 3 * 22);
    }

    #[test]
    fn renders_one_row_per_language() {
        let stats = sample_stats();
        let svg = render_card(&CardRenderParams {
            period: Some("Last 7 days"),
            ..CardRenderParams::new("The Octocat", &stats)
        });

        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(attr(&svg, "height"), "188");
        assert!(svg.contains("TypeScript — 3 hrs 48 mins"));
        assert!(svg.contains("Total LOC: 237"));
        assert!(svg.contains("Tracking period: Last 7 days"));
        assert!(svg.contains("The Octocat"));
        assert!(svg.contains("#3178c6"));
    }

    #[test]
    fn long_names_are_truncated() {
        let mut stats = sample_stats();
        stats.languages[0].name = "L".repeat(200);
        let svg = render_card(&CardRenderParams::new("octocat", &stats));
        // 448px budget at 6px per char
        let expected = format!("{}…", "L".repeat(73));
        assert!(svg.contains(&expected));
        assert!(!svg.contains(&"L".repeat(75)));
    }

    #[test]
    fn accent_override_colors_the_border() {
        let stats = sample_stats();
        let svg = render_card(&CardRenderParams {
            accent: Some("#ff0000"),
            ..CardRenderParams::new("octocat", &stats)
        });
        assert!(svg.contains(r##"stroke="#ff000044""##));
    }
}
