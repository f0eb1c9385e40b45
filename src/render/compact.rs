use super::text::{escape_xml, estimated_hours, format_compact, format_grouped};
use super::{fit_label, github_mark, language_label, stacked_segments, svg_open, CardContext};
use crate::languages::language_color;
use crate::models::AggregationResult;

const WIDTH: u32 = 600;
const PADDING_X: u32 = 16;
const HEADER_HEIGHT: u32 = 72;
const ROW_HEIGHT: u32 = 24;
const BADGES_HEIGHT: u32 = 28;
const LABEL_START_X: u32 = 160;
const MIN_SEGMENT: f64 = 4.0;
const BADGE_WIDTH: u32 = 170;
const BADGE_GAP: u32 = 14;

pub(super) fn height(rows: usize) -> u32 {
    HEADER_HEIGHT + 20 + rows as u32 * ROW_HEIGHT + 8 + BADGES_HEIGHT + 10
}

/// How many badge slots fit on the single badge row.
pub(super) fn badge_slots() -> usize {
    let inner = WIDTH - PADDING_X * 2;
    (((inner + BADGE_GAP) / (BADGE_WIDTH + BADGE_GAP)) as usize).max(1)
}

/// Summary badges in display order; optional ones only when positive.
pub(super) fn badge_texts(stats: &AggregationResult, tracked_hours: Option<f64>) -> Vec<String> {
    let mut badges = vec![
        format!("LOC: {}", format_grouped(stats.total_estimated_lines)),
        format!("Time: {:.1} h", estimated_hours(stats.total_estimated_lines)),
        format!("Committed(all): {}", format_compact(stats.total_committed_lines_all)),
    ];
    if stats.total_committed_lines_user > 0 {
        badges.push(format!(
            "Committed(you): {}",
            format_compact(stats.total_committed_lines_user)
        ));
    }
    badges.push(format!("{} repos", stats.repo_count));
    if let Some(hours) = tracked_hours.filter(|h| *h > 0.0) {
        badges.push(format!("WakaTime: {:.1} h", hours));
    }
    badges
}

pub(super) fn render(ctx: &CardContext<'_>) -> String {
    let theme = ctx.theme;
    let params = ctx.params;
    let languages = ctx.languages();
    let rows = languages.len();
    let height = height(rows);
    let inner_width = WIDTH - PADDING_X * 2;
    let track_width = WIDTH - (LABEL_START_X + PADDING_X);
    let label_budget = f64::from(WIDTH - PADDING_X - LABEL_START_X);

    let aria = format!("GitHub language stats for {}", params.display_name);
    let mut svg = svg_open(WIDTH, height, Some(&aria));
    svg.push_str(&format!(
        r#"  <rect width="100%" height="100%" fill="{}" rx="12" ry="12" />
  <rect x="{}" y="12" width="{}" height="10" rx="5" ry="5" fill="{}22" />
"#,
        theme.background, PADDING_X, inner_width, theme.subtext
    ));
    svg.push_str(&stacked_segments(
        languages,
        f64::from(PADDING_X),
        f64::from(inner_width),
        MIN_SEGMENT,
        14,
        6,
    ));

    svg.push_str(&github_mark(PADDING_X, 24, 20, theme.foreground));
    svg.push_str(&format!(
        r#"  <text x="{}" y="40" fill="{}" font-size="18" font-weight="700">{}</text>
  <text x="{}" y="58" fill="{}" font-size="12">Language usage across public repositories</text>
"#,
        PADDING_X + 26,
        theme.foreground,
        escape_xml(params.display_name),
        PADDING_X,
        theme.subtext
    ));

    for (i, language) in languages.iter().enumerate() {
        let y = HEADER_HEIGHT + 16 + i as u32 * ROW_HEIGHT;
        let bar = (language.percent / 100.0 * f64::from(track_width))
            .round()
            .max(2.0);
        svg.push_str(&format!(
            r#"  <g>
    <rect x="{x}" y="{}" rx="6" ry="6" width="{}" height="14" fill="{}22" />
    <rect x="{x}" y="{}" rx="6" ry="6" width="{}" height="14" fill="{}" />
    <circle cx="{}" cy="{}" r="5" fill="{}" />
    <text x="{}" y="{}" fill="{}" font-size="12">{}</text>
  </g>
"#,
            y - 12,
            track_width,
            theme.border,
            y - 12,
            bar,
            ctx.accent,
            PADDING_X + 8,
            y - 6,
            language_color(&language.name),
            PADDING_X + 20,
            y - 2,
            theme.foreground,
            fit_label(&language_label(language, " - "), label_budget),
            x = LABEL_START_X
        ));
    }

    let badges_y = HEADER_HEIGHT + 16 + rows as u32 * ROW_HEIGHT + 6;
    let badges = badge_texts(params.stats, params.tracked_hours);
    for (i, badge) in badges.iter().take(badge_slots()).enumerate() {
        let x = PADDING_X + i as u32 * (BADGE_WIDTH + BADGE_GAP);
        svg.push_str(&format!(
            r#"  <g>
    <rect x="{}" y="{}" rx="8" ry="8" width="{}" height="22" fill="{}22" stroke="{}" />
    <text x="{}" y="{}" fill="{}" font-size="12">{}</text>
  </g>
"#,
            x,
            badges_y,
            BADGE_WIDTH,
            theme.border,
            theme.border,
            x + 10,
            badges_y + 15,
            theme.subtext,
            fit_label(badge, f64::from(BADGE_WIDTH - 20))
        ));
    }

    svg.push_str("</svg>\n");
    svg
}
