use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub background: &'static str,
    pub foreground: &'static str,
    pub subtext: &'static str,
    pub border: &'static str,
}

const fn theme(
    background: &'static str,
    foreground: &'static str,
    subtext: &'static str,
    border: &'static str,
) -> Theme {
    Theme {
        background,
        foreground,
        subtext,
        border,
    }
}

pub const DEFAULT_THEME: &str = "light";

pub static THEMES: [(&str, Theme); 15] = [
    ("light", theme("#ffffff", "#111827", "#374151", "#e5e7eb")),
    ("dark", theme("#0b1220", "#e5e7eb", "#94a3b8", "#1f2937")),
    ("dracula", theme("#282a36", "#f8f8f2", "#bd93f9", "#44475a")),
    ("nord", theme("#2e3440", "#e5e9f0", "#88c0d0", "#4c566a")),
    ("radical", theme("#141321", "#fe428e", "#a9fef7", "#2b2a3b")),
    ("github", theme("#ffffff", "#24292f", "#57606a", "#d0d7de")),
    ("transparent", theme("transparent", "#111827", "#6b7280", "#00000000")),
    ("tokyonight", theme("#1a1b26", "#c0caf5", "#7aa2f7", "#24283b")),
    ("gruvbox", theme("#282828", "#ebdbb2", "#d79921", "#3c3836")),
    ("monokai", theme("#272822", "#f8f8f2", "#66d9ef", "#3e3d32")),
    ("rose-pine", theme("#191724", "#e0def4", "#9ccfd8", "#26233a")),
    ("catppuccin-mocha", theme("#1e1e2e", "#cdd6f4", "#94e2d5", "#313244")),
    ("catppuccin-latte", theme("#eff1f5", "#4c4f69", "#179299", "#ccd0da")),
    ("night-owl", theme("#011627", "#d6deeb", "#82aaff", "#0b2942")),
    ("ayu-dark", theme("#0a0e14", "#b3b1ad", "#39bae6", "#151a21")),
];

/// Case-insensitive palette lookup; unknown or missing names get `light`.
pub fn resolve_theme(name: Option<&str>) -> &'static Theme {
    let name = name.map(str::trim).unwrap_or(DEFAULT_THEME);
    THEMES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, theme)| theme)
        .unwrap_or(&THEMES[0].1)
}

pub fn theme_names() -> impl Iterator<Item = &'static str> {
    THEMES.iter().map(|(name, _)| *name)
}

/// Accepts `abc`, `#abc`, `a1b2c3` or `#a1b2c3` and returns it with a leading
/// `#`. Anything else is rejected.
pub fn normalize_accent(raw: &str) -> Option<String> {
    let hex = raw.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    let valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    valid.then(|| format!("#{}", hex.to_ascii_lowercase()))
}
