/// Average source bytes per line for languages not listed below.
pub const FALLBACK_BYTES_PER_LINE: u32 = 50;

pub fn bytes_per_line(language: &str) -> u32 {
    match language {
        "TypeScript" | "JavaScript" => 42,
        "Python" => 38,
        "Java" => 45,
        "Go" => 44,
        "C" => 40,
        "C++" | "C#" => 44,
        "PHP" => 46,
        "Ruby" => 40,
        "Rust" => 46,
        "Swift" | "Kotlin" | "Dart" => 44,
        "Scala" => 46,
        "Shell" => 28,
        "HTML" => 55,
        "CSS" | "SCSS" => 52,
        "Vue" | "Svelte" => 48,
        "Elixir" => 40,
        "Haskell" => 46,
        "Lua" => 36,
        "Objective-C" => 46,
        "R" => 42,
        "JSON" => 90,
        "YAML" => 80,
        "Markdown" => 70,
        _ => FALLBACK_BYTES_PER_LINE,
    }
}

pub fn estimate_lines(language: &str, bytes: u64) -> u64 {
    (bytes as f64 / bytes_per_line(language) as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_languages_use_curated_ratio() {
        assert_eq!(bytes_per_line("TypeScript"), 42);
        assert_eq!(bytes_per_line("Shell"), 28);
        assert_eq!(estimate_lines("TypeScript", 8400), 200);
        assert_eq!(estimate_lines("Python", 57), 2); // 1.5 rounds up
    }

    #[test]
    fn unlisted_languages_use_fallback() {
        assert_eq!(bytes_per_line("Zig"), FALLBACK_BYTES_PER_LINE);
        // lookup is exact, not case-insensitive
        assert_eq!(bytes_per_line("typescript"), FALLBACK_BYTES_PER_LINE);
        assert_eq!(estimate_lines("Zig", 124), 2);
        assert_eq!(estimate_lines("Zig", 0), 0);
    }
}
