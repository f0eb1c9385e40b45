use std::borrow::Cow;

const HASHED_SATURATION: f64 = 65.0;
const HASHED_LIGHTNESS: f64 = 52.0;

fn curated_color(language: &str) -> Option<&'static str> {
    let color = match language {
        "TypeScript" => "#3178c6",
        "JavaScript" => "#f1e05a",
        "Python" => "#3572A5",
        "Java" => "#b07219",
        "Go" => "#00ADD8",
        "C" => "#555555",
        "C++" => "#f34b7d",
        "C#" => "#178600",
        "PHP" => "#4F5D95",
        "Ruby" => "#701516",
        "Rust" => "#dea584",
        "Swift" => "#F05138",
        "Kotlin" => "#A97BFF",
        "Dart" => "#00B4AB",
        "Scala" => "#c22d40",
        "Shell" => "#89e051",
        "HTML" => "#e34c26",
        "CSS" => "#563d7c",
        "SCSS" => "#c6538c",
        "Vue" => "#41b883",
        "Svelte" => "#ff3e00",
        "Elixir" => "#6e4a7e",
        "Haskell" => "#5e5086",
        "Lua" => "#000080",
        "Objective-C" => "#438eff",
        "R" => "#198CE7",
        _ => return None,
    };
    Some(color)
}

/// Display color for a language: the curated color when known, otherwise a
/// color derived from a hash of the name. Stable across runs.
pub fn language_color(language: &str) -> Cow<'static, str> {
    match curated_color(language) {
        Some(color) => Cow::Borrowed(color),
        None => Cow::Owned(hsl_to_hex(
            hue_for_name(language) as f64,
            HASHED_SATURATION,
            HASHED_LIGHTNESS,
        )),
    }
}

/// 32-bit rolling hash (`h * 31 + c` over UTF-16 code units), absolute value.
pub fn name_hash(name: &str) -> u32 {
    name.encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

pub fn hue_for_name(name: &str) -> u32 {
    name_hash(name) % 360
}

pub fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let s = saturation / 100.0;
    let l = lightness / 100.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match hue {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn any_name_maps_to_a_hue_and_hex_color(name in ".{0,40}") {
            prop_assert!(hue_for_name(&name) < 360);
            let color = language_color(&name);
            prop_assert_eq!(color.len(), 7);
            prop_assert!(color.starts_with('#'));
            prop_assert_eq!(color, language_color(&name));
        }
    }

    #[test]
    fn curated_languages_keep_their_color() {
        assert_eq!(language_color("Rust"), "#dea584");
        assert_eq!(language_color("TypeScript"), "#3178c6");
    }

    #[test]
    fn unknown_languages_hash_to_stable_colors() {
        assert_eq!(name_hash("Zig"), 89848);
        assert_eq!(hue_for_name("Zig"), 208);
        assert_eq!(language_color("Zig"), "#358ad4");
        assert_eq!(language_color("Makefile"), "#d435af");
        assert_eq!(language_color("Jupyter Notebook"), "#d4a435");
        assert_eq!(language_color("Zig"), language_color("Zig"));
    }

    #[test]
    fn hue_stays_in_range() {
        for name in ["", "HCL", "Nix", "Jupyter Notebook", "a very long language name indeed"] {
            assert!(hue_for_name(name) < 360);
            let color = language_color(name);
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
        }
    }

    #[test]
    fn hsl_primary_sectors() {
        assert_eq!(hsl_to_hex(0.0, 100.0, 50.0), "#ff0000");
        assert_eq!(hsl_to_hex(120.0, 100.0, 50.0), "#00ff00");
        assert_eq!(hsl_to_hex(240.0, 100.0, 50.0), "#0000ff");
        assert_eq!(hsl_to_hex(0.0, 0.0, 100.0), "#ffffff");
    }
}
