use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageByteStat {
    pub name: String,
    pub bytes: u64,
}

/// Language → byte count breakdown for one repository, in the order the API
/// reported it. Non-numeric byte counts decode as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageBytes(pub Vec<LanguageByteStat>);

impl LanguageBytes {
    pub fn iter(&self) -> impl Iterator<Item = &LanguageByteStat> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
impl<const N: usize> From<[(&str, u64); N]> for LanguageBytes {
    fn from(pairs: [(&str, u64); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(name, bytes)| LanguageByteStat {
                    name: name.to_string(),
                    bytes,
                })
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for LanguageBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LanguageBytesVisitor;

        impl<'de> Visitor<'de> for LanguageBytesVisitor {
            type Value = LanguageBytes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping language names to byte counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut stats = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, Value>()? {
                    stats.push(LanguageByteStat {
                        name,
                        bytes: byte_count(&value),
                    });
                }
                Ok(LanguageBytes(stats))
            }
        }

        deserializer.deserialize_map(LanguageBytesVisitor)
    }
}

fn byte_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Per-repository byte distribution, used only to weight that repository's
/// commit additions across its languages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepoLanguageProfile {
    pub total_bytes: u64,
    pub languages: Vec<LanguageByteStat>,
}

impl RepoLanguageProfile {
    pub fn from_bytes(bytes: &LanguageBytes) -> Self {
        let mut profile = Self::default();
        for stat in bytes.iter() {
            profile.total_bytes += stat.bytes;
            match profile.languages.iter_mut().find(|l| l.name == stat.name) {
                Some(existing) => existing.bytes += stat.bytes,
                None => profile.languages.push(stat.clone()),
            }
        }
        profile
    }

    /// Splits `additions` across the repository's languages by byte share.
    /// Yields nothing when the repository has no bytes to weight by.
    pub fn distribute(&self, additions: u64) -> impl Iterator<Item = (&str, f64)> + '_ {
        let total = self.total_bytes;
        self.languages
            .iter()
            .filter(move |_| total > 0)
            .map(move |l| (l.name.as_str(), additions as f64 * (l.bytes as f64 / total as f64)))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn numbered(bytes: &[u64]) -> LanguageBytes {
        LanguageBytes(
            bytes
                .iter()
                .enumerate()
                .map(|(i, &bytes)| LanguageByteStat {
                    name: format!("Lang{}", i),
                    bytes,
                })
                .collect(),
        )
    }

    proptest! {
        #[test]
        fn distribution_conserves_additions(
            bytes in prop::collection::vec(0u64..5_000_000, 1..12),
            additions in 0u64..10_000_000,
        ) {
            let profile = RepoLanguageProfile::from_bytes(&numbered(&bytes));
            let shares: Vec<f64> = profile.distribute(additions).map(|(_, v)| v).collect();

            if profile.total_bytes == 0 {
                prop_assert!(shares.is_empty());
            } else {
                let sum: f64 = shares.iter().sum();
                prop_assert!((sum - additions as f64).abs() <= 1e-6 * (additions.max(1) as f64));

                // rounding moves each share by at most half a line
                let rounded: f64 = shares.iter().map(|v| v.round()).sum();
                let bound = shares.len() as f64 / 2.0 + 1e-3;
                prop_assert!((rounded - additions as f64).abs() <= bound);
            }
        }
    }

    #[test]
    fn deserialize_preserves_api_order() {
        let json = r#"{"TypeScript": 8000, "CSS": 300, "JavaScript": 2000}"#;
        let bytes: LanguageBytes = serde_json::from_str(json).unwrap();
        let names: Vec<_> = bytes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["TypeScript", "CSS", "JavaScript"]);
        assert_eq!(bytes.0[2].bytes, 2000);
    }

    #[test]
    fn deserialize_tolerates_malformed_counts() {
        let bytes: LanguageBytes =
            serde_json::from_str(r#"{"Go": "120", "Rust": null, "C": -5, "Zig": 10.0}"#).unwrap();
        let counts: Vec<_> = bytes.iter().map(|s| s.bytes).collect();
        assert_eq!(counts, [120, 0, 0, 10]);
    }

    #[test]
    fn distribute_conserves_additions() {
        let profile = RepoLanguageProfile::from_bytes(&LanguageBytes::from([
            ("TypeScript", 8000),
            ("JavaScript", 2000),
        ]));
        assert_eq!(profile.total_bytes, 10_000);

        let shares: Vec<_> = profile.distribute(100).collect();
        assert_eq!(shares.len(), 2);
        assert!((shares[0].1 - 80.0).abs() < 1e-9);
        assert!((shares[1].1 - 20.0).abs() < 1e-9);

        let odd = RepoLanguageProfile::from_bytes(&LanguageBytes::from([
            ("A", 1),
            ("B", 1),
            ("C", 1),
        ]));
        let sum: f64 = odd.distribute(1000).map(|(_, v)| v).sum();
        assert!((sum - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn distribute_skips_empty_profiles() {
        let profile = RepoLanguageProfile::from_bytes(&LanguageBytes::from([("Rust", 0)]));
        assert_eq!(profile.distribute(500).count(), 0);
        assert_eq!(RepoLanguageProfile::default().distribute(500).count(), 0);
    }
}
