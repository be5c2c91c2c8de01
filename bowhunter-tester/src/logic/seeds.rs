use anyhow::{Result, bail};
use std::collections::HashSet;
use std::hash::Hasher;
use twox_hash::XxHash64;

const DEFAULT_SEED: u64 = 1337;

/// A resolved seed and the word it came from, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub phrase: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, phrase: None }
    }

    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        let normalized = phrase.to_ascii_lowercase();
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(normalized.as_bytes());
        Self {
            seed: hasher.finish(),
            phrase: Some(normalized),
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        match &self.phrase {
            Some(phrase) => format!("{phrase} ({})", self.seed),
            None => self.seed.to_string(),
        }
    }
}

/// Resolve CLI seed arguments into seeds.
///
/// Integers are used as-is (negative values by magnitude); bare words are
/// hashed so a memorable phrase always replays the same run.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        let info = if let Ok(value) = token.parse::<u64>() {
            SeedInfo::from_numeric(value)
        } else if let Ok(value) = token.parse::<i64>() {
            SeedInfo::from_numeric(value.unsigned_abs())
        } else if token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            SeedInfo::from_phrase(token)
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        if seen.insert(info.seed) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_numbers_and_phrases() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "Meadow"])).unwrap();
        assert_eq!(seeds[0], SeedInfo::from_numeric(42));
        assert_eq!(seeds[1], SeedInfo::from_numeric(7));
        assert_eq!(seeds[2].phrase.as_deref(), Some("meadow"));
        assert_eq!(seeds[2].seed, SeedInfo::from_phrase("MEADOW").seed);
    }

    #[test]
    fn duplicates_collapse_and_empty_defaults() {
        let seeds = resolve_seed_inputs(&tokens(&["5", "5", "-5"])).unwrap();
        assert_eq!(seeds.len(), 1);
        let fallback = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(fallback, vec![SeedInfo::from_numeric(DEFAULT_SEED)]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&tokens(&["not a seed!"])).is_err());
    }
}
