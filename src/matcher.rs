//! Free-form component name resolution
//!
//! Resolves marketing names ("ASUS TUF Gaming RTX 4070 OC 12GB") to
//! canonical catalog keys ("GeForce RTX 4070"). Three strategies are
//! tried in order, first hit wins:
//!
//! 1. Case-insensitive exact match against catalog keys.
//! 2. Model-token extraction: a kind-specific pattern pulls the model
//!    designation out of the input ("RTX 4070", "i9-14900K",
//!    "Ryzen 7 7800X3D") and compares it against the token extracted
//!    from each catalog key — token equality first, then containment.
//! 3. Substring containment either direction on the full strings.
//!
//! Ties within a strategy resolve to the first catalog entry in
//! declaration order. No strategy ever invents an entry: an
//! unresolvable name is `None`, and callers treat that as "benchmarks
//! unavailable".

use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::ComponentKind;

// Ordered per kind; more specific model families first.
const GPU_PATTERNS: &[&str] = &[
    r"(?i)\bRTX\s*\d{4}(\s*Ti)?(\s*Super)?\b",
    r"(?i)\bGTX\s*\d{3,4}(\s*Ti)?\b",
    r"(?i)\bRX\s*\d{3,4}(\s*(XTX|XT|GRE))?\b",
    r"(?i)\bArc\s*A\d{3}\b",
    r"(?i)\bA\d{3}\b",
];

const CPU_PATTERNS: &[&str] = &[
    r"(?i)\bi[3579]-\d{4,5}[A-Z]*\b",
    r"(?i)\bRyzen\s*[3579]\s*\d{4}[A-Z0-9]*\b",
];

fn compiled(kind: ComponentKind) -> &'static [Regex] {
    static GPU: OnceLock<Vec<Regex>> = OnceLock::new();
    static CPU: OnceLock<Vec<Regex>> = OnceLock::new();
    let (cell, sources) = match kind {
        ComponentKind::Gpu => (&GPU, GPU_PATTERNS),
        ComponentKind::Cpu => (&CPU, CPU_PATTERNS),
    };
    cell.get_or_init(|| {
        sources
            .iter()
            .map(|p| match Regex::new(p) {
                Ok(re) => re,
                // Static pattern set; a failure here is a build defect.
                Err(e) => panic!("invalid model pattern {p}: {e}"),
            })
            .collect()
    })
}

/// Uppercase, whitespace collapsed to single spaces.
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Resolves free-form component names against a catalog key list.
#[derive(Debug, Clone, Copy)]
pub struct ComponentMatcher {
    kind: ComponentKind,
}

impl ComponentMatcher {
    pub fn new(kind: ComponentKind) -> Self {
        Self { kind }
    }

    /// Extract the normalized model token from a name, if any pattern hits.
    pub fn model_token(&self, name: &str) -> Option<String> {
        for pattern in compiled(self.kind) {
            if let Some(m) = pattern.find(name) {
                return Some(normalize(m.as_str()));
            }
        }
        None
    }

    /// Resolve `input` to a catalog key. `keys` must be in catalog
    /// declaration order; ties go to the first key.
    pub fn best_match<'a, I>(&self, input: &str, keys: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if let Some(key) = self.exact(input, keys.clone()) {
            return Some(key);
        }
        if let Some(key) = self.by_model_token(input, keys.clone()) {
            return Some(key);
        }
        self.by_substring(input, keys)
    }

    /// Strategy 1: case-insensitive exact match.
    fn exact<'a, I>(&self, input: &str, keys: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        keys.into_iter().find(|k| k.eq_ignore_ascii_case(input))
    }

    /// Strategy 2: model-token comparison. Token equality is preferred
    /// over containment so "RTX 4070" resolves to "GeForce RTX 4070"
    /// even when "GeForce RTX 4070 Ti Super" is declared earlier.
    fn by_model_token<'a, I>(&self, input: &str, keys: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        let token = self.model_token(input)?;
        for key in keys.clone() {
            if self.model_token(key).as_deref() == Some(token.as_str()) {
                return Some(key);
            }
        }
        for key in keys {
            let norm_key = normalize(key);
            if norm_key.contains(&token) || token.contains(&norm_key) {
                return Some(key);
            }
        }
        None
    }

    /// Strategy 3: whole-string containment either direction.
    fn by_substring<'a, I>(&self, input: &str, keys: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let norm_input = normalize(input);
        keys.into_iter().find(|key| {
            let norm_key = normalize(key);
            norm_input.contains(&norm_key) || norm_key.contains(&norm_input)
        })
    }
}
