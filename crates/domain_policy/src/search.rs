//! Search terms for the listing queries

use serde::{Deserialize, Serialize};
use std::fmt;

/// A trimmed, non-blank search term
///
/// Matching is a case-insensitive substring test. Blank input yields no term
/// at all, which the listings treat as "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Builds a term from raw query input
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| SearchTerm(term.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `haystack` contains this term, ignoring case
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }

    /// An `ILIKE` pattern with `%`, `_` and `\` escaped
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for c in self.0.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
