//! Station name disambiguation.
//!
//! Several Japanese stations share a bare name across regions (草津
//! exists in both Shiga and Gunma). Ekispert resolves the ambiguity
//! with a parenthesised prefecture suffix, so known-ambiguous names
//! are rewritten to that form before they become part of a query key.
//! The table is a fixed lookup, not a general solver.

use std::collections::HashMap;

/// Lookup table rewriting known-ambiguous station names to their
/// prefecture-qualified form.
#[derive(Debug, Clone)]
pub struct StationAliases {
    table: HashMap<String, String>,
}

impl Default for StationAliases {
    fn default() -> Self {
        let mut table = HashMap::new();
        table.insert("草津".to_string(), "草津(滋賀)".to_string());
        Self { table }
    }
}

impl StationAliases {
    /// Create an empty table (no rewrites beyond trimming).
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Add an alias entry.
    pub fn with_alias(mut self, name: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.table.insert(name.into(), replacement.into());
        self
    }

    /// Normalize a raw station name for use in a query key.
    ///
    /// Trims whitespace and a trailing 駅 suffix. A name that already
    /// carries a parenthesised region is returned unchanged; a table
    /// hit is rewritten; anything else passes through verbatim.
    pub fn normalize(&self, raw: &str) -> String {
        let name = raw.trim();

        if name.contains('(') && name.contains(')') {
            return name.to_string();
        }

        let name = name.strip_suffix('駅').unwrap_or(name);

        match self.table.get(name) {
            Some(replacement) => replacement.clone(),
            None => name.to_string(),
        }
    }
}
