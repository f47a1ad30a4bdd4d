//! Material factor table
//!
//! Maps a normalized (lower-case) material grade to the cutting-time
//! multiplier. Unknown grades are not an error; they use the neutral factor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lookup table from material grade to cutting-time multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct MaterialFactorTable {
    factors: BTreeMap<String, f64>,
}

impl MaterialFactorTable {
    /// Factor applied to grades missing from the table
    pub const NEUTRAL_FACTOR: f64 = 1.0;

    /// The shop-floor table the legacy spreadsheets were calibrated against
    pub fn standard() -> Self {
        Self::from_entries([
            ("aluminum", 0.8),
            ("steel", 1.0),
            ("stainless steel", 1.5),
            ("cast iron", 1.1),
            ("titanium", 1.8),
            ("brass", 0.9),
            ("copper", 0.85),
        ])
    }

    /// Build a table, normalizing every key
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let factors = entries
            .into_iter()
            .map(|(grade, factor)| (normalize(grade.as_ref()), factor))
            .collect();
        Self { factors }
    }

    /// Factor for a grade; case-insensitive, unknown grades → 1.0
    pub fn factor(&self, grade: &str) -> f64 {
        self.factors
            .get(&normalize(grade))
            .copied()
            .unwrap_or(Self::NEUTRAL_FACTOR)
    }

    pub fn contains(&self, grade: &str) -> bool {
        self.factors.contains_key(&normalize(grade))
    }

    /// Overlay another table; its entries win
    pub fn extend(&mut self, other: MaterialFactorTable) {
        self.factors.extend(other.factors);
    }

    /// Entries in key order
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.factors.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for MaterialFactorTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<BTreeMap<String, f64>> for MaterialFactorTable {
    fn from(map: BTreeMap<String, f64>) -> Self {
        Self::from_entries(map)
    }
}

impl From<MaterialFactorTable> for BTreeMap<String, f64> {
    fn from(table: MaterialFactorTable) -> Self {
        table.factors
    }
}

/// Normalize a material grade for lookup
pub fn normalize(grade: &str) -> String {
    grade.to_lowercase()
}
