//! Manual bed-capacity corrections.
//!
//! HOSxP reports a bed count per ward that is known to be wrong for some ICU units. The override
//! table replaces those totals and recomputes availability. The table is built once at startup
//! and is read-only afterwards.

use crate::constants::DEFAULT_CAPACITY_OVERRIDES;
use crate::error::{WardError, WardResult};
use crate::ward::MergedWard;
use std::collections::HashMap;

/// Mapping of `ward_code` to the true number of beds on that ward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapacityOverrideTable {
    totals: HashMap<String, u32>,
}

impl Default for CapacityOverrideTable {
    fn default() -> Self {
        Self::from_pairs(
            DEFAULT_CAPACITY_OVERRIDES
                .iter()
                .map(|(code, beds)| ((*code).to_string(), *beds)),
        )
    }
}

impl CapacityOverrideTable {
    /// A table that overrides nothing.
    pub fn empty() -> Self {
        Self {
            totals: HashMap::new(),
        }
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        Self {
            totals: pairs.into_iter().collect(),
        }
    }

    /// Parse a `code:beds,code:beds` list.
    ///
    /// Whitespace around entries is ignored and an empty string yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns `WardError::InvalidCapacityOverride` naming the first entry that is not a
    /// non-empty code followed by a non-negative integer.
    pub fn parse(value: &str) -> WardResult<Self> {
        let mut totals = HashMap::new();

        for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (code, beds) = entry
                .split_once(':')
                .ok_or_else(|| WardError::InvalidCapacityOverride(entry.to_string()))?;
            let code = code.trim();
            if code.is_empty() {
                return Err(WardError::InvalidCapacityOverride(entry.to_string()));
            }
            let beds = beds
                .trim()
                .parse::<u32>()
                .map_err(|_| WardError::InvalidCapacityOverride(entry.to_string()))?;
            totals.insert(code.to_string(), beds);
        }

        Ok(Self { totals })
    }

    pub fn get(&self, ward_code: &str) -> Option<u32> {
        self.totals.get(ward_code).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Apply the table to one ward.
    ///
    /// `available_beds` is clamped at zero when the ward holds more patients than its corrected
    /// capacity. Wards not in the table are returned untouched.
    pub fn apply_to(&self, mut ward: MergedWard) -> MergedWard {
        if let Some(total) = self.get(&ward.ward_code) {
            ward.total_beds = total;
            ward.available_beds = i64::from(total.saturating_sub(ward.patient_count));
        }
        ward
    }

    pub fn apply(&self, wards: Vec<MergedWard>) -> Vec<MergedWard> {
        wards.into_iter().map(|ward| self.apply_to(ward)).collect()
    }
}
