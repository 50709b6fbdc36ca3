//! Joins HOSxP bed occupancy with ICU database risk counts.

use crate::ward::{MergedWard, RiskCounts, WardBedRecord, WardRiskRecord};
use std::collections::HashMap;

/// Attaches risk counts to each bed record by `ward_code`.
///
/// Bed data decides which wards exist: the output has the same length and order as `beds`, and
/// risk records without a matching bed record are dropped. A ward with no risk record gets zero
/// in every tier. If the risk data repeats a ward code the last record wins.
pub fn merge_ward_data(beds: Vec<WardBedRecord>, risks: Vec<WardRiskRecord>) -> Vec<MergedWard> {
    let risk_lookup: HashMap<String, RiskCounts> = risks
        .iter()
        .map(|record| (record.ward_code.clone(), RiskCounts::from(record)))
        .collect();

    beds.into_iter()
        .map(|bed| {
            let risk = risk_lookup
                .get(&bed.ward_code)
                .copied()
                .unwrap_or_default();
            MergedWard {
                ward_code: bed.ward_code,
                ward_name: bed.ward_name,
                total_beds: bed.total_beds,
                patient_count: bed.patient_count,
                available_beds: bed.available_beds,
                risk,
            }
        })
        .collect()
}
