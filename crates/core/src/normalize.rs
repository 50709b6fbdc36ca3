//! Risk-count normalization.
//!
//! Nursing staff enter risk tiers by hand, so the tiers rarely add up to the HOSxP patient
//! count. Normalization forces `high + medium + low == patient_count`:
//!
//! - **Deficit**: patients without a tier are counted as high risk.
//! - **Surplus**: excess counts are removed from low, then medium, then high, never taking a
//!   tier below zero.
//!
//! Each ward is normalized on its own; there is no interaction between wards.

use crate::ward::{MergedWard, NormalizedWard, RiskCounts};

/// Balance `counts` against `patient_count`.
pub fn normalize_risk_counts(counts: RiskCounts, patient_count: u32) -> RiskCounts {
    let total = counts.total();
    let target = u64::from(patient_count);

    if total < target {
        // high + deficit == patient_count - medium - low, which fits in u32
        let deficit = (target - total) as u32;
        return RiskCounts {
            high: counts.high + deficit,
            ..counts
        };
    }

    let mut surplus = total - target;
    let mut deduct = |tier: u32| -> u32 {
        let taken = u64::from(tier).min(surplus);
        surplus -= taken;
        tier - taken as u32
    };

    let low = deduct(counts.low);
    let medium = deduct(counts.medium);
    let high = deduct(counts.high);

    RiskCounts { high, medium, low }
}

/// Balance the risk tiers of a merged ward against its patient count.
pub fn normalize_ward(ward: MergedWard) -> NormalizedWard {
    let risk = normalize_risk_counts(ward.risk, ward.patient_count);
    NormalizedWard {
        ward_code: ward.ward_code,
        ward_name: ward.ward_name,
        total_beds: ward.total_beds,
        patient_count: ward.patient_count,
        available_beds: ward.available_beds,
        high_risk: risk.high,
        medium_risk: risk.medium,
        low_risk: risk.low,
    }
}
