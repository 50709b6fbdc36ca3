//! Ward records flowing through the status pipeline.
//!
//! Upstream records decode into fixed field sets; unknown columns (the risk database returns
//! `SELECT *`) are ignored. Counts are unsigned, so a negative or fractional count in an upstream
//! payload fails decoding at the gateway instead of reaching the normalization step.

use serde::{Deserialize, Deserializer, Serialize};

/// Per-ward occupancy as reported by HOSxP.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardBedRecord {
    #[serde(deserialize_with = "deserialize_ward_code")]
    pub ward_code: String,
    pub ward_name: String,
    pub total_beds: u32,
    pub patient_count: u32,
    pub available_beds: i64,
}

/// Per-ward risk-tier counts as stored in the ICU database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardRiskRecord {
    #[serde(deserialize_with = "deserialize_ward_code")]
    pub ward_code: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub high_risk: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub medium_risk: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub low_risk: u32,
}

/// The three risk tiers of a ward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCounts {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl RiskCounts {
    pub fn new(high: u32, medium: u32, low: u32) -> Self {
        Self { high, medium, low }
    }

    /// Sum of all tiers, widened so three `u32::MAX` counts cannot overflow.
    pub fn total(&self) -> u64 {
        u64::from(self.high) + u64::from(self.medium) + u64::from(self.low)
    }
}

impl From<&WardRiskRecord> for RiskCounts {
    fn from(record: &WardRiskRecord) -> Self {
        Self::new(record.high_risk, record.medium_risk, record.low_risk)
    }
}

/// Bed record joined with its risk counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedWard {
    pub ward_code: String,
    pub ward_name: String,
    pub total_beds: u32,
    pub patient_count: u32,
    pub available_beds: i64,
    pub risk: RiskCounts,
}

/// Final per-ward status returned to callers.
///
/// Field order is the JSON field order of the `/icuStatus` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedWard {
    pub ward_code: String,
    pub ward_name: String,
    pub total_beds: u32,
    pub patient_count: u32,
    pub available_beds: i64,
    pub high_risk: u32,
    pub medium_risk: u32,
    pub low_risk: u32,
}

impl NormalizedWard {
    pub fn risk(&self) -> RiskCounts {
        RiskCounts::new(self.high_risk, self.medium_risk, self.low_risk)
    }

    pub fn to_risk_update(&self) -> RiskLevelUpdate {
        RiskLevelUpdate {
            ward_code: self.ward_code.clone(),
            high_risk: self.high_risk,
            medium_risk: self.medium_risk,
            low_risk: self.low_risk,
        }
    }
}

/// Payload written to the risk database for one ward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLevelUpdate {
    pub ward_code: String,
    pub high_risk: u32,
    pub medium_risk: u32,
    pub low_risk: u32,
}

/// Ward codes arrive as strings from one source and as integers from another; both key the same
/// ward, so numbers are normalised to their decimal text.
fn deserialize_ward_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WardCode {
        Text(String),
        Number(u64),
    }

    Ok(match WardCode::deserialize(deserializer)? {
        WardCode::Text(code) => code,
        WardCode::Number(code) => code.to_string(),
    })
}

/// Risk columns are nullable in the ICU database; an unset tier counts as zero.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bed_record_accepts_numeric_ward_code() {
        let record: WardBedRecord = serde_json::from_value(json!({
            "ward_code": 41,
            "ward_name": "CCU",
            "total_beds": 10,
            "patient_count": 6,
            "available_beds": 4
        }))
        .expect("should decode");
        assert_eq!(record.ward_code, "41");
    }

    #[test]
    fn risk_record_ignores_unknown_columns_and_nulls() {
        let record: WardRiskRecord = serde_json::from_value(json!({
            "id": 3,
            "ward_code": "22",
            "high_risk": 2,
            "medium_risk": null,
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .expect("should decode");
        assert_eq!(record.high_risk, 2);
        assert_eq!(record.medium_risk, 0);
        assert_eq!(record.low_risk, 0);
    }

    #[test]
    fn negative_counts_are_rejected() {
        let err = serde_json::from_value::<WardRiskRecord>(json!({
            "ward_code": "22",
            "high_risk": -1,
            "medium_risk": 0,
            "low_risk": 0
        }));
        assert!(err.is_err());

        let err = serde_json::from_value::<WardBedRecord>(json!({
            "ward_code": "22",
            "ward_name": "ICU Surg",
            "total_beds": 8,
            "patient_count": 2.5,
            "available_beds": 6
        }));
        assert!(err.is_err());
    }

    #[test]
    fn normalized_ward_serialises_in_response_field_order() {
        let ward = NormalizedWard {
            ward_code: "41".into(),
            ward_name: "CCU".into(),
            total_beds: 10,
            patient_count: 6,
            available_beds: 4,
            high_risk: 4,
            medium_risk: 1,
            low_risk: 1,
        };
        let text = serde_json::to_string(&ward).expect("should serialise");
        assert_eq!(
            text,
            r#"{"ward_code":"41","ward_name":"CCU","total_beds":10,"patient_count":6,"available_beds":4,"high_risk":4,"medium_risk":1,"low_risk":1}"#
        );
    }
}
