//! Constants used throughout the ICU core crate.

/// Bed capacities that replace the figures reported by HOSxP.
///
/// The hospital system's `bedcount` column is stale for these units.
pub const DEFAULT_CAPACITY_OVERRIDES: &[(&str, u32)] = &[
    ("10", 8),  // ICU Med
    ("17", 36), // RCU
    ("22", 8),  // ICU Surg
    ("24", 5),  // ICU CVT
    ("41", 10), // CCU
];

/// Error message returned when an upstream service cannot be reached.
pub const UPSTREAM_UNAVAILABLE_MESSAGE: &str = "Upstream service unavailable";

/// Error message returned when an upstream service answers with an unusable body.
pub const UPSTREAM_MALFORMED_MESSAGE: &str = "Invalid response from upstream service";
