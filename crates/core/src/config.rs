//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads process-wide environment variables.

use crate::capacity::CapacityOverrideTable;
use crate::error::{WardError, WardResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    capacity_overrides: CapacityOverrideTable,
    risk_sync_enabled: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(CapacityOverrideTable::default(), true)
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(capacity_overrides: CapacityOverrideTable, risk_sync_enabled: bool) -> Self {
        Self {
            capacity_overrides,
            risk_sync_enabled,
        }
    }

    pub fn capacity_overrides(&self) -> &CapacityOverrideTable {
        &self.capacity_overrides
    }

    /// Whether normalized risk counts are written back to the ICU database.
    pub fn risk_sync_enabled(&self) -> bool {
        self.risk_sync_enabled
    }
}

/// Resolve the capacity override table from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the built-in table.
pub fn capacity_overrides_from_env_value(
    value: Option<String>,
) -> WardResult<CapacityOverrideTable> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(CapacityOverrideTable::default()),
        Some(v) => CapacityOverrideTable::parse(v),
    }
}

/// Parse the risk-sync flag from an optional string value.
///
/// Accepts `true/false`, `1/0`, `yes/no` and `on/off` (case-insensitive). Missing or empty values
/// leave sync enabled.
pub fn risk_sync_from_env_value(value: Option<String>) -> WardResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(true),
        Some("true" | "1" | "yes" | "on") => Ok(true),
        Some("false" | "0" | "no" | "off") => Ok(false),
        Some(other) => Err(WardError::InvalidInput(format!(
            "risk sync flag must be true or false, got '{other}'"
        ))),
    }
}
