//! # ICU Core
//!
//! Core business logic for the ICU ward status service.
//!
//! This crate contains the ward-status aggregation pipeline:
//! - Ward records as delivered by the hospital (HOSxP) and risk databases
//! - Merging of bed occupancy with risk-tier counts by ward code
//! - Manual bed-capacity overrides
//! - Risk-count normalization against the patient total
//! - Orchestration of the above plus the best-effort write-back of balanced counts
//!
//! **No API concerns**: HTTP servers, request validation and authentication belong in
//! `api-rest` or `api-shared`. Upstream access is expressed through the traits in [`providers`]
//! and implemented over HTTP by `icu-gateway`.

pub mod capacity;
pub mod config;
pub mod constants;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod providers;
pub mod status;
pub mod ward;

pub use capacity::CapacityOverrideTable;
pub use config::CoreConfig;
pub use error::{UpstreamError, UpstreamReply, UpstreamResult, WardError, WardResult};
pub use merge::merge_ward_data;
pub use normalize::{normalize_risk_counts, normalize_ward};
pub use providers::{BedStatusProvider, RiskLevelProvider, StaffDirectory, StaffProfile};
pub use status::{SyncReport, WardStatusService};
pub use ward::{
    MergedWard, NormalizedWard, RiskCounts, RiskLevelUpdate, WardBedRecord, WardRiskRecord,
};
