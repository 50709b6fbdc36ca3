//! Ward status orchestration.
//!
//! `WardStatusService` runs the pipeline behind `POST /icuStatus`:
//!
//! ```text
//! fetch beds ─┐
//!             ├─> merge ─> capacity overrides ─> normalize ─> response
//! fetch risk ─┘                                      │
//!                                                    └─> detached risk sync
//! ```
//!
//! The two fetches run concurrently. If either fails nothing is merged and the failure is
//! returned for the caller to forward. The risk sync runs on its own task after the result is
//! computed; its failures are logged and never reach the caller.

use crate::config::CoreConfig;
use crate::error::{UpstreamReply, UpstreamResult};
use crate::merge::merge_ward_data;
use crate::normalize::normalize_ward;
use crate::providers::{BedStatusProvider, RiskLevelProvider};
use crate::ward::{NormalizedWard, RiskLevelUpdate, WardBedRecord, WardRiskRecord};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Outcome of one write-back pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub updated: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct WardStatusService {
    cfg: Arc<CoreConfig>,
    beds: Arc<dyn BedStatusProvider>,
    risks: Arc<dyn RiskLevelProvider>,
}

impl WardStatusService {
    pub fn new(
        cfg: Arc<CoreConfig>,
        beds: Arc<dyn BedStatusProvider>,
        risks: Arc<dyn RiskLevelProvider>,
    ) -> Self {
        Self { cfg, beds, risks }
    }

    /// Fetch both datasets and produce the normalized ward list.
    ///
    /// Both fetches are awaited before either result is inspected. When both fail, the bed
    /// status failure is the one returned.
    ///
    /// # Errors
    ///
    /// Returns the first `UpstreamError` (bed status, then risk levels). No merging happens in
    /// that case.
    pub async fn ward_status(&self) -> UpstreamResult<Vec<NormalizedWard>> {
        let (beds, risks) = tokio::join!(
            self.beds.fetch_bed_status(),
            self.risks.fetch_risk_levels()
        );
        let beds = beds?;
        let risks = risks?;

        tracing::debug!(
            bed_records = beds.len(),
            risk_records = risks.len(),
            "ward data fetched"
        );

        Ok(self.aggregate(beds, risks))
    }

    /// Merge, apply capacity overrides and normalize already-fetched data.
    pub fn aggregate(
        &self,
        beds: Vec<WardBedRecord>,
        risks: Vec<WardRiskRecord>,
    ) -> Vec<NormalizedWard> {
        let merged = merge_ward_data(beds, risks);
        self.cfg
            .capacity_overrides()
            .apply(merged)
            .into_iter()
            .map(normalize_ward)
            .collect()
    }

    /// Start writing the normalized counts back to the risk database.
    ///
    /// The write-back runs on a detached task. Returns `None` when risk sync is disabled. The
    /// handle is only useful to callers that want to wait for completion (CLI, tests).
    pub fn spawn_risk_sync(&self, wards: &[NormalizedWard]) -> Option<JoinHandle<SyncReport>> {
        if !self.cfg.risk_sync_enabled() {
            tracing::debug!("risk sync disabled; skipping write-back");
            return None;
        }

        let updates: Vec<RiskLevelUpdate> = wards.iter().map(|w| w.to_risk_update()).collect();
        let risks = self.risks.clone();
        Some(tokio::spawn(sync_risk_levels(risks, updates)))
    }

    /// Forward a single risk-level update to the risk database.
    pub async fn update_risk_level(
        &self,
        update: &RiskLevelUpdate,
    ) -> UpstreamResult<UpstreamReply> {
        self.risks.update_risk_level(update).await
    }
}

/// Write each update in order, continuing past failures.
pub async fn sync_risk_levels(
    risks: Arc<dyn RiskLevelProvider>,
    updates: Vec<RiskLevelUpdate>,
) -> SyncReport {
    let mut report = SyncReport::default();

    for update in &updates {
        match risks.update_risk_level(update).await {
            Ok(_) => report.updated += 1,
            Err(e) => {
                report.failed += 1;
                tracing::warn!(ward_code = %update.ward_code, error = %e, "risk sync failed for ward");
            }
        }
    }

    if report.failed > 0 {
        tracing::warn!(
            updated = report.updated,
            failed = report.failed,
            "risk sync finished with failures"
        );
    } else {
        tracing::info!(updated = report.updated, "risk sync finished");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::CapacityOverrideTable;
    use crate::error::UpstreamError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct FakeBeds(Mutex<Option<UpstreamResult<Vec<WardBedRecord>>>>);

    impl FakeBeds {
        fn ok(records: Vec<WardBedRecord>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(Some(Ok(records)))))
        }

        fn err(err: UpstreamError) -> Arc<Self> {
            Arc::new(Self(Mutex::new(Some(Err(err)))))
        }
    }

    #[async_trait]
    impl BedStatusProvider for FakeBeds {
        async fn fetch_bed_status(&self) -> UpstreamResult<Vec<WardBedRecord>> {
            self.0.lock().unwrap().take().expect("fetched once")
        }
    }

    #[derive(Default)]
    struct FakeRisks {
        records: Vec<WardRiskRecord>,
        fetch_error: Mutex<Option<UpstreamError>>,
        failing_wards: Vec<String>,
        updates: Mutex<Vec<RiskLevelUpdate>>,
    }

    #[async_trait]
    impl RiskLevelProvider for FakeRisks {
        async fn fetch_risk_levels(&self) -> UpstreamResult<Vec<WardRiskRecord>> {
            match self.fetch_error.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(self.records.clone()),
            }
        }

        async fn update_risk_level(
            &self,
            update: &RiskLevelUpdate,
        ) -> UpstreamResult<UpstreamReply> {
            self.updates.lock().unwrap().push(update.clone());
            if self.failing_wards.contains(&update.ward_code) {
                return Err(UpstreamError::Rejected {
                    service: "icu-db-api",
                    status: 404,
                    body: json!({ "error": "Ward not found" }),
                });
            }
            Ok(UpstreamReply::new(200, json!({ "success": true })))
        }
    }

    fn bed(code: &str, name: &str, total: u32, patients: u32) -> WardBedRecord {
        WardBedRecord {
            ward_code: code.into(),
            ward_name: name.into(),
            total_beds: total,
            patient_count: patients,
            available_beds: i64::from(total) - i64::from(patients),
        }
    }

    fn risk(code: &str, high: u32, medium: u32, low: u32) -> WardRiskRecord {
        WardRiskRecord {
            ward_code: code.into(),
            high_risk: high,
            medium_risk: medium,
            low_risk: low,
        }
    }

    fn service(beds: Arc<FakeBeds>, risks: Arc<FakeRisks>, sync: bool) -> WardStatusService {
        WardStatusService::new(
            Arc::new(CoreConfig::new(CapacityOverrideTable::default(), sync)),
            beds,
            risks,
        )
    }

    #[tokio::test]
    async fn end_to_end_ccu_scenario() {
        let risks = Arc::new(FakeRisks {
            records: vec![risk("41", 1, 1, 1)],
            ..Default::default()
        });
        let svc = service(FakeBeds::ok(vec![bed("41", "CCU", 10, 6)]), risks, true);

        let wards = svc.ward_status().await.expect("pipeline should succeed");
        assert_eq!(
            wards,
            vec![NormalizedWard {
                ward_code: "41".into(),
                ward_name: "CCU".into(),
                total_beds: 10,
                patient_count: 6,
                available_beds: 4,
                high_risk: 4,
                medium_risk: 1,
                low_risk: 1,
            }]
        );
    }

    #[tokio::test]
    async fn overrides_and_defaults_are_applied() {
        let risks = Arc::new(FakeRisks::default());
        let svc = service(
            FakeBeds::ok(vec![bed("10", "ICU Med", 12, 9), bed("99", "Ward 99", 6, 4)]),
            risks,
            true,
        );

        let wards = svc.ward_status().await.expect("pipeline should succeed");
        assert_eq!(wards[0].total_beds, 8);
        assert_eq!(wards[0].available_beds, 0);
        assert_eq!(wards[0].high_risk, 9);
        assert_eq!(wards[1].total_beds, 6);
        assert_eq!(wards[1].available_beds, 2);
        assert_eq!(wards[1].risk(), crate::RiskCounts::new(4, 0, 0));
    }

    #[tokio::test]
    async fn bed_failure_short_circuits() {
        let risks = Arc::new(FakeRisks {
            records: vec![risk("41", 1, 1, 1)],
            ..Default::default()
        });
        let svc = service(
            FakeBeds::err(UpstreamError::Rejected {
                service: "hosxp-api",
                status: 503,
                body: json!({ "error": "Database query failed" }),
            }),
            risks.clone(),
            true,
        );

        let err = svc.ward_status().await.expect_err("expected failure");
        let reply = err.into_reply();
        assert_eq!(reply.status, 503);
        assert_eq!(reply.body, json!({ "error": "Database query failed" }));
        assert!(risks.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bed_failure_wins_when_both_fail() {
        let risks = Arc::new(FakeRisks {
            fetch_error: Mutex::new(Some(UpstreamError::Unavailable {
                service: "icu-db-api",
                details: "connection refused".into(),
            })),
            ..Default::default()
        });
        let svc = service(
            FakeBeds::err(UpstreamError::Rejected {
                service: "hosxp-api",
                status: 500,
                body: json!({ "error": "Database query failed" }),
            }),
            risks,
            true,
        );

        let err = svc.ward_status().await.expect_err("expected failure");
        assert_eq!(err.service(), "hosxp-api");
    }

    #[tokio::test]
    async fn risk_failure_is_returned() {
        let risks = Arc::new(FakeRisks {
            fetch_error: Mutex::new(Some(UpstreamError::Unavailable {
                service: "icu-db-api",
                details: "timed out".into(),
            })),
            ..Default::default()
        });
        let svc = service(FakeBeds::ok(vec![bed("41", "CCU", 10, 6)]), risks, true);

        let err = svc.ward_status().await.expect_err("expected failure");
        assert_eq!(err.reply().status, 503);
    }

    #[tokio::test]
    async fn sync_writes_every_ward_and_survives_failures() {
        let risks = Arc::new(FakeRisks {
            failing_wards: vec!["22".into()],
            ..Default::default()
        });
        let svc = service(
            FakeBeds::ok(vec![
                bed("22", "ICU Surg", 8, 2),
                bed("41", "CCU", 10, 6),
            ]),
            risks.clone(),
            true,
        );

        let wards = svc.ward_status().await.expect("pipeline should succeed");
        let handle = svc.spawn_risk_sync(&wards).expect("sync enabled");
        let report = handle.await.expect("sync task should not panic");

        assert_eq!(report, SyncReport { updated: 1, failed: 1 });
        let updates = risks.updates.lock().unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].ward_code, "22");
        assert_eq!(updates[0].high_risk, 2);
        assert_eq!(
            updates[1],
            RiskLevelUpdate {
                ward_code: "41".into(),
                high_risk: 6,
                medium_risk: 0,
                low_risk: 0,
            }
        );
    }

    #[tokio::test]
    async fn sync_disabled_spawns_nothing() {
        let risks = Arc::new(FakeRisks::default());
        let svc = service(FakeBeds::ok(vec![bed("41", "CCU", 10, 6)]), risks.clone(), false);

        let wards = svc.ward_status().await.expect("pipeline should succeed");
        assert!(svc.spawn_risk_sync(&wards).is_none());
        assert!(risks.updates.lock().unwrap().is_empty());
    }

    /// Bed and risk sources that only answer once the other one has been asked.
    struct Rendezvous {
        beds_asked: AtomicBool,
        risks_asked: AtomicBool,
    }

    impl Rendezvous {
        async fn meet(mine: &AtomicBool, theirs: &AtomicBool) {
            mine.store(true, Ordering::SeqCst);
            while !theirs.load(Ordering::SeqCst) {
                tokio::task::yield_now().await;
            }
        }
    }

    #[async_trait]
    impl BedStatusProvider for Rendezvous {
        async fn fetch_bed_status(&self) -> UpstreamResult<Vec<WardBedRecord>> {
            Self::meet(&self.beds_asked, &self.risks_asked).await;
            Ok(vec![bed("41", "CCU", 10, 6)])
        }
    }

    #[async_trait]
    impl RiskLevelProvider for Rendezvous {
        async fn fetch_risk_levels(&self) -> UpstreamResult<Vec<WardRiskRecord>> {
            Self::meet(&self.risks_asked, &self.beds_asked).await;
            Ok(vec![])
        }

        async fn update_risk_level(
            &self,
            _update: &RiskLevelUpdate,
        ) -> UpstreamResult<UpstreamReply> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn fetches_run_concurrently_and_sync_is_detached() {
        let both = Arc::new(Rendezvous {
            beds_asked: AtomicBool::new(false),
            risks_asked: AtomicBool::new(false),
        });
        let svc = WardStatusService::new(
            Arc::new(CoreConfig::default()),
            both.clone(),
            both,
        );

        let wards = tokio::time::timeout(Duration::from_secs(2), svc.ward_status())
            .await
            .expect("fetches must not wait on each other")
            .expect("pipeline should succeed");
        assert_eq!(wards.len(), 1);
        assert_eq!(wards[0].high_risk, 6);

        // Write-back never completes, yet spawning it returns at once.
        let handle = svc.spawn_risk_sync(&wards).expect("sync enabled");
        tokio::task::yield_now().await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}
