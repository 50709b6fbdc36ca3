use crate::types::HealthRes;

/// Liveness check shared by the REST API and the CLI.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Static method to check health without creating an instance.
    ///
    /// The service holds no connections of its own, so being able to answer means it is alive.
    /// Upstream reachability is not probed here.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "ICU backend is alive".into(),
        }
    }
}
