use crate::hosxp::HosxpClient;
use crate::user_db::UserDbClient;
use async_trait::async_trait;
use icu_core::{StaffDirectory, StaffProfile, UpstreamResult};

/// Staff lookups backed by the user database and HOSxP.
#[derive(Clone, Debug)]
pub struct HttpStaffDirectory {
    user_db: UserDbClient,
    hosxp: HosxpClient,
}

impl HttpStaffDirectory {
    pub fn new(user_db: UserDbClient, hosxp: HosxpClient) -> Self {
        Self { user_db, hosxp }
    }
}

#[async_trait]
impl StaffDirectory for HttpStaffDirectory {
    async fn find_by_line_user_id(&self, line_user_id: &str) -> UpstreamResult<StaffProfile> {
        self.user_db.get_user(line_user_id).await
    }

    async fn check_active_license(&self, license_id: &str) -> UpstreamResult<()> {
        self.hosxp.check_active_user(license_id).await
    }
}
