use async_trait::async_trait;
use domain_shared::discord::UserId;
use thiserror::Error;

#[async_trait]
pub trait RoleSyncPort {
    /// Synchronizes one member pair identified by the user id.
    async fn sync_member(&self, user_id: UserId) -> Result<SyncOutcome, RoleSyncError>;

    /// Synchronizes every non-bot member of the source guild.
    async fn sync_all_members(&self) -> Result<FullSyncReport, RoleSyncError>;
}

/// Per-member result of one sync operation, for reporting only.
#[derive(Debug, Default)]
pub struct SyncOutcome {
    pub added_role_names: Vec<String>,
    pub removed_role_names: Vec<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct FullSyncReport {
    pub synced: usize,
    pub skipped: usize,
}

#[derive(Debug, Error)]
pub enum RoleSyncError {
    #[error("Could not find one or both guilds")]
    GuildUnresolvable,
    #[error("Member not found in one or both guilds")]
    MemberNotFound,
    #[error("The bot lacks permission to modify roles for this member")]
    PermissionDenied,
    #[error("Service is temporarily unavailable")]
    TemporaryUnavailable,
}
