use crate::role_mapping::RoleMappingService;
use application_ports::role_sync::{FullSyncReport, RoleSyncError, RoleSyncPort, SyncOutcome};
use async_trait::async_trait;
use domain::ports::discord::{
    DiscordError, Member, MemberDirectory, MutationError, Role, RoleCatalog, RoleMutator,
};
use domain::role_diff::diff_member_roles;
use domain_shared::discord::{GuildId, RoleId, RoleRank, UserId};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Audit-log reason attached to every role mutation issued by the sync.
pub const SYNC_AUDIT_REASON: &str = "Synced from source server";

/// Full reconciliation pauses after this many processed members to smooth
/// the request rate against the destination API.
const SYNC_BATCH_SIZE: usize = 10;
const SYNC_BATCH_PAUSE: Duration = Duration::from_secs(1);

pub struct RoleSyncService {
    role_catalog: Arc<dyn RoleCatalog + Send + Sync>,
    member_directory: Arc<dyn MemberDirectory + Send + Sync>,
    role_mutator: Arc<dyn RoleMutator + Send + Sync>,
    mapping: Arc<RoleMappingService>,
    source_guild_id: GuildId,
    dest_guild_id: GuildId,
}

impl RoleSyncService {
    #[instrument(level = "trace", skip_all)]
    pub fn new(
        role_catalog: Arc<dyn RoleCatalog + Send + Sync>,
        member_directory: Arc<dyn MemberDirectory + Send + Sync>,
        role_mutator: Arc<dyn RoleMutator + Send + Sync>,
        mapping: Arc<RoleMappingService>,
        source_guild_id: GuildId,
        dest_guild_id: GuildId,
    ) -> Self {
        Self {
            role_catalog,
            member_directory,
            role_mutator,
            mapping,
            source_guild_id,
            dest_guild_id,
        }
    }

    /// Applies the mapped role diff for one resolved member pair. Issues at
    /// most one bulk add and one bulk remove; a converged pair issues no
    /// mutation at all.
    #[instrument(
        level = "debug",
        skip(self, source_member, dest_member),
        fields(user_id = source_member.user_id.0)
    )]
    async fn sync_member_pair(
        &self,
        source_member: &Member,
        dest_member: &Member,
    ) -> Result<SyncOutcome, RoleSyncError> {
        let mapping = self.mapping.snapshot().await;
        let diff = diff_member_roles(&mapping, &source_member.role_ids, &dest_member.role_ids);

        if diff.is_empty() {
            return Ok(SyncOutcome::default());
        }

        // Re-resolve against the live catalog: drops roles deleted since
        // the member was fetched and carries the ranks for filtering.
        let dest_catalog = self
            .role_catalog
            .list_roles(self.dest_guild_id)
            .await
            .map_err(map_discord_err)?;
        let bot_top_rank = self
            .role_catalog
            .bot_top_rank(self.dest_guild_id)
            .await
            .map_err(map_discord_err)?;

        let to_add = resolve_assignable(&diff.to_add, &dest_catalog, bot_top_rank);
        let to_remove = resolve_assignable(&diff.to_remove, &dest_catalog, bot_top_rank);

        let mut outcome = SyncOutcome::default();

        if !to_add.is_empty() {
            let role_ids: Vec<RoleId> = to_add.iter().map(|role| role.role_id).collect();
            self.role_mutator
                .add_roles(
                    self.dest_guild_id,
                    dest_member.user_id,
                    &role_ids,
                    SYNC_AUDIT_REASON,
                )
                .await
                .map_err(map_mutation_err)?;
            outcome.added_role_names = to_add.into_iter().map(|role| role.name).collect();
            info!(
                "Added roles {:?} to {}",
                outcome.added_role_names, dest_member.display_name,
            );
        }

        if !to_remove.is_empty() {
            let role_ids: Vec<RoleId> = to_remove.iter().map(|role| role.role_id).collect();
            self.role_mutator
                .remove_roles(
                    self.dest_guild_id,
                    dest_member.user_id,
                    &role_ids,
                    SYNC_AUDIT_REASON,
                )
                .await
                .map_err(map_mutation_err)?;
            outcome.removed_role_names = to_remove.into_iter().map(|role| role.name).collect();
            info!(
                "Removed roles {:?} from {}",
                outcome.removed_role_names, dest_member.display_name,
            );
        }

        Ok(outcome)
    }

    #[instrument(level = "debug", skip(self))]
    async fn find_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Member>, RoleSyncError> {
        self.member_directory
            .find_member(guild_id, user_id)
            .await
            .map_err(map_discord_err)
    }
}

#[async_trait]
impl RoleSyncPort for RoleSyncService {
    #[instrument(level = "info", skip(self))]
    async fn sync_member(&self, user_id: UserId) -> Result<SyncOutcome, RoleSyncError> {
        let source_member = self
            .find_member(self.source_guild_id, user_id)
            .await?
            .ok_or(RoleSyncError::MemberNotFound)?;
        let dest_member = self
            .find_member(self.dest_guild_id, user_id)
            .await?
            .ok_or(RoleSyncError::MemberNotFound)?;

        self.sync_member_pair(&source_member, &dest_member).await
    }

    #[instrument(level = "info", skip(self))]
    async fn sync_all_members(&self) -> Result<FullSyncReport, RoleSyncError> {
        let members = self
            .member_directory
            .list_members(self.source_guild_id)
            .await
            .map_err(map_discord_err)?;

        let mut report = FullSyncReport::default();
        let mut processed = 0usize;

        for source_member in members.iter().filter(|member| !member.is_bot) {
            let dest_member = match self
                .member_directory
                .find_member(self.dest_guild_id, source_member.user_id)
                .await
            {
                Ok(Some(member)) => member,
                Ok(None) => {
                    report.skipped += 1;
                    continue;
                }
                Err(err) => {
                    warn!(
                        user_id = source_member.user_id.0,
                        "Member lookup failed, skipping: {}", err,
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            // One member's failure never aborts the rest of the batch.
            match self.sync_member_pair(source_member, &dest_member).await {
                Ok(_) => report.synced += 1,
                Err(err) => {
                    error!(
                        user_id = source_member.user_id.0,
                        "Failed to sync roles for {}: {}", source_member.display_name, err,
                    );
                    report.skipped += 1;
                }
            }

            processed += 1;
            if processed % SYNC_BATCH_SIZE == 0 {
                tokio::time::sleep(SYNC_BATCH_PAUSE).await;
            }
        }

        info!(
            "Full sync complete: {} synced, {} skipped",
            report.synced, report.skipped,
        );

        Ok(report)
    }
}

/// Keeps only roles that still exist in the live catalog and that the bot
/// outranks, in diff order.
fn resolve_assignable(
    role_ids: &BTreeSet<RoleId>,
    dest_catalog: &[Role],
    bot_top_rank: RoleRank,
) -> Vec<Role> {
    role_ids
        .iter()
        .filter_map(|role_id| {
            dest_catalog
                .iter()
                .find(|role| role.role_id == *role_id)
        })
        .filter(|role| role.rank < bot_top_rank)
        .cloned()
        .collect()
}

#[instrument(level = "trace", skip_all)]
fn map_discord_err(err: DiscordError) -> RoleSyncError {
    match err {
        DiscordError::GuildUnresolvable(guild_id) => {
            error!("Guild {} could not be resolved", guild_id);
            RoleSyncError::GuildUnresolvable
        }
        DiscordError::DiscordUnavailable => {
            error!("DiscordError::DiscordUnavailable");
            RoleSyncError::TemporaryUnavailable
        }
    }
}

#[instrument(level = "trace", skip_all)]
fn map_mutation_err(err: MutationError) -> RoleSyncError {
    match err {
        MutationError::PermissionDenied => {
            error!("Missing permissions to modify roles");
            RoleSyncError::PermissionDenied
        }
        MutationError::DiscordUnavailable => {
            error!("MutationError::DiscordUnavailable");
            RoleSyncError::TemporaryUnavailable
        }
    }
}
