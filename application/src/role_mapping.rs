use application_ports::role_mapping::{MappingStatus, RoleMappingError, RoleMappingPort};
use async_trait::async_trait;
use domain::ports::discord::{DiscordError, RoleCatalog};
use domain::role_mapping::{RoleMapping, RolePairSpec};
use domain_shared::discord::GuildId;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

const STATUS_SAMPLE_LIMIT: usize = 10;

/// Owns the live role mapping. Reload builds a brand-new mapping from the
/// configured pairs and the current catalogs, then swaps the shared
/// reference, so concurrent readers always observe a complete mapping.
pub struct RoleMappingService {
    role_catalog: Arc<dyn RoleCatalog + Send + Sync>,
    source_guild_id: GuildId,
    dest_guild_id: GuildId,
    configured_pairs: Vec<RolePairSpec>,
    current: RwLock<Arc<RoleMapping>>,
}

impl RoleMappingService {
    #[instrument(level = "trace", skip_all)]
    pub fn new(
        role_catalog: Arc<dyn RoleCatalog + Send + Sync>,
        source_guild_id: GuildId,
        dest_guild_id: GuildId,
        configured_pairs: Vec<RolePairSpec>,
    ) -> Self {
        Self {
            role_catalog,
            source_guild_id,
            dest_guild_id,
            configured_pairs,
            current: RwLock::new(Arc::new(RoleMapping::default())),
        }
    }

    /// The current complete mapping; never a partially rebuilt view.
    pub async fn snapshot(&self) -> Arc<RoleMapping> {
        self.current.read().await.clone()
    }

    #[instrument(level = "debug", skip(self))]
    async fn rebuild(&self) -> Result<usize, RoleMappingError> {
        let (source_catalog, dest_catalog) = tokio::try_join!(
            self.role_catalog.list_roles(self.source_guild_id),
            self.role_catalog.list_roles(self.dest_guild_id),
        )
        .map_err(map_discord_err)?;

        let mapping = Arc::new(RoleMapping::build(
            &self.configured_pairs,
            &source_catalog,
            &dest_catalog,
        ));
        let size = mapping.len();

        if mapping.is_empty() {
            error!("Role mapping is empty; no roles will be synchronized");
        } else {
            info!("Loaded {} role mapping(s)", size);
        }

        *self.current.write().await = mapping;

        Ok(size)
    }
}

#[async_trait]
impl RoleMappingPort for RoleMappingService {
    #[instrument(level = "info", skip(self))]
    async fn reload(&self) -> Result<usize, RoleMappingError> {
        self.rebuild().await
    }

    #[instrument(level = "debug", skip(self))]
    async fn status(&self) -> Result<MappingStatus, RoleMappingError> {
        let source_guild_resolved = self
            .role_catalog
            .list_roles(self.source_guild_id)
            .await
            .is_ok();
        let dest_guild_resolved = self
            .role_catalog
            .list_roles(self.dest_guild_id)
            .await
            .is_ok();

        let mapping = self.snapshot().await;
        let (sample_pairs, truncated) = mapping.sample_pairs(STATUS_SAMPLE_LIMIT);

        Ok(MappingStatus {
            source_guild_resolved,
            dest_guild_resolved,
            mapping_size: mapping.len(),
            sample_pairs,
            truncated,
        })
    }
}

#[instrument(level = "trace", skip_all)]
fn map_discord_err(err: DiscordError) -> RoleMappingError {
    match err {
        DiscordError::GuildUnresolvable(guild_id) => {
            error!("Guild {} could not be resolved", guild_id);
            RoleMappingError::GuildUnresolvable
        }
        DiscordError::DiscordUnavailable => {
            error!("DiscordError::DiscordUnavailable");
            RoleMappingError::TemporaryUnavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ports::discord::{MockRoleCatalog, Role};
    use domain_shared::discord::{RoleId, RoleRank};

    const SOURCE_GUILD: GuildId = GuildId(100);
    const DEST_GUILD: GuildId = GuildId(200);

    fn role(id: u64, name: &str) -> Role {
        Role {
            role_id: RoleId(id),
            name: name.to_string(),
            rank: RoleRank(1),
        }
    }

    fn pairs(entries: &[&str]) -> Vec<RolePairSpec> {
        entries.iter().filter_map(|e| RolePairSpec::parse(e)).collect()
    }

    #[tokio::test]
    async fn reload_swaps_in_the_newly_built_mapping() {
        let mut catalog = MockRoleCatalog::new();
        catalog
            .expect_list_roles()
            .withf(|guild_id| *guild_id == SOURCE_GUILD)
            .returning(|_| Ok(vec![role(1, "Supporter")]));
        catalog
            .expect_list_roles()
            .withf(|guild_id| *guild_id == DEST_GUILD)
            .returning(|_| Ok(vec![role(2, "Supporter-Synced")]));

        let service = RoleMappingService::new(
            Arc::new(catalog),
            SOURCE_GUILD,
            DEST_GUILD,
            pairs(&["Supporter:Supporter-Synced"]),
        );

        assert!(service.snapshot().await.is_empty());
        let size = service.reload().await.unwrap();

        assert_eq!(size, 1);
        assert_eq!(service.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn reload_with_no_valid_pairs_yields_an_empty_mapping() {
        let mut catalog = MockRoleCatalog::new();
        catalog.expect_list_roles().returning(|_| Ok(vec![]));

        let service = RoleMappingService::new(
            Arc::new(catalog),
            SOURCE_GUILD,
            DEST_GUILD,
            pairs(&["no colon at all"]),
        );

        let size = service.reload().await.unwrap();

        assert_eq!(size, 0);
        assert!(service.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn reload_failure_keeps_the_previous_mapping() {
        let mut catalog = MockRoleCatalog::new();
        catalog
            .expect_list_roles()
            .times(2)
            .returning(|guild_id| match guild_id {
                SOURCE_GUILD => Ok(vec![role(1, "Supporter")]),
                _ => Ok(vec![role(2, "Supporter-Synced")]),
            });
        catalog
            .expect_list_roles()
            .returning(|_| Err(DiscordError::DiscordUnavailable));

        let service = RoleMappingService::new(
            Arc::new(catalog),
            SOURCE_GUILD,
            DEST_GUILD,
            pairs(&["Supporter:Supporter-Synced"]),
        );

        service.reload().await.unwrap();
        let err = service.reload().await.unwrap_err();

        assert!(matches!(err, RoleMappingError::TemporaryUnavailable));
        assert_eq!(service.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn status_reports_unresolved_guilds() {
        let mut catalog = MockRoleCatalog::new();
        catalog
            .expect_list_roles()
            .withf(|guild_id| *guild_id == SOURCE_GUILD)
            .returning(|_| Ok(vec![]));
        catalog
            .expect_list_roles()
            .withf(|guild_id| *guild_id == DEST_GUILD)
            .returning(|guild_id| Err(DiscordError::GuildUnresolvable(guild_id.0)));

        let service =
            RoleMappingService::new(Arc::new(catalog), SOURCE_GUILD, DEST_GUILD, vec![]);

        let status = service.status().await.unwrap();

        assert!(status.source_guild_resolved);
        assert!(!status.dest_guild_resolved);
        assert_eq!(status.mapping_size, 0);
        assert!(status.sample_pairs.is_empty());
        assert_eq!(status.truncated, 0);
    }
}
