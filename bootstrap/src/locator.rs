use application::role_mapping::RoleMappingService;
use application::role_sync::RoleSyncService;
use application_ports::role_mapping::RoleMappingPort;
use application_ports::role_sync::RoleSyncPort;
use domain_shared::discord::GuildId;
use presentation::application_ports::Locator;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct ApplicationPortLocator {
    role_sync_adapter: Arc<RoleSyncService>,
    role_mapping_adapter: Arc<RoleMappingService>,
    source_guild_id: GuildId,
    dest_guild_id: GuildId,
}

impl ApplicationPortLocator {
    #[instrument(level = "trace", skip_all)]
    pub fn new(
        role_sync_adapter: Arc<RoleSyncService>,
        role_mapping_adapter: Arc<RoleMappingService>,
        source_guild_id: GuildId,
        dest_guild_id: GuildId,
    ) -> Self {
        Self {
            role_sync_adapter,
            role_mapping_adapter,
            source_guild_id,
            dest_guild_id,
        }
    }
}

impl Locator for ApplicationPortLocator {
    #[instrument(level = "trace", skip(self))]
    fn get_role_sync_port(&self) -> Arc<dyn RoleSyncPort + Send + Sync> {
        self.role_sync_adapter.clone()
    }

    #[instrument(level = "trace", skip(self))]
    fn get_role_mapping_port(&self) -> Arc<dyn RoleMappingPort + Send + Sync> {
        self.role_mapping_adapter.clone()
    }

    #[instrument(level = "trace", skip(self))]
    fn source_guild_id(&self) -> GuildId {
        self.source_guild_id
    }

    #[instrument(level = "trace", skip(self))]
    fn dest_guild_id(&self) -> GuildId {
        self.dest_guild_id
    }
}
