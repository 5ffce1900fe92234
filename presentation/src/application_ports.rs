use application_ports::role_mapping::RoleMappingPort;
use application_ports::role_sync::RoleSyncPort;
use domain_shared::discord::GuildId;
use std::sync::Arc;

pub trait Locator {
    fn get_role_sync_port(&self) -> Arc<dyn RoleSyncPort + Send + Sync>;
    fn get_role_mapping_port(&self) -> Arc<dyn RoleMappingPort + Send + Sync>;
    fn source_guild_id(&self) -> GuildId;
    fn dest_guild_id(&self) -> GuildId;
}
