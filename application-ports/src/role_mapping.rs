use async_trait::async_trait;
use thiserror::Error;

#[async_trait]
pub trait RoleMappingPort {
    /// Rebuilds the mapping from configuration and the live role catalogs,
    /// returning the new mapping size.
    async fn reload(&self) -> Result<usize, RoleMappingError>;

    async fn status(&self) -> Result<MappingStatus, RoleMappingError>;
}

pub struct MappingStatus {
    pub source_guild_resolved: bool,
    pub dest_guild_resolved: bool,
    pub mapping_size: usize,
    /// Up to 10 mapped (source, destination) role-name pairs.
    pub sample_pairs: Vec<(String, String)>,
    /// How many mapped pairs did not fit into `sample_pairs`.
    pub truncated: usize,
}

#[derive(Debug, Error)]
pub enum RoleMappingError {
    #[error("Could not find one or both guilds")]
    GuildUnresolvable,
    #[error("Service is temporarily unavailable")]
    TemporaryUnavailable,
}
