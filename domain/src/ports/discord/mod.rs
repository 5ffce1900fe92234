mod member;
mod role;

use async_trait::async_trait;
use domain_shared::discord::{GuildId, RoleId, RoleRank, UserId};
pub use member::Member;
pub use role::Role;
use thiserror::Error;

/// Read access to a guild's role catalog.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait RoleCatalog {
    async fn list_roles(&self, guild_id: GuildId) -> Result<Vec<Role>, DiscordError>;

    /// The rank of the bot's own highest role in the guild. Roles at or
    /// above this rank cannot be granted or revoked by the bot.
    async fn bot_top_rank(&self, guild_id: GuildId) -> Result<RoleRank, DiscordError>;
}

/// Member lookup within a guild. `Ok(None)` means the user is confirmed
/// not to be a member; `Err` means the lookup itself failed.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait MemberDirectory {
    async fn find_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Member>, DiscordError>;

    async fn list_members(&self, guild_id: GuildId) -> Result<Vec<Member>, DiscordError>;
}

/// Role assignment mutation. One call is one logical batch: a single audit
/// reason and a single success/failure outcome for all listed roles.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait RoleMutator {
    async fn add_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_ids: &[RoleId],
        reason: &str,
    ) -> Result<(), MutationError>;

    async fn remove_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_ids: &[RoleId],
        reason: &str,
    ) -> Result<(), MutationError>;
}

#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Guild {0} is unknown or not accessible to the bot")]
    GuildUnresolvable(u64),
    #[error("Discord is unavailable")]
    DiscordUnavailable,
}

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("The bot lacks permission to modify the requested roles")]
    PermissionDenied,
    #[error("Discord is unavailable")]
    DiscordUnavailable,
}
