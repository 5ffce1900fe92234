mod guild_id;
mod member;
mod role;
mod role_id;
mod user_id;

use crate::discord::guild_id::domain_to_serenity_guild_id;
use crate::discord::member::serenity_to_domain_member;
use crate::discord::role::serenity_to_domain_role;
use crate::discord::role_id::domain_to_serenity_role_id;
use crate::discord::user_id::domain_to_serenity_user_id;
use async_trait::async_trait;
use domain::ports::discord::{
    DiscordError, Member, MemberDirectory, MutationError, Role, RoleCatalog, RoleMutator,
};
use domain_shared::discord::{GuildId, RoleId, RoleRank, UserId};
use serenity::all::Http;
use serenity::http::HttpError;
use std::sync::Arc;
use tracing::instrument;

/// Page size for member listing; Discord caps the endpoint at 1000.
const MEMBER_PAGE_SIZE: u64 = 1000;

pub struct DiscordAdapter {
    client: Arc<Http>,
}

impl DiscordAdapter {
    #[instrument(level = "trace", skip_all)]
    pub fn new(client: Arc<Http>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RoleCatalog for DiscordAdapter {
    #[instrument(level = "debug", err, skip(self))]
    async fn list_roles(&self, guild_id: GuildId) -> Result<Vec<Role>, DiscordError> {
        let roles = self
            .client
            .get_guild_roles(domain_to_serenity_guild_id(guild_id))
            .await
            .map_err(|err| map_guild_err(guild_id, err))?;

        Ok(roles.into_iter().map(serenity_to_domain_role).collect())
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn bot_top_rank(&self, guild_id: GuildId) -> Result<RoleRank, DiscordError> {
        let serenity_guild_id = domain_to_serenity_guild_id(guild_id);

        let bot_user = self
            .client
            .get_current_user()
            .await
            .map_err(|err| map_guild_err(guild_id, err))?;
        let bot_member = self
            .client
            .get_member(serenity_guild_id, bot_user.id)
            .await
            .map_err(|err| map_guild_err(guild_id, err))?;
        let roles = self
            .client
            .get_guild_roles(serenity_guild_id)
            .await
            .map_err(|err| map_guild_err(guild_id, err))?;

        let top_rank = roles
            .iter()
            .filter(|role| bot_member.roles.contains(&role.id))
            .map(|role| role.position)
            .max()
            .unwrap_or(0);

        Ok(RoleRank(top_rank))
    }
}

#[async_trait]
impl MemberDirectory for DiscordAdapter {
    #[instrument(level = "debug", err, skip(self))]
    async fn find_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Member>, DiscordError> {
        let member = self
            .client
            .get_member(
                domain_to_serenity_guild_id(guild_id),
                domain_to_serenity_user_id(user_id),
            )
            .await;

        match member {
            Ok(member) => Ok(Some(serenity_to_domain_member(guild_id, member))),
            // Unknown member: confirmed not present, not a lookup failure.
            Err(err) if error_status(&err) == Some(404) => Ok(None),
            Err(_) => Err(DiscordError::DiscordUnavailable),
        }
    }

    #[instrument(level = "debug", err, skip(self))]
    async fn list_members(&self, guild_id: GuildId) -> Result<Vec<Member>, DiscordError> {
        let serenity_guild_id = domain_to_serenity_guild_id(guild_id);
        let mut members = Vec::new();
        let mut after: Option<u64> = None;

        loop {
            let page = self
                .client
                .get_guild_members(serenity_guild_id, Some(MEMBER_PAGE_SIZE), after)
                .await
                .map_err(|err| map_guild_err(guild_id, err))?;

            let page_len = page.len() as u64;
            after = page.last().map(|member| member.user.id.get());
            members.extend(
                page.into_iter()
                    .map(|member| serenity_to_domain_member(guild_id, member)),
            );

            if page_len < MEMBER_PAGE_SIZE {
                return Ok(members);
            }
        }
    }
}

#[async_trait]
impl RoleMutator for DiscordAdapter {
    #[instrument(level = "debug", err, skip(self, role_ids, reason))]
    async fn add_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_ids: &[RoleId],
        reason: &str,
    ) -> Result<(), MutationError> {
        let serenity_guild_id = domain_to_serenity_guild_id(guild_id);
        let serenity_user_id = domain_to_serenity_user_id(user_id);

        // Discord has no bulk role-grant endpoint; the batch boundary is
        // this call, the endpoint is per role.
        for role_id in role_ids {
            self.client
                .add_member_role(
                    serenity_guild_id,
                    serenity_user_id,
                    domain_to_serenity_role_id(*role_id),
                    Some(reason),
                )
                .await
                .map_err(map_mutation_err)?;
        }

        Ok(())
    }

    #[instrument(level = "debug", err, skip(self, role_ids, reason))]
    async fn remove_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_ids: &[RoleId],
        reason: &str,
    ) -> Result<(), MutationError> {
        let serenity_guild_id = domain_to_serenity_guild_id(guild_id);
        let serenity_user_id = domain_to_serenity_user_id(user_id);

        for role_id in role_ids {
            self.client
                .remove_member_role(
                    serenity_guild_id,
                    serenity_user_id,
                    domain_to_serenity_role_id(*role_id),
                    Some(reason),
                )
                .await
                .map_err(map_mutation_err)?;
        }

        Ok(())
    }
}

fn error_status(err: &serenity::Error) -> Option<u16> {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            Some(response.status_code.as_u16())
        }
        _ => None,
    }
}

#[instrument(level = "trace", skip(err))]
fn map_guild_err(guild_id: GuildId, err: serenity::Error) -> DiscordError {
    match error_status(&err) {
        Some(403) | Some(404) => DiscordError::GuildUnresolvable(guild_id.0),
        _ => DiscordError::DiscordUnavailable,
    }
}

#[instrument(level = "trace", skip(err))]
fn map_mutation_err(err: serenity::Error) -> MutationError {
    match error_status(&err) {
        Some(403) => MutationError::PermissionDenied,
        _ => MutationError::DiscordUnavailable,
    }
}
