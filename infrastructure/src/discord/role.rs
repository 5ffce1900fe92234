use crate::discord::role_id::serenity_to_domain_role_id;
use domain::ports::discord::Role;
use domain_shared::discord::RoleRank;
use poise::serenity_prelude as serenity;
use tracing::instrument;

#[instrument(level = "trace", skip(role))]
pub fn serenity_to_domain_role(role: serenity::Role) -> Role {
    Role {
        role_id: serenity_to_domain_role_id(role.id),
        rank: RoleRank(role.position),
        name: role.name,
    }
}
