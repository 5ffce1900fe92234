use crate::discord::role_id::serenity_to_domain_role_id;
use crate::discord::user_id::serenity_to_domain_user_id;
use domain::ports::discord::Member;
use domain_shared::discord::GuildId;
use poise::serenity_prelude as serenity;
use tracing::instrument;

#[instrument(level = "trace", skip(member))]
pub fn serenity_to_domain_member(guild_id: GuildId, member: serenity::Member) -> Member {
    let display_name = member.display_name().to_string();

    Member {
        user_id: serenity_to_domain_user_id(member.user.id),
        display_name,
        is_bot: member.user.bot,
        // The everyone role shares the guild's id; keep it out of the set.
        role_ids: member
            .roles
            .iter()
            .filter(|role_id| role_id.get() != guild_id.0)
            .copied()
            .map(serenity_to_domain_role_id)
            .collect(),
    }
}
