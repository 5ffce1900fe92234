use domain_shared::discord::GuildId;
use poise::serenity_prelude as serenity;
use tracing::instrument;

#[instrument(level = "trace", skip(guild_id))]
pub fn domain_to_serenity_guild_id(guild_id: GuildId) -> serenity::GuildId {
    serenity::GuildId::new(guild_id.0)
}
