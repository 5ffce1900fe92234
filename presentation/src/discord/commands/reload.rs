use crate::application_ports::Locator;
use crate::discord::{response, Context, Error};
use application_ports::role_mapping::RoleMappingError;
use poise::CreateReply;
use tracing::{info, instrument, warn};

/// Rebuilds the role mapping from configuration and the live role catalogs.
#[poise::command(slash_command, rename = "reload", required_permissions = "ADMINISTRATOR")]
#[instrument(level = "info", skip(ctx))]
pub async fn command<D: Sync + Locator>(ctx: Context<'_, D>) -> Result<(), Error> {
    let mapping_port = ctx.data().get_role_mapping_port();

    info!(
        guild_id = ctx.guild_id().map(|id| id.get()),
        user_id = ctx.author().id.get(),
        "Mapping reload requested",
    );

    let reply = match mapping_port.reload().await {
        Ok(size) => CreateReply::default()
            .reply(true)
            .ephemeral(true)
            .content(format!("Reloaded {size} role mapping(s)!")),
        Err(RoleMappingError::GuildUnresolvable) => CreateReply::default()
            .reply(true)
            .ephemeral(true)
            .content("Could not find one or both servers!"),
        Err(err) => {
            warn!("Mapping reload failed: {}", err);
            response::unavailable::temporary_unavailable()
        }
    };

    ctx.send(reply).await?;

    Ok(())
}
