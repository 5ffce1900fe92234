use crate::application_ports::Locator;
use crate::discord::{response, Context, Error};
use application_ports::role_sync::RoleSyncError;
use domain_shared::discord::UserId;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;
use poise::CreateReply;
use tracing::{info, instrument, warn};

/// Manually synchronizes roles for one member, or all source guild members
/// when no target is given.
#[poise::command(slash_command, rename = "sync", required_permissions = "ADMINISTRATOR")]
#[instrument(level = "info", skip(ctx))]
pub async fn command<D: Sync + Locator>(
    ctx: Context<'_, D>,
    #[description = "Member to sync; leave empty to sync all members"] target: Option<
        serenity::User,
    >,
) -> Result<(), Error> {
    let sync_port = ctx.data().get_role_sync_port();

    info!(
        guild_id = ctx.guild_id().map(|id| id.get()),
        user_id = ctx.author().id.get(),
        "Manual sync requested for {:?}",
        target.as_ref().map(|user| user.id.get()),
    );

    // A full sync can easily exceed the interaction deadline.
    ctx.defer_ephemeral().await?;

    let reply = match &target {
        Some(user) => match sync_port.sync_member(UserId(user.id.get())).await {
            Ok(_) => ephemeral(format!("Synced roles for {}!", user.mention())),
            Err(RoleSyncError::MemberNotFound) => {
                ephemeral("Member not found in one or both servers!".to_string())
            }
            Err(RoleSyncError::GuildUnresolvable) => {
                ephemeral("Could not find one or both servers!".to_string())
            }
            Err(err) => {
                warn!("Manual sync for {} failed: {}", user.id.get(), err);
                response::unavailable::temporary_unavailable()
            }
        },
        None => match sync_port.sync_all_members().await {
            Ok(report) => ephemeral(format!(
                "Full sync complete! Synced {} member(s), skipped {}.",
                report.synced, report.skipped,
            )),
            Err(RoleSyncError::GuildUnresolvable) => {
                ephemeral("Could not find one or both servers!".to_string())
            }
            Err(err) => {
                warn!("Full sync failed: {}", err);
                response::unavailable::temporary_unavailable()
            }
        },
    };

    ctx.send(reply).await?;

    Ok(())
}

fn ephemeral(content: String) -> CreateReply {
    CreateReply::default().reply(true).ephemeral(true).content(content)
}
