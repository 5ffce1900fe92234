use crate::application_ports::Locator;
use application_ports::role_sync::RoleSyncError;
use domain_shared::discord::UserId;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::ClientBuilder;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

pub mod commands;
mod response;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a, D> = poise::Context<'a, D, Error>;

/// Grace period after a member joins the source guild before syncing, so
/// the platform has time to attach their roles.
const JOIN_SYNC_DELAY: Duration = Duration::from_secs(2);

pub async fn run_bot<L: Locator + Send + Sync + 'static>(
    locator: L,
    token: String,
    intents: serenity::GatewayIntents,
) -> Result<(), Error> {
    let source_guild = serenity::GuildId::new(locator.source_guild_id().0);
    let dest_guild = serenity::GuildId::new(locator.dest_guild_id().0);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::enabled_commands(),
            event_handler: |ctx, event, framework, locator| {
                Box::pin(event_handler(ctx, event, framework, locator))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                for guild in [source_guild, dest_guild] {
                    poise::builtins::register_in_guild(ctx, &framework.options().commands, guild)
                        .await?;
                }
                Ok(locator)
            })
        })
        .build();

    let mut client = ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await?;

    Ok(())
}

async fn event_handler<L: Locator>(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, L, Error>,
    locator: &L,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("{} has connected to Discord", data_about_bot.user.name);
            run_startup_sync(locator).await;
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            if new_member.guild_id.get() != locator.source_guild_id().0 {
                return Ok(());
            }

            tokio::time::sleep(JOIN_SYNC_DELAY).await;
            sync_one(locator, UserId(new_member.user.id.get())).await;
        }
        serenity::FullEvent::GuildMemberUpdate {
            old_if_available,
            new: _,
            event,
        } => {
            if event.guild_id.get() != locator.source_guild_id().0 {
                return Ok(());
            }
            if let Some(old) = old_if_available {
                let old_roles: HashSet<_> = old.roles.iter().collect();
                let new_roles: HashSet<_> = event.roles.iter().collect();
                if old_roles == new_roles {
                    return Ok(());
                }
            }

            sync_one(locator, UserId(event.user.id.get())).await;
        }
        _ => {}
    }

    Ok(())
}

#[instrument(level = "info", skip(locator))]
async fn run_startup_sync<L: Locator>(locator: &L) {
    match locator.get_role_mapping_port().reload().await {
        Ok(size) => info!("Built role mapping with {} pair(s)", size),
        Err(err) => {
            error!("Could not build the role mapping: {}", err);
            return;
        }
    }

    match locator.get_role_sync_port().sync_all_members().await {
        Ok(report) => info!(
            "Initial sync complete: {} synced, {} skipped",
            report.synced, report.skipped,
        ),
        Err(err) => error!("Initial sync failed: {}", err),
    }
}

/// Reacts to one membership notification. All errors are contained here;
/// a failed sync for one member never takes the event loop down.
#[instrument(level = "debug", skip(locator))]
async fn sync_one<L: Locator>(locator: &L, user_id: UserId) {
    match locator.get_role_sync_port().sync_member(user_id).await {
        Ok(_) => {}
        Err(RoleSyncError::MemberNotFound) => {
            debug!("Member {} has no counterpart to sync", user_id.0);
        }
        Err(err) => warn!("Failed to sync member {}: {}", user_id.0, err),
    }
}
