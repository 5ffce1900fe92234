use crate::application_ports::Locator;
use crate::discord::{response, Context, Error};
use poise::serenity_prelude::CreateEmbed;
use poise::CreateReply;
use tracing::{info, instrument, warn};

/// Reports which guilds resolved and which role pairs are currently mapped.
#[poise::command(slash_command, rename = "status", required_permissions = "ADMINISTRATOR")]
#[instrument(level = "info", skip(ctx))]
pub async fn command<D: Sync + Locator>(ctx: Context<'_, D>) -> Result<(), Error> {
    let mapping_port = ctx.data().get_role_mapping_port();

    info!(
        guild_id = ctx.guild_id().map(|id| id.get()),
        user_id = ctx.author().id.get(),
        "Status requested",
    );

    let status = match mapping_port.status().await {
        Ok(status) => status,
        Err(err) => {
            warn!("Status request failed: {}", err);
            ctx.send(response::unavailable::temporary_unavailable())
                .await?;
            return Ok(());
        }
    };

    let mut embed = CreateEmbed::default()
        .title("Role Sync Status")
        .field("Source server", resolution_text(status.source_guild_resolved), false)
        .field(
            "Destination server",
            resolution_text(status.dest_guild_resolved),
            false,
        )
        .field(
            "Role mappings",
            format!("{} role(s) configured", status.mapping_size),
            false,
        );

    if !status.sample_pairs.is_empty() {
        let mut lines: Vec<String> = status
            .sample_pairs
            .iter()
            .map(|(source, dest)| format!("• {source} → {dest}"))
            .collect();
        if status.truncated > 0 {
            lines.push(format!("... and {} more", status.truncated));
        }
        embed = embed.field("Mappings", lines.join("\n"), false);
    }

    let reply = CreateReply::default().embed(embed).reply(true).ephemeral(true);
    ctx.send(reply).await?;

    Ok(())
}

fn resolution_text(resolved: bool) -> &'static str {
    if resolved {
        "Resolved"
    } else {
        "Not found"
    }
}
