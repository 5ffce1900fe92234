use crate::args::CommonArgs;
use crate::locator;
use anyhow::anyhow;
use application::role_mapping::RoleMappingService;
use application::role_sync::RoleSyncService;
use clap::Args;
use domain::ports::discord::{MemberDirectory, RoleCatalog, RoleMutator};
use domain::role_mapping::RolePairSpec;
use domain_shared::discord::GuildId;
use infrastructure::discord::DiscordAdapter;
use presentation::discord::run_bot;
use poise::serenity_prelude::{ClientBuilder, GatewayIntents};
use std::sync::Arc;
use tracing::{instrument, warn};

#[derive(Args)]
pub struct ServeArgs {
    /// The token for the Discord bot
    #[arg(long, env = "DISCORD_BOT_TOKEN")]
    pub discord_bot_token: String,
    /// The ID of the subscription-gated guild roles are mirrored from
    #[arg(long, env = "SOURCE_GUILD_ID")]
    pub source_guild: u64,
    /// The ID of the guild roles are mirrored into
    #[arg(long, env = "DESTINATION_GUILD_ID")]
    pub destination_guild: u64,
    /// Comma-separated list of "sourceRoleName:destRoleName" pairs
    #[arg(long, env = "SYNC_ROLES", default_value = "")]
    pub sync_roles: String,
}

#[instrument(level = "trace", skip(common_args, args))]
pub async fn run(common_args: CommonArgs, args: ServeArgs) -> anyhow::Result<()> {
    let CommonArgs {
        sentry_dsn: _,
        sentry_environment: _,
        sentry_sample_rate: _,
        sentry_traces_sample_rate: _,
    } = common_args;
    let ServeArgs {
        discord_bot_token,
        source_guild,
        destination_guild,
        sync_roles,
    } = args;

    if discord_bot_token.trim().is_empty() {
        anyhow::bail!("DISCORD_BOT_TOKEN must not be empty");
    }
    if source_guild == 0 || destination_guild == 0 {
        anyhow::bail!("SOURCE_GUILD_ID and DESTINATION_GUILD_ID must be set and non-zero");
    }

    let source_guild_id = GuildId(source_guild);
    let dest_guild_id = GuildId(destination_guild);

    let configured_pairs: Vec<RolePairSpec> = sync_roles
        .split(',')
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(RolePairSpec::parse)
        .collect();
    if configured_pairs.is_empty() {
        warn!("SYNC_ROLES contains no valid pairs; no roles will be synchronized");
    }

    // Member join/update notifications require the privileged members intent.
    let intents = GatewayIntents::non_privileged() | GatewayIntents::GUILD_MEMBERS;

    let serenity_client = ClientBuilder::new(&discord_bot_token, intents).await?.http;

    let discord_adapter = Arc::new(DiscordAdapter::new(serenity_client));
    let role_catalog: Arc<dyn RoleCatalog + Send + Sync> = discord_adapter.clone();
    let member_directory: Arc<dyn MemberDirectory + Send + Sync> = discord_adapter.clone();
    let role_mutator: Arc<dyn RoleMutator + Send + Sync> = discord_adapter;

    let role_mapping_adapter = Arc::new(RoleMappingService::new(
        role_catalog.clone(),
        source_guild_id,
        dest_guild_id,
        configured_pairs,
    ));
    let role_sync_adapter = Arc::new(RoleSyncService::new(
        role_catalog,
        member_directory,
        role_mutator,
        role_mapping_adapter.clone(),
        source_guild_id,
        dest_guild_id,
    ));

    let locator = locator::ApplicationPortLocator::new(
        role_sync_adapter,
        role_mapping_adapter,
        source_guild_id,
        dest_guild_id,
    );

    let bot = tokio::spawn(run_bot(locator, discord_bot_token, intents));

    bot.await?.map_err(|e| anyhow!(e))?;

    Ok(())
}
