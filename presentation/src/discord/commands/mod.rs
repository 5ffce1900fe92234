use crate::application_ports::Locator;
use crate::discord::Error;
use poise::Command;
use tracing::instrument;

pub mod reload;
pub mod status;
pub mod sync;

#[instrument(level = "trace", skip())]
pub fn enabled_commands<L: Locator + Send + Sync + 'static>() -> Vec<Command<L, Error>> {
    vec![reload::command(), status::command(), sync::command()]
}
