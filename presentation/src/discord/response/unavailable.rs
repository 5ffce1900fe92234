use poise::CreateReply;
use tracing::instrument;

#[instrument(level = "trace")]
pub fn temporary_unavailable() -> CreateReply {
    CreateReply::default()
        .reply(true)
        .ephemeral(true)
        .content("The service is temporarily unavailable. Please try again later.")
}
