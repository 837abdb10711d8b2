use crate::bot;
use crate::bot::handlers::Command;
use crate::config::BotSettings;
use anyhow::{anyhow, Result};
use reelgrab_core::fetch::{InstagramClient, PostResolver};
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

/// Run the Telegram transport runtime.
///
/// # Errors
///
/// Returns an error if the bot token is missing or the Instagram client cannot
/// be built. Once polling starts, the function only returns on shutdown.
pub async fn run_bot(settings: Arc<BotSettings>) -> Result<()> {
    let token = settings
        .telegram
        .bot_token()
        .ok_or_else(|| anyhow!("{} is not set", crate::config::TOKEN_ENV_VAR))?
        .to_string();

    let resolver = init_resolver(&settings)?;
    let bot = Bot::new(token);
    register_commands(&bot).await;
    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![resolver])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped.");
    Ok(())
}

fn init_resolver(settings: &BotSettings) -> Result<Arc<dyn PostResolver>> {
    let client = InstagramClient::new(settings.fetch.as_ref())?;
    Ok(Arc::new(client))
}

async fn register_commands(bot: &Bot) {
    match bot.set_my_commands(Command::bot_commands()).await {
        Ok(_) => info!("Bot commands registered."),
        Err(e) => warn!("Failed to register bot commands: {}", e),
    }
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry().branch(
        Update::filter_message()
            .filter_command::<Command>()
            .endpoint(handle_command),
    )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    resolver: Arc<dyn PostResolver>,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => bot::handlers::start(bot, msg).await,
        Command::Download(link) => bot::handlers::download(bot, msg, link, resolver).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}
