//! REPL runner: converts teloxide messages to core::Message and passes them to HandlerChain,
//! one message at a time.

use anyhow::Result;
use dbot_core::{Message as CoreMessage, ToCoreMessage};
use handler_chain::HandlerChain;
use std::sync::Arc;
use teloxide::prelude::*;
use tokio::sync::Semaphore;
use tracing::{error, info, instrument, warn};

use super::adapters::TelegramMessageWrapper;

/// Polls Telegram until shutdown (Ctrl-C) and feeds every message to `handler_chain`.
///
/// teloxide dispatches different chats concurrently; a single-permit semaphore keeps message
/// processing sequential across the whole bot.
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(
            username = ?me.user.username,
            id = me.user.id.0,
            "Connected to Telegram"
        ),
        Err(e) => warn!(error = %e, "getMe failed, starting polling anyway"),
    }

    let permits = Arc::new(Semaphore::new(1));
    let chain = handler_chain;
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = chain.clone();
        let permits = permits.clone();

        async move {
            let core_msg = TelegramMessageWrapper(&msg).to_core();
            if core_msg.is_empty() {
                info!(
                    user_id = core_msg.user.id,
                    chat_id = core_msg.chat.id,
                    "Received non-text message, ignoring"
                );
                return respond(());
            }
            info!(
                user_id = core_msg.user.id,
                chat_id = core_msg.chat.id,
                message_content = %core_msg.content,
                "Received message"
            );

            process_message(&chain, &permits, &core_msg).await;
            respond(())
        }
    })
    .await;

    info!("Polling stopped");
    Ok(())
}

/// Runs `message` through `chain` while holding a permit from `permits`. With a single-permit
/// semaphore, at most one message is inside the chain at any time.
pub async fn process_message(chain: &HandlerChain, permits: &Semaphore, message: &CoreMessage) {
    let Ok(_permit) = permits.acquire().await else {
        warn!("Semaphore closed, dropping message");
        return;
    };
    match chain.handle(message).await {
        Ok(response) => info!(
            user_id = message.user.id,
            response = ?response,
            "Message handled"
        ),
        Err(e) => error!(error = %e, user_id = message.user.id, "Handler chain failed"),
    }
}
