//! Startup sequence: logging, config validation, components, then the supervised polling loop.

use anyhow::{bail, Result};
use tracing::{info, instrument};

use crate::components::build_bot_components;
use crate::config::BotConfig;
use crate::supervisor::{supervise, RestartPolicy};
use crate::telegram::run_repl;

/// Main entry: init logging, validate config, build components, then run the REPL under the
/// supervisor. Returns `Err` when config is invalid or the supervisor gives up.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    dbot_core::init_tracing(&config.log_file)?;

    if !config.validate() {
        bail!("invalid configuration, see the log above");
    }

    info!(
        model = %config.llm_model,
        images_dir = %config.images_dir,
        log_file = %config.log_file,
        "Starting bot"
    );

    let components = build_bot_components(&config)?;
    let policy = RestartPolicy::default();
    supervise(&policy, || {
        run_repl(
            components.teloxide_bot.clone(),
            components.handler_chain.clone(),
        )
    })
    .await
}
