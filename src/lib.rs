//! Library root for `shush-bot`.
//!
//! Shush-bot is a chat-bot plugin that talks back to the messages it watches:
//! - Watches every new message that matches its listener
//! - Replies "i know you are but what am i" when a watched message is referenced
//! - Stops replying to a message once someone reacts to it with 🤫
//!
//! The host runtime delivers one event at a time and provides a key-value variable
//! store and a messaging gateway. Both are traits here, so the plugin can run on
//! SurrealDB or in memory, and against a real host or the console.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use std::path::Path;

use base::{config::Config, types::Void};
use tokio::io::BufReader;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and feeds events to the plugin:
/// - Creates the runtime context with the variable store and gateway
/// - Reads newline-delimited JSON events from `events`, or stdin when `None`
/// - Handles them one at a time until the input ends
pub async fn start(config: Config, events: Option<&Path>) -> Void {
    info!("Starting shush-bot ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Run over the input.
    let stats = match events {
        Some(path) => runtime.run(BufReader::new(tokio::fs::File::open(path).await?)).await?,
        None => runtime.run(BufReader::new(tokio::io::stdin())).await?,
    };

    info!("Shush-bot finished ({} events handled).", stats.handled);

    Ok(())
}
