//! Routing of host events to side effects.
//!
//! | Event | Condition | Action |
//! |---|---|---|
//! | `content` | | watch the message |
//! | `watch:reference` | message ignored | none |
//! | `watch:reference` | not ignored | reply in the channel |
//! | `watch:reaction:added` | shush emoji | acknowledge, then ignore the message |
//! | anything else | | none |

use tracing::{debug, info, instrument};

use crate::{
    base::{
        config::Config,
        error::{Dependency, DependencyExt},
        event::{Event, IncomingMessage, IncomingReaction},
        phrases,
        types::{HostResult, OutgoingMessage, OutgoingReaction, Res, Void},
    },
    service::{gateway::GatewayClient, store::VarStore},
};

use super::ignore_list::{IgnoreListFilter, IgnoreListOptions, validate_id};

/// Phrases and emoji the handler uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replies {
    /// Reply to referenced messages.
    pub reply_text: String,
    /// Reaction that shushes a message.
    pub shush_emoji: String,
    /// Reaction acknowledging a shush.
    pub ack_emoji: String,
}

impl Default for Replies {
    fn default() -> Self {
        Self {
            reply_text: phrases::REPLY_TEXT.to_string(),
            shush_emoji: phrases::SHUSH_EMOJI.to_string(),
            ack_emoji: phrases::ACK_EMOJI.to_string(),
        }
    }
}

impl From<&Config> for Replies {
    fn from(config: &Config) -> Self {
        Self {
            reply_text: config.reply_text.clone(),
            shush_emoji: config.shush_emoji.clone(),
            ack_emoji: config.ack_emoji.clone(),
        }
    }
}

/// Everything a single invocation of the handler needs.
#[derive(Clone)]
pub struct PluginContext {
    /// The ignore list.
    pub filter: IgnoreListFilter,
    /// The host messaging gateway.
    pub gateway: GatewayClient,
    /// Phrases and emoji.
    pub replies: Replies,
}

impl PluginContext {
    /// Builds a context from the configuration and the host services.
    pub fn new(config: &Config, store: VarStore, gateway: GatewayClient) -> Self {
        Self {
            filter: IgnoreListFilter::new(store, IgnoreListOptions::from(config)),
            gateway,
            replies: Replies::from(config),
        }
    }
}

/// Handles one host event.
///
/// Any store or gateway failure aborts the event with a
/// [`crate::base::error::PluginError`]. The ignore list is only written after the
/// acknowledgement went out, so a failed event never leaves a half-applied shush.
#[instrument(skip_all, fields(kind = event.kind()))]
pub async fn handle_plugin_event(event: Event, ctx: &PluginContext) -> Void {
    match event {
        Event::Content { message, .. } => handle_content(message, ctx).await,
        Event::Reference { channel, message } => handle_reference(channel, message, ctx).await,
        Event::ReactionAdded { reaction, .. } => handle_reaction_added(reaction, ctx).await,
        other => {
            debug!("Ignoring `{}` event.", other.kind());
            Ok(())
        }
    }
}

async fn handle_content(message: IncomingMessage, ctx: &PluginContext) -> Void {
    info!("Watching message `{}` ...", message.id);

    settle(ctx.gateway.watch_message(&message.id).await)?;

    Ok(())
}

async fn handle_reference(channel: String, message: IncomingMessage, ctx: &PluginContext) -> Void {
    if ctx.filter.is_ignored(&message.id).await? {
        info!("Message `{}` is shushed, not replying.", message.id);
        return Ok(());
    }

    info!("Replying to message `{}` ...", message.id);

    let reply = OutgoingMessage {
        channel,
        message: ctx.replies.reply_text.clone(),
        reply: Some(message.id),
    };

    settle(ctx.gateway.send_message(reply).await)?;

    Ok(())
}

async fn handle_reaction_added(reaction: IncomingReaction, ctx: &PluginContext) -> Void {
    if reaction.with != ctx.replies.shush_emoji {
        debug!("Ignoring `{}` reaction.", reaction.with);
        return Ok(());
    }

    let message_id = reaction.message.id;
    validate_id(&message_id)?;

    info!("Shushing message `{}` ...", message_id);

    let ack = OutgoingReaction {
        message_id: message_id.clone(),
        channel: None,
        with: ctx.replies.ack_emoji.clone(),
    };

    settle(ctx.gateway.react(ack).await)?;

    ctx.filter.add_ignored(&message_id).await?;

    Ok(())
}

/// Resolves a gateway call into the returned id, mapping transport and host errors
/// to a gateway dependency failure.
fn settle(result: Res<HostResult>) -> Res<Option<String>> {
    result.and_then(|r| Ok(r.into_result()?)).dependency(Dependency::Gateway)
}
