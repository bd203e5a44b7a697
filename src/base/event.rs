//! Events delivered by the host runtime.
//!
//! The host sends a flat [`IncomingEvent`] whose optional fields depend on its `kind`.
//! Handlers work on the typed [`Event`] instead, where each kind carries exactly the
//! payload it needs.

use serde::{Deserialize, Serialize};

use super::{error::EventError, types::Res};

/// Known event kinds.
pub mod kinds {
    /// A new message matched the plugin's listener.
    pub const CONTENT: &str = "content";
    /// A watched message was replied to or quoted.
    pub const REFERENCE: &str = "watch:reference";
    /// A reaction was added to a watched message.
    pub const REACTION_ADDED: &str = "watch:reaction:added";
    /// A reaction was removed from a watched message.
    pub const REACTION_REMOVED: &str = "watch:reaction:removed";
}

/// A chat message as seen by the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Message id.
    pub id: String,
    /// Message text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Author id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A reaction on a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingReaction {
    /// The message that was reacted to.
    pub message: IncomingMessage,
    /// Id of the reacting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// The emoji token.
    pub with: String,
}

/// The event exactly as the host serializes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingEvent {
    /// Event discriminator (see [`kinds`]).
    pub kind: String,
    /// Channel the event happened in.
    #[serde(default)]
    pub channel: String,
    /// Guild (server) the event happened in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild: Option<String>,
    /// Message payload, present for message events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<IncomingMessage>,
    /// Reaction payload, present for reaction events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<IncomingReaction>,
}

/// A typed event, one variant per kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `content`: a new message.
    Content {
        /// Channel of the message.
        channel: String,
        /// The message.
        message: IncomingMessage,
    },
    /// `watch:reference`: a watched message was referenced.
    Reference {
        /// Channel of the referencing message.
        channel: String,
        /// The referenced message.
        message: IncomingMessage,
    },
    /// `watch:reaction:added`.
    ReactionAdded {
        /// Channel of the reacted message.
        channel: String,
        /// The reaction.
        reaction: IncomingReaction,
    },
    /// `watch:reaction:removed`.
    ReactionRemoved {
        /// Channel of the reacted message.
        channel: String,
        /// The reaction.
        reaction: IncomingReaction,
    },
    /// Any kind the plugin does not act on.
    Other {
        /// The raw kind.
        kind: String,
    },
}

impl Event {
    /// Parses one JSON-encoded host event.
    pub fn parse(json: &str) -> Res<Self> {
        let incoming: IncomingEvent = serde_json::from_str(json)?;

        Ok(Self::try_from(incoming)?)
    }

    /// The wire kind of this event.
    pub fn kind(&self) -> &str {
        match self {
            Self::Content { .. } => kinds::CONTENT,
            Self::Reference { .. } => kinds::REFERENCE,
            Self::ReactionAdded { .. } => kinds::REACTION_ADDED,
            Self::ReactionRemoved { .. } => kinds::REACTION_REMOVED,
            Self::Other { kind } => kind,
        }
    }
}

impl TryFrom<IncomingEvent> for Event {
    type Error = EventError;

    fn try_from(incoming: IncomingEvent) -> Result<Self, Self::Error> {
        let IncomingEvent { kind, channel, message, reaction, .. } = incoming;

        let missing = |field| EventError::MissingField { kind: kind.clone(), field };

        let event = match kind.as_str() {
            kinds::CONTENT => Self::Content {
                message: message.ok_or_else(|| missing("message"))?,
                channel,
            },
            kinds::REFERENCE => Self::Reference {
                message: message.ok_or_else(|| missing("message"))?,
                channel,
            },
            kinds::REACTION_ADDED => Self::ReactionAdded {
                reaction: reaction.ok_or_else(|| missing("reaction"))?,
                channel,
            },
            kinds::REACTION_REMOVED => Self::ReactionRemoved {
                reaction: reaction.ok_or_else(|| missing("reaction"))?,
                channel,
            },
            _ => Self::Other { kind },
        };

        Ok(event)
    }
}
