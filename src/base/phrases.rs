//! Default phrases, emoji and storage keys used by the plugin.

/// Reply sent when a watched message is referenced.
pub const REPLY_TEXT: &str = "i know you are but what am i";

/// Reaction that asks the bot to stop replying to a message.
pub const SHUSH_EMOJI: &str = "🤫";

/// Reaction the bot adds to acknowledge a shush.
pub const ACK_EMOJI: &str = "✔️";

/// Variable holding the ignore list.
pub const IGNORE_KEY: &str = "ignore";

/// Variable name the host refuses to read or write.
pub const RESERVED_KEY: &str = "__proto__";
