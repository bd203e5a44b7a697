//! Common result aliases and the values exchanged with the host runtime.

use serde::{Deserialize, Serialize};

use super::error::HostError;

/// The application error type.
pub type Err = anyhow::Error;
/// A result carrying the application error type.
pub type Res<T> = Result<T, Err>;
/// A result with no value.
pub type Void = Res<()>;

/// A message the plugin asks the host to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Channel to post into.
    pub channel: String,
    /// Message text.
    pub message: String,
    /// Id of the message this one replies to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

/// A reaction the plugin asks the host to add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingReaction {
    /// Id of the message to react to.
    pub message_id: String,
    /// Channel holding the message; the host falls back to the current channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Emoji token to react with.
    pub with: String,
}

/// The value every host call returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostResult {
    /// Id of whatever the host created (a sent message, a reacted message).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Zero on success, a negative host error code otherwise.
    #[serde(default)]
    pub error_code: i32,
}

impl HostResult {
    /// A successful result without an id.
    pub fn ok() -> Self {
        Self::default()
    }

    /// A successful result carrying an id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()), error_code: 0 }
    }

    /// A failed result carrying a host error code.
    pub fn failed(error_code: i32) -> Self {
        Self { id: None, error_code }
    }

    /// Converts the raw result into the id on success, or the matching [`HostError`].
    pub fn into_result(self) -> Result<Option<String>, HostError> {
        match HostError::from_code(self.error_code) {
            Some(err) => Err(err),
            None => Ok(self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_reaction_uses_host_field_names() {
        let reaction = OutgoingReaction {
            message_id: "9".to_string(),
            channel: None,
            with: "✔️".to_string(),
        };

        let json = serde_json::to_value(&reaction).unwrap();

        assert_eq!(json, serde_json::json!({ "messageId": "9", "with": "✔️" }));
    }

    #[test]
    fn test_host_result_error_code_defaults_to_success() {
        let result: HostResult = serde_json::from_str(r#"{ "id": "123" }"#).unwrap();

        assert_eq!(result.into_result().unwrap(), Some("123".to_string()));
    }

    #[test]
    fn test_host_result_maps_error_codes() {
        assert_eq!(HostResult::failed(-4).into_result(), Err(HostError::NoSuchMessage));
        assert_eq!(HostResult::failed(-999).into_result(), Err(HostError::OutOfTokens));
        assert_eq!(HostResult::failed(-42).into_result(), Err(HostError::Unknown(-42)));
    }
}
