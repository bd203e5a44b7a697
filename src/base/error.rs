//! Typed errors that callers may want to inspect.
//!
//! Everything else flows through `anyhow` (see [`super::types::Res`]); these types
//! can be recovered from an `anyhow::Error` with `downcast_ref`.

use std::fmt;

use thiserror::Error;

use super::types::Res;

/// Errors reported by the host through a non-zero `errorCode`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// The channel could not be found (`-3`).
    #[error("no such channel")]
    NoSuchChannel,
    /// The message could not be found (`-4`).
    #[error("no such message")]
    NoSuchMessage,
    /// The plugin may not reach the requested host (`-5`).
    #[error("no access to hosts")]
    NoHostAccess,
    /// The request was malformed (`-6`).
    #[error("bad request")]
    BadRequest,
    /// The plugin ran out of rate-limiting tokens (`-999`).
    #[error("not enough tokens")]
    OutOfTokens,
    /// Any other non-zero code.
    #[error("host error code {0}")]
    Unknown(i32),
}

impl HostError {
    /// Maps a host error code to an error; `0` means success.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => None,
            -3 => Some(Self::NoSuchChannel),
            -4 => Some(Self::NoSuchMessage),
            -5 => Some(Self::NoHostAccess),
            -6 => Some(Self::BadRequest),
            -999 => Some(Self::OutOfTokens),
            other => Some(Self::Unknown(other)),
        }
    }

    /// The host error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::NoSuchChannel => -3,
            Self::NoSuchMessage => -4,
            Self::NoHostAccess => -5,
            Self::BadRequest => -6,
            Self::OutOfTokens => -999,
            Self::Unknown(code) => *code,
        }
    }
}

/// Errors raised while turning a wire event into a typed [`super::event::Event`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The event kind requires a payload that was not present.
    #[error("event `{kind}` is missing `{field}`")]
    MissingField {
        /// The event kind.
        kind: String,
        /// The missing field.
        field: &'static str,
    },
}

/// Errors raised by the ignore list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IgnoreListError {
    /// The id is empty or contains the `:` token terminator, so it cannot be stored.
    #[error("message id `{id}` cannot be stored in the ignore list")]
    InvalidId {
        /// The rejected id.
        id: String,
    },
}

/// External collaborators the plugin depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    /// The host key-value variable store.
    Store,
    /// The host messaging gateway.
    Gateway,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store => f.write_str("variable store"),
            Self::Gateway => f.write_str("messaging gateway"),
        }
    }
}

/// Errors that abort the processing of a single event.
#[derive(Error, Debug)]
pub enum PluginError {
    /// A store or gateway call failed.
    #[error("{dependency} unavailable: {source}")]
    DependencyUnavailable {
        /// Which collaborator failed.
        dependency: Dependency,
        /// The underlying failure.
        source: anyhow::Error,
    },
}

impl PluginError {
    /// The failed collaborator.
    pub fn dependency(&self) -> Dependency {
        match self {
            Self::DependencyUnavailable { dependency, .. } => *dependency,
        }
    }
}

/// Extension for tagging a failed call with the collaborator it came from.
pub trait DependencyExt<T> {
    /// Wraps any error as [`PluginError::DependencyUnavailable`].
    fn dependency(self, dependency: Dependency) -> Res<T>;
}

impl<T, E> DependencyExt<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn dependency(self, dependency: Dependency) -> Res<T> {
        self.map_err(|err| PluginError::DependencyUnavailable { dependency, source: err.into() }.into())
    }
}
