//! Messaging gateway: the host calls that produce visible side effects.
//!
//! This module defines the `GenericGateway` trait the plugin uses to talk back to
//! the chat platform through the host, and a default console implementation that
//! prints every call as a JSON line.

pub mod console;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{HostResult, OutgoingMessage, OutgoingReaction, Res};

// Traits.

/// Generic gateway trait that hosts must implement.
///
/// Each call is fire-and-forget from the plugin's perspective; the returned
/// [`HostResult`] carries the host's error code, which callers turn into a
/// [`crate::base::error::HostError`] via [`HostResult::into_result`].
#[async_trait]
pub trait GenericGateway: Send + Sync + 'static {
    /// Send a message to a channel, optionally as a reply.
    async fn send_message(&self, message: OutgoingMessage) -> Res<HostResult>;

    /// Add a reaction to a message.
    async fn react(&self, reaction: OutgoingReaction) -> Res<HostResult>;

    /// Register interest in future references and reactions on a message.
    async fn watch_message(&self, message_id: &str) -> Res<HostResult>;
}

// Structs.

/// Gateway client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct GatewayClient {
    inner: Arc<dyn GenericGateway>,
}

impl Deref for GatewayClient {
    type Target = dyn GenericGateway;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl GatewayClient {
    /// Wraps any gateway implementation.
    pub fn new(inner: Arc<dyn GenericGateway>) -> Self {
        Self { inner }
    }
}
