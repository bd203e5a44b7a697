//! Console gateway: writes each host call as a JSON line.
//!
//! Used when the plugin runs outside a host, so the calls it would make can be
//! inspected or piped into another process.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use serde_json::json;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt, Stdout},
    sync::Mutex,
};
use tracing::instrument;

use crate::base::types::{HostResult, OutgoingMessage, OutgoingReaction, Res, Void};

use super::{GatewayClient, GenericGateway};

// Extra methods on `GatewayClient` applied by the console implementation.

impl GatewayClient {
    /// Creates a gateway that prints every call to stdout.
    pub fn console() -> Self {
        Self::new(Arc::new(ConsoleGateway::new(tokio::io::stdout())))
    }
}

/// Gateway that serializes calls to a writer, one JSON object per line.
#[derive(Debug)]
pub struct ConsoleGateway<W = Stdout> {
    out: Mutex<W>,
    next_id: AtomicU64,
}

impl<W> ConsoleGateway<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Creates a gateway writing one JSON line per call to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    async fn emit(&self, call: &str, args: serde_json::Value) -> Void {
        let mut line = serde_json::to_vec(&json!({ "call": call, "args": args }))?;
        line.push(b'\n');

        let mut out = self.out.lock().await;
        out.write_all(&line).await?;
        out.flush().await?;

        Ok(())
    }
}

#[async_trait]
impl<W> GenericGateway for ConsoleGateway<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    #[instrument(skip(self))]
    async fn send_message(&self, message: OutgoingMessage) -> Res<HostResult> {
        self.emit("sendMessage", serde_json::to_value(&message)?).await?;

        // Sent messages get a fresh id, as a real host would assign.
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        Ok(HostResult::with_id(format!("console-{id}")))
    }

    #[instrument(skip(self))]
    async fn react(&self, reaction: OutgoingReaction) -> Res<HostResult> {
        self.emit("react", serde_json::to_value(&reaction)?).await?;

        Ok(HostResult::with_id(reaction.message_id))
    }

    #[instrument(skip(self))]
    async fn watch_message(&self, message_id: &str) -> Res<HostResult> {
        self.emit("watchMessage", json!({ "id": message_id })).await?;

        Ok(HostResult::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_calls_are_written_as_json_lines() {
        let gateway = ConsoleGateway::new(Vec::new());

        gateway.watch_message("42").await.unwrap();
        let sent = gateway
            .send_message(OutgoingMessage {
                channel: "bots".to_string(),
                message: "hi".to_string(),
                reply: Some("42".to_string()),
            })
            .await
            .unwrap();
        let reacted = gateway
            .react(OutgoingReaction {
                message_id: "42".to_string(),
                channel: None,
                with: "✔️".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(sent.id.as_deref(), Some("console-1"));
        assert_eq!(reacted.id.as_deref(), Some("42"));

        let output = String::from_utf8(gateway.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = output.lines().map(|l| serde_json::from_str(l).unwrap()).collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], json!({ "call": "watchMessage", "args": { "id": "42" } }));
        assert_eq!(lines[1], json!({ "call": "sendMessage", "args": { "channel": "bots", "message": "hi", "reply": "42" } }));
        assert_eq!(lines[2], json!({ "call": "react", "args": { "messageId": "42", "with": "✔️" } }));
    }
}
