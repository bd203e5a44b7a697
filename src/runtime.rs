//! Runtime services and shared state for the shush-bot.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{Instrument, error, info, info_span, instrument};

use crate::{
    base::{
        config::Config,
        event::Event,
        types::{Res, Void},
    },
    interaction::plugin_event::{PluginContext, handle_plugin_event},
    service::{gateway::GatewayClient, store::VarStore},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the variable store, the messaging gateway, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The variable store instance.
    pub store: VarStore,
    /// The messaging gateway instance.
    pub gateway: GatewayClient,
}

/// Counts from a [`Runtime::run`] pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Events handled successfully.
    pub handled: usize,
    /// Lines that could not be parsed or whose handling failed.
    pub failed: usize,
}

impl Runtime {
    /// Create a new runtime instance with the configured store and the console gateway.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the store.
        let store = VarStore::from_config(&config).await?;

        // Initialize the gateway.
        let gateway = GatewayClient::console();

        Ok(Self { config, store, gateway })
    }

    /// The handler context for one invocation.
    pub fn context(&self) -> PluginContext {
        PluginContext::new(&self.config, self.store.clone(), self.gateway.clone())
    }

    /// Parses one JSON event and handles it.
    pub async fn process_line(&self, line: &str) -> Void {
        let event = Event::parse(line)?;

        handle_plugin_event(event, &self.context()).await
    }

    /// Handles newline-delimited JSON events until the reader is exhausted.
    ///
    /// Events are processed strictly one at a time. A line that fails, including one
    /// that is not valid UTF-8, is logged and skipped; blank lines are ignored. Only
    /// a failure of the reader itself ends the run early.
    pub async fn run<R>(&self, reader: R) -> Res<RunStats>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut segments = reader.split(b'\n');
        let mut stats = RunStats::default();
        let mut number = 0usize;

        while let Some(bytes) = segments.next_segment().await? {
            number += 1;

            let line = match String::from_utf8(bytes) {
                Ok(line) => line,
                Err(err) => {
                    error!("Error while decoding line {}: {}", number, err);
                    stats.failed += 1;
                    continue;
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // Process the event.
            let result = self.process_line(line).instrument(info_span!("event", line = number)).await;

            // Log any errors.
            match result {
                Ok(()) => stats.handled += 1,
                Err(err) => {
                    error!("Error while handling line {}: {:#}", number, err);
                    stats.failed += 1;
                }
            }
        }

        info!("Input exhausted: {} handled, {} failed.", stats.handled, stats.failed);

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::service::gateway::console::ConsoleGateway;

    fn runtime(store: VarStore) -> Runtime {
        Runtime {
            config: Config::default(),
            store,
            gateway: GatewayClient::new(Arc::new(ConsoleGateway::new(Vec::new()))),
        }
    }

    #[tokio::test]
    async fn test_new_uses_memory_store_by_default() {
        let runtime = Runtime::new(Config::default()).await.unwrap();

        assert_eq!(runtime.store.get("ignore").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_run_skips_bad_lines_and_keeps_going() {
        let store = VarStore::memory();
        let runtime = runtime(store.clone());

        let lines: [&[u8]; 8] = [
            br#"{ "kind": "content", "channel": "bots", "message": { "id": "42" } }"#,
            b"",
            b"not json",
            b"\xff\xfe",
            br#"{ "kind": "watch:reference", "channel": "bots" }"#,
            r#"{ "kind": "watch:reaction:added", "channel": "bots", "reaction": { "with": "🤫", "message": { "id": "9" } } }"#.as_bytes(),
            b"\r",
            br#"{ "kind": "http:response", "channel": "bots" }"#,
        ];

        let mut input = Vec::new();
        for line in lines {
            input.extend_from_slice(line);
            input.push(b'\n');
        }

        let stats = runtime.run(input.as_slice()).await.unwrap();

        assert_eq!(stats, RunStats { handled: 3, failed: 3 });
        assert_eq!(store.get("ignore").await.unwrap().as_deref(), Some("9:"));
    }

    #[tokio::test]
    async fn test_events_see_earlier_state() {
        let store = VarStore::memory();
        let runtime = runtime(store.clone());

        runtime
            .process_line(r#"{ "kind": "watch:reaction:added", "channel": "bots", "reaction": { "with": "🤫", "message": { "id": "7" } } }"#)
            .await
            .unwrap();

        assert!(runtime.context().filter.is_ignored("7").await.unwrap());
    }
}
