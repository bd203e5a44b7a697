//! Service integrations for the host runtime.
//!
//! This module contains implementations for the collaborators the plugin relies on:
//! - Variable stores (in-memory, SurrealDB)
//! - Messaging gateways (console)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod gateway;
pub mod store;
