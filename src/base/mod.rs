//! Core components, types, and utilities for the shush-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Host event and host call types.
//! - Default phrases and emoji.
//! - Common types, errors, and result handling.

pub mod config;
pub mod error;
pub mod event;
pub mod phrases;
pub mod types;
