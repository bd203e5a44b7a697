//! Event handling for shush-bot.
//!
//! This module provides the plugin's behaviour:
//! - Routing host events to replies, reactions, and watch registrations
//! - Maintaining the ignore list of shushed messages

pub mod ignore_list;
pub mod plugin_event;
