//! Event handling module.
//!
//! This module contains handlers for different types of events:
//! - Network events: issue queries run on the network thread
//! - Terminal events: key presses and ticks

pub mod network;
pub mod terminal;
