//! Console front-end: responsibility and boundaries
//!
//! This module owns everything the user sees: status texts, the activity log
//! and the command loop. It never runs probes on its own schedule; periodic
//! status arrives from ConnectionMonitor over a channel.

mod activity_log;
mod command;
mod console;
mod view;

pub use command::{ConsoleCommand, ContactRef};
pub use console::{spawn_stdin_reader, ActionOutcome, Console};
