//! Operator commands received through the Telegram inbox
//!
//! The listener owns the inbox cursor. It is polled both by its own
//! background loop and, once per alert, by the alert dispatcher waiting for
//! an acknowledgment.

pub mod listener;
pub mod parser;
pub mod retry;

pub use listener::CommandListener;
pub use parser::Command;
pub use retry::RetryPolicy;
