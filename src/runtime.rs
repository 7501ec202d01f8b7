//! Runtimes that drive the engines
//!
//! Each engine gets its own task: events arrive on an mpsc channel, are run
//! through the pure transition function, and the resulting effects are
//! executed here. Remote calls run as spawned tasks that feed their outcome
//! back in as events, so the engine never blocks on I/O.

mod chat;
mod content;

#[cfg(test)]
pub mod testing;

pub use chat::{ChatHandle, ChatRuntime, ChatViewEvent};
pub use content::{ContentHandle, ContentRuntime, ContentViewEvent};

use crate::remote::{HttpRemote, LoggingRemote};

/// Remote used outside of tests
pub type ProductionRemote = LoggingRemote<HttpRemote>;
