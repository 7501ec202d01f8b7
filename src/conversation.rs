//! Conversation engine state machine
//!
//! A scripted menu that turns into freeform questions, with one remote
//! exchange in flight at a time. Implemented as pure state transitions; the
//! chat runtime executes the effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;
mod view;


pub use effect::ChatEffect;
pub use event::ChatEvent;
pub use state::{ChatState, ConversationMode, ExchangeId, Origin, Turn, TurnKind};
pub use transition::{transition, TransitionError, TransitionResult};
pub use view::{ChatView, TurnView};
