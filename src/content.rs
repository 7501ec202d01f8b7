//! Content sync state machine
//!
//! Mirrors the remote content store in a local cache and serializes local
//! edits with remote CRUD calls. Transitions are pure; the content runtime
//! executes the effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;
mod view;


pub use effect::ContentEffect;
pub use event::ContentEvent;
pub use state::{ContentContext, ContentState, DeleteNotice, EditorState, InFlight, RowMenu};
pub use transition::{transition, TransitionError, TransitionResult};
pub use view::{ContentView, EditorView, NoticeView};
