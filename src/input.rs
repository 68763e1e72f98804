//! Input subsystem: key bindings and terminal event translation.

pub mod service;

// Modules outside this crate should prefer importing from `crate::input`
// rather than reaching into submodules.
pub use service::{InputAction, InputService, InputState, InputStateMachine, MoveDirection, QuickField};
