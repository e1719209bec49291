//! Event, Action, and StateMachine vocabulary shared by the MST processor,
//! the YAC gate, and the synchronizer.

mod action;
mod event;
mod request;
mod traits;

pub use action::{Action, OutboundMessage, TimerId};
pub use event::Event;
pub use request::RequestId;
pub use traits::StateMachine;
