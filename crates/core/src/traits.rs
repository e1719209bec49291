//! Core trait for state machines.

use crate::{Action, Event};
use std::time::Duration;

/// A state machine that processes events.
///
/// This is the core abstraction shared by the MST processor, the YAC gate,
/// the synchronizer, and the node that composes them:
///
/// - **Synchronous**: no async, no `.await`.
/// - **Deterministic**: same state + event = same actions.
/// - **Pure-ish**: mutates `self`, but performs no I/O.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for NodeStateMachine {
///     fn handle(&mut self, event: Event) -> Vec<Action> {
///         match event {
///             Event::Mst(e) => self.mst.handle(e),
///             Event::Yac(e) => self.yac.handle(e),
///             Event::Sync(e) => self.sync.handle(e),
///         }
///     }
///
///     fn set_time(&mut self, now: Duration) {
///         self.now = now;
///     }
///
///     fn now(&self) -> Duration {
///         self.now
///     }
/// }
/// ```
pub trait StateMachine {
    /// Process an event, returning actions for the runner to perform.
    ///
    /// # Guarantees
    ///
    /// - **Synchronous**: never blocks or awaits.
    /// - **Deterministic**: given the same state and event, always returns
    ///   the same actions.
    /// - **No I/O**: all I/O is performed by the runner via the returned
    ///   actions.
    fn handle(&mut self, event: Event) -> Vec<Action>;

    /// Set the current time. Called by the runner before each `handle()`
    /// call.
    fn set_time(&mut self, now: Duration);

    /// Get the time that was last set via `set_time()`.
    fn now(&self) -> Duration;
}
