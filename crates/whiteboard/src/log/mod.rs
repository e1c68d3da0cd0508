//! Event log storage and notification hooks for the whiteboard.
//!
//! This module provides:
//! - [`EventLog`] - Append-only, time-ordered storage for drawing events
//! - [`Notice`] - Notifications for UI integration hooks
//! - [`NoticeListeners`] - Listener registry that delivers notices
//!
//! ## Ordering
//!
//! Every event is stamped with the recording time at capture. Recording time
//! never decreases, even across stop/start cycles, so insertion order and
//! time order are the same thing. Restoring a log from storage re-checks this
//! and refuses a log whose timestamps go backwards.

mod events;
mod storage;

pub use events::{Notice, NoticeListeners};
pub use storage::EventLog;
