//! Session persistence
//!
//! A session is saved as a [`Snapshot`]: the event log plus the timeline
//! fields needed to keep recording where it left off. Snapshots are encoded
//! as JSON and handed to a [`SnapshotStore`] as opaque bytes.

mod snapshot;
mod store;

pub use snapshot::{SESSION_ID_LEN, Snapshot, generate_session_id};
pub use store::{FileStore, MemoryStore, SnapshotStore};
