//! Recordable whiteboard engine
//!
//! This crate records freehand drawing as a timestamped event log and
//! replays it:
//! - [`types::EventKind`] - The six drawing actions, and how each one draws
//! - [`log`] - Append-only event log and UI notices
//! - [`timebase`] - One continuous timeline across record/stop cycles
//! - [`scheduler`] - Cancellable timers drained by the host event loop
//! - [`surface`] - The drawing surface trait and a recording test surface
//! - [`raster`] - CPU RGBA surface
//! - [`input`] - Pointer gesture to event mapping
//! - [`engine`] - Capture, redraw/seek, timed animation, recording control
//! - [`persistence`] - Session snapshots and stores

pub mod clock;
pub mod engine;
pub mod error;
pub mod input;
pub mod log;
pub mod persistence;
pub mod raster;
pub mod scheduler;
pub mod surface;
pub mod timebase;
pub mod types;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{PlaybackState, Whiteboard};
pub use error::{Result, WhiteboardError};
pub use input::{Gesture, GestureMapper, Tool};
pub use log::{EventLog, Notice, NoticeListeners};
pub use persistence::{FileStore, MemoryStore, Snapshot, SnapshotStore};
pub use raster::RasterSurface;
pub use scheduler::{TimerHandle, TimerQueue};
pub use surface::{CommandSurface, DrawingSurface, SurfaceGeometry, SurfaceOp};
pub use timebase::{ClockStatus, Timebase};
pub use types::{Event, EventKind};
pub use validation::{ValidationError, parse_color, validate_position};
pub use whiteboard_config::WhiteboardConfig;
