//! Session save and restore

use tracing::info;

use crate::error::{Result, WhiteboardError};
use crate::log::{EventLog, Notice};
use crate::persistence::{Snapshot, SnapshotStore, generate_session_id};
use crate::surface::DrawingSurface;

use super::{PlaybackState, Whiteboard};

impl<S: DrawingSurface> Whiteboard<S> {
    /// Current session as a snapshot, tagged with `unique_id`
    pub fn snapshot(&self, unique_id: impl Into<String>) -> Snapshot {
        // A session saved mid-recording resumes as if recording stopped now
        let last_end_time = if self.timebase.is_recording() {
            self.timebase.now()
        } else {
            self.timebase.last_end_time()
        };
        Snapshot {
            unique_id: unique_id.into(),
            recording_time: self.timebase.current_recording_time(),
            subtract_time: self.timebase.subtract_time(),
            last_end_time,
            stroke_color: self.stroke_color.clone(),
            events: self.log.events().to_vec(),
        }
    }

    /// Save the session, assigning an id on first save.
    ///
    /// Returns the session id.
    pub fn save<T: SnapshotStore + ?Sized>(&mut self, store: &mut T) -> Result<String> {
        let id = self
            .session_id
            .get_or_insert_with(generate_session_id)
            .clone();
        let blob = self.snapshot(id.clone()).encode()?;
        if !store.save(&id, &blob) {
            return Err(WhiteboardError::SaveRejected(id));
        }

        info!("Saved session {} ({} events)", id, self.log.len());
        self.listeners.emit(Notice::Saved { id: id.clone() });
        Ok(id)
    }

    /// Replace the current session with the one stored under `id`.
    ///
    /// On error nothing is changed. On success the board is cleared and
    /// rewound; the restored drawing appears through seek or playback.
    pub fn restore<T: SnapshotStore + ?Sized>(&mut self, store: &T, id: &str) -> Result<()> {
        let blob = store
            .load(id)
            .ok_or_else(|| WhiteboardError::SnapshotMissing(id.to_string()))?;
        let snapshot = Snapshot::decode(&blob)?;
        if snapshot.unique_id != id {
            return Err(WhiteboardError::IdentityMismatch {
                expected: id.to_string(),
                found: snapshot.unique_id,
            });
        }
        let Snapshot {
            unique_id,
            recording_time,
            subtract_time,
            last_end_time,
            stroke_color,
            events,
        } = snapshot;
        let log = EventLog::from_events(events)?;
        if let Some(time) = log.last_time().filter(|time| *time > recording_time) {
            return Err(WhiteboardError::EventPastEnd {
                time,
                length: recording_time,
            });
        }

        self.cancel_timers();
        self.log = log;
        self.timebase
            .restore(recording_time, subtract_time, last_end_time);
        self.surface.clear_all();
        self.surface.set_stroke_color(&stroke_color);
        self.stroke_color = stroke_color;
        self.cursor = 0;
        self.tail_executed = false;
        self.state = PlaybackState::Idle;
        self.gestures.reset();
        self.session_id = Some(unique_id.clone());

        info!(
            "Restored session {} ({} events over {:?})",
            unique_id,
            self.log.len(),
            recording_time
        );
        self.listeners.emit(Notice::Restored {
            id: unique_id,
            length: recording_time,
        });
        Ok(())
    }
}
