//! Redraw and timeline seeking

use std::time::Duration;

use tracing::{debug, warn};

use crate::log::Notice;
use crate::surface::DrawingSurface;

use super::{PlaybackState, Task, Whiteboard};

impl<S: DrawingSurface> Whiteboard<S> {
    /// Bring the surface to the state at `target`.
    ///
    /// `None` executes every remaining event. A target behind the playback
    /// clock, or at or before an event that was already executed, clears the
    /// surface and replays from the first event; otherwise replay resumes at
    /// the cursor. Events stamped at or after the target are left for later.
    /// The playback clock is not moved.
    ///
    /// Returns the number of events executed.
    pub fn redraw_to(&mut self, target: Option<Duration>) -> usize {
        if self.log.is_empty() {
            return 0;
        }

        if let Some(time) = target {
            // Animation steps can run up to one sample ahead of the clock
            let executed_past_target = self
                .resume_index()
                .checked_sub(1)
                .and_then(|last| self.log.get(last))
                .is_some_and(|event| event.time >= time);
            if time < self.timebase.playback_clock() || executed_past_target {
                debug!("Rewinding surface for {:?}", time);
                self.surface.clear_all();
                self.cursor = 0;
                self.tail_executed = false;
            }
        }

        let start = self.resume_index();
        let mut index = start;
        while let Some(event) = self.log.get(index) {
            if target.is_some_and(|time| event.time >= time) {
                break;
            }
            event.kind.execute(&mut self.surface);
            index += 1;
        }
        self.set_cursor(index);

        let executed = index - start;
        debug!("Redraw to {:?} executed {} events", target, executed);
        executed
    }

    /// Move the playback position to `time`.
    ///
    /// A running animation continues from the new position. While playing,
    /// the clock advances in sample-rate ticks but steps fire at their own
    /// event times, so a target behind an already drawn event rewinds even
    /// when it is ahead of the clock.
    ///
    /// # Panics
    ///
    /// Panics if `time` is past the end of the recording.
    pub fn seek(&mut self, time: Duration) {
        if self.timebase.is_recording() {
            warn!("seek: ignored while recording");
            return;
        }
        let length = self.recording_length();
        assert!(
            time <= length,
            "seek to {:?} past end of recording ({:?})",
            time,
            length
        );

        self.cancel_step();
        self.cancel_ticker();
        self.redraw_to(Some(time));
        self.timebase.set_playback_clock(Some(time));
        self.listeners.emit(Notice::Clock(time));

        match self.state {
            PlaybackState::Playing => {
                let now = self.timebase.now();
                self.schedule_next_step(now);
                self.start_ticker(now, Task::PlaybackTick);
            }
            PlaybackState::Finished => self.state = PlaybackState::Paused,
            PlaybackState::Idle | PlaybackState::Paused => {}
        }
    }

    /// Schedule the step for the next unexecuted event, relative to the playback clock
    pub(crate) fn schedule_next_step(&mut self, base: Duration) {
        if let Some(event) = self.log.get(self.resume_index()) {
            let delay = event.time.saturating_sub(self.timebase.playback_clock());
            self.schedule_step(base + delay);
        }
    }
}
