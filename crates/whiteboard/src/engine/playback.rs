//! Timed animation and recording control

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::log::Notice;
use crate::surface::DrawingSurface;
use crate::timebase::ClockStatus;
use crate::types::EventKind;

use super::{PlaybackState, Task, Whiteboard};

impl<S: DrawingSurface> Whiteboard<S> {
    /// Replay the whole log from the beginning with its original timing
    pub fn animate(&mut self) {
        self.leave_recording();
        self.cancel_timers();

        self.surface.clear_all();
        self.cursor = 0;
        self.tail_executed = false;
        self.timebase.set_playback_clock(Some(Duration::ZERO));
        self.state = PlaybackState::Playing;

        let now = self.timebase.now();
        if let Some(first) = self.log.get(0) {
            let delay = first.time;
            self.schedule_step(now + delay);
        }
        self.start_ticker(now, Task::PlaybackTick);

        info!("Animating {} events", self.log.len());
        self.listeners.emit(Notice::PlaybackStarted);
        self.listeners.emit(Notice::Clock(Duration::ZERO));
    }

    /// Resume playback from the current position.
    ///
    /// Restarts from the beginning when the playback clock sits at the end
    /// of the recording.
    pub fn play(&mut self) {
        self.leave_recording();
        if self.state == PlaybackState::Playing {
            debug!("play: already playing");
            return;
        }
        if self.timebase.is_playback_at_end() {
            self.animate();
            return;
        }

        self.cancel_timers();
        self.state = PlaybackState::Playing;
        let now = self.timebase.now();
        self.schedule_next_step(now);
        self.start_ticker(now, Task::PlaybackTick);

        debug!("Playing from {:?}", self.timebase.playback_clock());
        self.listeners.emit(Notice::PlaybackStarted);
    }

    /// Pause playback, keeping the cursor and playback clock
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.cancel_step();
        self.cancel_ticker();
        self.state = PlaybackState::Paused;

        debug!("Paused at {:?}", self.timebase.playback_clock());
        self.listeners.emit(Notice::PlaybackPaused);
    }

    /// Start or resume recording at the end of the log
    pub fn record(&mut self) {
        if self.timebase.is_recording() {
            warn!("record: already recording");
            return;
        }
        self.cancel_timers();
        self.state = PlaybackState::Idle;
        // New events land at the end of the timeline; show everything before them
        self.redraw_to(None);

        self.timebase.start_recording();
        if self.log.is_empty() {
            let color = self.stroke_color.clone();
            self.capture(EventKind::SetStrokeStyle { color });
        }
        let now = self.timebase.now();
        self.start_ticker(now, Task::RecordingTick);

        info!("Recording from {:?}", self.timebase.current_recording_time());
        self.listeners.emit(Notice::RecordingStarted);
    }

    /// Stop recording. Everything recorded is already on the surface.
    pub fn stop_recording(&mut self) {
        if !self.timebase.is_recording() {
            warn!("stop_recording: not recording");
            return;
        }
        self.timebase.stop_recording();
        self.cancel_ticker();
        self.set_cursor(self.log.len());

        let length = self.timebase.current_recording_time();
        info!("Recording stopped, {} events over {:?}", self.log.len(), length);
        self.listeners.emit(Notice::RecordingStopped { length });
        self.listeners.emit(Notice::Clock(length));
    }

    /// Execute the event at the cursor and chain the next step
    pub(crate) fn animation_step(&mut self, deadline: Duration) {
        let index = self.resume_index();
        let Some(event) = self.log.get(index) else {
            return;
        };
        let time = event.time;
        event.kind.execute(&mut self.surface);
        trace!("animation step {} at {:?}", index, time);

        let next = index + 1;
        self.set_cursor(next);
        if let Some(next_event) = self.log.get(next) {
            let delay = next_event.time.saturating_sub(time);
            self.schedule_step(deadline + delay);
        }
    }

    pub(crate) fn playback_tick(&mut self, deadline: Duration) {
        let status = self.timebase.set_playback_clock(None);
        self.listeners
            .emit(Notice::Clock(self.timebase.playback_clock()));
        match status {
            ClockStatus::Running => self.start_ticker(deadline, Task::PlaybackTick),
            ClockStatus::ReachedEnd => self.finish_playback(),
        }
    }

    pub(crate) fn recording_tick(&mut self, deadline: Duration) {
        if !self.timebase.is_recording() {
            return;
        }
        self.listeners
            .emit(Notice::Clock(self.timebase.current_recording_time()));
        self.start_ticker(deadline, Task::RecordingTick);
    }

    fn finish_playback(&mut self) {
        self.cancel_step();
        self.redraw_to(None);
        self.state = PlaybackState::Finished;
        debug!("Playback finished");
        self.listeners.emit(Notice::PlaybackFinished);
    }

    fn leave_recording(&mut self) {
        if self.timebase.is_recording() {
            debug!("Stopping recording for playback");
            self.stop_recording();
        }
    }
}
