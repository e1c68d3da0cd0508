//! Recording and playback timebase
//!
//! Event timestamps live on a single logical timeline: recording time. Real
//! time spent with recording paused is accumulated in `subtract_time` and
//! removed, so several record/stop cycles produce one continuous recording.
//! The playback clock moves on the same timeline and is never allowed past
//! the end of the recording.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::clock::Clock;

/// Outcome of moving the playback clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStatus {
    /// The clock is before the end of the recording
    Running,
    /// The clock was clamped to (or landed on) the end of the recording
    ReachedEnd,
}

pub struct Timebase {
    clock: Arc<dyn Clock>,
    recording: bool,
    /// Recording length, frozen while not recording
    recording_time: Duration,
    /// Total real time spent outside recording
    subtract_time: Duration,
    /// Wall-clock time recording was last stopped
    last_end_time: Duration,
    playback_clock: Duration,
    sample_rate: Duration,
}

impl std::fmt::Debug for Timebase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timebase")
            .field("recording", &self.recording)
            .field("recording_time", &self.recording_time)
            .field("subtract_time", &self.subtract_time)
            .field("last_end_time", &self.last_end_time)
            .field("playback_clock", &self.playback_clock)
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

impl Timebase {
    pub fn new(clock: Arc<dyn Clock>, sample_rate: Duration) -> Self {
        Self {
            clock,
            recording: false,
            recording_time: Duration::ZERO,
            subtract_time: Duration::ZERO,
            last_end_time: Duration::ZERO,
            playback_clock: Duration::ZERO,
            sample_rate,
        }
    }

    /// Current wall-clock reading
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn sample_rate(&self) -> Duration {
        self.sample_rate
    }

    pub fn playback_clock(&self) -> Duration {
        self.playback_clock
    }

    pub fn subtract_time(&self) -> Duration {
        self.subtract_time
    }

    pub fn last_end_time(&self) -> Duration {
        self.last_end_time
    }

    /// Time used to stamp new events.
    ///
    /// Live while recording, otherwise the length frozen at the last stop.
    pub fn current_recording_time(&self) -> Duration {
        if self.recording {
            self.clock.now().saturating_sub(self.subtract_time)
        } else {
            self.recording_time
        }
    }

    /// Start (or resume) recording, excluding the paused interval from the timeline
    pub fn start_recording(&mut self) {
        if self.recording {
            warn!("start_recording: already recording");
            return;
        }
        let paused_for = self.clock.now().saturating_sub(self.last_end_time);
        self.subtract_time += paused_for;
        self.recording = true;
        debug!(
            "Recording resumed at {:?} after {:?} paused",
            self.recording_time, paused_for
        );
    }

    /// Stop recording, freezing its length and moving the playback clock to the end
    pub fn stop_recording(&mut self) {
        if !self.recording {
            warn!("stop_recording: not recording");
            return;
        }
        self.recording_time = self.current_recording_time();
        self.recording = false;
        self.last_end_time = self.clock.now();
        self.playback_clock = self.recording_time;
        debug!("Recording stopped at {:?}", self.recording_time);
    }

    /// Set the playback clock, or advance it by one sample when `time` is `None`.
    ///
    /// The clock never passes the end of the recording.
    pub fn set_playback_clock(&mut self, time: Option<Duration>) -> ClockStatus {
        let end = self.current_recording_time();
        let next = time.unwrap_or(self.playback_clock + self.sample_rate);
        if next >= end {
            self.playback_clock = end;
            ClockStatus::ReachedEnd
        } else {
            self.playback_clock = next;
            ClockStatus::Running
        }
    }

    /// Whether playback sits at the end of the recording
    pub fn is_playback_at_end(&self) -> bool {
        self.playback_clock >= self.current_recording_time()
    }

    /// Replace the timeline with persisted values.
    ///
    /// Stops recording and rewinds the playback clock to zero.
    pub fn restore(
        &mut self,
        recording_time: Duration,
        subtract_time: Duration,
        last_end_time: Duration,
    ) {
        self.recording = false;
        self.recording_time = recording_time;
        self.subtract_time = subtract_time;
        self.last_end_time = last_end_time;
        self.playback_clock = Duration::ZERO;
    }
}
