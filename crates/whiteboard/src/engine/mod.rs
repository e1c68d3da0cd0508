//! Whiteboard engine
//!
//! This module ties the pieces together:
//! - Capture (from the host's input handlers via `capture` / `handle_gesture`)
//! - Event log (append-only record of everything drawn while recording)
//! - Redraw and seek (rebuilding the surface for a timeline position)
//! - Timed animation (replaying the log with its original delays)
//! - Session snapshots (save/restore through a `SnapshotStore`)
//!
//! The engine never blocks or sleeps. Animation steps and clock ticks are
//! timers in a [`TimerQueue`]; the host calls [`Whiteboard::poll`] from its
//! event loop and uses [`Whiteboard::next_deadline`] to decide how long to wait.

mod capture;
mod playback;
mod seek;
mod session;

use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use tracing::debug;
use whiteboard_config::WhiteboardConfig;

use crate::clock::Clock;
use crate::input::GestureMapper;
use crate::log::{EventLog, Notice, NoticeListeners};
use crate::raster::RasterSurface;
use crate::scheduler::{TimerHandle, TimerQueue};
use crate::surface::DrawingSurface;
use crate::timebase::Timebase;

/// Playback state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
    /// The playback clock reached the end of the recording
    Finished,
}

/// Work items held in the timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    /// Execute the event at the cursor
    AnimationStep,
    /// Advance the playback clock by one sample
    PlaybackTick,
    /// Report the live recording time
    RecordingTick,
}

/// A recordable whiteboard bound to a drawing surface
///
/// Owns the event log, the timebase, the replay cursor and the pending
/// timers. Several whiteboards can coexist; nothing is global.
pub struct Whiteboard<S: DrawingSurface> {
    pub(crate) surface: S,
    pub(crate) config: WhiteboardConfig,
    pub(crate) timebase: Timebase,
    pub(crate) log: EventLog,
    /// Index of the next event to execute, or of the last event once the
    /// whole log has been consumed
    pub(crate) cursor: usize,
    /// The event at `cursor` has already been executed (cursor parked at the end)
    pub(crate) tail_executed: bool,
    pub(crate) state: PlaybackState,
    pub(crate) timers: TimerQueue<Task>,
    /// Pending animation step; at most one exists
    pub(crate) step_timer: Option<TimerHandle>,
    /// Pending playback or recording tick
    pub(crate) clock_timer: Option<TimerHandle>,
    pub(crate) gestures: GestureMapper,
    pub(crate) stroke_color: String,
    pub(crate) session_id: Option<String>,
    pub(crate) listeners: NoticeListeners,
}

impl<S: DrawingSurface> std::fmt::Debug for Whiteboard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Whiteboard")
            .field("timebase", &self.timebase)
            .field("events", &self.log.len())
            .field("cursor", &self.cursor)
            .field("tail_executed", &self.tail_executed)
            .field("state", &self.state)
            .field("pending_timers", &self.timers.len())
            .field("stroke_color", &self.stroke_color)
            .field("session_id", &self.session_id)
            .finish()
    }
}

impl<S: DrawingSurface> Whiteboard<S> {
    /// Create an empty whiteboard drawing onto `surface`
    pub fn new(mut surface: S, config: WhiteboardConfig, clock: Arc<dyn Clock>) -> Self {
        let sample_rate = Duration::from_millis(config.sample_rate_ms.max(1));
        let stroke_color = config.stroke_color.clone();
        surface.set_stroke_color(&stroke_color);
        let gestures = GestureMapper::new(Vec2::new(config.eraser_width, config.eraser_height));

        Self {
            surface,
            timebase: Timebase::new(clock, sample_rate),
            config,
            log: EventLog::new(),
            cursor: 0,
            tail_executed: false,
            state: PlaybackState::Idle,
            timers: TimerQueue::new(),
            step_timer: None,
            clock_timer: None,
            gestures,
            stroke_color,
            session_id: None,
            listeners: NoticeListeners::default(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &WhiteboardConfig {
        &self.config
    }

    /// Get reference to the event log
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn timebase(&self) -> &Timebase {
        &self.timebase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn playback_clock(&self) -> Duration {
        self.timebase.playback_clock()
    }

    /// Length of the recording so far (live while recording)
    pub fn recording_length(&self) -> Duration {
        self.timebase.current_recording_time()
    }

    pub fn is_recording(&self) -> bool {
        self.timebase.is_recording()
    }

    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    /// Session id, assigned on first save or by restore
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn gestures(&self) -> &GestureMapper {
        &self.gestures
    }

    /// Register a listener for UI notices
    pub fn add_listener<F>(&mut self, listener: F)
    where
        F: Fn(&Notice) + Send + 'static,
    {
        self.listeners.add(listener);
    }

    /// Earliest pending timer deadline, on the injected clock
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Translate a point in displayed pixels to canvas logical coordinates
    pub fn logical_point(&self, displayed: Vec2) -> Vec2 {
        self.surface.geometry().to_logical(displayed)
    }

    /// Fire every timer that is due at the clock's current reading.
    ///
    /// Returns the number of timers fired.
    pub fn poll(&mut self) -> usize {
        let now = self.timebase.now();
        self.poll_at(now)
    }

    /// Fire every timer due at `now`, in deadline order.
    ///
    /// Follow-up timers are scheduled relative to the deadline of the timer
    /// that fired, so a late poll replays the chain without drift.
    pub fn poll_at(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        while let Some((handle, task)) = self.timers.pop_due(now) {
            fired += 1;
            let deadline = handle.deadline();
            match task {
                Task::AnimationStep => {
                    self.step_timer = None;
                    self.animation_step(deadline);
                }
                Task::PlaybackTick => {
                    self.clock_timer = None;
                    self.playback_tick(deadline);
                }
                Task::RecordingTick => {
                    self.clock_timer = None;
                    self.recording_tick(deadline);
                }
            }
        }
        fired
    }

    /// Index of the first event that has not been executed yet
    pub(crate) fn resume_index(&self) -> usize {
        if self.tail_executed {
            self.cursor + 1
        } else {
            self.cursor
        }
    }

    /// Move the cursor to `index`, parking it on the last event once the log is consumed
    pub(crate) fn set_cursor(&mut self, index: usize) {
        if index >= self.log.len() && !self.log.is_empty() {
            self.cursor = self.log.len() - 1;
            self.tail_executed = true;
        } else {
            self.cursor = index;
            self.tail_executed = false;
        }
    }

    /// Schedule the animation step.
    ///
    /// # Panics
    ///
    /// Panics if a step is already pending.
    pub(crate) fn schedule_step(&mut self, deadline: Duration) {
        assert!(
            self.step_timer.is_none(),
            "animation step scheduled while another is pending"
        );
        self.step_timer = Some(self.timers.schedule(deadline, Task::AnimationStep));
    }

    pub(crate) fn cancel_step(&mut self) {
        if let Some(handle) = self.step_timer.take() {
            self.timers.cancel(handle);
        }
    }

    pub(crate) fn start_ticker(&mut self, base: Duration, task: Task) {
        self.cancel_ticker();
        let deadline = base + self.timebase.sample_rate();
        self.clock_timer = Some(self.timers.schedule(deadline, task));
    }

    pub(crate) fn cancel_ticker(&mut self) {
        if let Some(handle) = self.clock_timer.take() {
            self.timers.cancel(handle);
        }
    }

    /// Cancel every pending timer
    pub(crate) fn cancel_timers(&mut self) {
        self.cancel_step();
        self.cancel_ticker();
        if !self.timers.is_empty() {
            debug!("Dropping {} orphaned timers", self.timers.len());
            self.timers.clear();
        }
    }
}

impl Whiteboard<RasterSurface> {
    /// Create a whiteboard on a raster surface sized by `config.canvas`
    pub fn with_raster(config: WhiteboardConfig, clock: Arc<dyn Clock>) -> Self {
        let surface = RasterSurface::from_config(&config);
        Self::new(surface, config, clock)
    }
}
