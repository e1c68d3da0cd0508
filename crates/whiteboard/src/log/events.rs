//! Notifications emitted by the whiteboard for UI hooks.

use std::time::Duration;

/// Notifications emitted by the whiteboard.
///
/// These let a UI layer (clock label, timeline slider, play button) follow
/// the engine without the engine knowing anything about widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// An event was appended to the log while recording.
    EventCaptured { index: usize, time: Duration },
    /// The displayed clock changed (playback position or live recording time).
    Clock(Duration),
    RecordingStarted,
    /// Recording paused; `length` is the new total recording length.
    RecordingStopped { length: Duration },
    PlaybackStarted,
    PlaybackPaused,
    /// The playback clock reached the end of the recording.
    PlaybackFinished,
    Saved { id: String },
    /// A stored session replaced the current one.
    Restored { id: String, length: Duration },
}

type Listener = Box<dyn Fn(&Notice) + Send>;

/// Registered notice listeners
#[derive(Default)]
pub struct NoticeListeners {
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for NoticeListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoticeListeners")
            .field("listener_count", &self.listeners.len())
            .finish()
    }
}

impl NoticeListeners {
    pub fn add<F>(&mut self, listener: F)
    where
        F: Fn(&Notice) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver a notice to every listener, in registration order.
    pub fn emit(&self, notice: Notice) {
        for listener in &self.listeners {
            listener(&notice);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
