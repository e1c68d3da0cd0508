//! Capture of drawing actions

use glam::Vec2;
use tracing::{trace, warn};

use crate::input::{Gesture, Tool};
use crate::log::Notice;
use crate::surface::DrawingSurface;
use crate::types::{Event, EventKind};
use crate::validation::{parse_color, validate_position};

use super::{PlaybackState, Whiteboard};

impl<S: DrawingSurface> Whiteboard<S> {
    /// Capture a drawing action.
    ///
    /// The action is always drawn. It is appended to the log, stamped with
    /// the current recording time, only while recording.
    pub fn capture(&mut self, kind: EventKind) {
        let logged = self.timebase.is_recording();
        self.apply(kind, logged);
    }

    /// Start a path at (x, y)
    pub fn begin_path(&mut self, x: f32, y: f32) {
        if let Some(position) = checked_position(x, y) {
            self.capture(EventKind::BeginPath { position });
        }
    }

    /// Extend the current path to (x, y)
    pub fn draw_to(&mut self, x: f32, y: f32) {
        if let Some(position) = checked_position(x, y) {
            self.capture(EventKind::DrawSegment { position });
        }
    }

    pub fn close_path(&mut self) {
        self.capture(EventKind::ClosePath);
    }

    /// Erase the configured eraser rectangle anchored at (x, y)
    pub fn erase_at(&mut self, x: f32, y: f32) {
        if let Some(position) = checked_position(x, y) {
            self.capture(EventKind::Erase {
                position,
                width: self.config.eraser_width,
                height: self.config.eraser_height,
            });
        }
    }

    /// Clear the whole board
    pub fn clear(&mut self) {
        self.capture(EventKind::ClearAll);
    }

    /// Change the stroke color.
    ///
    /// Logged while recording and whenever playback is not running, so a
    /// color picked before recording starts is part of the session. Colors
    /// the surface could not parse are rejected.
    pub fn set_stroke_color(&mut self, color: impl Into<String>) {
        let color = color.into();
        if let Err(err) = parse_color(&color) {
            warn!("Ignoring stroke color: {}", err);
            return;
        }
        let logged = self.timebase.is_recording() || self.state != PlaybackState::Playing;
        self.apply(EventKind::SetStrokeStyle { color }, logged);
    }

    /// Select the drawing tool, closing any open path
    pub fn set_tool(&mut self, tool: Tool) {
        if let Some(kind) = self.gestures.set_tool(tool) {
            self.capture(kind);
        }
    }

    /// Feed a pointer gesture in canvas logical coordinates
    pub fn handle_gesture(&mut self, gesture: Gesture) {
        match self.gestures.map(gesture) {
            Some(EventKind::SetStrokeStyle { color }) => self.set_stroke_color(color),
            Some(kind) => self.capture(kind),
            None => {}
        }
    }

    /// Feed a pointer gesture whose positions are in displayed pixels
    pub fn handle_pointer_displayed(&mut self, gesture: Gesture) {
        let gesture = match gesture {
            Gesture::PointerDown(position) => Gesture::PointerDown(self.logical_point(position)),
            Gesture::PointerMove(position) => Gesture::PointerMove(self.logical_point(position)),
            other => other,
        };
        self.handle_gesture(gesture);
    }

    /// Draw `kind` and, when `logged`, append it to the log
    fn apply(&mut self, kind: EventKind, logged: bool) {
        kind.execute(&mut self.surface);
        if let EventKind::SetStrokeStyle { color } = &kind {
            self.stroke_color.clone_from(color);
        }
        if !logged {
            trace!("preview {}", kind);
            return;
        }

        // Keep a caught-up cursor parked on the newest event, which is already drawn
        let caught_up = self.resume_index() >= self.log.len();
        let time = self.timebase.current_recording_time();
        let index = self.log.append(Event::new(kind, time));
        if caught_up {
            self.set_cursor(index + 1);
        }
        trace!("captured event {} at {:?}", index, time);
        self.listeners.emit(Notice::EventCaptured { index, time });
    }
}

fn checked_position(x: f32, y: f32) -> Option<Vec2> {
    let position = Vec2::new(x, y);
    match validate_position(position) {
        Ok(()) => Some(position),
        Err(err) => {
            warn!("Ignoring drawing action: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::engine::tests::{board, ms};
    use crate::surface::SurfaceOp;

    #[test]
    fn test_capture_without_recording_only_draws() {
        let (mut board, _clock) = board();
        board.surface.take_ops();
        board.begin_path(1.0, 2.0);
        board.draw_to(3.0, 4.0);
        board.close_path();

        assert!(board.log().is_empty());
        assert_eq!(board.surface().stroke_count(), 2);
    }

    #[test]
    fn test_capture_while_recording_stamps_events() {
        let (mut board, clock) = board();
        board.record();
        board.begin_path(0.0, 0.0);
        clock.advance_ms(100);
        board.draw_to(5.0, 5.0);
        clock.advance_ms(50);
        board.close_path();

        let times: Vec<_> = board.log().iter().map(|event| event.time).collect();
        // Initial color, then the three path events
        assert_eq!(times, vec![ms(0), ms(0), ms(100), ms(150)]);
        assert_eq!(board.log()[0].kind.as_str(), "set_stroke_style");
        assert_eq!(board.cursor(), 3);
        assert_eq!(board.resume_index(), 4);
    }

    #[test]
    fn test_log_timestamps_never_decrease() {
        let (mut board, clock) = board();
        for round in 0..3 {
            board.record();
            for step in 0..4 {
                board.draw_to(step as f32, round as f32);
                clock.advance_ms(30);
            }
            board.stop_recording();
            clock.advance_ms(5_000);
            board.set_stroke_color("#ff0000");
        }
        let events = board.log().events();
        assert!(events.windows(2).all(|pair| pair[0].time <= pair[1].time));
        assert_eq!(board.recording_length(), ms(360));
    }

    #[test]
    fn test_stroke_color_logged_once_when_idle() {
        let (mut board, _clock) = board();
        board.set_stroke_color("#ff0000");
        assert_eq!(board.log().len(), 1);
        assert_eq!(board.stroke_color(), "#ff0000");
        assert_eq!(
            board.surface().ops().last(),
            Some(&SurfaceOp::SetStrokeColor("#ff0000".into()))
        );
    }

    #[test]
    fn test_stroke_color_not_logged_while_playing() {
        let (mut board, clock) = board();
        board.record();
        board.begin_path(0.0, 0.0);
        clock.advance_ms(1_000);
        board.stop_recording();
        let len = board.log().len();

        board.animate();
        board.set_stroke_color("#00ff00");
        assert_eq!(board.log().len(), len);
        assert_eq!(board.stroke_color(), "#00ff00");
    }

    #[test]
    fn test_invalid_stroke_color_rejected() {
        let (mut board, _clock) = board();
        board.set_stroke_color("not-a-color");
        assert!(board.log().is_empty());
        assert_eq!(board.stroke_color(), "#000000");
    }

    #[test]
    fn test_erase_uses_configured_size() {
        let (mut board, _clock) = board();
        board.surface.take_ops();
        board.erase_at(20.0, 30.0);
        assert_eq!(
            board.surface().ops(),
            &[SurfaceOp::ClearRect {
                x: 20.0,
                y: 30.0,
                width: 10.0,
                height: 10.0,
            }]
        );
    }

    #[test]
    fn test_non_finite_coordinates_ignored() {
        let (mut board, _clock) = board();
        board.record();
        let len = board.log().len();
        board.begin_path(f32::NAN, 1.0);
        board.draw_to(1.0, f32::INFINITY);
        assert_eq!(board.log().len(), len);
    }

    #[test]
    fn test_gestures_drive_capture() {
        let (mut board, clock) = board();
        let captured = Arc::new(Mutex::new(Vec::new()));
        let captured_clone = Arc::clone(&captured);
        board.add_listener(move |notice| {
            if let Notice::EventCaptured { index, .. } = notice {
                captured_clone.lock().unwrap().push(*index);
            }
        });

        board.record();
        board.handle_gesture(Gesture::PointerMove(Vec2::ONE));
        board.handle_gesture(Gesture::PointerDown(Vec2::ZERO));
        clock.advance_ms(20);
        board.handle_gesture(Gesture::PointerMove(Vec2::new(4.0, 4.0)));
        board.handle_gesture(Gesture::PointerLeave);
        board.set_tool(Tool::Eraser);
        board.handle_gesture(Gesture::PointerDown(Vec2::new(8.0, 8.0)));
        board.handle_gesture(Gesture::PointerMove(Vec2::new(9.0, 9.0)));
        board.handle_gesture(Gesture::PointerUp);
        board.handle_gesture(Gesture::SetColor("#0000ff".into()));
        board.handle_gesture(Gesture::Clear);

        let kinds: Vec<_> = board.log().iter().map(|event| event.kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                "set_stroke_style",
                "begin_path",
                "draw_segment",
                "close_path",
                "begin_path",
                "erase",
                "close_path",
                "set_stroke_style",
                "clear_all",
            ]
        );
        assert_eq!(*captured.lock().unwrap(), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_displayed_pointer_positions_scaled() {
        let clock = crate::clock::ManualClock::new(crate::engine::tests::START);
        let surface = crate::surface::CommandSurface::with_geometry(
            crate::surface::SurfaceGeometry {
                logical_width: 640.0,
                logical_height: 480.0,
                displayed_width: 1280.0,
                displayed_height: 960.0,
            },
        );
        let mut board = Whiteboard::new(
            surface,
            whiteboard_config::WhiteboardConfig::default(),
            Arc::new(clock),
        );
        board.record();
        board.handle_pointer_displayed(Gesture::PointerDown(Vec2::new(100.0, 50.0)));
        assert_eq!(
            board.log().events().last().map(|event| &event.kind),
            Some(&EventKind::BeginPath {
                position: Vec2::new(50.0, 25.0)
            })
        );
    }
}
