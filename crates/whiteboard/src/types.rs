use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::surface::DrawingSurface;

/// A single drawing action, without its timestamp
///
/// Serialized with an internal `type` tag so a snapshot reads as
/// `{"type": "draw_segment", "position": [5.0, 5.0], "time": 100}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Start a new stroke or erase path
    BeginPath { position: Vec2 },
    /// Extend the current path to a point
    DrawSegment { position: Vec2 },
    /// End the current path
    ClosePath,
    /// Clear a rectangle anchored at `position`
    Erase {
        position: Vec2,
        width: f32,
        height: f32,
    },
    /// Clear the whole surface
    ClearAll,
    /// Change the active stroke color (CSS color string)
    SetStrokeStyle { color: String },
}

impl EventKind {
    /// Short lowercase name, used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeginPath { .. } => "begin_path",
            Self::DrawSegment { .. } => "draw_segment",
            Self::ClosePath => "close_path",
            Self::Erase { .. } => "erase",
            Self::ClearAll => "clear_all",
            Self::SetStrokeStyle { .. } => "set_stroke_style",
        }
    }

    /// Apply this action's visual effect to a surface.
    ///
    /// Each variant maps to a fixed sequence of surface primitives and
    /// nothing else.
    pub fn execute<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        match self {
            Self::BeginPath { position } => {
                surface.begin_path();
                surface.move_to(position.x, position.y);
                surface.stroke();
            }
            Self::DrawSegment { position } => {
                surface.line_to(position.x, position.y);
                surface.stroke();
            }
            Self::ClosePath => surface.close_path(),
            Self::Erase {
                position,
                width,
                height,
            } => surface.clear_rect(position.x, position.y, *width, *height),
            Self::ClearAll => surface.clear_all(),
            Self::SetStrokeStyle { color } => surface.set_stroke_color(color),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A timestamped drawing action as stored in the event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(flatten)]
    pub kind: EventKind,
    /// Recording time at capture (serialized as milliseconds)
    #[serde(with = "duration_ms")]
    pub time: Duration,
}

impl Event {
    pub fn new(kind: EventKind, time: Duration) -> Self {
        Self { kind, time }
    }
}

/// Serde adapter storing a `Duration` as whole milliseconds
pub(crate) mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CommandSurface, SurfaceOp};

    #[test]
    fn test_event_json_shape() {
        let event = Event::new(
            EventKind::DrawSegment {
                position: Vec2::new(5.0, 5.0),
            },
            Duration::from_millis(100),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "draw_segment");
        assert_eq!(json["time"], 100);
        assert_eq!(json["position"][0], 5.0);

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_unit_variant_json() {
        let event = Event::new(EventKind::ClosePath, Duration::from_millis(150));
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"close_path","time":150}"#);
    }

    #[test]
    fn test_execute_begin_path() {
        let mut surface = CommandSurface::new(100.0, 100.0);
        EventKind::BeginPath {
            position: Vec2::new(1.0, 2.0),
        }
        .execute(&mut surface);
        assert_eq!(
            surface.ops(),
            &[
                SurfaceOp::BeginPath,
                SurfaceOp::MoveTo(Vec2::new(1.0, 2.0)),
                SurfaceOp::Stroke,
            ]
        );
    }

    #[test]
    fn test_execute_dispatch() {
        let mut surface = CommandSurface::new(100.0, 100.0);
        EventKind::Erase {
            position: Vec2::new(3.0, 4.0),
            width: 10.0,
            height: 10.0,
        }
        .execute(&mut surface);
        EventKind::SetStrokeStyle {
            color: "#ff0000".into(),
        }
        .execute(&mut surface);
        EventKind::ClearAll.execute(&mut surface);
        EventKind::ClosePath.execute(&mut surface);

        assert_eq!(
            surface.ops(),
            &[
                SurfaceOp::ClearRect {
                    x: 3.0,
                    y: 4.0,
                    width: 10.0,
                    height: 10.0
                },
                SurfaceOp::SetStrokeColor("#ff0000".into()),
                SurfaceOp::ClearAll,
                SurfaceOp::ClosePath,
            ]
        );
    }
}
