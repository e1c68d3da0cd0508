//! Pointer gesture to drawing event mapping.

use glam::Vec2;
use tracing::{trace, warn};

use crate::types::EventKind;
use crate::validation::validate_position;

/// Active drawing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
}

/// Raw user gesture, positions in canvas logical coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,
    /// Pointer left the surface; ends the path like `PointerUp`
    PointerLeave,
    /// Explicit "clear board" action
    Clear,
    /// Color picked
    SetColor(String),
}

/// Turns pointer gestures into drawing events.
///
/// Tracks whether a path is open so stray moves and releases (pointer moving
/// over the board without a button held) produce nothing.
#[derive(Debug, Clone)]
pub struct GestureMapper {
    tool: Tool,
    /// Tool of the path currently open, if any
    active: Option<Tool>,
    eraser_size: Vec2,
}

impl GestureMapper {
    pub fn new(eraser_size: Vec2) -> Self {
        Self {
            tool: Tool::default(),
            active: None,
            eraser_size,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Check if a path is currently open.
    pub fn is_path_active(&self) -> bool {
        self.active.is_some()
    }

    /// Switch tools. An open path is closed first.
    pub fn set_tool(&mut self, tool: Tool) -> Option<EventKind> {
        self.tool = tool;
        self.active.take().map(|_| EventKind::ClosePath)
    }

    /// Forget any open path without closing it
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Map a gesture to the event it produces, if any.
    pub fn map(&mut self, gesture: Gesture) -> Option<EventKind> {
        let kind = match gesture {
            Gesture::PointerDown(position) => {
                if let Err(err) = validate_position(position) {
                    warn!("Ignoring pointer down: {}", err);
                    return None;
                }
                self.active = Some(self.tool);
                Some(EventKind::BeginPath { position })
            }
            Gesture::PointerMove(position) => {
                let tool = self.active?;
                if let Err(err) = validate_position(position) {
                    warn!("Ignoring pointer move: {}", err);
                    return None;
                }
                match tool {
                    Tool::Pencil => Some(EventKind::DrawSegment { position }),
                    Tool::Eraser => Some(EventKind::Erase {
                        position,
                        width: self.eraser_size.x,
                        height: self.eraser_size.y,
                    }),
                }
            }
            Gesture::PointerUp | Gesture::PointerLeave => {
                self.active.take().map(|_| EventKind::ClosePath)
            }
            Gesture::Clear => Some(EventKind::ClearAll),
            Gesture::SetColor(color) => Some(EventKind::SetStrokeStyle { color }),
        };
        if let Some(kind) = &kind {
            trace!("gesture mapped to {}", kind);
        }
        kind
    }
}
