//! Drawing surface abstraction
//!
//! The engine never renders by itself: it issues canvas-style path
//! primitives against a [`DrawingSurface`]. [`RasterSurface`](crate::raster::RasterSurface)
//! rasterizes them on the CPU, [`CommandSurface`] records them for inspection.

use glam::Vec2;

/// Canvas-style 2D drawing primitives consumed by the engine
pub trait DrawingSurface {
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn stroke(&mut self);
    fn close_path(&mut self);
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn clear_all(&mut self);
    fn set_stroke_color(&mut self, color: &str);

    /// Backing store size versus on-screen size, for pointer scaling
    fn geometry(&self) -> SurfaceGeometry;
}

/// Logical (backing store) and displayed (CSS) dimensions of a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    pub logical_width: f32,
    pub logical_height: f32,
    pub displayed_width: f32,
    pub displayed_height: f32,
}

impl SurfaceGeometry {
    /// Geometry of a surface displayed at its natural size
    pub fn unscaled(width: f32, height: f32) -> Self {
        Self {
            logical_width: width,
            logical_height: height,
            displayed_width: width,
            displayed_height: height,
        }
    }

    /// Logical pixels per displayed pixel on each axis (1.0 when unscaled).
    pub fn relative(&self) -> Vec2 {
        let ratio = |logical: f32, displayed: f32| {
            if displayed > 0.0 {
                logical / displayed
            } else {
                1.0
            }
        };
        Vec2::new(
            ratio(self.logical_width, self.displayed_width),
            ratio(self.logical_height, self.displayed_height),
        )
    }

    /// Convert a point in displayed pixels (relative to the surface origin)
    /// into logical canvas coordinates
    pub fn to_logical(&self, displayed: Vec2) -> Vec2 {
        displayed * self.relative()
    }
}

/// A primitive call captured by [`CommandSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    Stroke,
    ClosePath,
    ClearRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    ClearAll,
    SetStrokeColor(String),
}

/// Surface that records every primitive call instead of drawing
#[derive(Debug, Clone)]
pub struct CommandSurface {
    geometry: SurfaceGeometry,
    ops: Vec<SurfaceOp>,
}

impl CommandSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_geometry(SurfaceGeometry::unscaled(width, height))
    }

    pub fn with_geometry(geometry: SurfaceGeometry) -> Self {
        Self {
            geometry,
            ops: Vec::new(),
        }
    }

    /// All primitives issued so far, oldest first
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drain the recorded primitives
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of `stroke` calls, i.e. path events that reached the surface
    pub fn stroke_count(&self) -> usize {
        self.ops.iter().filter(|op| **op == SurfaceOp::Stroke).count()
    }
}

impl DrawingSurface for CommandSurface {
    fn begin_path(&mut self) {
        self.ops.push(SurfaceOp::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ops.push(SurfaceOp::MoveTo(Vec2::new(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ops.push(SurfaceOp::LineTo(Vec2::new(x, y)));
    }

    fn stroke(&mut self) {
        self.ops.push(SurfaceOp::Stroke);
    }

    fn close_path(&mut self) {
        self.ops.push(SurfaceOp::ClosePath);
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(SurfaceOp::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_all(&mut self) {
        self.ops.push(SurfaceOp::ClearAll);
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.ops.push(SurfaceOp::SetStrokeColor(color.to_string()));
    }

    fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }
}
