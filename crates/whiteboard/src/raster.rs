//! CPU raster surface implementing the canvas path primitives

use glam::Vec2;
use tracing::warn;

use crate::surface::{DrawingSurface, SurfaceGeometry};
use crate::validation::parse_color;

const TRANSPARENT: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// An RGBA CPU surface that rasterizes stroked paths
/// Stores pixels as [f32; 4] straight (non-premultiplied) color
///
/// Strokes use square caps and no anti-aliasing, so replaying the same events
/// always yields bit-identical pixels.
pub struct RasterSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a] as f32
    pixels: Vec<[f32; 4]>,
    /// Sub-paths of the current path; each holds its points in order
    subpaths: Vec<Vec<Vec2>>,
    stroke_color: [f32; 4],
    line_width: f32,
    /// On-screen size, for pointer scaling
    displayed: Vec2,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("subpaths", &self.subpaths.len())
            .field("stroke_color", &self.stroke_color)
            .field("line_width", &self.line_width)
            .finish()
    }
}

impl RasterSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32, line_width: f32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; pixel_count],
            subpaths: Vec::new(),
            stroke_color: [0.0, 0.0, 0.0, 1.0],
            line_width,
            displayed: Vec2::new(width as f32, height as f32),
        }
    }

    /// Create a surface sized from whiteboard configuration
    pub fn from_config(config: &whiteboard_config::WhiteboardConfig) -> Self {
        Self::new(config.canvas.width, config.canvas.height, config.line_width)
    }

    /// Record the on-screen size the surface is currently displayed at
    pub fn set_displayed_size(&mut self, width: f32, height: f32) {
        self.displayed = Vec2::new(width, height);
    }

    /// Clear the surface to a solid color
    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        Some(self.pixels[index])
    }

    /// Set a pixel at the given coordinates
    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        self.pixels[index] = color;
    }

    /// All pixels in row-major order
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Number of pixels with non-zero alpha
    pub fn painted_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] > 0.0).count()
    }

    /// Current stroke color as RGBA
    pub fn stroke_color(&self) -> [f32; 4] {
        self.stroke_color
    }

    /// Fill every pixel in an axis-aligned rectangle (clipped to the surface)
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) {
        // Negative extents grow towards the origin, as on a canvas
        let (x0, x1) = if width < 0.0 { (x + width, x) } else { (x, x + width) };
        let (y0, y1) = if height < 0.0 { (y + height, y) } else { (y, y + height) };

        let clamp_x = |v: f32| v.round().clamp(0.0, self.width as f32) as u32;
        let clamp_y = |v: f32| v.round().clamp(0.0, self.height as f32) as u32;
        let (x_start, x_end) = (clamp_x(x0), clamp_x(x1));
        let (y_start, y_end) = (clamp_y(y0), clamp_y(y1));

        for py in y_start..y_end {
            for px in x_start..x_end {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Stamp a square pen of `line_width` centered on a point
    fn stamp(&mut self, point: Vec2) {
        let half = self.line_width / 2.0;
        let color = self.stroke_color;
        self.fill_rect(
            point.x - half,
            point.y - half,
            self.line_width,
            self.line_width,
            color,
        );
    }

    /// Rasterize one segment by stepping at most one pixel at a time.
    ///
    /// Only the part within a stroke width of the surface is walked.
    fn draw_segment(&mut self, from: Vec2, to: Vec2) {
        let margin = Vec2::splat(self.line_width);
        let max = Vec2::new(self.width as f32, self.height as f32) + margin;
        let Some((from, to)) = clip_segment(from, to, -margin, max) else {
            return;
        };
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp(from + delta * t);
        }
    }
}

/// Clip the segment `from..to` to the box `min..max` (Liang-Barsky).
///
/// Returns `None` when no part of the segment lies inside.
fn clip_segment(from: Vec2, to: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    let delta = to - from;
    let mut enter = 0.0_f32;
    let mut exit = 1.0_f32;
    let edges = [
        (-delta.x, from.x - min.x),
        (delta.x, max.x - from.x),
        (-delta.y, from.y - min.y),
        (delta.y, max.y - from.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            enter = enter.max(r);
        } else {
            exit = exit.min(r);
        }
        if enter > exit {
            return None;
        }
    }
    Some((from + delta * enter, from + delta * exit))
}

impl DrawingSurface for RasterSurface {
    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.subpaths.push(vec![Vec2::new(x, y)]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let point = Vec2::new(x, y);
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(point),
            // lineTo without a current point behaves like moveTo
            None => self.subpaths.push(vec![point]),
        }
    }

    fn stroke(&mut self) {
        // Stroking re-renders the whole current path with the current color
        let subpaths = std::mem::take(&mut self.subpaths);
        for subpath in &subpaths {
            for pair in subpath.windows(2) {
                self.draw_segment(pair[0], pair[1]);
            }
        }
        self.subpaths = subpaths;
    }

    fn close_path(&mut self) {
        if let Some(subpath) = self.subpaths.last_mut() {
            if subpath.len() > 1 {
                let start = subpath[0];
                subpath.push(start);
            }
        }
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.fill_rect(x, y, width, height, TRANSPARENT);
    }

    fn clear_all(&mut self) {
        self.clear(TRANSPARENT);
    }

    fn set_stroke_color(&mut self, color: &str) {
        match parse_color(color) {
            Ok(rgba) => self.stroke_color = rgba,
            Err(err) => warn!("Keeping previous stroke color: {}", err),
        }
    }

    fn geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry {
            logical_width: self.width as f32,
            logical_height: self.height as f32,
            displayed_width: self.displayed.x,
            displayed_height: self.displayed.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_surface_creation() {
        let surface = RasterSurface::new(64, 32, 3.0);
        assert_eq!(surface.pixels().len(), 64 * 32);
        assert_eq!(surface.painted_pixel_count(), 0);
        assert_eq!(surface.get_pixel(64, 0), None);
    }

    #[test]
    fn test_single_point_path_draws_nothing() {
        let mut surface = RasterSurface::new(32, 32, 3.0);
        surface.begin_path();
        surface.move_to(10.0, 10.0);
        surface.stroke();
        assert_eq!(surface.painted_pixel_count(), 0);
    }

    #[test]
    fn test_horizontal_stroke() {
        let mut surface = RasterSurface::new(32, 32, 3.0);
        surface.begin_path();
        surface.move_to(5.0, 10.0);
        surface.line_to(15.0, 10.0);
        surface.stroke();

        assert_eq!(surface.get_pixel(10, 10), Some(BLACK));
        assert_eq!(surface.get_pixel(10, 9), Some(BLACK));
        assert_eq!(surface.get_pixel(10, 11), Some(BLACK));
        assert_eq!(surface.get_pixel(10, 13), Some(TRANSPARENT));
        assert_eq!(surface.get_pixel(20, 10), Some(TRANSPARENT));
    }

    #[test]
    fn test_stroke_uses_current_color() {
        let mut surface = RasterSurface::new(32, 32, 1.0);
        surface.set_stroke_color("#ff0000");
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.line_to(5.0, 0.0);
        surface.stroke();
        assert_eq!(surface.get_pixel(2, 0), Some([1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_invalid_color_keeps_previous() {
        let mut surface = RasterSurface::new(8, 8, 1.0);
        surface.set_stroke_color("#00ff00");
        surface.set_stroke_color("not-a-color");
        assert_eq!(surface.stroke_color(), [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_clear_rect_and_clear_all() {
        let mut surface = RasterSurface::new(32, 32, 1.0);
        surface.clear(BLACK);
        surface.clear_rect(4.0, 4.0, 10.0, 10.0);
        assert_eq!(surface.get_pixel(4, 4), Some(TRANSPARENT));
        assert_eq!(surface.get_pixel(13, 13), Some(TRANSPARENT));
        assert_eq!(surface.get_pixel(14, 14), Some(BLACK));
        assert_eq!(surface.painted_pixel_count(), 32 * 32 - 100);

        surface.clear_all();
        assert_eq!(surface.painted_pixel_count(), 0);
    }

    #[test]
    fn test_clear_rect_clips_to_bounds() {
        let mut surface = RasterSurface::new(8, 8, 1.0);
        surface.clear(BLACK);
        surface.clear_rect(-5.0, -5.0, 7.0, 7.0);
        assert_eq!(surface.get_pixel(1, 1), Some(TRANSPARENT));
        assert_eq!(surface.get_pixel(2, 2), Some(BLACK));
    }

    #[test]
    fn test_close_path_adds_closing_segment() {
        let mut surface = RasterSurface::new(32, 32, 1.0);
        surface.begin_path();
        surface.move_to(2.0, 2.0);
        surface.line_to(20.0, 2.0);
        surface.line_to(20.0, 20.0);
        surface.close_path();
        surface.stroke();
        // Diagonal closing segment from (20,20) back to (2,2)
        assert_eq!(surface.get_pixel(11, 11), Some(BLACK));
    }

    #[test]
    fn test_far_off_canvas_segment_is_clipped() {
        let mut surface = RasterSurface::new(32, 32, 3.0);
        surface.begin_path();
        surface.move_to(10.0, 10.0);
        surface.line_to(1.0e9, 1.0e9);
        surface.stroke();

        assert_eq!(surface.get_pixel(10, 10), Some(BLACK));
        assert_eq!(surface.get_pixel(20, 20), Some(BLACK));
        assert_eq!(surface.get_pixel(31, 31), Some(BLACK));
        assert_eq!(surface.get_pixel(20, 5), Some(TRANSPARENT));
    }

    #[test]
    fn test_segment_outside_surface_draws_nothing() {
        let mut surface = RasterSurface::new(32, 32, 3.0);
        surface.begin_path();
        surface.move_to(-1.0e9, -50.0);
        surface.line_to(1.0e9, -50.0);
        surface.stroke();
        assert_eq!(surface.painted_pixel_count(), 0);
    }

    #[test]
    fn test_clip_segment() {
        let min = Vec2::ZERO;
        let max = Vec2::splat(10.0);
        assert_eq!(
            clip_segment(Vec2::new(-10.0, 5.0), Vec2::new(20.0, 5.0), min, max),
            Some((Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0)))
        );
        assert_eq!(
            clip_segment(Vec2::new(2.0, 2.0), Vec2::new(3.0, 4.0), min, max),
            Some((Vec2::new(2.0, 2.0), Vec2::new(3.0, 4.0)))
        );
        assert_eq!(
            clip_segment(Vec2::new(-5.0, 20.0), Vec2::new(20.0, 20.0), min, max),
            None
        );
    }

    #[test]
    fn test_geometry_tracks_displayed_size() {
        let mut surface = RasterSurface::new(640, 480, 3.0);
        surface.set_displayed_size(320.0, 240.0);
        assert_eq!(surface.geometry().relative(), Vec2::new(2.0, 2.0));
    }
}
