//! Host-facing boundary: drawing surface and environment adapter traits.
//!
//! The crate never touches a real canvas, DOM node, or window. The
//! embedding supplies a [`Surface`] for immediate-mode drawing and a
//! [`Host`] for surface resolution, repaint scheduling, and the
//! mobile-context heuristic. Pointer and resize events travel the other
//! way, as explicit method calls on the field.

use glam::Vec2;

/// Fill color in HSL space: hue in degrees, saturation and lightness as
/// percentages, alpha 0-1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub alpha: f32,
}

/// Stroke color: RGB channels 0-255, alpha 0-1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

/// 2D immediate-mode drawing surface, borrowed from the host each frame.
pub trait Surface {
    /// Current drawable size in pixels; mutable by the host on container
    /// resize.
    fn dimensions(&self) -> (f32, f32);

    /// Wipes the whole surface before a frame is painted.
    fn clear(&mut self);

    /// Fills a circle of the given radius.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Hsla);

    /// Strokes a straight line of the given width.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

/// Environment adapter supplied by the embedding.
pub trait Host {
    type Surface: Surface;

    /// Resolves the drawing surface for `id`. `None` when the host has no
    /// such surface.
    fn surface(&mut self, id: &str) -> Option<&mut Self::Surface>;

    /// Asks the host to invoke `ParticleField::tick` once more before the
    /// next repaint. Ticks never overlap; the host delivers one callback at
    /// a time.
    fn request_frame(&mut self);

    /// Device heuristic (user-agent or similar), opaque to the core.
    fn is_mobile(&self) -> bool;
}
