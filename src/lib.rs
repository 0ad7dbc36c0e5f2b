//! Dotfield
//!
//! Animated particle-field widget core: a population of bouncing dots that
//! connect to near neighbors with fading lines and react to pointer hover.
//! The host environment (canvas, repaint scheduling, pointer events, device
//! detection) stays behind traits, so the same core drives a browser
//! canvas, a desktop framebuffer, or the bundled software rasterizer.
//!
//! # Features
//!
//! - Per-tick particle simulation with boundary reflection
//! - Proximity-line rendering with linear opacity falloff
//! - Hover-driven activity multiplier (debounced enter/leave)
//! - Validated, hot-reloadable settings with clamp-to-bounds semantics
//! - Jump-free reconciliation of a live population onto new settings
//! - Software RGBA surface with PNG export via `image`

pub mod field;
pub mod particle;
pub mod raster;
pub mod settings;
pub mod surface;

// Re-export commonly used types
pub use field::links::{self, Link};
pub use field::{FieldError, FieldState, ParticleField};
pub use particle::Particle;
pub use raster::RasterSurface;
pub use settings::{reconcile, Settings, SettingsInput, USE_DEFAULT};
pub use surface::{Host, Hsla, Rgba, Surface};
