//! Particle state and per-tick motion.

use glam::Vec2;

/// A single moving dot.
///
/// Velocity is stored as a 2D vector; speed and direction are derived
/// accessors that rebuild the vector from the other polar component, so the
/// two views can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Center position in surface pixels.
    pub position: Vec2,
    /// Base radius in pixels, strictly positive.
    pub size: f32,
    /// Hue-like scalar, conventionally degrees 0-360.
    pub hue: f32,
    velocity: Vec2,
    multiplier: f32,
}

impl Particle {
    /// Creates a particle from polar velocity components.
    pub fn new(position: Vec2, size: f32, speed: f32, direction: f32, hue: f32) -> Self {
        Self {
            position,
            size,
            hue,
            velocity: Vec2::from_angle(direction) * speed,
            multiplier: 1.0,
        }
    }

    /// Advances the particle one tick inside a `width` x `height` box.
    ///
    /// An excited particle (`multiplier != 1`) gets a transient speed boost
    /// of `multiplier / 2` that is withdrawn at the end of the same tick:
    /// the boost feeds the displacement and any boundary reflection of this
    /// tick, while the resting speed carried into the next tick is
    /// unchanged.
    ///
    /// A step that would carry the leading edge across a bound reflects
    /// that velocity component and clamps the position onto the boundary;
    /// otherwise the position advances by the component. Either way the
    /// particle ends the tick inside `[size, dimension - size]` on both
    /// axes.
    pub fn update(&mut self, width: f32, height: f32) {
        let boost = if self.multiplier != 1.0 {
            self.multiplier / 2.0
        } else {
            0.0
        };
        self.set_speed(self.speed() + boost);

        let next_x = self.position.x + self.velocity.x;
        if next_x + self.size > width || next_x - self.size < 0.0 {
            self.velocity.x = -self.velocity.x;
            self.position.x = if next_x + self.size > width {
                width - self.size
            } else {
                self.size
            };
        } else {
            self.position.x = next_x;
        }

        let next_y = self.position.y + self.velocity.y;
        if next_y + self.size > height || next_y - self.size < 0.0 {
            self.velocity.y = -self.velocity.y;
            self.position.y = if next_y + self.size > height {
                height - self.size
            } else {
                self.size
            };
        } else {
            self.position.y = next_y;
        }

        self.set_speed(self.speed() - boost);
    }

    /// Current speed, the velocity vector's norm. Never negative.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Re-points the velocity vector at the current direction with the given
    /// magnitude.
    pub fn set_speed(&mut self, speed: f32) {
        self.velocity = Vec2::from_angle(self.direction()) * speed;
    }

    /// Current heading in radians.
    pub fn direction(&self) -> f32 {
        self.velocity.to_angle()
    }

    /// Re-points the velocity vector in the given direction, preserving
    /// speed.
    pub fn set_direction(&mut self, direction: f32) {
        self.velocity = Vec2::from_angle(direction) * self.speed();
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Activity scalar; 1.0 is the rest state.
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn set_multiplier(&mut self, multiplier: f32) {
        self.multiplier = multiplier;
    }

    /// Radius as drawn, scaled by the activity multiplier.
    pub fn rendered_size(&self) -> f32 {
        self.size * self.multiplier
    }

    /// HSL lightness percentage as drawn. Excited particles dim with the
    /// multiplier.
    pub fn brightness(&self) -> f32 {
        if self.multiplier > 1.0 {
            100.0 - self.multiplier * 10.0
        } else {
            100.0
        }
    }

    /// Euclidean distance to another particle's center.
    pub fn distance_to(&self, other: &Particle) -> f32 {
        self.position.distance(other.position)
    }
}
