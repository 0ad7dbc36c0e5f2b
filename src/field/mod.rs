//! Particle field handler.
//!
//! [`ParticleField`] owns the particle collection and the validated
//! settings record, drives the per-frame update/render cycle, and
//! implements the hover multiplier switch plus the live settings-reload
//! protocol. The host environment stays behind the [`Host`] and
//! [`Surface`](crate::surface::Surface) traits; pointer and resize events
//! arrive as explicit method calls.

pub mod links;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::particle::Particle;
use crate::settings::{self, Settings, SettingsInput};
use crate::surface::{Host, Hsla, Rgba, Surface};

/// Lifecycle states. The cycle is `Stopped -> Starting -> Running ->
/// Stopped`, repeating on `start()`/`stop()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Stopped,
    Starting,
    Running,
}

/// Errors that end a field's current run.
///
/// Both kinds are terminal for the run and are reported through the log and
/// [`ParticleField::last_error`] rather than propagated; the caller fixes
/// the environment and calls `start()` again.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("drawing surface '{0}' was not found")]
    SurfaceNotFound(String),

    #[error("drawing surface '{id}' has a degenerate size ({width}x{height})")]
    ZeroSizedSurface { id: String, width: f32, height: f32 },
}

/// The handler that owns and animates a particle population on one surface.
pub struct ParticleField {
    surface_id: String,
    input: SettingsInput,
    settings: Option<Settings>,
    particles: Vec<Particle>,
    state: FieldState,
    hovered: bool,
    rng: SmallRng,
    last_error: Option<FieldError>,
}

impl ParticleField {
    /// Creates a field targeting the surface named `surface_id`. The input
    /// record may be empty; defaults are resolved against the surface
    /// dimensions on the first tick.
    pub fn new(surface_id: impl Into<String>, input: SettingsInput) -> Self {
        Self::with_rng(surface_id, input, SmallRng::from_entropy())
    }

    /// Like [`ParticleField::new`] with a fixed RNG seed, for deterministic
    /// runs.
    pub fn with_seed(surface_id: impl Into<String>, input: SettingsInput, seed: u64) -> Self {
        Self::with_rng(surface_id, input, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(surface_id: impl Into<String>, input: SettingsInput, rng: SmallRng) -> Self {
        Self {
            surface_id: surface_id.into(),
            input,
            settings: None,
            particles: Vec::new(),
            state: FieldState::Stopped,
            hovered: false,
            rng,
            last_error: None,
        }
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The resolved settings, present once the field has initialized.
    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    /// The error that ended the last run, if any.
    pub fn last_error(&self) -> Option<&FieldError> {
        self.last_error.as_ref()
    }

    /// Starts (or restarts) the field: marks it starting and runs the first
    /// tick synchronously. Initialization failures leave the field stopped
    /// with [`last_error`](ParticleField::last_error) set; nothing
    /// propagates.
    pub fn start<H: Host>(&mut self, host: &mut H) {
        log::info!("starting particle field '{}'", self.surface_id);
        self.last_error = None;
        self.state = FieldState::Starting;
        self.tick(host);
    }

    /// Requests a stop. Cooperative: a tick already scheduled by the host
    /// observes the state and exits without scheduling another frame, so at
    /// most one more frame may render.
    pub fn stop(&mut self) {
        if self.state != FieldState::Stopped {
            log::info!("stopping particle field '{}'", self.surface_id);
        }
        self.state = FieldState::Stopped;
    }

    /// One simulation + render step. The host invokes this once per
    /// animation frame (and `start` invokes it once synchronously).
    pub fn tick<H: Host>(&mut self, host: &mut H) {
        if self.state == FieldState::Starting {
            if let Err(err) = self.init(host) {
                log::error!("particle field '{}' failed to start: {err}", self.surface_id);
                self.last_error = Some(err);
                self.state = FieldState::Stopped;
                return;
            }
        }
        if self.state != FieldState::Running {
            log::trace!("tick on inactive field '{}'", self.surface_id);
            return;
        }

        let settings = match self.settings {
            Some(settings) => settings,
            None => return,
        };
        let Some(surface) = host.surface(&self.surface_id) else {
            let err = FieldError::SurfaceNotFound(self.surface_id.clone());
            log::error!("{err}; stopping");
            self.last_error = Some(err);
            self.state = FieldState::Stopped;
            return;
        };

        let (width, height) = surface.dimensions();
        for particle in &mut self.particles {
            particle.update(width, height);
        }
        render(surface, &settings, &self.particles);

        host.request_frame();
    }

    /// One-time initialization on the first tick after `start`.
    fn init<H: Host>(&mut self, host: &mut H) -> Result<(), FieldError> {
        let is_mobile = host.is_mobile();
        let surface = host
            .surface(&self.surface_id)
            .ok_or_else(|| FieldError::SurfaceNotFound(self.surface_id.clone()))?;
        let (width, height) = surface.dimensions();
        if width <= 0.0 || height <= 0.0 {
            return Err(FieldError::ZeroSizedSurface {
                id: self.surface_id.clone(),
                width,
                height,
            });
        }

        let settings = Settings::resolve(&self.input, width, height);
        if settings.disable_on_mobile && is_mobile {
            log::info!(
                "mobile context detected, particle field '{}' stays off",
                self.surface_id
            );
            self.particles.clear();
            self.settings = Some(settings);
            self.state = FieldState::Stopped;
            return Ok(());
        }

        self.particles.clear();
        let target = settings.population_target();
        self.particles.reserve(target);
        for _ in 0..target {
            self.particles.push(settings.spawn(&mut self.rng));
        }
        self.settings = Some(settings);
        self.state = FieldState::Running;
        log::info!(
            "particle field '{}' running: {} particles on {width}x{height}",
            self.surface_id,
            self.particles.len()
        );
        Ok(())
    }

    /// Hover-enter notification. Debounced: repeated enters apply the
    /// multiplier switch once.
    pub fn pointer_entered(&mut self) {
        if self.hovered {
            return;
        }
        self.hovered = true;
        if let Some(settings) = self.settings {
            log::debug!("pointer entered, multiplier -> {}", settings.multiplier_in);
            for particle in &mut self.particles {
                particle.set_multiplier(settings.multiplier_in);
            }
        }
    }

    /// Hover-leave notification, the debounced counterpart of
    /// [`pointer_entered`](ParticleField::pointer_entered).
    pub fn pointer_left(&mut self) {
        if !self.hovered {
            return;
        }
        self.hovered = false;
        if let Some(settings) = self.settings {
            log::debug!("pointer left, multiplier -> {}", settings.multiplier_out);
            for particle in &mut self.particles {
                particle.set_multiplier(settings.multiplier_out);
            }
        }
    }

    /// Replaces the settings record while the field may be running.
    ///
    /// The live collection is reconciled with the new record: out-of-range
    /// attributes re-randomize within the new bounds, the population is
    /// resized into the amount band, and a mobile disable taking effect
    /// stops the field and clears the collection. A field that is not
    /// running just stores the input for its next start.
    pub fn apply_settings<H: Host>(&mut self, input: SettingsInput, host: &mut H) {
        self.input = input;
        if self.state != FieldState::Running {
            log::debug!(
                "settings stored for '{}'; they apply at the next start",
                self.surface_id
            );
            return;
        }

        let is_mobile = host.is_mobile();
        let Some(surface) = host.surface(&self.surface_id) else {
            let err = FieldError::SurfaceNotFound(self.surface_id.clone());
            log::error!("{err}; stopping");
            self.last_error = Some(err);
            self.state = FieldState::Stopped;
            return;
        };
        let (width, height) = surface.dimensions();

        let next = Settings::resolve(&self.input, width, height);
        if next.disable_on_mobile && is_mobile {
            log::info!(
                "mobile disable turned on, stopping particle field '{}'",
                self.surface_id
            );
            self.particles.clear();
            self.settings = Some(next);
            self.state = FieldState::Stopped;
            return;
        }

        settings::reconcile(&next, &mut self.particles, &mut self.rng);
        self.settings = Some(next);
    }

    /// Container-resize notification. Position bounds re-resolve against
    /// the new dimensions; with `dynamicAmount` on, the population target
    /// rescales from the new area. The same reconciliation pass as
    /// [`apply_settings`](ParticleField::apply_settings) migrates the live
    /// collection, so a resize causes no visual jump.
    pub fn resized<H: Host>(&mut self, host: &mut H) {
        if self.state != FieldState::Running {
            return;
        }
        let Some(surface) = host.surface(&self.surface_id) else {
            return;
        };
        let (width, height) = surface.dimensions();
        if width <= 0.0 || height <= 0.0 {
            let err = FieldError::ZeroSizedSurface {
                id: self.surface_id.clone(),
                width,
                height,
            };
            log::error!("{err}; stopping");
            self.last_error = Some(err);
            self.state = FieldState::Stopped;
            return;
        }

        let mut next = Settings::resolve(&self.input, width, height);
        if !next.dynamic_amount {
            if let Some(previous) = &self.settings {
                next.amount = previous.amount;
            }
        }
        log::debug!(
            "surface '{}' resized to {width}x{height}, reconciling {} particles",
            self.surface_id,
            self.particles.len()
        );
        settings::reconcile(&next, &mut self.particles, &mut self.rng);
        self.settings = Some(next);
    }
}

/// Paints one frame: clear, links underneath, particle bodies on top.
fn render<S: Surface>(surface: &mut S, settings: &Settings, particles: &[Particle]) {
    surface.clear();

    let [red, green, blue] = settings.line_color;
    for link in links::collect(particles, settings.tolerance) {
        surface.stroke_line(
            link.from,
            link.to,
            settings.line_width,
            Rgba {
                red,
                green,
                blue,
                alpha: link.opacity,
            },
        );
    }

    for particle in particles {
        surface.fill_circle(
            particle.position,
            particle.rendered_size(),
            Hsla {
                hue: particle.hue,
                saturation: 100.0,
                lightness: particle.brightness(),
                alpha: 1.0,
            },
        );
    }
}
