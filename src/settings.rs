//! Settings record: partial input, validation, and live reconciliation.
//!
//! A [`SettingsInput`] is a flat mapping of setting name to number in which
//! every field is optional and `-1.0` means "use the default". Resolving it
//! against the surface dimensions produces a [`Settings`] record where every
//! value sits inside its documented band. Out-of-range input is never an
//! error; it is clamped to the nearest bound with a debug trace.

use std::f64::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// Sentinel value accepted for any input field: apply the default.
pub const USE_DEFAULT: f64 = -1.0;

/// Slack for speed-range membership checks. The polar round-trip in
/// `Particle::update` wobbles the stored speed by a few ulps per tick; that
/// drift must not count as out-of-range during reconciliation.
const SPEED_SLACK: f32 = 1e-3;

/// Partially specified settings, as accepted from the embedding page.
///
/// Field names serialize in camelCase, so a JSON record like
/// `{"amount": 80, "sizeMin": 2}` deserializes directly. Booleans are
/// carried as numbers (0 = off, anything else = on) to keep the record a
/// flat name-to-number mapping.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsInput {
    pub amount: Option<f64>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub dynamic_amount: Option<f64>,
    pub tolerance: Option<f64>,
    pub line_width: Option<f64>,
    pub line_color_red: Option<f64>,
    pub line_color_green: Option<f64>,
    pub line_color_blue: Option<f64>,
    pub size_min: Option<f64>,
    pub size_max: Option<f64>,
    pub position_x_min: Option<f64>,
    pub position_x_max: Option<f64>,
    pub position_y_min: Option<f64>,
    pub position_y_max: Option<f64>,
    pub speed_min: Option<f64>,
    pub speed_max: Option<f64>,
    pub direction_min: Option<f64>,
    pub direction_max: Option<f64>,
    pub color_min: Option<f64>,
    pub color_max: Option<f64>,
    pub multiplier_in: Option<f64>,
    pub multiplier_out: Option<f64>,
    pub disable_on_mobile: Option<f64>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub amount: usize,
    pub amount_min: usize,
    pub amount_max: usize,
    pub dynamic_amount: bool,
    pub tolerance: f32,
    pub line_width: f32,
    /// Line RGB channels, 0-255.
    pub line_color: [f32; 3],
    pub size_min: f32,
    pub size_max: f32,
    pub position_x_min: f32,
    pub position_x_max: f32,
    pub position_y_min: f32,
    pub position_y_max: f32,
    /// Speed bounds in thousandths of a pixel per tick.
    pub speed_min: f32,
    pub speed_max: f32,
    pub direction_min: f32,
    pub direction_max: f32,
    pub color_min: f32,
    pub color_max: f32,
    pub multiplier_in: f32,
    pub multiplier_out: f32,
    pub disable_on_mobile: bool,
}

impl Settings {
    /// Resolves an input record against the surface dimensions.
    ///
    /// Dependent bounds resolve in order (minima before their maxima), so
    /// the resulting record always has non-empty random ranges. Resolution
    /// is idempotent: feeding back an already-valid record changes nothing.
    pub fn resolve(input: &SettingsInput, width: f32, height: f32) -> Settings {
        let (w, h) = (f64::from(width), f64::from(height));

        let amount_min = resolve_value("amountMin", input.amount_min, 0.0, 0.0, f64::MAX);
        let amount_max = resolve_value("amountMax", input.amount_max, 500.0, amount_min, f64::MAX);
        let amount = resolve_value(
            "amount",
            input.amount,
            (w * h / 15_000.0).round(),
            amount_min,
            amount_max,
        );
        let dynamic_amount = resolve_value("dynamicAmount", input.dynamic_amount, 1.0, 0.0, 1.0);

        let tolerance = resolve_value("tolerance", input.tolerance, 150.0, 0.0, f64::MAX);
        let line_width = resolve_value("lineWidth", input.line_width, 3.0, 0.0, f64::MAX);
        let line_color = [
            resolve_value("lineColorRed", input.line_color_red, 255.0, 0.0, 255.0) as f32,
            resolve_value("lineColorGreen", input.line_color_green, 255.0, 0.0, 255.0) as f32,
            resolve_value("lineColorBlue", input.line_color_blue, 255.0, 0.0, 255.0) as f32,
        ];

        let size_min = resolve_value("sizeMin", input.size_min, 2.0, 0.1, f64::MAX);
        let size_max = resolve_value("sizeMax", input.size_max, 6.0, size_min, f64::MAX);

        // Position bounds keep newly spawned particles clear of the edges.
        let position_x_min = resolve_value(
            "positionXMin",
            input.position_x_min,
            size_max + 1.0,
            size_max + 1.0,
            w - size_max - 1.0,
        );
        let position_x_max = resolve_value(
            "positionXMax",
            input.position_x_max,
            w - size_max - 1.0,
            position_x_min,
            w - size_max - 1.0,
        );
        let position_y_min = resolve_value(
            "positionYMin",
            input.position_y_min,
            size_max + 1.0,
            size_max + 1.0,
            h - size_max - 1.0,
        );
        let position_y_max = resolve_value(
            "positionYMax",
            input.position_y_max,
            h - size_max - 1.0,
            position_y_min,
            h - size_max - 1.0,
        );

        let speed_min = resolve_value("speedMin", input.speed_min, 200.0, 0.0, f64::MAX);
        let speed_max = resolve_value("speedMax", input.speed_max, 400.0, speed_min, f64::MAX);

        let direction_min = resolve_value("directionMin", input.direction_min, 0.0, 0.0, TAU);
        let direction_max =
            resolve_value("directionMax", input.direction_max, TAU, direction_min, TAU);

        let color_min = resolve_value("colorMin", input.color_min, 0.0, 0.0, 360.0);
        let color_max = resolve_value("colorMax", input.color_max, 360.0, color_min, 360.0);

        let multiplier_in =
            resolve_value("multiplierIn", input.multiplier_in, 1.5, 0.001, f64::MAX);
        let multiplier_out =
            resolve_value("multiplierOut", input.multiplier_out, 1.0, 0.001, f64::MAX);

        let disable_on_mobile =
            resolve_value("disableOnMobile", input.disable_on_mobile, 0.0, 0.0, 1.0);

        Settings {
            amount: amount.round() as usize,
            amount_min: amount_min.round() as usize,
            amount_max: amount_max.round() as usize,
            dynamic_amount: dynamic_amount != 0.0,
            tolerance: tolerance as f32,
            line_width: line_width as f32,
            line_color,
            size_min: size_min as f32,
            size_max: size_max as f32,
            position_x_min: position_x_min as f32,
            position_x_max: position_x_max as f32,
            position_y_min: position_y_min as f32,
            position_y_max: position_y_max as f32,
            speed_min: speed_min as f32,
            speed_max: speed_max as f32,
            direction_min: direction_min as f32,
            direction_max: direction_max as f32,
            color_min: color_min as f32,
            color_max: color_max as f32,
            multiplier_in: multiplier_in as f32,
            multiplier_out: multiplier_out as f32,
            disable_on_mobile: disable_on_mobile != 0.0,
        }
    }

    /// Live population target: the nominal amount held inside the band.
    pub fn population_target(&self) -> usize {
        self.amount.clamp(self.amount_min, self.amount_max)
    }

    /// Spawn-time speed bounds in pixels per tick.
    pub fn speed_bounds(&self) -> (f32, f32) {
        (self.speed_min / 1000.0, self.speed_max / 1000.0)
    }

    /// Creates one particle drawn from the full configured ranges.
    pub fn spawn(&self, rng: &mut impl Rng) -> Particle {
        let size = sample(rng, self.size_min, self.size_max);
        let position = Vec2::new(
            sample(rng, self.position_x_min, self.position_x_max),
            sample(rng, self.position_y_min, self.position_y_max),
        );
        let speed = sample(rng, self.speed_min, self.speed_max) / 1000.0;
        let direction = sample(rng, self.direction_min, self.direction_max);
        let hue = sample(rng, self.color_min, self.color_max);
        Particle::new(position, size, speed, direction, hue)
    }
}

/// Reconciles a live particle collection with a freshly resolved record.
///
/// Attributes that fell outside the new bounds are re-randomized within
/// them, one attribute at a time; in-range attributes are left untouched so
/// the reload causes no visible jump. Afterwards the population is resized
/// onto the target, truncating excess or spawning from the new ranges.
pub fn reconcile(settings: &Settings, particles: &mut Vec<Particle>, rng: &mut impl Rng) {
    let (speed_lo, speed_hi) = settings.speed_bounds();
    let mut migrated = 0usize;

    for particle in particles.iter_mut() {
        if particle.size < settings.size_min || particle.size > settings.size_max {
            particle.size = sample(rng, settings.size_min, settings.size_max);
            migrated += 1;
        }
        if particle.position.x < settings.position_x_min
            || particle.position.x > settings.position_x_max
        {
            particle.position.x = sample(rng, settings.position_x_min, settings.position_x_max);
            migrated += 1;
        }
        if particle.position.y < settings.position_y_min
            || particle.position.y > settings.position_y_max
        {
            particle.position.y = sample(rng, settings.position_y_min, settings.position_y_max);
            migrated += 1;
        }
        let speed = particle.speed();
        if speed < speed_lo - SPEED_SLACK || speed > speed_hi + SPEED_SLACK {
            particle.set_speed(sample(rng, settings.speed_min, settings.speed_max) / 1000.0);
            migrated += 1;
        }
        if particle.hue < settings.color_min || particle.hue > settings.color_max {
            particle.hue = sample(rng, settings.color_min, settings.color_max);
            migrated += 1;
        }
    }
    if migrated > 0 {
        log::debug!("settings reload re-randomized {migrated} out-of-range attributes");
    }

    let target = settings.population_target();
    if particles.len() > target {
        log::debug!("shrinking population {} -> {}", particles.len(), target);
        particles.truncate(target);
    } else if particles.len() < target {
        log::debug!("growing population {} -> {}", particles.len(), target);
        while particles.len() < target {
            particles.push(settings.spawn(rng));
        }
    }
}

/// Uniform sample from an inclusive range that may have collapsed to a
/// point.
fn sample(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

fn resolve_value(name: &str, raw: Option<f64>, default: f64, min: f64, max: f64) -> f64 {
    // Dependent bounds can invert on tiny surfaces; the band collapses to
    // its minimum.
    let max = max.max(min);
    match raw {
        None => {
            log::debug!("setting '{name}': absent, using default {default}");
            default.clamp(min, max)
        }
        Some(v) if v == USE_DEFAULT => {
            log::debug!("setting '{name}': default requested, using {default}");
            default.clamp(min, max)
        }
        Some(v) if v < min => {
            log::debug!("setting '{name}': {v} too low, clamped to {min}");
            min
        }
        Some(v) if v > max => {
            log::debug!("setting '{name}': {v} too high, clamped to {max}");
            max
        }
        Some(v) => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn test_empty_input_resolves_to_defaults() {
        let settings = Settings::resolve(&SettingsInput::default(), 600.0, 500.0);
        assert_eq!(settings.amount, 20); // 600 * 500 / 15000
        assert_eq!(settings.amount_min, 0);
        assert_eq!(settings.amount_max, 500);
        assert!(settings.dynamic_amount);
        assert_eq!(settings.tolerance, 150.0);
        assert_eq!(settings.line_width, 3.0);
        assert_eq!(settings.line_color, [255.0, 255.0, 255.0]);
        assert_eq!(settings.size_min, 2.0);
        assert_eq!(settings.size_max, 6.0);
        assert_eq!(settings.position_x_min, 7.0);
        assert_eq!(settings.position_x_max, 593.0);
        assert_eq!(settings.position_y_min, 7.0);
        assert_eq!(settings.position_y_max, 493.0);
        assert_eq!(settings.speed_min, 200.0);
        assert_eq!(settings.speed_max, 400.0);
        assert_eq!(settings.direction_min, 0.0);
        assert!((f64::from(settings.direction_max) - TAU).abs() < 1e-6);
        assert_eq!(settings.color_min, 0.0);
        assert_eq!(settings.color_max, 360.0);
        assert_eq!(settings.multiplier_in, 1.5);
        assert_eq!(settings.multiplier_out, 1.0);
        assert!(!settings.disable_on_mobile);
    }

    #[test]
    fn test_sentinel_means_default() {
        let input = SettingsInput {
            tolerance: Some(USE_DEFAULT),
            ..Default::default()
        };
        let settings = Settings::resolve(&input, 600.0, 500.0);
        assert_eq!(settings.tolerance, 150.0);
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        let input = SettingsInput {
            size_min: Some(-3.0),
            color_max: Some(720.0),
            multiplier_in: Some(0.0),
            position_x_max: Some(10_000.0),
            ..Default::default()
        };
        let settings = Settings::resolve(&input, 600.0, 500.0);
        // Only exactly -1 reads as the sentinel; -3 clamps like any low value.
        assert_eq!(settings.size_min, 0.1);
        assert_eq!(settings.color_max, 360.0);
        assert_eq!(settings.multiplier_in, 0.001);
        assert_eq!(settings.position_x_max, 593.0);
    }

    #[test]
    fn test_resolution_is_idempotent_on_valid_records() {
        let input = SettingsInput {
            amount: Some(40.0),
            amount_min: Some(10.0),
            amount_max: Some(100.0),
            dynamic_amount: Some(0.0),
            tolerance: Some(120.0),
            line_width: Some(2.0),
            line_color_red: Some(10.0),
            line_color_green: Some(20.0),
            line_color_blue: Some(30.0),
            size_min: Some(3.0),
            size_max: Some(5.0),
            position_x_min: Some(10.0),
            position_x_max: Some(500.0),
            position_y_min: Some(10.0),
            position_y_max: Some(400.0),
            speed_min: Some(100.0),
            speed_max: Some(300.0),
            direction_min: Some(0.5),
            direction_max: Some(3.0),
            color_min: Some(90.0),
            color_max: Some(270.0),
            multiplier_in: Some(2.0),
            multiplier_out: Some(1.0),
            disable_on_mobile: Some(0.0),
        };
        let settings = Settings::resolve(&input, 600.0, 500.0);
        assert_eq!(settings.amount, 40);
        assert_eq!(settings.amount_min, 10);
        assert_eq!(settings.amount_max, 100);
        assert_eq!(settings.tolerance, 120.0);
        assert_eq!(settings.line_width, 2.0);
        assert_eq!(settings.line_color, [10.0, 20.0, 30.0]);
        assert_eq!(settings.size_min, 3.0);
        assert_eq!(settings.size_max, 5.0);
        assert_eq!(settings.position_x_min, 10.0);
        assert_eq!(settings.position_x_max, 500.0);
        assert_eq!(settings.position_y_min, 10.0);
        assert_eq!(settings.position_y_max, 400.0);
        assert_eq!(settings.speed_min, 100.0);
        assert_eq!(settings.speed_max, 300.0);
        assert_eq!(settings.direction_min, 0.5);
        assert_eq!(settings.direction_max, 3.0);
        assert_eq!(settings.color_min, 90.0);
        assert_eq!(settings.color_max, 270.0);
        assert_eq!(settings.multiplier_in, 2.0);
        assert_eq!(settings.multiplier_out, 1.0);
    }

    #[test]
    fn test_dependent_maxima_never_undercut_minima() {
        let input = SettingsInput {
            size_min: Some(8.0),
            size_max: Some(3.0),
            speed_min: Some(500.0),
            speed_max: Some(100.0),
            ..Default::default()
        };
        let settings = Settings::resolve(&input, 600.0, 500.0);
        assert_eq!(settings.size_max, 8.0);
        assert_eq!(settings.speed_max, 500.0);
    }

    #[test]
    fn test_serde_round_trip_uses_camel_case() {
        let json = r#"{"amount": 80, "sizeMin": 3, "disableOnMobile": 1}"#;
        let input: SettingsInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.amount, Some(80.0));
        assert_eq!(input.size_min, Some(3.0));
        assert_eq!(input.disable_on_mobile, Some(1.0));

        let back = serde_json::to_string(&input).unwrap();
        let reparsed: SettingsInput = serde_json::from_str(&back).unwrap();
        assert_eq!(input, reparsed);
    }

    #[test]
    fn test_spawn_respects_ranges() {
        let settings = Settings::resolve(&SettingsInput::default(), 600.0, 500.0);
        let mut rng = rng();
        for _ in 0..100 {
            let p = settings.spawn(&mut rng);
            assert!(p.size >= settings.size_min && p.size <= settings.size_max);
            assert!(p.position.x >= settings.position_x_min);
            assert!(p.position.x <= settings.position_x_max);
            assert!(p.position.y >= settings.position_y_min);
            assert!(p.position.y <= settings.position_y_max);
            let (lo, hi) = settings.speed_bounds();
            assert!(p.speed() >= lo - 1e-4 && p.speed() <= hi + 1e-4);
            assert!(p.hue >= settings.color_min && p.hue <= settings.color_max);
        }
    }

    #[test]
    fn test_reconcile_migrates_only_out_of_range_sizes() {
        let old = Settings::resolve(
            &SettingsInput {
                size_min: Some(2.0),
                size_max: Some(12.0),
                ..Default::default()
            },
            600.0,
            500.0,
        );
        let mut rng = rng();
        let mut particles: Vec<Particle> = (0..50).map(|_| old.spawn(&mut rng)).collect();
        // Pin a few known sizes on both sides of the new floor.
        particles[0].size = 4.0;
        particles[1].size = 11.0;

        let new = Settings::resolve(
            &SettingsInput {
                size_min: Some(10.0),
                size_max: Some(12.0),
                amount: Some(50.0),
                ..Default::default()
            },
            600.0,
            500.0,
        );
        reconcile(&new, &mut particles, &mut rng);

        assert!(particles[0].size >= 10.0 && particles[0].size <= 12.0);
        assert_eq!(particles[1].size, 11.0); // already in range, untouched
        for p in &particles {
            assert!(p.size >= 10.0 && p.size <= 12.0);
        }
    }

    #[test]
    fn test_reconcile_keeps_population_inside_band() {
        let settings = Settings::resolve(
            &SettingsInput {
                amount: Some(200.0),
                amount_max: Some(30.0),
                amount_min: Some(5.0),
                ..Default::default()
            },
            600.0,
            500.0,
        );
        let mut rng = rng();
        let mut particles = Vec::new();
        reconcile(&settings, &mut particles, &mut rng);
        assert_eq!(particles.len(), 30);

        let shrink = Settings::resolve(
            &SettingsInput {
                amount: Some(0.0),
                amount_min: Some(5.0),
                ..Default::default()
            },
            600.0,
            500.0,
        );
        reconcile(&shrink, &mut particles, &mut rng);
        assert_eq!(particles.len(), 5);
    }

    #[test]
    fn test_reconcile_preserves_in_range_particles_exactly() {
        let settings = Settings::resolve(&SettingsInput::default(), 600.0, 500.0);
        let mut rng = rng();
        let mut particles: Vec<Particle> = (0..20).map(|_| settings.spawn(&mut rng)).collect();
        let before = particles.clone();
        reconcile(&settings, &mut particles, &mut rng);
        assert_eq!(particles, before);
    }
}
