//! Proximity graph: fading lines between nearby particles.

use glam::Vec2;

use crate::particle::Particle;

/// One line to stroke between two close particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: Vec2,
    pub to: Vec2,
    /// 1 at zero distance, fading linearly to 0 at the tolerance threshold.
    pub opacity: f32,
}

/// Opacity of a link at the given distance, or `None` when the particles
/// are too far apart (or the tolerance is degenerate).
pub fn opacity(distance: f32, tolerance: f32) -> Option<f32> {
    if tolerance <= 0.0 || distance >= tolerance {
        return None;
    }
    Some(1.0 - distance / tolerance)
}

/// Collects every qualifying link, one per unordered pair.
///
/// Quadratic in the particle count; callers keep populations in the low
/// hundreds. Links are rendered before any particle body so the dots always
/// sit on top of the line endpoints.
pub fn collect(particles: &[Particle], tolerance: f32) -> Vec<Link> {
    let mut links = Vec::new();
    for (index, a) in particles.iter().enumerate() {
        for b in &particles[index + 1..] {
            if let Some(opacity) = opacity(a.distance_to(b), tolerance) {
                links.push(Link {
                    from: a.position,
                    to: b.position,
                    opacity,
                });
            }
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), 2.0, 0.3, 0.0, 120.0)
    }

    #[test]
    fn test_opacity_fades_linearly() {
        assert_eq!(opacity(0.0, 150.0), Some(1.0));
        let mid = opacity(75.0, 150.0).unwrap();
        assert!((mid - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_no_link_at_or_past_tolerance() {
        assert_eq!(opacity(150.0, 150.0), None);
        assert_eq!(opacity(151.0, 150.0), None);
    }

    #[test]
    fn test_degenerate_tolerance_yields_nothing() {
        assert_eq!(opacity(10.0, 0.0), None);
        assert_eq!(opacity(10.0, -5.0), None);
    }

    #[test]
    fn test_collect_visits_each_pair_once() {
        let particles = vec![particle(0.0, 0.0), particle(10.0, 0.0), particle(20.0, 0.0)];
        let links = collect(&particles, 100.0);
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn test_collect_two_particles_at_distance_100() {
        let particles = vec![particle(0.0, 0.0), particle(100.0, 0.0)];
        let links = collect(&particles, 150.0);
        assert_eq!(links.len(), 1);
        assert!((links[0].opacity - (1.0 - 100.0 / 150.0)).abs() < 1e-6);
    }

    #[test]
    fn test_collect_skips_distant_pairs() {
        let particles = vec![particle(0.0, 0.0), particle(500.0, 0.0), particle(40.0, 0.0)];
        let links = collect(&particles, 150.0);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].to, Vec2::new(40.0, 0.0));
    }
}
