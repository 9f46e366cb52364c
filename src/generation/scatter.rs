//! Random node placement
//!
//! Scatters node positions uniformly over the domain rectangle. No
//! relaxation or blue-noise shaping is applied: the crossing-free
//! connection passes tolerate clustering, and the uneven spacing is what
//! gives extracted continents their irregular coastlines.

use glam::Vec2;
use rand::Rng;

/// Generate `count` uniform positions inside a `width` × `height` domain
///
/// Positions are drawn from the closed range on each axis, so nodes may
/// land exactly on the domain edge. Pass a seeded RNG for deterministic
/// output.
pub fn scatter_points<R: Rng>(count: usize, width: f32, height: f32, rng: &mut R) -> Vec<Vec2> {
    (0..count)
        .map(|_| {
            Vec2::new(
                rng.gen_range(0.0..=width),
                rng.gen_range(0.0..=height),
            )
        })
        .collect()
}
