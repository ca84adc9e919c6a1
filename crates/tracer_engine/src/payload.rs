//! Result of a ray query.

use tracer_core::Color;
use tracer_math::Vec3;

/// Hit distance, barycentric weights and resolved color of a ray query.
///
/// `Default` yields `t = 0` and black. A trace starts from
/// [`Payload::miss`] so that "no hit yet" is encoded as `t == max_t`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Payload {
    /// Distance along the (unit) ray direction
    pub t: f32,
    /// Weights `(u, v, 1 - u - v)` of the hit triangle
    pub barycentric: Vec3,
    pub color: Color,
}

impl Payload {
    /// Sentinel payload for a trace that has not hit anything closer than `max_t`.
    pub fn miss(max_t: f32) -> Self {
        Self {
            t: max_t,
            ..Default::default()
        }
    }

    /// Payload carrying only a color, as returned by miss shaders.
    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }
}
