use crate::{Interval, Ray, Vec3};

/// Relative error bound of a slab distance `(bound - origin) / direction`,
/// doubled. Slab distances are widened by it before overlap checks.
const SLAB_EPSILON: f32 = 2.0 * GAMMA_3;
/// `3u / (1 - 3u)` for the f32 unit roundoff `u`.
const GAMMA_3: f32 = 3.0 * UNIT_ROUNDOFF / (1.0 - 3.0 * UNIT_ROUNDOFF);
const UNIT_ROUNDOFF: f32 = f32::EPSILON * 0.5;

/// Margin added around a padded box, relative to its size and distance from
/// the origin.
const PAD_RELATIVE: f32 = 1e-3;
/// Smallest margin added around a padded box.
const PAD_MIN: f32 = 1e-4;

/// Axis-Aligned Bounding Box used to reject rays before triangle tests.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// It starts out empty and is only ever widened.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::EMPTY.grown(a).grown(b)
    }

    /// Returns a copy of this box widened to include `point`.
    pub fn grown(&self, point: Vec3) -> Self {
        Self {
            x: self.x.include(point.x),
            y: self.y.include(point.y),
            z: self.z.include(point.z),
        }
    }

    /// Widen this box in place to include `point`.
    pub fn grow(&mut self, point: Vec3) {
        *self = self.grown(point);
    }

    /// Returns a copy grown on every side by a margin scaled to the box's
    /// extent and its distance from the origin. Flat boxes get thickness.
    /// An empty box stays empty.
    pub fn padded(&self) -> Self {
        if self.is_empty() {
            return *self;
        }

        let extent = self.x.size().max(self.y.size()).max(self.z.size());
        let distance = self.min().abs().max(self.max().abs()).max_element();
        let margin = PAD_MIN + PAD_RELATIVE * extent.max(distance);

        // expand() splits its delta over both sides
        Self {
            x: self.x.expand(2.0 * margin),
            y: self.y.expand(2.0 * margin),
            z: self.z.expand(2.0 * margin),
        }
    }

    /// True until the first point has been added.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test against the line carrying `r`.
    ///
    /// Per axis the entry/exit distances are swapped when the direction
    /// component is negative, widened by their rounding bound, and the
    /// running `[tmin, tmax]` overlap is narrowed. A zero direction component
    /// yields infinities, which compare consistently; a 0/0 NaN never narrows
    /// or rejects. The test is conservative: it can pass for geometry behind
    /// the origin, but never fails for a line that touches the box.
    pub fn hit(&self, r: &Ray) -> bool {
        if self.is_empty() {
            return false;
        }

        let origin = r.origin();
        let direction = r.direction();

        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let mut t0 = (slab.min - origin[axis]) / direction[axis];
            let mut t1 = (slab.max - origin[axis]) / direction[axis];
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            let t0 = widen_down(t0);
            let t1 = widen_up(t1);

            if tmin > t1 || t0 > tmax {
                return false;
            }
            if t0 > tmin {
                tmin = t0;
            }
            if t1 < tmax {
                tmax = t1;
            }
        }

        true
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Move `t` towards negative infinity by its relative rounding bound.
/// Infinities and NaN pass through unchanged.
#[inline]
fn widen_down(t: f32) -> f32 {
    if t > 0.0 {
        t * (1.0 - SLAB_EPSILON)
    } else {
        t * (1.0 + SLAB_EPSILON)
    }
}

/// Move `t` towards positive infinity by its relative rounding bound.
#[inline]
fn widen_up(t: f32) -> f32 {
    if t > 0.0 {
        t * (1.0 + SLAB_EPSILON)
    } else {
        t * (1.0 - SLAB_EPSILON)
    }
}
