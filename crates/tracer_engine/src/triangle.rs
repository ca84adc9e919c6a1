//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use tracer_core::{Color, Vertex};
use tracer_math::{Ray, Vec3};

use crate::Payload;

/// Determinant threshold below which a ray counts as parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A triangle built once from three vertex records.
///
/// Edges are precomputed for every intersection test. Normals are kept per
/// vertex for interpolation, while the material terms come from vertex A only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    /// b - a
    pub ba: Vec3,
    /// c - a
    pub ca: Vec3,
    pub na: Vec3,
    pub nb: Vec3,
    pub nc: Vec3,
    pub ambient: Color,
    pub diffuse: Color,
    pub emissive: Color,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(vertex_a: &Vertex, vertex_b: &Vertex, vertex_c: &Vertex) -> Self {
        let a = vertex_a.position;
        let b = vertex_b.position;
        let c = vertex_c.position;

        Self {
            a,
            b,
            c,
            ba: b - a,
            ca: c - a,
            na: vertex_a.normal,
            nb: vertex_b.normal,
            nc: vertex_c.normal,
            ambient: vertex_a.ambient,
            diffuse: vertex_a.diffuse,
            emissive: vertex_a.emissive,
        }
    }

    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// Returns `None` when the ray is parallel to the triangle or passes
    /// outside it. Hits behind the ray origin are returned with negative `t`;
    /// the trace window decides whether they count. The payload color is
    /// seeded with the diffuse term.
    pub fn intersect(&self, ray: &Ray) -> Option<Payload> {
        let pvec = ray.direction().cross(self.ca);
        let det = self.ba.dot(pvec);

        // Ray is parallel to triangle
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - self.a;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(self.ba);
        let v = ray.direction().dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        Some(Payload {
            t: self.ca.dot(qvec) * inv_det,
            barycentric: Vec3::new(u, v, 1.0 - u - v),
            color: self.diffuse,
        })
    }

    /// Shading normal: `barycentric.x * na + barycentric.y * nb + barycentric.z * nc`,
    /// normalized.
    pub fn interpolate_normal(&self, barycentric: Vec3) -> Vec3 {
        (barycentric.x * self.na + barycentric.y * self.nb + barycentric.z * self.nc)
            .normalize_or_zero()
    }

    /// Geometric normal from the winding `a → b → c`.
    pub fn face_normal(&self) -> Vec3 {
        self.ba.cross(self.ca).normalize_or_zero()
    }
}
