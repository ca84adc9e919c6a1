//! Per-mesh bounding volume: the triangles of one mesh plus their AABB.

use tracer_math::{Aabb, Ray};

use crate::Triangle;

/// Owns the triangles of one mesh in insertion order and an axis-aligned box
/// that is widened, never shrunk, on every insertion.
///
/// Ray rejection runs against a slightly padded copy of the box, so lines
/// through a vertex or along an edge on the box boundary are never culled
/// while the triangle test still reports a hit.
#[derive(Debug, Clone, Default)]
pub struct BoundingVolume {
    triangles: Vec<Triangle>,
    bbox: Aabb,
    cull_box: Aabb,
}

impl BoundingVolume {
    /// Create an empty volume.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a triangle and widen the box around its three vertices.
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.bbox.grow(triangle.a);
        self.bbox.grow(triangle.b);
        self.bbox.grow(triangle.c);
        self.cull_box = self.bbox.padded();
        self.triangles.push(triangle);
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Tight box around every stored vertex.
    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Cheap reject-only test: `false` means no triangle in this volume can
    /// be hit by `ray`. `true` carries no distance and does not guarantee a hit.
    #[inline]
    pub fn ray_box_test(&self, ray: &Ray) -> bool {
        self.cull_box.hit(ray)
    }
}
