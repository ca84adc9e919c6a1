//! Vertex records and per-mesh vertex/index buffers.
//!
//! A `Mesh` is the unit handed from model loading to the ray tracer: one
//! vertex buffer plus one triangle-list index buffer. Every mesh becomes one
//! bounding volume during scene assembly.

use tracer_math::Vec3;

use crate::{Buffer, Color};

/// A vertex carrying position, normal and material channels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub ambient: Color,
    pub diffuse: Color,
    pub emissive: Color,
}

impl Vertex {
    /// Create a vertex with a diffuse color and no ambient or emissive term.
    pub fn new(position: Vec3, normal: Vec3, diffuse: Color) -> Self {
        Self {
            position,
            normal,
            diffuse,
            ..Default::default()
        }
    }

    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_emissive(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }
}

/// A triangle-list mesh: vertex records plus indices in groups of three.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Mesh name (OBJ shape name, or caller supplied)
    pub name: String,

    /// Vertex records
    pub vertices: Buffer<Vertex>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Buffer<u32>,
}

impl Mesh {
    /// Create a new mesh from vertices and indices.
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices: Buffer::from_vec(vertices),
            indices: Buffer::from_vec(indices),
        }
    }

    /// Get the number of complete triangles in the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.count() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertices.count()
    }

    /// Resolve the index buffer into vertex triplets.
    ///
    /// Triangles referencing a vertex outside the buffer, and trailing
    /// indices that do not form a full triangle, are skipped with a warning.
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        let indices = self.indices.get_data();
        let vertices = self.vertices.get_data();

        if indices.len() % 3 != 0 {
            log::warn!(
                "Mesh {}: {} trailing indices do not form a triangle",
                self.name,
                indices.len() % 3
            );
        }

        indices.chunks_exact(3).filter_map(move |face| {
            let i0 = face[0] as usize;
            let i1 = face[1] as usize;
            let i2 = face[2] as usize;

            if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
                log::warn!(
                    "Mesh {}: invalid triangle indices [{}, {}, {}], vertex count: {}",
                    self.name,
                    i0,
                    i1,
                    i2,
                    vertices.len()
                );
                return None;
            }

            Some([vertices[i0], vertices[i1], vertices[i2]])
        })
    }
}

/// Flat normal of the triangle `(p0, p1, p2)` with counter-clockwise winding.
///
/// Degenerate triangles get a zero normal.
pub fn face_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    (p1 - p0).cross(p2 - p0).normalize_or_zero()
}
