//! Scene assembly: vertex/index buffers to bounding volumes.
//!
//! The scene is built once, single-threaded, and is read-only afterwards so
//! every tracer can borrow it from parallel pixel tasks without locking.

use tracer_core::{Light, Mesh};

use crate::{BoundingVolume, Triangle};

/// Triangles grouped into one bounding volume per input mesh, plus lights.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    volumes: Vec<BoundingVolume>,
    lights: Vec<Light>,
}

impl Scene {
    /// Build the acceleration structure for `meshes`.
    ///
    /// Each mesh's index buffer is read in groups of three; invalid triangles
    /// are skipped (see [`Mesh::triangles`]).
    pub fn build(meshes: &[Mesh], lights: Vec<Light>) -> Self {
        let volumes: Vec<BoundingVolume> = meshes.iter().map(build_volume).collect();

        log::info!(
            "Built {} bounding volumes ({} triangles), {} lights",
            volumes.len(),
            volumes.iter().map(BoundingVolume::len).sum::<usize>(),
            lights.len()
        );

        Self { volumes, lights }
    }

    pub fn volumes(&self) -> &[BoundingVolume] {
        &self.volumes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn triangle_count(&self) -> usize {
        self.volumes.iter().map(BoundingVolume::len).sum()
    }
}

fn build_volume(mesh: &Mesh) -> BoundingVolume {
    let mut volume = BoundingVolume::new();
    for [a, b, c] in mesh.triangles() {
        volume.add_triangle(Triangle::new(&a, &b, &c));
    }

    log::debug!(
        "Mesh {}: {} triangles, bounds {:?} .. {:?}",
        mesh.name,
        volume.len(),
        volume.bounding_box().min(),
        volume.bounding_box().max()
    );
    volume
}
