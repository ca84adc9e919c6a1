//! Wavefront OBJ loading.
//!
//! Each OBJ shape becomes one `Mesh`. Every face corner gets its own vertex
//! so the flat face normal can be stored per vertex; the index buffer is
//! therefore `0..n`. Material ambient (`Ka`), diffuse (`Kd`) and emission
//! (`Ke`, parsed by tobj into `Material::emissive`) are copied into every
//! vertex of the shape.

use std::path::Path;

use tracer_math::Vec3;

use crate::mesh::face_normal;
use crate::{Color, CoreError, CoreResult, Mesh, Vertex};

/// Diffuse color used for shapes without a material.
const DEFAULT_DIFFUSE: Color = Color::new(0.5, 0.5, 0.5);

/// Material channels copied into vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Channels {
    ambient: Color,
    diffuse: Color,
    emissive: Color,
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            ambient: Color::ZERO,
            diffuse: DEFAULT_DIFFUSE,
            emissive: Color::ZERO,
        }
    }
}

impl From<&tobj::Material> for Channels {
    fn from(material: &tobj::Material) -> Self {
        let defaults = Channels::default();
        Self {
            ambient: material.ambient.map(Color::from).unwrap_or(defaults.ambient),
            diffuse: material.diffuse.map(Color::from).unwrap_or(defaults.diffuse),
            emissive: material.emissive.map(Color::from).unwrap_or(defaults.emissive),
        }
    }
}

/// Load an OBJ file (and its MTL library, if any) into per-shape meshes.
pub fn load_obj(path: impl AsRef<Path>) -> CoreResult<Vec<Mesh>> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .map_err(|source| CoreError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|err| {
        log::warn!("No materials for {}: {}", path.display(), err);
        Vec::new()
    });

    let meshes: Vec<Mesh> = models
        .iter()
        .map(|model| {
            let channels = model
                .mesh
                .material_id
                .and_then(|id| materials.get(id))
                .map(Channels::from)
                .unwrap_or_default();
            build_mesh(&model.name, &model.mesh, channels)
        })
        .filter(|mesh| mesh.triangle_count() > 0)
        .collect();

    if meshes.is_empty() {
        return Err(CoreError::NoGeometry(path.to_path_buf()));
    }

    log::info!(
        "Loaded {} meshes ({} triangles) from {}",
        meshes.len(),
        meshes.iter().map(Mesh::triangle_count).sum::<usize>(),
        path.display()
    );
    Ok(meshes)
}

fn build_mesh(name: &str, mesh: &tobj::Mesh, channels: Channels) -> Mesh {
    let position = |index: u32| {
        let i = 3 * index as usize;
        Vec3::new(mesh.positions[i], mesh.positions[i + 1], mesh.positions[i + 2])
    };
    let vertex_count = mesh.positions.len() / 3;

    let mut vertices = Vec::with_capacity(mesh.indices.len());
    for face in mesh.indices.chunks_exact(3) {
        if face.iter().any(|&i| i as usize >= vertex_count) {
            log::warn!("Shape {}: face {:?} references a missing vertex", name, face);
            continue;
        }

        let corners = [position(face[0]), position(face[1]), position(face[2])];
        let normal = face_normal(corners[0], corners[1], corners[2]);

        vertices.extend(corners.iter().map(|&p| Vertex {
            position: p,
            normal,
            ambient: channels.ambient,
            diffuse: channels.diffuse,
            emissive: channels.emissive,
        }));
    }

    let indices = (0..vertices.len() as u32).collect();
    log::debug!("Shape {}: {} triangles", name, vertices.len() / 3);
    Mesh::new(name, vertices, indices)
}
