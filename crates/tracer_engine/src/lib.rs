//! Tracer Engine - CPU ray tracing over per-mesh bounding volumes.
//!
//! Rays are tested against every triangle of every mesh (skipping meshes
//! whose bounding box the ray misses), and the result is handed to
//! caller-installed miss / closest-hit / any-hit shaders. Shadow rays reuse
//! the same scene through a second tracer with its own shaders.

mod bounding_volume;
mod error;
mod frame;
mod payload;
mod raytracer;
mod scene;
pub mod shading;
mod stats;
mod triangle;

pub use bounding_volume::BoundingVolume;
pub use error::{ShadingError, ShadingResult};
pub use frame::FrameBuffers;
pub use payload::Payload;
pub use raytracer::{
    AnyHitShader, ClosestHitShader, MissShader, Raytracer, TracerConfig, DEFAULT_MAX_T,
    DEFAULT_MIN_T,
};
pub use scene::Scene;
pub use stats::{TraceCounts, TraceStats};
pub use triangle::Triangle;

/// Re-export common types from the core and math crates
pub use tracer_core::{Buffer, Color, Light, Mesh, UnsignedColor, Vertex};
pub use tracer_math::{Ray, Vec3};
