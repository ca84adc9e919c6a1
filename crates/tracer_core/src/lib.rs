//! Tracer Core - buffers, geometry records and scene input for the ray tracer.
//!
//! This crate provides:
//!
//! - **Storage**: `Buffer<T>`, the flat 1D/2D container used for images,
//!   per-pixel attributes and vertex/index data
//! - **Scene input**: `Vertex`, `Mesh`, `Light`, OBJ loading and the JSON
//!   scene description read by the command line renderer
//!
//! # Example
//!
//! ```ignore
//! use tracer_core::{load_obj, SceneDescription};
//!
//! let description = SceneDescription::load("scene.json")?;
//! let meshes = load_obj(description.model_path()?)?;
//! println!("Loaded {} meshes, {} lights", meshes.len(), description.lights().len());
//! ```

pub mod buffer;
pub mod color;
pub mod error;
pub mod mesh;
pub mod obj;
pub mod scene;

// Re-export commonly used types
pub use buffer::Buffer;
pub use color::{Color, UnsignedColor};
pub use error::{CoreError, CoreResult};
pub use mesh::{Mesh, Vertex};
pub use obj::load_obj;
pub use scene::{CameraDescription, Light, LightDescription, SceneDescription};
