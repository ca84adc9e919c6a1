// Re-export glam for convenience
pub use glam::*;

// Tracer math types
mod aabb;
mod camera;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use camera::OrbitCamera;
pub use interval::Interval;
pub use ray::Ray;
