//! Lights and the JSON scene description.
//!
//! The description carries everything the renderer needs besides geometry:
//! resolution, model path, camera, lights, background and trace depth.
//! Every field is optional in the file and falls back to the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracer_math::{OrbitCamera, Vec3};

use crate::{Color, CoreError, CoreResult};

/// A point light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
}

impl Light {
    pub fn new(position: Vec3, color: Color) -> Self {
        Self { position, color }
    }
}

/// A light as written in the scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightDescription {
    pub position: [f32; 3],
    #[serde(default = "white")]
    pub color: [f32; 3],
}

impl From<&LightDescription> for Light {
    fn from(desc: &LightDescription) -> Self {
        Light::new(Vec3::from(desc.position), Color::from(desc.color))
    }
}

/// Camera placement as written in the scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub position: [f32; 3],
    /// Rotation around Y, radians
    pub theta: f32,
    /// Elevation, radians
    pub phi: f32,
    /// Vertical field of view, degrees
    pub angle_of_view: f32,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            theta: 0.0,
            phi: 0.0,
            angle_of_view: 60.0,
        }
    }
}

/// Render settings and scene content read from a JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub width: u32,
    pub height: u32,
    /// OBJ model, relative paths resolve against the description file
    pub model: Option<PathBuf>,
    pub camera: CameraDescription,
    pub lights: Vec<LightDescription>,
    /// Color returned by the miss shader
    pub background: [f32; 3],
    /// Trace depth handed to the closest-hit shader
    pub depth: usize,
    /// Seeds the sub-pixel jitter
    pub sample_index: u64,

    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            model: None,
            camera: CameraDescription::default(),
            lights: vec![LightDescription {
                position: [5.0, 5.0, 5.0],
                color: white(),
            }],
            background: [0.3, 0.5, 0.7],
            depth: 3,
            sample_index: 1,
            base_dir: None,
        }
    }
}

fn white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl SceneDescription {
    /// Parse a description from a JSON string.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a description from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut description = Self::from_json_str(&json)?;
        description.base_dir = path.parent().map(Path::to_path_buf);

        log::info!(
            "Loaded scene description {} ({}x{}, {} lights)",
            path.display(),
            description.width,
            description.height,
            description.lights.len()
        );
        Ok(description)
    }

    /// Resolved path of the model to render.
    pub fn model_path(&self) -> CoreResult<PathBuf> {
        let model = self.model.as_ref().ok_or(CoreError::MissingModel)?;
        Ok(match &self.base_dir {
            Some(dir) if model.is_relative() => dir.join(model),
            _ => model.clone(),
        })
    }

    /// Replace the model with a path relative to the working directory.
    pub fn set_model(&mut self, model: impl Into<PathBuf>) {
        self.model = Some(model.into());
        self.base_dir = None;
    }

    pub fn lights(&self) -> Vec<Light> {
        self.lights.iter().map(Light::from).collect()
    }

    pub fn background(&self) -> Color {
        Color::from(self.background)
    }

    /// Camera for this description's resolution.
    pub fn camera(&self) -> OrbitCamera {
        let mut camera = OrbitCamera::new(
            Vec3::from(self.camera.position),
            self.camera.theta,
            self.camera.phi,
        )
        .with_resolution(self.width, self.height);
        camera.angle_of_view = self.camera.angle_of_view.to_radians();
        camera
    }
}
