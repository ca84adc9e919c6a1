use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

/// Spherical-angle camera that supplies the position and orthonormal basis
/// consumed by ray generation.
///
/// `theta` rotates around the world Y axis, `phi` tilts up/down. At
/// `theta = phi = 0` the camera looks down +Z.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub theta: f32,
    pub phi: f32,
    /// Vertical field of view in radians
    pub angle_of_view: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            theta: 0.0,
            phi: 0.0,
            angle_of_view: 60.0_f32.to_radians(),
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl OrbitCamera {
    /// Create a camera at `position` with the given angles.
    pub fn new(position: Vec3, theta: f32, phi: f32) -> Self {
        Self {
            position,
            theta,
            phi,
            ..Default::default()
        }
    }

    /// Set the image size the camera projects onto.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width as f32;
        self.height = height as f32;
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// Forward (view) direction.
    pub fn direction(&self) -> Vec3 {
        Vec3::new(
            self.phi.cos() * self.theta.sin(),
            self.phi.sin(),
            self.phi.cos() * self.theta.cos(),
        )
    }

    /// Right vector, always horizontal.
    pub fn right(&self) -> Vec3 {
        Vec3::new(
            (self.theta - FRAC_PI_2).sin(),
            0.0,
            (self.theta - FRAC_PI_2).cos(),
        )
    }

    /// Up vector, `right × direction`.
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.direction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_default_basis() {
        let camera = OrbitCamera::default();

        assert!(approx(camera.direction(), Vec3::Z));
        assert!(approx(camera.right(), Vec3::NEG_X));
        assert!(approx(camera.up(), Vec3::Y));
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = OrbitCamera::new(Vec3::new(0.0, 1.0, -4.0), 0.7, -0.3);
        let (d, r, u) = (camera.direction(), camera.right(), camera.up());

        assert!((d.length() - 1.0).abs() < 1e-5);
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!((u.length() - 1.0).abs() < 1e-5);
        assert!(d.dot(r).abs() < 1e-5);
        assert!(d.dot(u).abs() < 1e-5);
        assert!(r.dot(u).abs() < 1e-5);
    }

    #[test]
    fn test_aspect_ratio_follows_resolution() {
        let camera = OrbitCamera::default().with_resolution(200, 100);
        assert_eq!(camera.aspect_ratio(), 2.0);
    }
}
