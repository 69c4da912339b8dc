use foundation::math::Vec3;

use crate::picking::Ray;

/// Canvas size in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Pixel position to normalized device coordinates (x right, y up, both in [-1, 1]).
    pub fn to_ndc(&self, x_px: f64, y_px: f64) -> [f64; 2] {
        [(x_px / self.width) * 2.0 - 1.0, -(y_px / self.height) * 2.0 + 1.0]
    }

    pub fn from_ndc(&self, ndc: [f64; 2]) -> [f64; 2] {
        [
            (ndc[0] + 1.0) * 0.5 * self.width,
            (1.0 - ndc[1]) * 0.5 * self.height,
        ]
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Perspective camera looking at the globe centre.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub aspect: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            aspect: Viewport::default().aspect(),
        }
    }
}

/// Eye placement for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

struct Basis {
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    pub fn set_aspect(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }

    /// Ray from the eye through an NDC point.
    pub fn ray_from_ndc(&self, pose: CameraPose, ndc: [f64; 2]) -> Option<Ray> {
        let basis = basis(pose)?;
        let tan_half = (self.fov_y_deg.to_radians() * 0.5).tan();
        let dir = basis.forward
            + basis.right.scale(ndc[0] * tan_half * self.aspect)
            + basis.up.scale(ndc[1] * tan_half);
        Some(Ray::new(pose.eye, dir.normalized()?))
    }

    /// NDC position of a world point, or `None` when it lies outside the view frustum depth.
    pub fn project(&self, pose: CameraPose, point: Vec3) -> Option<[f64; 2]> {
        let basis = basis(pose)?;
        let rel = point - pose.eye;
        let depth = rel.dot(basis.forward);
        if depth < self.near || depth > self.far {
            return None;
        }
        let tan_half = (self.fov_y_deg.to_radians() * 0.5).tan();
        Some([
            rel.dot(basis.right) / (depth * tan_half * self.aspect),
            rel.dot(basis.up) / (depth * tan_half),
        ])
    }
}

fn basis(pose: CameraPose) -> Option<Basis> {
    let forward = (pose.target - pose.eye).normalized()?;
    let right = forward.cross(pose.up).normalized()?;
    let up = right.cross(forward);
    Some(Basis { forward, right, up })
}

#[cfg(test)]
mod tests {
    use super::{Camera, CameraPose, Viewport};
    use foundation::math::Vec3;

    fn pose() -> CameraPose {
        CameraPose {
            eye: Vec3::new(0.0, 0.0, 2.5),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }

    #[test]
    fn centre_pixel_maps_to_ndc_origin() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_ndc(400.0, 300.0), [0.0, 0.0]);
        assert_eq!(vp.to_ndc(0.0, 0.0), [-1.0, 1.0]);
        assert_eq!(vp.from_ndc([1.0, -1.0]), [800.0, 600.0]);
    }

    #[test]
    fn centre_ray_points_at_target() {
        let cam = Camera::default();
        let ray = cam.ray_from_ndc(pose(), [0.0, 0.0]).expect("ray");
        assert!((ray.dir.z + 1.0).abs() < 1e-12);
    }

    #[test]
    fn project_inverts_ray() {
        let cam = Camera::default();
        let ray = cam.ray_from_ndc(pose(), [0.3, -0.4]).expect("ray");
        let point = ray.origin + ray.dir.scale(2.0);
        let ndc = cam.project(pose(), point).expect("visible");
        assert!((ndc[0] - 0.3).abs() < 1e-9);
        assert!((ndc[1] + 0.4).abs() < 1e-9);
    }

    #[test]
    fn points_behind_the_eye_do_not_project() {
        let cam = Camera::default();
        assert!(cam.project(pose(), Vec3::new(0.0, 0.0, 5.0)).is_none());
    }

    #[test]
    fn viewport_never_collapses() {
        let vp = Viewport::new(0.0, -3.0);
        assert_eq!(vp.aspect(), 1.0);
    }
}
