//! Orbit controls for a unit globe: quaternion arcball rotation with damped inertia,
//! bounded smooth zoom and slow auto-rotation around the polar axis.
//!
//! The orientation quaternion rotates the camera frame around the globe. The eye sits
//! at `orientation * (0, 0, distance)` looking at the origin.

use foundation::math::{LatLng, Vec3, lat_lng_to_sphere};

/// Closest the camera may get to the globe centre.
pub const MIN_DISTANCE: f64 = 1.5;

/// Farthest the camera may get from the globe centre.
pub const MAX_DISTANCE: f64 = 4.0;

pub const DEFAULT_DISTANCE: f64 = 2.5;

/// Fraction of angular velocity lost per 60 Hz frame after a drag is released.
pub const DAMPING_FACTOR: f64 = 0.05;

/// Scales pointer drag into rotation.
pub const ROTATE_SPEED: f64 = 0.5;

/// Auto-rotation speed; 1.0 is one orbit per minute.
pub const AUTO_ROTATE_SPEED: f64 = 0.5;

/// Below this angular rate (rad/s) inertia stops.
const ANGULAR_VELOCITY_THRESHOLD: f64 = 1e-3;

/// Zoom smoothing factor (higher = faster response).
const ZOOM_SMOOTHING: f64 = 8.0;

const IDENTITY: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragButton {
    #[default]
    None,
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone)]
pub struct OrbitController {
    /// Unit quaternion [x, y, z, w].
    orientation: [f64; 4],
    distance: f64,
    target_distance: f64,

    /// Inertia as a rotation axis (camera frame) and rate in rad/s.
    spin_axis: [f64; 3],
    spin_rate: f64,

    pub auto_rotate: bool,

    canvas_width: f64,
    canvas_height: f64,

    dragging: bool,
    drag_button: DragButton,
    arcball_last_unit: Option<[f64; 3]>,
    last_drag_delta: Option<([f64; 4], f64)>,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            orientation: IDENTITY,
            distance: DEFAULT_DISTANCE,
            target_distance: DEFAULT_DISTANCE,
            spin_axis: [0.0, 1.0, 0.0],
            spin_rate: 0.0,
            auto_rotate: true,
            canvas_width: 1280.0,
            canvas_height: 720.0,
            dragging: false,
            drag_button: DragButton::None,
            arcball_last_unit: None,
            last_drag_delta: None,
        }
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width.max(1.0);
        self.canvas_height = height.max(1.0);
    }

    /// - `button`: 0=left, 1=middle, 2=right.
    pub fn on_pointer_down(&mut self, pos_px: [f64; 2], button: i32) {
        self.spin_rate = 0.0;
        self.dragging = true;
        self.drag_button = match button {
            1 => DragButton::Middle,
            2 => DragButton::Right,
            _ => DragButton::Left,
        };
        self.arcball_last_unit = Some(self.screen_to_arcball(pos_px));
        self.last_drag_delta = None;
    }

    /// `dt` is the time since the previous pointer sample, used for inertia.
    pub fn on_pointer_move(&mut self, pos_px: [f64; 2], dt: f64) {
        if !self.dragging {
            return;
        }

        let next_unit = self.screen_to_arcball(pos_px);
        if let Some(prev_unit) = self.arcball_last_unit {
            let delta = quat_scale_angle(quat_from_unit_vectors(prev_unit, next_unit), ROTATE_SPEED);
            // The camera moves opposite to the dragged surface.
            self.orientation = quat_normalize(quat_mul(self.orientation, quat_conjugate(delta)));
            self.last_drag_delta = Some((delta, dt.max(1e-6)));
        }
        self.arcball_last_unit = Some(next_unit);
    }

    pub fn on_pointer_up(&mut self) {
        if !self.dragging {
            return;
        }

        if let Some((delta, dt)) = self.last_drag_delta.take() {
            let (axis, angle) = quat_axis_angle(quat_conjugate(delta));
            self.spin_axis = axis;
            self.spin_rate = angle / dt;
            if self.spin_rate < ANGULAR_VELOCITY_THRESHOLD {
                self.spin_rate = 0.0;
            }
        }

        self.dragging = false;
        self.drag_button = DragButton::None;
        self.arcball_last_unit = None;
    }

    /// Positive delta zooms out, negative zooms in.
    pub fn on_wheel(&mut self, delta: f64) {
        let zoom_factor = (delta * 0.002).exp();
        self.target_distance = (self.target_distance * zoom_factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Advances inertia, auto-rotation and zoom by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        let dt = dt.clamp(0.0, 0.1);

        if !self.dragging && self.spin_rate > 0.0 {
            let step = quat_from_axis_angle(self.spin_axis, self.spin_rate * dt);
            self.orientation = quat_normalize(quat_mul(self.orientation, step));

            self.spin_rate *= (1.0 - DAMPING_FACTOR).powf(dt * 60.0);
            if self.spin_rate < ANGULAR_VELOCITY_THRESHOLD {
                self.spin_rate = 0.0;
            }
        }

        if self.auto_rotate && !self.dragging {
            let angle = std::f64::consts::TAU / 60.0 * AUTO_ROTATE_SPEED * dt;
            let step = quat_from_axis_angle([0.0, 1.0, 0.0], angle);
            self.orientation = quat_normalize(quat_mul(step, self.orientation));
        }

        let zoom_alpha = 1.0 - (-ZOOM_SMOOTHING * dt).exp();
        self.distance += (self.target_distance - self.distance) * zoom_alpha;
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Points the camera straight down at `coord` from the current distance.
    pub fn look_at(&mut self, coord: LatLng) {
        let dir = lat_lng_to_sphere(coord, 1.0);
        self.orientation = quat_from_unit_vectors([0.0, 0.0, 1.0], dir.as_array());
        self.spin_rate = 0.0;
    }

    pub fn eye_position(&self) -> Vec3 {
        Vec3::from_array(quat_rotate_vec3(self.orientation, [0.0, 0.0, self.distance]))
    }

    /// Camera up vector in world space.
    pub fn up_direction(&self) -> Vec3 {
        Vec3::from_array(quat_rotate_vec3(self.orientation, [0.0, 1.0, 0.0]))
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn orientation(&self) -> [f64; 4] {
        self.orientation
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn drag_button(&self) -> DragButton {
        self.drag_button
    }

    pub fn is_spinning(&self) -> bool {
        self.spin_rate > 0.0
    }

    fn screen_to_arcball(&self, pos_px: [f64; 2]) -> [f64; 3] {
        let min_dim = self.canvas_width.min(self.canvas_height).max(1.0);
        let nx = (2.0 * pos_px[0] - self.canvas_width) / min_dim;
        let ny = (self.canvas_height - 2.0 * pos_px[1]) / min_dim;

        let r2 = nx * nx + ny * ny;
        if r2 <= 1.0 {
            vec3_normalize([nx, ny, (1.0 - r2).sqrt()])
        } else {
            let inv_r = 1.0 / r2.sqrt();
            vec3_normalize([nx * inv_r, ny * inv_r, 0.0])
        }
    }
}

// ============================================================================
// Quaternion math utilities
// ============================================================================

fn quat_mul(a: [f64; 4], b: [f64; 4]) -> [f64; 4] {
    [
        a[3] * b[0] + a[0] * b[3] + a[1] * b[2] - a[2] * b[1],
        a[3] * b[1] - a[0] * b[2] + a[1] * b[3] + a[2] * b[0],
        a[3] * b[2] + a[0] * b[1] - a[1] * b[0] + a[2] * b[3],
        a[3] * b[3] - a[0] * b[0] - a[1] * b[1] - a[2] * b[2],
    ]
}

fn quat_normalize(q: [f64; 4]) -> [f64; 4] {
    let n = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
    if n > 1e-10 {
        [q[0] / n, q[1] / n, q[2] / n, q[3] / n]
    } else {
        IDENTITY
    }
}

fn quat_conjugate(q: [f64; 4]) -> [f64; 4] {
    [-q[0], -q[1], -q[2], q[3]]
}

fn quat_from_axis_angle(axis: [f64; 3], angle: f64) -> [f64; 4] {
    let axis = vec3_normalize(axis);
    let (s, c) = (angle * 0.5).sin_cos();
    [axis[0] * s, axis[1] * s, axis[2] * s, c]
}

/// Returns (unit axis, angle in [0, pi]).
fn quat_axis_angle(q: [f64; 4]) -> ([f64; 3], f64) {
    let q = if q[3] < 0.0 { [-q[0], -q[1], -q[2], -q[3]] } else { q };
    let angle = 2.0 * q[3].clamp(-1.0, 1.0).acos();
    let s = (1.0 - q[3] * q[3]).max(0.0).sqrt();
    if s < 1e-12 {
        ([0.0, 1.0, 0.0], 0.0)
    } else {
        ([q[0] / s, q[1] / s, q[2] / s], angle)
    }
}

fn quat_scale_angle(q: [f64; 4], factor: f64) -> [f64; 4] {
    let (axis, angle) = quat_axis_angle(q);
    quat_from_axis_angle(axis, angle * factor)
}

fn quat_rotate_vec3(q: [f64; 4], v: [f64; 3]) -> [f64; 3] {
    let qv = [q[0], q[1], q[2]];
    let t = vec3_mul(vec3_cross(qv, v), 2.0);
    vec3_add(v, vec3_add(vec3_mul(t, q[3]), vec3_cross(qv, t)))
}

/// Quaternion rotating unit vector `a` onto unit vector `b`.
fn quat_from_unit_vectors(a: [f64; 3], b: [f64; 3]) -> [f64; 4] {
    let dot = vec3_dot(a, b).clamp(-1.0, 1.0);

    // Nearly opposite vectors: pick arbitrary orthogonal axis.
    if dot < -0.999999 {
        let mut axis = vec3_cross([1.0, 0.0, 0.0], a);
        if vec3_dot(axis, axis) < 1e-12 {
            axis = vec3_cross([0.0, 1.0, 0.0], a);
        }
        let axis = vec3_normalize(axis);
        return [axis[0], axis[1], axis[2], 0.0];
    }

    if dot > 0.999999 {
        return IDENTITY;
    }

    let axis = vec3_cross(a, b);
    quat_normalize([axis[0], axis[1], axis[2], 1.0 + dot])
}

fn vec3_add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn vec3_mul(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

fn vec3_dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn vec3_cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn vec3_normalize(a: [f64; 3]) -> [f64; 3] {
    let n = vec3_dot(a, a).sqrt();
    if n > 1e-10 {
        [a[0] / n, a[1] / n, a[2] / n]
    } else {
        [0.0, 0.0, 0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected {a} ~= {b}");
    }

    #[test]
    fn default_eye_is_on_positive_z() {
        let ctrl = OrbitController::new();
        let eye = ctrl.eye_position();
        assert_close(eye.z, DEFAULT_DISTANCE, 1e-12);
        assert_close(eye.x, 0.0, 1e-12);
        assert!(ctrl.auto_rotate);
    }

    #[test]
    fn quat_from_unit_vectors_rotates_a_onto_b() {
        let q = quat_from_unit_vectors([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let r = quat_rotate_vec3(q, [1.0, 0.0, 0.0]);
        assert_close(r[0], 0.0, 1e-9);
        assert_close(r[1], 1.0, 1e-9);
    }

    #[test]
    fn zoom_is_bounded() {
        let mut ctrl = OrbitController::new();
        ctrl.on_wheel(-100_000.0);
        for _ in 0..200 {
            ctrl.update(0.05);
        }
        assert_close(ctrl.distance(), MIN_DISTANCE, 1e-9);

        ctrl.on_wheel(100_000.0);
        for _ in 0..200 {
            ctrl.update(0.05);
        }
        assert_close(ctrl.distance(), MAX_DISTANCE, 1e-9);
    }

    #[test]
    fn auto_rotation_orbits_around_polar_axis() {
        let mut ctrl = OrbitController::new();
        let before = ctrl.eye_position();
        for _ in 0..60 {
            ctrl.update(1.0 / 60.0);
        }
        let after = ctrl.eye_position();
        // Height above the equator plane is unchanged, azimuth moved.
        assert_close(after.y, before.y, 1e-9);
        assert_close(after.length(), before.length(), 1e-9);
        let moved = (after - before).length();
        let expected = std::f64::consts::TAU / 60.0 * AUTO_ROTATE_SPEED * DEFAULT_DISTANCE;
        assert_close(moved, expected, 1e-3);
    }

    #[test]
    fn drag_release_spins_then_damps_to_rest() {
        let mut ctrl = OrbitController::new();
        ctrl.auto_rotate = false;
        ctrl.set_canvas_size(800.0, 600.0);
        ctrl.on_pointer_down([400.0, 300.0], 0);
        ctrl.on_pointer_move([420.0, 300.0], 1.0 / 60.0);
        ctrl.on_pointer_up();
        assert!(ctrl.is_spinning());

        for _ in 0..2_000 {
            ctrl.update(1.0 / 60.0);
        }
        assert!(!ctrl.is_spinning());
    }

    #[test]
    fn dragging_rotates_the_camera() {
        let mut ctrl = OrbitController::new();
        ctrl.set_canvas_size(800.0, 600.0);
        let before = ctrl.eye_position();
        ctrl.on_pointer_down([400.0, 300.0], 2);
        assert_eq!(ctrl.drag_button(), DragButton::Right);
        ctrl.on_pointer_move([500.0, 300.0], 0.016);
        assert!(ctrl.is_dragging());
        let after = ctrl.eye_position();
        assert!((after - before).length() > 1e-3);
        assert_close(after.length(), DEFAULT_DISTANCE, 1e-9);
    }

    #[test]
    fn look_at_faces_coordinate() {
        let mut ctrl = OrbitController::new();
        let coord = LatLng::new(38.9637, 35.2433);
        ctrl.look_at(coord);
        let eye_dir = ctrl.eye_position().normalized().expect("dir");
        let surface = lat_lng_to_sphere(coord, 1.0);
        assert_close(eye_dir.dot(surface), 1.0, 1e-9);
    }
}
