use bevy_ecs::prelude::*;
use glam::{Mat4, Vec3};
use vitrine_core::{ConfigError, PointerInput};

bitflags::bitflags! {
    /// Which camera gestures are honored. Showcase deployments run
    /// with all three off and keep the configured framing.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ControlFlags: u8 {
        const ROTATE = 1 << 0;
        const PAN    = 1 << 1;
        const ZOOM   = 1 << 2;
    }
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Initial eye position; the rig converts it to spherical
    /// coordinates around `target` at construction.
    pub position: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub controls: ControlFlags,
    /// (min, max) polar angle in radians, measured from straight up.
    pub polar_bounds: (f32, f32),
    /// (min, max) orbit distance in world units.
    pub distance_bounds: (f32, f32),
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.64, 0.0, -1.89),
            target: Vec3::ZERO,
            fov_degrees: 45.0,
            controls: ControlFlags::all(),
            polar_bounds: (std::f32::consts::FRAC_PI_6, std::f32::consts::FRAC_PI_2),
            distance_bounds: (2.0, 4.0),
        }
    }
}

impl CameraConfig {
    /// Locked framing for unattended deployments.
    pub fn showcase() -> Self {
        Self {
            controls: ControlFlags::empty(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (dmin, dmax) = self.distance_bounds;
        if !(dmin.is_finite() && dmax.is_finite()) || dmin > dmax || dmin <= 0.0 {
            return Err(ConfigError::DistanceBounds {
                min: dmin,
                max: dmax,
            });
        }
        let (pmin, pmax) = self.polar_bounds;
        if pmin > pmax || pmin <= 0.0 || pmax >= std::f32::consts::PI {
            return Err(ConfigError::PolarBounds {
                min: pmin,
                max: pmax,
            });
        }
        if !(0.0..180.0).contains(&self.fov_degrees) || self.fov_degrees == 0.0 {
            return Err(ConfigError::FieldOfView {
                fov: self.fov_degrees,
            });
        }
        Ok(())
    }
}

const ROTATE_SENSITIVITY: f32 = 0.005;
const PAN_SENSITIVITY: f32 = 0.002;
const ZOOM_SENSITIVITY: f32 = 0.25;

/// Orbit camera around a fixed target: yaw free, polar and distance
/// clamped. Clamping happens inside every handler, so no input
/// sequence can push the camera outside its bounds even transiently.
#[derive(Resource, Debug)]
pub struct CameraRig {
    config: CameraConfig,
    target: Vec3,
    yaw: f32,
    polar: f32,
    distance: f32,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let offset = config.position - config.target;
        let distance = offset.length().max(1e-4);
        let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
        let yaw = offset.x.atan2(offset.z);

        let mut rig = Self {
            target: config.target,
            yaw,
            polar,
            distance,
            config,
        };
        // The configured eye itself must respect the bounds.
        rig.clamp();
        Ok(rig)
    }

    fn clamp(&mut self) {
        let (pmin, pmax) = self.config.polar_bounds;
        let (dmin, dmax) = self.config.distance_bounds;
        self.polar = self.polar.clamp(pmin, pmax);
        self.distance = self.distance.clamp(dmin, dmax);
    }

    /// Drag rotation, in pixels. Ignored when ROTATE is off.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if !self.config.controls.contains(ControlFlags::ROTATE) {
            return;
        }
        self.yaw -= dx * ROTATE_SENSITIVITY;
        self.polar -= dy * ROTATE_SENSITIVITY;
        self.clamp();
    }

    /// Shift-drag panning: moves the target in the view plane.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if !self.config.controls.contains(ControlFlags::PAN) {
            return;
        }
        let forward = (self.target - self.eye()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        self.target += (-right * dx + up * dy) * PAN_SENSITIVITY * self.distance;
        self.clamp();
    }

    /// Scroll zoom, in line units. Ignored when ZOOM is off.
    pub fn zoom(&mut self, lines: f32) {
        if !self.config.controls.contains(ControlFlags::ZOOM) {
            return;
        }
        self.distance -= lines * ZOOM_SENSITIVITY;
        self.clamp();
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        self.target + Vec3::new(sp * sy, cp, sp * cy) * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.config.fov_degrees.to_radians(), aspect, 0.1, 100.0)
    }
}

/// Applies this frame's accumulated pointer gestures to the rig.
pub fn drive_camera(pointer: Res<PointerInput>, mut rig: ResMut<CameraRig>) {
    let (dx, dy) = pointer.delta;
    if dx != 0.0 || dy != 0.0 {
        if pointer.shift {
            rig.pan(dx, dy);
        } else {
            rig.rotate(dx, dy);
        }
    }
    if pointer.scroll != 0.0 {
        rig.zoom(pointer.scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(CameraConfig::default()).unwrap()
    }

    fn assert_in_bounds(rig: &CameraRig) {
        let (pmin, pmax) = rig.config.polar_bounds;
        let (dmin, dmax) = rig.config.distance_bounds;
        assert!(
            rig.polar() >= pmin - 1e-6 && rig.polar() <= pmax + 1e-6,
            "polar {} outside [{}, {}]",
            rig.polar(),
            pmin,
            pmax
        );
        assert!(
            rig.distance() >= dmin - 1e-6 && rig.distance() <= dmax + 1e-6,
            "distance {} outside [{}, {}]",
            rig.distance(),
            dmin,
            dmax
        );
    }

    #[test]
    fn initial_eye_is_clamped_into_bounds() {
        // The configured eye sits at distance ~1.995, just under the
        // minimum; construction must pull it to 2.0.
        let rig = rig();
        assert_in_bounds(&rig);
        assert!((rig.distance() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn bounds_hold_at_every_sampled_instant_of_a_wild_drag() {
        let mut rig = rig();
        // Alternating violent gestures; check after every single step,
        // not just at the end.
        for i in 0..500 {
            match i % 4 {
                0 => rig.rotate(35.0, -90.0),
                1 => rig.zoom(12.0),
                2 => rig.rotate(-80.0, 120.0),
                _ => rig.zoom(-15.0),
            }
            assert_in_bounds(&rig);
        }
    }

    #[test]
    fn showcase_mode_ignores_all_gestures() {
        let mut rig = CameraRig::new(CameraConfig::showcase()).unwrap();
        let before = rig.eye();
        rig.rotate(100.0, 50.0);
        rig.zoom(5.0);
        rig.pan(30.0, 30.0);
        assert!((rig.eye() - before).length() < 1e-6);
    }

    #[test]
    fn inverted_distance_bounds_fail_fast() {
        let config = CameraConfig {
            distance_bounds: (4.0, 2.0),
            ..Default::default()
        };
        assert!(matches!(
            CameraRig::new(config),
            Err(ConfigError::DistanceBounds { .. })
        ));
    }

    #[test]
    fn inverted_polar_bounds_fail_fast() {
        let config = CameraConfig {
            polar_bounds: (2.0, 1.0),
            ..Default::default()
        };
        assert!(CameraRig::new(config).is_err());
    }

    #[test]
    fn eye_matches_spherical_parameters() {
        let rig = rig();
        let eye = rig.eye();
        assert!(((eye - rig.target()).length() - rig.distance()).abs() < 1e-5);
    }
}
