use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Uniform scale, the common case for the tableau parts.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    pub fn with_scale_xyz(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotates the object around the Y axis (Global Up)
    pub fn rotate_y(&mut self, angle_radians: f32) {
        let rotation = Quat::from_rotation_y(angle_radians);
        self.rotation = self.rotation * rotation;
    }

    // --- Matrices ---

    /// Creates the Model Matrix (Local -> World)
    /// This is what we send to the GPU Uniform Buffer
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    // --- Directions ---

    /// Returns the "Forward" direction (-Z) relative to current rotation
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Returns the "Right" direction (+X) relative to current rotation
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Returns the "Up" direction (+Y) relative to current rotation
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

/// World-space matrix cached on each scene node after propagation.
/// Always parent global * local; never written anywhere else.
#[derive(Debug, Clone, Copy)]
pub struct GlobalTransform(pub Mat4);

impl Default for GlobalTransform {
    fn default() -> Self {
        Self(Mat4::IDENTITY)
    }
}

impl GlobalTransform {
    pub fn translation(&self) -> Vec3 {
        self.0.w_axis.truncate()
    }

    /// Transforms a local-space point into world space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.0.transform_point3(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_composes_scale_rotation_translation() {
        let t = Transform::from_xyz(1.0, 2.0, 3.0).with_scale(2.0);
        let m = t.compute_matrix();
        // Origin maps to the translation; a unit X offset is scaled.
        assert!((m.transform_point3(Vec3::ZERO) - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
        assert!((m.transform_point3(Vec3::X) - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn forward_is_negative_z() {
        let t = Transform::default();
        assert!((t.forward() - -Vec3::Z).length() < 1e-6);
        let mut turned = Transform::default();
        turned.rotate_y(std::f32::consts::PI);
        assert!((turned.forward() - Vec3::Z).length() < 1e-5);
    }
}
