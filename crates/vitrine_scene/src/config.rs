use bevy_ecs::resource::Resource;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use vitrine_core::ConfigError;
use vitrine_core::transform::Transform;

/// Uniform or per-axis scale, matching what the deployment table can
/// express per part.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartScale {
    Uniform(f32),
    PerAxis([f32; 3]),
}

impl PartScale {
    fn as_vec3(self) -> Vec3 {
        match self {
            PartScale::Uniform(s) => Vec3::splat(s),
            PartScale::PerAxis(v) => Vec3::from(v),
        }
    }

    fn is_positive(self) -> bool {
        let v = self.as_vec3();
        v.x > 0.0 && v.y > 0.0 && v.z > 0.0 && v.is_finite()
    }
}

/// Placement of one named part: where it sits inside the tableau
/// group, and its external scale. Rotation is XYZ Euler, radians.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PartPlacement {
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    pub scale: PartScale,
}

impl PartPlacement {
    pub fn at(x: f32, y: f32, z: f32, scale: f32) -> Self {
        Self {
            position: [x, y, z],
            rotation: [0.0, 0.0, 0.0],
            scale: PartScale::Uniform(scale),
        }
    }

    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = [x, y, z];
        self
    }

    pub fn transform(&self) -> Transform {
        Transform {
            translation: Vec3::from(self.position),
            rotation: Quat::from_euler(
                glam::EulerRot::XYZ,
                self.rotation[0],
                self.rotation[1],
                self.rotation[2],
            ),
            scale: self.scale.as_vec3(),
        }
    }

    fn validate(&self, part: &str) -> Result<(), ConfigError> {
        if !self.position.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Placement {
                part: part.to_owned(),
                reason: "position is not finite".to_owned(),
            });
        }
        if !self.scale.is_positive() {
            return Err(ConfigError::Placement {
                part: part.to_owned(),
                reason: "scale must be positive and finite".to_owned(),
            });
        }
        Ok(())
    }
}

/// Per-part placement for the whole tableau. Deployment configuration:
/// the builder reads it, nothing mutates it afterwards.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct PlacementTable {
    /// The group holding every part; the original frames the desk by
    /// pushing the group back and spinning it half a turn.
    pub group: PartPlacement,
    pub desk: PartPlacement,
    pub monitor: PartPlacement,
    pub tower: PartPlacement,
    pub keyboard: PartPlacement,
    pub mouse: PartPlacement,
    pub speakers: PartPlacement,
    pub poster: PartPlacement,
    pub label_name: PartPlacement,
    pub label_title: PartPlacement,
    pub hotspots: Vec<PartPlacement>,
}

impl Default for PlacementTable {
    fn default() -> Self {
        Self {
            group: PartPlacement::at(0.0, 0.0, 1.0, 1.0).rotated(0.0, std::f32::consts::PI, 0.0),
            desk: PartPlacement::at(0.0, -1.0, 0.0, 1.0),
            monitor: PartPlacement::at(0.0, -0.9, -1.8, 0.5),
            tower: PartPlacement::at(2.5, 0.05, -1.5, 0.5),
            keyboard: PartPlacement::at(0.0, -0.9, -0.8, 0.5),
            mouse: PartPlacement::at(1.5, -0.9, -0.8, 0.2),
            speakers: PartPlacement::at(-2.4, -0.4, -1.6, 0.5),
            poster: PartPlacement::at(-2.6, 0.8, -2.6, 1.0),
            label_name: PartPlacement::at(0.0, 1.7, -2.7, 1.0),
            label_title: PartPlacement::at(0.0, 1.25, -2.7, 1.0),
            hotspots: vec![
                PartPlacement::at(1.7, 1.1, -2.6, 1.0),
                PartPlacement::at(2.2, 1.1, -2.6, 1.0),
                PartPlacement::at(2.7, 1.1, -2.6, 1.0),
            ],
        }
    }
}

impl PlacementTable {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.group.validate("group")?;
        self.desk.validate("desk")?;
        self.monitor.validate("monitor")?;
        self.tower.validate("tower")?;
        self.keyboard.validate("keyboard")?;
        self.mouse.validate("mouse")?;
        self.speakers.validate("speakers")?;
        self.poster.validate("poster")?;
        self.label_name.validate("label_name")?;
        self.label_title.validate("label_title")?;
        for (i, spot) in self.hotspots.iter().enumerate() {
            spot.validate(&format!("hotspot[{i}]"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        assert!(PlacementTable::default().validate().is_ok());
    }

    #[test]
    fn zero_scale_is_rejected() {
        let mut table = PlacementTable::default();
        table.mouse.scale = PartScale::Uniform(0.0);
        assert!(table.validate().is_err());
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let mut table = PlacementTable::default();
        table.tower.position[1] = f32::NAN;
        assert!(table.validate().is_err());
    }

    #[test]
    fn per_axis_scale_builds_the_expected_transform() {
        let p = PartPlacement {
            position: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.0, 0.0],
            scale: PartScale::PerAxis([1.0, 2.0, 3.0]),
        };
        let t = p.transform();
        assert_eq!(t.scale, Vec3::new(1.0, 2.0, 3.0));
    }
}
