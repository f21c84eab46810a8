use bevy_ecs::prelude::*;
use glam::Vec3;
use vitrine_core::{PointerInput, Viewport};

use crate::orbit::CameraRig;
use crate::reporter::InteractionState;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// World-space axis-aligned box around one hoverable part.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Slab test; returns the entry distance along the ray, or None.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;
        let t_near = t0.min(t1);
        let t_far = t0.max(t1);

        let enter = t_near.max_element();
        let exit = t_far.min_element();
        if enter <= exit && exit >= 0.0 {
            Some(enter.max(0.0))
        } else {
            None
        }
    }
}

/// Named hover regions, registered once by the scene builder after it
/// knows the world-space bounds of each hoverable part.
#[derive(Resource, Default)]
pub struct HitRegions {
    regions: Vec<(String, Aabb)>,
}

impl HitRegions {
    pub fn register(&mut self, name: &str, aabb: Aabb) {
        self.regions.push((name.to_owned(), aabb));
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Aabb)> {
        self.regions.iter()
    }

    /// Teardown hook; with no regions, hover simply never activates.
    pub fn clear(&mut self) {
        self.regions.clear();
    }
}

/// Ray from the camera through a window pixel.
pub fn screen_ray(rig: &CameraRig, viewport: &Viewport, px: f32, py: f32) -> Ray {
    let ndc_x = 2.0 * px / viewport.width.max(1) as f32 - 1.0;
    let ndc_y = 1.0 - 2.0 * py / viewport.height.max(1) as f32;

    let inverse_vp =
        (rig.projection_matrix(viewport.aspect()) * rig.view_matrix()).inverse();
    let near = inverse_vp.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
    let far = inverse_vp.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

    Ray {
        origin: near,
        direction: (far - near).normalize_or_zero(),
    }
}

/// Per-tick hover pass: cast the cursor ray, find the nearest region,
/// and feed the reporter. Events are synthesized in a fixed order —
/// leave before enter — so delivery order is never ambiguous.
pub fn update_hover(
    pointer: Res<PointerInput>,
    viewport: Res<Viewport>,
    rig: Res<CameraRig>,
    regions: Res<HitRegions>,
    mut state: ResMut<InteractionState>,
) {
    let Some((px, py)) = pointer.position else {
        return;
    };
    let ray = screen_ray(&rig, &viewport, px, py);

    let mut nearest: Option<(f32, &str)> = None;
    for (name, aabb) in regions.iter() {
        if let Some(t) = aabb.intersect(&ray) {
            if nearest.is_none_or(|(best, _)| t < best) {
                nearest = Some((t, name.as_str()));
            }
        }
    }

    let target = nearest.map(|(_, name)| name);
    if state.active() == target {
        return;
    }
    if let Some(old) = state.active().map(str::to_owned) {
        state.leave(&old);
    }
    if let Some(new) = target {
        state.enter(new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_a_box_in_front() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, 4.0), Vec3::new(1.0, 1.0, 6.0));
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        };
        let t = aabb.intersect(&ray).unwrap();
        assert!((t - 4.0).abs() < 1e-6);
    }

    #[test]
    fn ray_misses_a_box_behind() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -6.0), Vec3::new(1.0, 1.0, -4.0));
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        };
        assert!(aabb.intersect(&ray).is_none());
    }

    #[test]
    fn origin_inside_reports_zero_distance() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::X,
        };
        assert_eq!(aabb.intersect(&ray), Some(0.0));
    }

    #[test]
    fn axis_parallel_ray_outside_slab_misses() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, 4.0), Vec3::new(1.0, 1.0, 6.0));
        let ray = Ray {
            origin: Vec3::new(5.0, 0.0, 0.0),
            direction: Vec3::Z,
        };
        assert!(aabb.intersect(&ray).is_none());
    }
}
