use vitrine_core::{App, IntoScheduleConfigs, Plugin, Stage};

pub mod orbit;
pub mod picking;
pub mod reporter;

pub use orbit::{CameraConfig, CameraRig, ControlFlags, drive_camera};
pub use picking::{Aabb, HitRegions, Ray, screen_ray, update_hover};
pub use reporter::InteractionState;

/// Wires the camera rig and the hover pipeline into the app. The
/// camera configuration comes from the deployment (interactive or
/// showcase); an out-of-range configuration is a deployment defect and
/// aborts startup.
pub struct InteractionPlugin {
    pub camera: CameraConfig,
}

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        let rig = CameraRig::new(self.camera.clone()).expect("camera configuration rejected");

        app.world.insert_resource(rig);
        app.world.init_resource::<InteractionState>();
        app.world.init_resource::<HitRegions>();

        // The rig consumes this frame's gestures before the hover ray
        // is cast from the updated eye.
        app.add_system((drive_camera, update_hover).chain());
        app.add_system_to_stage(Stage::Shutdown, clear_hover_state);
    }
}

/// On teardown the regions go away and the exported label returns to
/// idle, so late readers see a coherent "nothing hovered" state.
fn clear_hover_state(
    mut regions: bevy_ecs::prelude::ResMut<HitRegions>,
    mut state: bevy_ecs::prelude::ResMut<InteractionState>,
) {
    regions.clear();
    if let Some(active) = state.active().map(str::to_owned) {
        state.leave(&active);
    }
    log::debug!("hover regions deregistered");
}
