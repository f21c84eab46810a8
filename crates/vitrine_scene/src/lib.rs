use bevy_ecs::prelude::*;
use vitrine_core::{App, Plugin, Stage};

pub mod animator;
pub mod builder;
pub mod config;
pub mod geometry;
pub mod graph;
pub mod material;
pub mod parts;
pub mod spline;

pub use animator::{AnimatedSet, animate_materials, wave_color};
pub use builder::{BuiltScene, build_tableau};
pub use config::{PartPlacement, PartScale, PlacementTable};
pub use geometry::{GeometryHandle, GeometryStore, MeshData, Vertex};
pub use graph::{NodeId, SceneGraph, SceneNode};
pub use material::{MaterialArena, MaterialId, MaterialInstance, WaveTag};

use vitrine_assets::ResourceTable;
use vitrine_interaction::{Aabb, HitRegions};

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        // The binary may have inserted a custom PlacementTable already;
        // init keeps it if so.
        app.world.init_resource::<PlacementTable>();
        app.world.init_resource::<SceneGraph>();
        app.world.init_resource::<GeometryStore>();
        app.world.init_resource::<MaterialArena>();
        app.world.init_resource::<AnimatedSet>();

        // Resource handles must exist before materials can reference
        // them, hence the ordering on the manifest spawn.
        app.add_startup_system(build_scene.after(vitrine_assets::spawn_manifest_fetches));
        app.add_system(animate_materials);
        app.add_system_to_stage(Stage::Shutdown, deregister_animated);
    }
}

/// Startup: validate the table, assemble the tableau, register hover
/// regions from the resolved world bounds.
fn build_scene(
    table: Res<PlacementTable>,
    resources: Res<ResourceTable>,
    mut graph: ResMut<SceneGraph>,
    mut geometries: ResMut<GeometryStore>,
    mut materials: ResMut<MaterialArena>,
    mut animated: ResMut<AnimatedSet>,
    mut regions: ResMut<HitRegions>,
) {
    table.validate().expect("placement table rejected");

    let built = {
        let mut assembler = parts::SceneAssembler {
            graph: &mut *graph,
            geometries: &mut *geometries,
            materials: &mut *materials,
            animated: &mut *animated,
        };
        build_tableau(&mut assembler, &table, &resources)
    };

    for (name, (min, max)) in &built.hover_bounds {
        regions.register(name, Aabb::new(*min, *max));
    }

    log::info!(
        "tableau built: {} nodes, {} materials ({} animated), {} hover regions",
        graph.len(),
        materials.len(),
        animated.len(),
        regions.len()
    );
}

/// Teardown: empty the registration list so the animator has nothing
/// left to write into.
fn deregister_animated(mut animated: ResMut<AnimatedSet>) {
    animated.clear();
}
