use bevy_ecs::prelude::*;
use std::collections::HashMap;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use uuid::Uuid;
use vitrine_core::{App, IoTaskPool, Plugin, Stage};

pub mod assets;
pub mod loader;
pub mod progress;
pub mod texture;

pub use assets::{Assets, Handle};
pub use loader::{ResourceDescriptor, ResourceKind, ResourceLoader, ResourceWorkerMessage};
pub use progress::LoadProgress;
pub use texture::{TextureData, TextureFormat};

/// The deployment's resource list, inserted by the binary before
/// startup. Consumed once by `spawn_manifest_fetches`.
#[derive(Resource, Default)]
pub struct ResourceManifest(pub Vec<ResourceDescriptor>);

/// key -> handle, filled at startup so the scene builder can wire
/// materials to resources that are still in flight.
#[derive(Resource, Default)]
pub struct ResourceTable {
    by_key: HashMap<String, Handle<TextureData>>,
}

impl ResourceTable {
    pub fn get(&self, key: &str) -> Option<Handle<TextureData>> {
        self.by_key.get(key).cloned()
    }
}

/// Frame-facing notification that a resource settled. The renderer
/// reads these to upload textures / refresh material bindings.
#[derive(Message, Debug, Clone, Copy)]
pub enum ResourceEvent {
    TextureLoaded { id: Uuid },
    LoadFailed { id: Uuid },
}

// Internal wrapper to hold the receiver
#[derive(Resource)]
struct ResourceReceiver(UnboundedReceiver<ResourceWorkerMessage>);

pub struct ResourcePlugin;

impl Plugin for ResourcePlugin {
    fn build(&self, app: &mut App) {
        let io_handle = app.world.resource::<IoTaskPool>().0.clone();

        // Internal communication channel: IO workers -> render loop.
        let (tx, rx) = unbounded_channel::<ResourceWorkerMessage>();

        app.world
            .insert_resource(ResourceLoader::new(tx, io_handle));
        app.world.insert_resource(ResourceReceiver(rx));
        // Keeps a manifest the binary inserted; empty otherwise.
        app.world.init_resource::<ResourceManifest>();
        app.world.init_resource::<Assets<TextureData>>();
        app.world.init_resource::<ResourceTable>();
        app.world.init_resource::<LoadProgress>();
        app.world.init_resource::<Messages<ResourceEvent>>();

        app.add_startup_system(spawn_manifest_fetches);
        app.add_system_to_stage(
            Stage::PreUpdate,
            (update_resource_messages, flush_resource_messages).chain(),
        );
        app.add_system_to_stage(Stage::Shutdown, cancel_pending_loads);
    }
}

/// Kicks off one fetch per manifest entry. Handles land in the
/// ResourceTable before the scene builder runs; the scene plugin
/// orders its build after this system.
pub fn spawn_manifest_fetches(
    manifest: Res<ResourceManifest>,
    mut loader: ResMut<ResourceLoader>,
    mut table: ResMut<ResourceTable>,
    mut progress: ResMut<LoadProgress>,
) {
    for descriptor in &manifest.0 {
        progress.register();
        let handle = loader.fetch_bitmap(descriptor);
        table.by_key.insert(descriptor.key.clone(), handle);
    }
    log::info!("requested {} resources", progress.total());
}

/// Double-buffered message maintenance; must run before this frame's
/// messages are written.
fn update_resource_messages(mut messages: ResMut<Messages<ResourceEvent>>) {
    messages.update();
}

/// Drains the worker channel on the render thread. Completions are
/// applied to the store and surfaced as messages; a failure is logged
/// exactly once and permanently pins the progress gate below 100%.
fn flush_resource_messages(
    mut receiver: ResMut<ResourceReceiver>,
    mut textures: ResMut<Assets<TextureData>>,
    mut progress: ResMut<LoadProgress>,
    mut events: MessageWriter<ResourceEvent>,
) {
    while let Ok(message) = receiver.0.try_recv() {
        match message {
            ResourceWorkerMessage::TextureLoaded { id, key, data } => {
                log::info!("resource `{key}` ready ({}x{})", data.width, data.height);
                textures.insert(id, data);
                progress.complete();
                events.write(ResourceEvent::TextureLoaded { id });
            }
            ResourceWorkerMessage::LoadFailed { id, key, error } => {
                log::warn!("resource `{key}` failed: {error}; its surface keeps the placeholder");
                progress.fail();
                events.write(ResourceEvent::LoadFailed { id });
            }
        }
    }
}

fn cancel_pending_loads(mut loader: ResMut<ResourceLoader>) {
    loader.cancel_pending();
}
