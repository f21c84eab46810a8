pub use bevy_ecs::prelude::*;
use bevy_ecs::{schedule::InternedSystemSet, system::ScheduleSystem};
pub use tokio;

pub mod color;
pub mod error;
pub mod input;
pub mod time;
pub mod transform;

pub use error::ConfigError;
pub use input::{PointerInput, Viewport};

use crate::time::Time;

/// Handle to the dedicated IO runtime. Systems that need to spawn an
/// async fetch clone this instead of blocking the frame.
#[derive(Resource, Clone)]
pub struct IoTaskPool(pub tokio::runtime::Handle);

/// The Plugin Trait
/// Every module (Renderer, Assets, Window) must implement this.
pub trait Plugin {
    fn build(&self, app: &mut App);
}

/// The Engine Application
/// Holds the ECS World and orchestrates the loop.
pub struct App {
    pub world: World,
    pub main_schedule: Schedule,
    pub startup_schedule: Schedule,
    pub pre_update_schedule: Schedule,
    pub post_update_schedule: Schedule,
    pub render_schedule: Schedule,
    pub shutdown_schedule: Schedule,
    pub running: bool,
    pub io_runtime: tokio::runtime::Runtime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Startup,
    PreUpdate,
    Update,
    PostUpdate,
    Render,
    Shutdown,
}

impl App {
    pub fn new() -> Self {
        // Dedicated multi-threaded runtime for I/O. Resource fetches run
        // here; the render loop only ever drains their channel.
        let io_runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("vitrine-io")
            .build()
            .expect("failed to build IO runtime");

        let mut world = World::new();
        world.insert_resource(IoTaskPool(io_runtime.handle().clone()));

        world.init_resource::<PointerInput>();
        world.init_resource::<Viewport>();
        world.init_resource::<Time>();

        Self {
            world,
            main_schedule: Schedule::default(),
            startup_schedule: Schedule::default(),
            pre_update_schedule: Schedule::default(),
            post_update_schedule: Schedule::default(),
            render_schedule: Schedule::default(),
            shutdown_schedule: Schedule::default(),
            running: true,
            io_runtime,
        }
    }

    pub fn add_plugin<P: Plugin>(&mut self, plugin: P) -> &mut Self {
        plugin.build(self);
        self
    }

    pub fn add_system<M>(
        &mut self,
        system: impl IntoScheduleConfigs<ScheduleSystem, M>,
    ) -> &mut Self {
        self.main_schedule.add_systems(system);
        self
    }

    pub fn add_startup_system<M>(
        &mut self,
        system: impl IntoScheduleConfigs<ScheduleSystem, M>,
    ) -> &mut Self {
        self.startup_schedule.add_systems(system);
        self
    }

    pub fn add_system_to_stage<M>(
        &mut self,
        stage: Stage,
        system: impl IntoScheduleConfigs<ScheduleSystem, M>,
    ) -> &mut Self {
        match stage {
            Stage::Startup => {
                self.startup_schedule.add_systems(system);
            }
            Stage::PreUpdate => {
                self.pre_update_schedule.add_systems(system);
            }
            Stage::Update => {
                self.main_schedule.add_systems(system);
            }
            Stage::PostUpdate => {
                self.post_update_schedule.add_systems(system);
            }
            Stage::Render => {
                self.render_schedule.add_systems(system);
            }
            Stage::Shutdown => {
                self.shutdown_schedule.add_systems(system);
            }
        }
        self
    }

    pub fn configure_sets<M>(
        &mut self,
        stage: Stage,
        sets: impl IntoScheduleConfigs<InternedSystemSet, M>,
    ) -> &mut Self {
        match stage {
            Stage::Startup => {
                self.startup_schedule.configure_sets(sets);
            }
            Stage::PreUpdate => {
                self.pre_update_schedule.configure_sets(sets);
            }
            Stage::Update => {
                self.main_schedule.configure_sets(sets);
            }
            Stage::PostUpdate => {
                self.post_update_schedule.configure_sets(sets);
            }
            Stage::Render => {
                self.render_schedule.configure_sets(sets);
            }
            Stage::Shutdown => {
                self.shutdown_schedule.configure_sets(sets);
            }
        }
        self
    }

    /// Explicit ticks: there is no run() that takes over the thread.
    /// The windowing layer decides WHEN a frame happens and calls this.
    pub fn update(&mut self) {
        if !self.running {
            return;
        }
        self.pre_update_schedule.run(&mut self.world);
        self.main_schedule.run(&mut self.world);
        self.post_update_schedule.run(&mut self.world);
        self.render_schedule.run(&mut self.world);
    }

    pub fn startup(&mut self) {
        self.startup_schedule.run(&mut self.world);
    }

    /// Runs once when the window closes. Plugins hook cancellation and
    /// deregistration here so nothing writes into a torn-down world.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.shutdown_schedule.run(&mut self.world);
        log::info!("engine stopped");
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
