use std::sync::Arc;

use bevy_ecs::resource::Resource;
use vitrine_core::{App, Plugin, PointerInput, Stage, Viewport, input::decay_pointer_input, time::Time};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::Window,
};

/// The OS window. Window is Send + Sync in winit 0.30, so an Arc in a
/// plain resource is enough; the renderer clones it for the surface.
#[derive(Resource, Clone)]
pub struct MainWindow(pub Arc<Window>);

pub struct WindowPlugin;

impl Plugin for WindowPlugin {
    fn build(&self, app: &mut App) {
        // Per-frame pointer accumulators reset after everything that
        // wanted them has run.
        app.add_system_to_stage(Stage::PostUpdate, decay_pointer_input);
    }
}

// The state machine that holds the App while waiting for the OS.
struct VitrineRunner {
    app: App,
    initialized: bool,
}

impl VitrineRunner {
    pub fn new(app: App) -> Self {
        Self {
            app,
            initialized: false,
        }
    }
}

impl ApplicationHandler for VitrineRunner {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title("Vitrine"))
                .expect("failed to create window"),
        );

        let size = window.inner_size();
        if let Some(mut viewport) = self.app.world.get_resource_mut::<Viewport>() {
            viewport.width = size.width;
            viewport.height = size.height;
        }
        self.app.world.insert_resource(MainWindow(window));

        if !self.initialized {
            self.app.startup();
            self.initialized = true;
        }
    }

    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = self.app.world.get_resource::<MainWindow>() {
            window.0.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested; shutting down");
                // Cancels in-flight loads and deregisters before the
                // world unwinds.
                self.app.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(mut viewport) = self.app.world.get_resource_mut::<Viewport>() {
                    viewport.width = size.width;
                    viewport.height = size.height;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let mut pointer = self.app.world.resource_mut::<PointerInput>();
                pointer.cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let mut pointer = self.app.world.resource_mut::<PointerInput>();
                pointer.primary_down = state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 60.0,
                };
                let mut pointer = self.app.world.resource_mut::<PointerInput>();
                pointer.scrolled(lines);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                let mut pointer = self.app.world.resource_mut::<PointerInput>();
                pointer.shift = modifiers.state().shift_key();
            }
            WindowEvent::RedrawRequested => {
                // 1. Tick the clock
                if let Some(mut time) = self.app.world.get_resource_mut::<Time>() {
                    time.update();
                }

                // 2. Run the systems
                self.app.update();

                // 3. Request the next frame
                if let Some(window) = self.app.world.get_resource::<MainWindow>() {
                    window.0.request_redraw();
                }
            }
            _ => (),
        }
    }
}

pub fn run_vitrine_app(app: App) {
    let event_loop = EventLoop::new().expect("failed to create event loop");

    // ControlFlow::Poll keeps the loop spinning at display cadence;
    // RedrawRequested drives the actual ticks.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = VitrineRunner::new(app);
    event_loop
        .run_app(&mut runner)
        .expect("event loop terminated abnormally");
}
