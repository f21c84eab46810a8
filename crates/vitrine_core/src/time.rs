use std::time::{Duration, Instant};

use bevy_ecs::resource::Resource;

/// Monotonic clock for the render loop. The animator reads elapsed
/// wall-clock milliseconds; it is never reset and never persisted.
#[derive(Resource)]
pub struct Time {
    startup: Instant,
    last_update: Instant,
    delta: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            startup: Instant::now(),
            last_update: Instant::now(),
            delta: Duration::ZERO,
        }
    }
}

impl Time {
    /// Called by the engine loop once per frame
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_update;
        self.last_update = now;
    }

    /// Returns time in seconds since last frame (e.g., 0.016 for 60fps)
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Returns total time since app started
    pub fn elapsed_seconds(&self) -> f32 {
        self.startup.elapsed().as_secs_f32()
    }

    /// Total milliseconds since app start. The color wave is phased in
    /// milliseconds, so this is f64 to stay precise over long sessions.
    pub fn elapsed_millis(&self) -> f64 {
        self.startup.elapsed().as_secs_f64() * 1000.0
    }
}
