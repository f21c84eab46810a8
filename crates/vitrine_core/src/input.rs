use bevy_ecs::prelude::*;

/// Pointer state for the current frame, written by the windowing layer
/// and read by the camera rig and the hover picker. Deltas accumulate
/// within a frame and are zeroed after the frame is rendered, so event
/// bursts between two redraws are not lost.
#[derive(Resource, Default, Debug)]
pub struct PointerInput {
    /// Cursor position in physical window pixels; None until the cursor
    /// first enters the window.
    pub position: Option<(f32, f32)>,
    /// Accumulated drag delta since last frame, in pixels.
    pub delta: (f32, f32),
    /// Accumulated scroll since last frame, in line units.
    pub scroll: f32,
    pub primary_down: bool,
    /// Shift modifier; shift-drag pans instead of rotating.
    pub shift: bool,
}

impl PointerInput {
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        if let Some((px, py)) = self.position {
            if self.primary_down {
                self.delta.0 += x - px;
                self.delta.1 += y - py;
            }
        }
        self.position = Some((x, y));
    }

    pub fn scrolled(&mut self, lines: f32) {
        self.scroll += lines;
    }
}

/// Runs at the end of every frame; per-frame accumulators reset here so
/// the next frame starts clean.
pub fn decay_pointer_input(mut pointer: ResMut<PointerInput>) {
    pointer.delta = (0.0, 0.0);
    pointer.scroll = 0.0;
}

/// Current drawable size in physical pixels; written on resize by the
/// windowing layer, read by picking and the projection.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_delta_accumulates_only_while_pressed() {
        let mut p = PointerInput::default();
        p.cursor_moved(10.0, 10.0);
        p.cursor_moved(20.0, 15.0);
        assert_eq!(p.delta, (0.0, 0.0));

        p.primary_down = true;
        p.cursor_moved(25.0, 18.0);
        p.cursor_moved(30.0, 20.0);
        assert_eq!(p.delta, (10.0, 5.0));
    }
}
