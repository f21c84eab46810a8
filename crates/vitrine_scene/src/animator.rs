use bevy_ecs::prelude::*;
use vitrine_core::color::hsl_to_rgb;
use vitrine_core::time::Time;

use crate::material::{MaterialArena, MaterialId, WaveTag};

/// Keyboard lattice shape.
pub const GRID_ROWS: u32 = 10;
pub const GRID_COLS: u32 = 30;
/// Geometric center of the grid; not itself a key.
pub const CENTER_ROW: f32 = 5.0;
pub const CENTER_COL: f32 = 15.0;
/// Lattice distance to phase offset.
pub const LATTICE_SCALE: f32 = 0.2;
/// Phase step between enumerated strips.
pub const STRIP_STEP: f32 = 0.5;
/// Wave speed in radians per millisecond of wall clock.
pub const WAVE_SPEED: f64 = 0.0008;

/// The registration list: every animated material, captured once at
/// scene-build time. The per-tick pass walks this flat list; it never
/// rediscovers animated materials by traversing the scene tree.
#[derive(Resource, Default)]
pub struct AnimatedSet {
    entries: Vec<(MaterialId, WaveTag)>,
}

impl AnimatedSet {
    pub fn register(&mut self, id: MaterialId, tag: WaveTag) {
        self.entries.push((id, tag));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(MaterialId, WaveTag)> {
        self.entries.iter()
    }

    /// Teardown hook; after this the animator touches nothing.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Phase offset for a tag, in radians. Pure, allocation-free.
pub fn phase_offset(tag: WaveTag) -> f32 {
    match tag {
        WaveTag::Lattice { row, col } => {
            let dc = col as f32 - CENTER_COL;
            let dr = row as f32 - CENTER_ROW;
            (dc * dc + dr * dr).sqrt() * LATTICE_SCALE
        }
        WaveTag::Strip { index } => index as f32 * STRIP_STEP,
    }
}

/// The traveling rainbow: color = f(t, tag) and nothing else. No
/// accumulator, so a skipped frame can never desynchronize the wave.
pub fn wave_color(tag: WaveTag, t_millis: f64) -> [f32; 3] {
    let phase = phase_offset(tag) as f64 + t_millis * WAVE_SPEED;
    let wave = phase.sin() * 0.5 + 0.5;
    hsl_to_rgb(wave as f32, 1.0, 0.5)
}

/// Once per tick: recompute every registered material's color from the
/// current clock reading. O(registered), no allocation.
pub fn animate_materials(
    time: Res<Time>,
    animated: Res<AnimatedSet>,
    mut materials: ResMut<MaterialArena>,
) {
    let t = time.elapsed_millis();
    for (id, tag) in animated.iter() {
        let color = wave_color(*tag, t);
        let material = materials.get_mut(*id);
        material.base_color = color;
        if matches!(tag, WaveTag::Strip { .. }) {
            material.emissive = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD_MS: f64 = std::f64::consts::TAU / WAVE_SPEED;

    #[test]
    fn colors_stay_valid_across_the_whole_lattice() {
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                for t in [0.0, 123.456, 9_999_999.0] {
                    let rgb = wave_color(WaveTag::Lattice { row, col }, t);
                    for c in rgb {
                        assert!((0.0..=1.0).contains(&c), "({row},{col}) t={t}: {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn wave_is_periodic() {
        let tag = WaveTag::Lattice { row: 2, col: 7 };
        for t in [0.0, 431.7, 100_000.0] {
            let a = wave_color(tag, t);
            let b = wave_color(tag, t + PERIOD_MS);
            for (x, y) in a.iter().zip(b.iter()) {
                assert!((x - y).abs() < 1e-3, "t={t}: {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn output_is_deterministic_for_fixed_inputs() {
        let tag = WaveTag::Strip { index: 1 };
        assert_eq!(wave_color(tag, 5_000.0), wave_color(tag, 5_000.0));
    }

    #[test]
    fn lattice_center_leads_the_wave() {
        // The center key has zero offset; at t=0 its hue is exactly
        // sin(0)*0.5+0.5 = 0.5 (cyan). A corner key is phase-shifted.
        let center = wave_color(WaveTag::Lattice { row: 5, col: 15 }, 0.0);
        let expected = hsl_to_rgb(0.5, 1.0, 0.5);
        for (a, b) in center.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-6);
        }

        let corner = wave_color(WaveTag::Lattice { row: 0, col: 0 }, 0.0);
        assert_ne!(center, corner);
    }

    #[test]
    fn strip_offsets_step_by_half() {
        assert_eq!(phase_offset(WaveTag::Strip { index: 0 }), 0.0);
        assert_eq!(phase_offset(WaveTag::Strip { index: 1 }), 0.5);
        assert_eq!(phase_offset(WaveTag::Strip { index: 2 }), 1.0);
    }

    #[test]
    fn lattice_offset_matches_euclidean_distance() {
        let tag = WaveTag::Lattice { row: 5, col: 18 };
        assert!((phase_offset(tag) - 3.0 * LATTICE_SCALE).abs() < 1e-6);
    }
}
