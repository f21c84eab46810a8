use bevy_ecs::resource::Resource;
use vitrine_assets::{Handle, TextureData};

/// Which wave rule drives an animated material, and where it sits in
/// its lattice. The tag is fixed at scene-build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveTag {
    /// Keyboard key at (row, col) of the 10x30 grid.
    Lattice { row: u32, col: u32 },
    /// Enumerated strip (the mouse RGB side strips); emissive-linked.
    Strip { index: u32 },
}

/// One material slot. Shared by every mesh node that references its
/// id; the animated ones are rewritten each tick by the animator and
/// by nothing else.
#[derive(Debug, Clone)]
pub struct MaterialInstance {
    pub base_color: [f32; 3],
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
    /// Bitmap surface; the renderer keeps a flat placeholder until the
    /// resource behind the handle arrives.
    pub texture: Option<Handle<TextureData>>,
    pub animated: Option<WaveTag>,
}

impl Default for MaterialInstance {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0],
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 0.0,
            metalness: 0.0,
            roughness: 0.5,
            texture: None,
            animated: None,
        }
    }
}

impl MaterialInstance {
    pub fn flat(base_color: [f32; 3]) -> Self {
        Self {
            base_color,
            ..Default::default()
        }
    }

    pub fn standard(base_color: [f32; 3], metalness: f32, roughness: f32) -> Self {
        Self {
            base_color,
            metalness,
            roughness,
            ..Default::default()
        }
    }

    pub fn emissive(color: [f32; 3], intensity: f32) -> Self {
        Self {
            base_color: color,
            emissive: color,
            emissive_intensity: intensity,
            ..Default::default()
        }
    }

    /// Keyboard key slot; color is filled in by the first animator
    /// tick, so the initial value never shows.
    pub fn animated_key(row: u32, col: u32) -> Self {
        Self {
            base_color: [0.0, 0.0, 0.0],
            metalness: 0.3,
            roughness: 0.5,
            animated: Some(WaveTag::Lattice { row, col }),
            ..Default::default()
        }
    }

    /// Mouse strip slot; the animator mirrors base color into the
    /// emissive channel every tick.
    pub fn animated_strip(index: u32) -> Self {
        Self {
            base_color: [0.0, 0.0, 0.0],
            metalness: 0.3,
            roughness: 0.5,
            emissive_intensity: 0.5,
            animated: Some(WaveTag::Strip { index }),
            ..Default::default()
        }
    }

    /// Texture-gated surface: renders `placeholder` flat until the
    /// bitmap behind `texture` arrives (or forever, if it fails).
    pub fn textured(placeholder: [f32; 3], texture: Handle<TextureData>) -> Self {
        Self {
            base_color: placeholder,
            texture: Some(texture),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Arena of material instances, owned by the scene. Ids are stable for
/// the scene's lifetime; nothing is ever removed before teardown.
#[derive(Resource, Default)]
pub struct MaterialArena {
    materials: Vec<MaterialInstance>,
}

impl MaterialArena {
    pub fn add(&mut self, material: MaterialInstance) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn get(&self, id: MaterialId) -> &MaterialInstance {
        &self.materials[id.0]
    }

    pub fn get_mut(&mut self, id: MaterialId) -> &mut MaterialInstance {
        &mut self.materials[id.0]
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &MaterialInstance)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialId(i), m))
    }
}
