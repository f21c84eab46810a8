use vitrine_scene::MaterialInstance;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuMaterialUniform {
    pub base_color: [f32; 4],
    /// rgb = emissive color, w = intensity.
    pub emissive: [f32; 4],
    /// x = metalness, y = roughness, z = textured flag, w unused.
    pub params: [f32; 4],
}

impl GpuMaterialUniform {
    pub fn from_instance(material: &MaterialInstance, textured: bool) -> Self {
        Self {
            base_color: [
                material.base_color[0],
                material.base_color[1],
                material.base_color[2],
                1.0,
            ],
            emissive: [
                material.emissive[0],
                material.emissive[1],
                material.emissive[2],
                material.emissive_intensity,
            ],
            params: [
                material.metalness,
                material.roughness,
                if textured { 1.0 } else { 0.0 },
                0.0,
            ],
        }
    }
}

/// GPU-side slot for one material instance: its uniform buffer (kept
/// COPY_DST so the animated ones can be rewritten every tick) and the
/// bind group tying it to a texture view.
pub struct GpuMaterialSlot {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    /// Whether the bind group currently points at the real bitmap, as
    /// opposed to the white fallback.
    pub textured: bool,
}
