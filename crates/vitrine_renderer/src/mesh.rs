use std::mem;

use bytemuck::{Pod, Zeroable};
use vitrine_core::transform::GlobalTransform;

// #[repr(C)] ensures the compiler doesn't reorder fields.
// Pod (Plain Old Data) and Zeroable allow us to cast this struct to raw bytes safely.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshUniform {
    /// Model matrix: local -> world.
    pub model: [[f32; 4]; 4],
    /// Transpose(Inverse(Model)), so normals survive non-uniform scale.
    /// (3x3 would do, but GPUs prefer 4x4 alignment.)
    pub normal_matrix: [[f32; 4]; 4],
}

impl MeshUniform {
    pub fn from_transform(global: &GlobalTransform) -> Self {
        let model_matrix = global.0;
        let normal_matrix = model_matrix.inverse().transpose();

        Self {
            model: model_matrix.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
        }
    }
}

// The GPU-compatible vertex. #[repr(C)] gives the C-like memory layout
// the vertex buffer layout below describes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3, // position
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3, // normal
                },
                wgpu::VertexAttribute {
                    offset: (mem::size_of::<[f32; 3]>() * 2) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2, // uv
                },
            ],
        }
    }
}

/// Uploaded vertex/index buffers for one shared mesh.
pub struct GpuGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

/// Per-node uniform buffer + bind group (group 2 in the pipeline).
pub struct MeshInstance {
    pub bind_group: wgpu::BindGroup,
    pub buffer: wgpu::Buffer,
}

pub fn create_gpu_geometry(
    device: &wgpu::Device,
    data: &vitrine_scene::MeshData,
) -> GpuGeometry {
    use wgpu::util::DeviceExt;

    // Interleave into the GPU vertex layout.
    let vertices: Vec<Vertex> = data
        .vertices
        .iter()
        .map(|v| Vertex {
            position: v.position,
            normal: v.normal,
            uv: v.uv,
        })
        .collect();

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Vertex Buffer"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Index Buffer"),
        contents: bytemuck::cast_slice(&data.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    GpuGeometry {
        vertex_buffer,
        index_buffer,
        index_count: data.indices.len() as u32,
    }
}
