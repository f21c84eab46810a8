use std::collections::HashMap;

use bevy_ecs::prelude::*;
use uuid::Uuid;
use vitrine_assets::{Assets, Handle, LoadProgress, ResourceEvent, TextureData};
use vitrine_core::{App, Plugin, Stage, Viewport};
use vitrine_interaction::CameraRig;
use vitrine_scene::{AnimatedSet, GeometryStore, MaterialArena, SceneGraph};
use vitrine_window::MainWindow;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration, util::DeviceExt};

pub mod material;
pub mod mesh;
mod overlay;
pub mod texture;

use material::{GpuMaterialSlot, GpuMaterialUniform};
use mesh::{GpuGeometry, MeshInstance, MeshUniform, Vertex, create_gpu_geometry};
use overlay::OverlayPipeline;
use texture::{GpuTexture, TextureHelper};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum RenderSet {
    Start,   // Acquire swapchain image
    Scene,   // Draw the 3D tableau
    Overlay, // Loading readout while resources settle
    End,     // Present to screen
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

// The Resource that holds our GPU connection
#[derive(Resource)]
pub struct RenderContext {
    pub device: Device,
    pub queue: Queue,
    pub surface: Surface<'static>,
    pub config: SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub depth_texture: wgpu::TextureView,

    // Caches keyed by the scene's arena indices.
    geometry_buffers: HashMap<usize, GpuGeometry>,
    node_uniforms: HashMap<usize, MeshInstance>,
    material_slots: HashMap<usize, GpuMaterialSlot>,
    texture_cache: HashMap<Uuid, GpuTexture>,

    default_diffuse: GpuTexture,

    camera_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    mesh_layout: wgpu::BindGroupLayout,

    overlay: OverlayPipeline,
}

#[derive(Resource, Default)]
pub struct RenderTarget {
    pub view: Option<wgpu::TextureView>,
    pub texture: Option<wgpu::SurfaceTexture>,
}

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Stage::Render,
            (
                RenderSet::Start,
                RenderSet::Scene,
                RenderSet::Overlay,
                RenderSet::End,
            )
                .chain(),
        );

        app.world.init_resource::<RenderTarget>();

        // Connect to the GPU once the window exists.
        app.add_startup_system(init_wgpu);

        // GPU mirrors of scene data; after the animator has written
        // this frame's colors.
        app.add_system_to_stage(
            Stage::PostUpdate,
            (prepare_scene_gpu, sync_animated_materials).chain(),
        );

        app.add_system_to_stage(Stage::Render, start_frame.in_set(RenderSet::Start));
        app.add_system_to_stage(Stage::Render, render_scene.in_set(RenderSet::Scene));
        app.add_system_to_stage(Stage::Render, render_overlay.in_set(RenderSet::Overlay));
        app.add_system_to_stage(Stage::Render, end_frame.in_set(RenderSet::End));
    }
}

// --- SYSTEM 1: INITIALIZATION ---
fn init_wgpu(world: &mut World) {
    let window = world
        .get_resource::<MainWindow>()
        .expect("window not found; add WindowPlugin before RenderPlugin")
        .0
        .clone();

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

    let surface = instance
        .create_surface(window.clone())
        .expect("failed to create surface");

    // We use 'pollster' to block on the async adapter request; this is
    // startup, the frame loop has not begun.
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
    }))
    .expect("no compatible GPU found");

    let (device, queue) =
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
            .expect("failed to open device");

    let size = window.inner_size();
    let caps = surface.get_capabilities(&adapter);
    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: caps.formats[0],
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::Fifo, // VSync on: the display drives the tick
        desired_maximum_frame_latency: 2,
        alpha_mode: caps.alpha_modes[0],
        view_formats: vec![],
    };
    surface.configure(&device, &config);

    let shader = device.create_shader_module(wgpu::include_wgsl!("shader.wgsl"));
    let depth_texture = TextureHelper::create_depth_texture(&device, &config, "Depth Texture");

    let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Global Bind Group Layout"),
        entries: &[
            // --- BINDING 0: Camera ---
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    });

    let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Material Bind Group Layout"),
        entries: &[
            // --- BINDING 0: Material settings ---
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            // --- BINDING 1: Diffuse texture ---
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            // --- BINDING 2: Sampler ---
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });

    let mesh_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Mesh Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Render Pipeline Layout"),
        bind_group_layouts: &[&global_layout, &material_layout, &mesh_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Render Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::desc()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: config.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        depth_stencil: Some(wgpu::DepthStencilState {
            format: TextureHelper::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    });

    // 1x1 white pixel: the universal fallback so untextured and
    // not-yet-textured materials share the pipeline.
    let default_diffuse = GpuTexture::from_image(
        &device,
        &queue,
        &TextureData::solid("default-white", [255, 255, 255, 255]),
        Some("Default White Texture"),
    );

    let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Camera Buffer"),
        contents: bytemuck::cast_slice(&[CameraUniform {
            view_proj: [[0.0; 4]; 4],
        }]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Global Bind Group"),
        layout: &global_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: camera_buffer.as_entire_binding(),
        }],
    });

    let overlay = OverlayPipeline::new(&device, config.format);

    log::info!("renderer ready: {:?} surface", config.format);

    world.insert_resource(RenderContext {
        device,
        queue,
        surface,
        config,
        pipeline,
        depth_texture,
        geometry_buffers: HashMap::new(),
        node_uniforms: HashMap::new(),
        material_slots: HashMap::new(),
        texture_cache: HashMap::new(),
        default_diffuse,
        camera_buffer,
        global_bind_group,
        material_layout,
        mesh_layout,
        overlay,
    });
}

/// Builds a material's uniform buffer and bind group against either
/// its uploaded bitmap or the white fallback.
fn create_material_slot(
    device: &Device,
    layout: &wgpu::BindGroupLayout,
    material: &vitrine_scene::MaterialInstance,
    texture: Option<&GpuTexture>,
    fallback: &GpuTexture,
) -> GpuMaterialSlot {
    let textured = texture.is_some();
    let bound = texture.unwrap_or(fallback);

    let uniform = GpuMaterialUniform::from_instance(material, textured);
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Material Uniforms"),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Material Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&bound.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&bound.sampler),
            },
        ],
    });

    GpuMaterialSlot {
        buffer,
        bind_group,
        textured,
    }
}

/// Mirrors scene data into GPU caches: geometry and per-node uniforms
/// once, textures as their bitmaps arrive, material slots whenever
/// their binding situation changes. Steady-state this is a no-op scan.
fn prepare_scene_gpu(
    mut context: ResMut<RenderContext>,
    viewport: Res<Viewport>,
    graph: Res<SceneGraph>,
    geometries: Res<GeometryStore>,
    materials: Res<MaterialArena>,
    textures: Res<Assets<TextureData>>,
    mut events: MessageReader<ResourceEvent>,
) {
    let context = &mut *context;

    // Surface follows the window size.
    if context.config.width != viewport.width.max(1)
        || context.config.height != viewport.height.max(1)
    {
        context.config.width = viewport.width.max(1);
        context.config.height = viewport.height.max(1);
        context.surface.configure(&context.device, &context.config);
        context.depth_texture =
            TextureHelper::create_depth_texture(&context.device, &context.config, "Depth Texture");
    }

    // Newly arrived bitmaps -> GPU.
    for event in events.read() {
        if let ResourceEvent::TextureLoaded { id } = event {
            if let Some(data) = textures.get(&Handle::from_id(*id)) {
                log::debug!("uploading texture `{}`", data.name);
                let gpu = GpuTexture::from_image(&context.device, &context.queue, data, None);
                context.texture_cache.insert(*id, gpu);
            }
        }
    }

    // Shared geometry, uploaded once.
    for index in 0..geometries.len() {
        context.geometry_buffers.entry(index).or_insert_with(|| {
            create_gpu_geometry(
                &context.device,
                geometries.get(vitrine_scene::GeometryHandle(index)),
            )
        });
    }

    // Per-node model uniforms. The tableau is static after build, so
    // each buffer is written exactly once, at creation.
    graph.visit(graph.root(), &mut |id, node| {
        if node.geometry.is_none() || context.node_uniforms.contains_key(&id.0) {
            return;
        }
        let uniform = MeshUniform::from_transform(&node.global);
        let buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Uniform Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Mesh Bind Group"),
                layout: &context.mesh_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
        context
            .node_uniforms
            .insert(id.0, MeshInstance { bind_group, buffer });
    });

    // Material slots; rebuilt when a referenced bitmap shows up.
    for (id, instance) in materials.iter() {
        let uploaded = instance
            .texture
            .as_ref()
            .and_then(|handle| context.texture_cache.get(&handle.id));
        let needs_build = match context.material_slots.get(&id.0) {
            None => true,
            Some(slot) => slot.textured != uploaded.is_some(),
        };
        if needs_build {
            let slot = create_material_slot(
                &context.device,
                &context.material_layout,
                instance,
                uploaded,
                &context.default_diffuse,
            );
            context.material_slots.insert(id.0, slot);
        }
    }
}

/// The animated instances get fresh uniform contents every tick; the
/// buffers already exist, so this is write_buffer only, no allocation.
fn sync_animated_materials(
    context: Res<RenderContext>,
    animated: Res<AnimatedSet>,
    materials: Res<MaterialArena>,
) {
    for (id, _) in animated.iter() {
        if let Some(slot) = context.material_slots.get(&id.0) {
            let uniform = GpuMaterialUniform::from_instance(materials.get(*id), slot.textured);
            context
                .queue
                .write_buffer(&slot.buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }
}

pub fn start_frame(context: Res<RenderContext>, mut target: ResMut<RenderTarget>) {
    // Acquire the texture once at the start of the frame.
    if let Ok(frame) = context.surface.get_current_texture() {
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        target.texture = Some(frame);
        target.view = Some(view);
    }
}

// --- SYSTEM 2: RENDERING ---
fn render_scene(
    context: Res<RenderContext>,
    target: Res<RenderTarget>,
    viewport: Res<Viewport>,
    rig: Res<CameraRig>,
    graph: Res<SceneGraph>,
) {
    let Some(view) = target.view.as_ref() else {
        return;
    };

    let view_proj = rig.projection_matrix(viewport.aspect()) * rig.view_matrix();
    context.queue.write_buffer(
        &context.camera_buffer,
        0,
        bytemuck::cast_slice(&[CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
        }]),
    );

    let mut encoder = context
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.043,
                        g: 0.051, // near-black slate behind the desk
                        b: 0.075,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &context.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        render_pass.set_pipeline(&context.pipeline);
        render_pass.set_bind_group(0, &context.global_bind_group, &[]);

        graph.visit(graph.root(), &mut |id, node| {
            let (Some(geometry), Some(material)) = (node.geometry, node.material) else {
                return;
            };
            let (Some(gpu_geometry), Some(instance), Some(slot)) = (
                context.geometry_buffers.get(&geometry.0),
                context.node_uniforms.get(&id.0),
                context.material_slots.get(&material.0),
            ) else {
                return;
            };

            render_pass.set_bind_group(1, &slot.bind_group, &[]);
            render_pass.set_bind_group(2, &instance.bind_group, &[]);
            render_pass.set_vertex_buffer(0, gpu_geometry.vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(gpu_geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..gpu_geometry.index_count, 0, 0..1);
        });
    }

    context.queue.submit(std::iter::once(encoder.finish()));
}

/// Centered progress readout, drawn until every resource has settled
/// one way or the other. The scene underneath keeps rendering with its
/// placeholders; this never blocks the loop.
fn render_overlay(
    context: Res<RenderContext>,
    target: Res<RenderTarget>,
    progress: Res<LoadProgress>,
) {
    if progress.settled() {
        return;
    }
    let Some(view) = target.view.as_ref() else {
        return;
    };

    context
        .overlay
        .update(&context.queue, progress.fraction());

    let mut encoder = context
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Overlay Encoder"),
        });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });
        pass.set_pipeline(&context.overlay.pipeline);
        pass.set_bind_group(0, &context.overlay.bind_group, &[]);
        // Track quad + fill quad.
        pass.draw(0..12, 0..1);
    }
    context.queue.submit(std::iter::once(encoder.finish()));
}

pub fn end_frame(mut target: ResMut<RenderTarget>) {
    if let Some(frame) = target.texture.take() {
        frame.present();
    }
    target.view = None;
}
