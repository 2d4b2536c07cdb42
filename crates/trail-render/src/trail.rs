//! Tube and ring passes plus the `GeometryBackend` that turns the core's
//! meshes into GPU buffers.

use super::helpers;
use super::targets::HDR_FORMAT;
use glam::Mat4;
use trail_core::{
    build_ring, GeometryBackend, Palette, PulseVisual, RingVertex, TubeMaterial, TubeMesh,
    TubeVertex, DEFAULT_PALETTES,
};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) c1: [f32; 4],
    pub(crate) c2: [f32; 4],
    pub(crate) c3: [f32; 4],
    pub(crate) params: [f32; 4], // x = hdr gain, y = time
}

impl SceneUniforms {
    pub(crate) fn new(view_proj: Mat4, palette: &Palette, hdr_gain: f32, time: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            c1: palette.c1.extend(1.0).to_array(),
            c2: palette.c2.extend(1.0).to_array(),
            c3: palette.c3.extend(1.0).to_array(),
            params: [hdr_gain, time, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniforms {
    params: [f32; 4], // x = opacity
}

/// Per-instance data for one pulse ring.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RingInstance {
    pub center: [f32; 3],
    pub scale: f32,
    pub opacity: f32,
    pub _pad: [f32; 3],
}

/// GPU buffers for one frame's tube. Destroyed by `release_tube`.
pub struct GpuTube {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material_buffer: wgpu::Buffer,
    material_bg: wgpu::BindGroup,
}

/// Creates and destroys per-frame GPU geometry for the core.
pub struct MeshFactory {
    device: wgpu::Device,
    queue: wgpu::Queue,
    material_bgl: wgpu::BindGroupLayout,
    palette: Palette,
    live_tubes: usize,
}

impl MeshFactory {
    pub(crate) fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        let material_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tube_material_bgl"),
            entries: &[helpers::uniform_layout_entry(0, wgpu::ShaderStages::FRAGMENT)],
        });
        Self {
            device,
            queue,
            material_bgl,
            palette: DEFAULT_PALETTES[0],
            live_tubes: 0,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Tubes created and not yet released.
    pub fn live_tubes(&self) -> usize {
        self.live_tubes
    }
}

impl GeometryBackend for MeshFactory {
    type Tube = GpuTube;
    type Ring = RingInstance;

    fn create_tube(&mut self, mesh: &TubeMesh, material: &TubeMaterial) -> GpuTube {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tube_vb"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tube_ib"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        let material_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tube_material"),
                contents: bytemuck::bytes_of(&MaterialUniforms {
                    params: [material.opacity, material.strand as f32, 0.0, 0.0],
                }),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let material_bg = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tube_material_bg"),
            layout: &self.material_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: material_buffer.as_entire_binding(),
            }],
        });
        self.live_tubes += 1;
        GpuTube {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            material_buffer,
            material_bg,
        }
    }

    fn release_tube(&mut self, tube: GpuTube) {
        tube.vertex_buffer.destroy();
        tube.index_buffer.destroy();
        tube.material_buffer.destroy();
        self.live_tubes = self.live_tubes.saturating_sub(1);
    }

    fn create_ring(&mut self) -> RingInstance {
        RingInstance::default()
    }

    fn update_ring(&mut self, ring: &mut RingInstance, visual: &PulseVisual) {
        ring.center = visual.position.to_array();
        ring.scale = visual.scale;
        ring.opacity = visual.opacity.clamp(0.0, 1.0);
    }

    fn release_ring(&mut self, _ring: RingInstance) {}

    fn set_palette(&mut self, palette: &Palette) {
        self.palette = *palette;
    }
}

/// Pipelines and shared buffers for the scene passes.
pub(crate) struct TrailPasses {
    tube_pipeline: wgpu::RenderPipeline,
    ring_pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bg: wgpu::BindGroup,
    ring_vb: wgpu::Buffer,
    ring_ib: wgpu::Buffer,
    ring_index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
}

const INITIAL_RING_CAPACITY: usize = 8;

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("ring_instances"),
        size: (std::mem::size_of::<RingInstance>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl TrailPasses {
    pub(crate) fn new(factory: &MeshFactory) -> Self {
        let device = &factory.device;
        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[helpers::uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
            )],
        });
        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        // Tube pass
        let tube_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tube_shader"),
            source: wgpu::ShaderSource::Wgsl(trail_core::TUBE_WGSL.into()),
        });
        let tube_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tube_pl"),
            bind_group_layouts: &[&scene_bgl, &factory.material_bgl],
            push_constant_ranges: &[],
        });
        let tube_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TubeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 24,
                    shader_location: 2,
                },
            ],
        }];
        let tube_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tube_pipeline"),
            layout: Some(&tube_pl),
            vertex: wgpu::VertexState {
                module: &tube_shader,
                entry_point: Some("vs_tube"),
                buffers: &tube_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &tube_shader,
                entry_point: Some("fs_tube"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(helpers::ADDITIVE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        // Ring pass
        let ring_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ring_shader"),
            source: wgpu::ShaderSource::Wgsl(trail_core::RING_WGSL.into()),
        });
        let ring_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ring_pl"),
            bind_group_layouts: &[&scene_bgl],
            push_constant_ranges: &[],
        });
        let ring_buffers = [
            // slot 0: ring outline
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<RingVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: per-pulse instance data
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<RingInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 16,
                        shader_location: 3,
                    },
                ],
            },
        ];
        let ring_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ring_pipeline"),
            layout: Some(&ring_pl),
            vertex: wgpu::VertexState {
                module: &ring_shader,
                entry_point: Some("vs_ring"),
                buffers: &ring_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &ring_shader,
                entry_point: Some("fs_ring"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(helpers::ADDITIVE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let ring = build_ring(
            trail_core::constants::RING_INNER_RADIUS,
            trail_core::constants::RING_OUTER_RADIUS,
            trail_core::constants::RING_SEGMENTS,
        );
        let ring_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ring_vb"),
            contents: bytemuck::cast_slice(&ring.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ring_ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ring_ib"),
            contents: bytemuck::cast_slice(&ring.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            tube_pipeline,
            ring_pipeline,
            scene_buffer,
            scene_bg,
            ring_vb,
            ring_ib,
            ring_index_count: ring.indices.len() as u32,
            instance_buffer: create_instance_buffer(device, INITIAL_RING_CAPACITY),
            instance_capacity: INITIAL_RING_CAPACITY,
        }
    }

    pub(crate) fn write_scene(&self, queue: &wgpu::Queue, uniforms: &SceneUniforms) {
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Upload ring instances, growing the instance buffer if needed.
    pub(crate) fn write_rings(&mut self, factory: &MeshFactory, rings: &[RingInstance]) {
        if rings.len() > self.instance_capacity {
            let capacity = rings.len().next_power_of_two();
            self.instance_buffer.destroy();
            self.instance_buffer = create_instance_buffer(&factory.device, capacity);
            self.instance_capacity = capacity;
        }
        if !rings.is_empty() {
            factory
                .queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(rings));
        }
    }

    /// Draw tubes then rings into the HDR target.
    pub(crate) fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear: wgpu::Color,
        tubes: &[GpuTube],
        ring_count: usize,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_bind_group(0, &self.scene_bg, &[]);
        if !tubes.is_empty() {
            rpass.set_pipeline(&self.tube_pipeline);
            for tube in tubes {
                rpass.set_bind_group(1, &tube.material_bg, &[]);
                rpass.set_vertex_buffer(0, tube.vertex_buffer.slice(..));
                rpass.set_index_buffer(tube.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..tube.index_count, 0, 0..1);
            }
        }
        if ring_count > 0 {
            rpass.set_pipeline(&self.ring_pipeline);
            rpass.set_bind_group(0, &self.scene_bg, &[]);
            rpass.set_vertex_buffer(0, self.ring_vb.slice(..));
            rpass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            rpass.set_index_buffer(self.ring_ib.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..self.ring_index_count, 0, 0..ring_count as u32);
        }
    }
}
