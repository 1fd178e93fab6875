//! Graphics backend seam.
//!
//! The batch renderer talks to a small trait: bind texture state, set the
//! scissor, take a vertex slice, draw. The wgpu adapter implements it for
//! real frames; `RecordingBackend` implements it for headless tests.

use std::borrow::Cow;
use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use pollster::block_on;
use uuid::Uuid;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::batch::Vertex;

/// Clip rectangle in physical (backbuffer) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

pub trait GpuBackend {
    /// Projection update: virtual canvas extent plus backbuffer extent.
    fn configure(&mut self, virtual_size: (f32, f32), physical: PhysicalSize<u32>);
    /// Clip state is backend-global; the renderer flushes before calling.
    fn set_scissor(&mut self, rect: Option<ScissorRect>);
    /// One batch worth of vertices, drawn in submission order.
    fn submit(&mut self, vertices: &[Vertex], texture: Option<Uuid>);
    fn begin_frame(&mut self);
    fn end_frame(&mut self);
}

/// Test backend: remembers every submission with the state it was made
/// under, so batching and scissor scoping are observable without a GPU.
#[derive(Default)]
pub struct RecordingBackend {
    pub virtual_size: (f32, f32),
    pub physical: (u32, u32),
    pub scissor: Option<ScissorRect>,
    pub submissions: Vec<Submission>,
    pub frames_begun: usize,
    pub frames_ended: usize,
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub quad_count: usize,
    pub texture: Option<Uuid>,
    pub scissor: Option<ScissorRect>,
    pub vertices: Vec<Vertex>,
}

impl GpuBackend for RecordingBackend {
    fn configure(&mut self, virtual_size: (f32, f32), physical: PhysicalSize<u32>) {
        self.virtual_size = virtual_size;
        self.physical = (physical.width, physical.height);
    }

    fn set_scissor(&mut self, rect: Option<ScissorRect>) {
        self.scissor = rect;
    }

    fn submit(&mut self, vertices: &[Vertex], texture: Option<Uuid>) {
        self.submissions.push(Submission {
            quad_count: vertices.len() / 6,
            texture,
            scissor: self.scissor,
            vertices: vertices.to_vec(),
        });
    }

    fn begin_frame(&mut self) {
        self.frames_begun += 1;
    }

    fn end_frame(&mut self) {
        self.frames_ended += 1;
    }
}

struct DrawCmd {
    vertex_range: std::ops::Range<u32>,
    texture: Option<Uuid>,
    scissor: Option<ScissorRect>,
}

/// wgpu adapter. Owns the surface, device, one pipeline, and the registered
/// texture bind groups; accumulates the frame's batches and replays them in
/// a single render pass at `end_frame`.
pub struct WgpuBackend<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    canvas_buffer: wgpu::Buffer,
    canvas_bind_group: wgpu::BindGroup,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: HashMap<Uuid, wgpu::BindGroup>,
    white: wgpu::BindGroup,
    staging: Vec<Vertex>,
    commands: Vec<DrawCmd>,
    scissor: Option<ScissorRect>,
    clear_color: wgpu::Color,
}

impl<'a> WgpuBackend<'a> {
    pub fn new(
        surface: wgpu::Surface<'a>,
        instance: &wgpu::Instance,
        size: PhysicalSize<u32>,
    ) -> Result<Self> {
        let adapter = block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .ok_or_else(|| anyhow!("no compatible gpu adapter"))?;

        let (device, queue) = block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let config = wgpu::SurfaceConfiguration {
            desired_maximum_frame_latency: 2,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![wgpu::TextureFormat::Bgra8UnormSrgb],
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
        };
        surface.configure(&device, &config);

        let canvas_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("canvas_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(16),
                    },
                    count: None,
                }],
            });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture_bind_group_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: None,
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("../shaders/ui.wgsl"))),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ui pipeline layout"),
            bind_group_layouts: &[&canvas_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ui pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Bgra8UnormSrgb,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let canvas_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("canvas uniform"),
            contents: bytemuck::cast_slice(&[size.width as f32, size.height as f32, 0.0, 0.0]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let canvas_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &canvas_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: canvas_buffer.as_entire_binding(),
            }],
            label: Some("canvas bind group"),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let white = Self::make_texture_bind_group(
            &device,
            &queue,
            &texture_bind_group_layout,
            &sampler,
            1,
            1,
            &[255, 255, 255, 255],
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            canvas_buffer,
            canvas_bind_group,
            texture_bind_group_layout,
            sampler,
            textures: HashMap::new(),
            white,
            staging: Vec::new(),
            commands: Vec::new(),
            scissor: None,
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.12,
                a: 1.0,
            },
        })
    }

    pub fn set_clear_color(&mut self, rgba: crate::utils::Rgba) {
        self.clear_color = wgpu::Color {
            r: rgba[0] as f64,
            g: rgba[1] as f64,
            b: rgba[2] as f64,
            a: rgba[3] as f64,
        };
    }

    fn make_texture_bind_group(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> wgpu::BindGroup {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ui texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            texture.as_image_copy(),
            pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some("ui texture bind group"),
        })
    }

    /// Register an RGBA8 texture (e.g. a baked glyph atlas) under an id the
    /// batch renderer can reference.
    pub fn register_texture_rgba8(&mut self, id: Uuid, width: u32, height: u32, pixels: &[u8]) {
        let bind_group = Self::make_texture_bind_group(
            &self.device,
            &self.queue,
            &self.texture_bind_group_layout,
            &self.sampler,
            width,
            height,
            pixels,
        );
        self.textures.insert(id, bind_group);
    }
}

impl GpuBackend for WgpuBackend<'_> {
    fn configure(&mut self, virtual_size: (f32, f32), physical: PhysicalSize<u32>) {
        self.config.width = physical.width.max(1);
        self.config.height = physical.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.queue.write_buffer(
            &self.canvas_buffer,
            0,
            bytemuck::cast_slice(&[virtual_size.0, virtual_size.1, 0.0, 0.0]),
        );
    }

    fn set_scissor(&mut self, rect: Option<ScissorRect>) {
        self.scissor = rect;
    }

    fn submit(&mut self, vertices: &[Vertex], texture: Option<Uuid>) {
        let start = self.staging.len() as u32;
        self.staging.extend_from_slice(vertices);
        self.commands.push(DrawCmd {
            vertex_range: start..self.staging.len() as u32,
            texture,
            scissor: self.scissor,
        });
    }

    fn begin_frame(&mut self) {
        self.staging.clear();
        self.commands.clear();
    }

    fn end_frame(&mut self) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("dropped frame: {err}");
                self.surface.configure(&self.device, &self.config);
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("ui vertices"),
                contents: if self.staging.is_empty() {
                    &[0u8; 4][..]
                } else {
                    bytemuck::cast_slice(&self.staging)
                },
                usage: wgpu::BufferUsages::VERTEX,
            });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ui encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ui pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.canvas_bind_group, &[]);
            rpass.set_vertex_buffer(0, vertex_buffer.slice(..));

            for cmd in &self.commands {
                match cmd.scissor {
                    Some(rect) => {
                        let x = rect.x.min(self.config.width);
                        let y = rect.y.min(self.config.height);
                        let w = rect.width.min(self.config.width - x);
                        let h = rect.height.min(self.config.height - y);
                        if w == 0 || h == 0 {
                            continue;
                        }
                        rpass.set_scissor_rect(x, y, w, h);
                    }
                    None => rpass.set_scissor_rect(0, 0, self.config.width, self.config.height),
                }
                let bind_group = match cmd.texture.as_ref().and_then(|id| self.textures.get(id)) {
                    Some(group) => group,
                    None => {
                        if cmd.texture.is_some() {
                            log::warn!("texture {:?} not registered; drawing untextured", cmd.texture);
                        }
                        &self.white
                    }
                };
                rpass.set_bind_group(1, bind_group, &[]);
                rpass.draw(cmd.vertex_range.clone(), 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
    }
}
