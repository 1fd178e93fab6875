//! Vertex batching.
//!
//! Quads accumulate into one reusable vertex region and flush to the
//! backend whenever batch-relevant state changes (textured flag, bound
//! texture id), when capacity is hit, or when the frame ends. Batches flush
//! strictly in queue order; paint order is never reordered for efficiency.

use uuid::Uuid;

use crate::backend::{GpuBackend, ScissorRect};
use crate::layout::CanvasSize;
use crate::text::GlyphQuad;
use crate::utils::{Position, Rectangle, Rgba, Size};

/// Hard per-batch capacity; hitting it forces a flush, never a drop and
/// never a mid-frame reallocation.
pub const MAX_QUADS: usize = 4096;
pub const VERTICES_PER_QUAD: usize = 6;

/// One vertex of the shared fragment-stage contract: every attribute the
/// rounded-rect/border SDF needs rides on the vertex. A zero `size` stamp
/// means "plain textured surface, skip the rounded-box math".
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    pub size: [f32; 2],
    pub corner_radius: f32,
    pub local_uv: [f32; 2],
    pub border_thickness: f32,
    pub border_color: [f32; 4],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 7]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 9]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 11]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 14]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 15]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Everything needed to stamp one widget quad.
#[derive(Debug, Clone, Copy)]
pub struct QuadInstance {
    pub position: Position,
    pub size: Size,
    pub color: Rgba,
    /// Degrees; the quad rotates around its own center.
    pub angle: f32,
    pub corner_radius: f32,
    pub border_thickness: f32,
    pub border_color: Rgba,
}

impl QuadInstance {
    pub fn flat(position: Position, size: Size, color: Rgba) -> Self {
        Self {
            position,
            size,
            color,
            angle: 0.0,
            corner_radius: 0.0,
            border_thickness: 0.0,
            border_color: [0.0; 4],
        }
    }
}

/// UV window into an atlas texture.
#[derive(Debug, Clone, Copy)]
pub struct UvRegion {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl UvRegion {
    pub const FULL: UvRegion = UvRegion {
        min: [0.0, 0.0],
        max: [1.0, 1.0],
    };
}

struct Batch {
    vertices: Vec<Vertex>,
    quads: usize,
    textured: bool,
    texture: Option<Uuid>,
}

impl Batch {
    fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(MAX_QUADS * VERTICES_PER_QUAD),
            quads: 0,
            textured: false,
            texture: None,
        }
    }

    fn matches(&self, textured: bool, texture: Option<Uuid>) -> bool {
        self.textured == textured && self.texture == texture
    }

    fn reset(&mut self) {
        self.vertices.clear();
        self.quads = 0;
    }
}

/// Accumulates widget quads and projects the fixed virtual-height canvas
/// onto the physical backbuffer. Resizes recompute the virtual width so
/// aspect ratio is preserved while virtual height stays constant — this is
/// the sole resolution-independence mechanism.
pub struct BatchRenderer<B> {
    backend: B,
    batch: Batch,
    virtual_height: i32,
    virtual_width: i32,
    physical: winit::dpi::PhysicalSize<u32>,
    flush_count: usize,
}

impl<B: GpuBackend> BatchRenderer<B> {
    pub fn new(backend: B, virtual_height: i32, physical: winit::dpi::PhysicalSize<u32>) -> Self {
        let mut renderer = Self {
            backend,
            batch: Batch::new(),
            virtual_height,
            virtual_width: virtual_height,
            physical,
            flush_count: 0,
        };
        renderer.resize(physical);
        renderer
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize::new(self.virtual_width, self.virtual_height)
    }

    /// Physical pixels per virtual pixel.
    pub fn scale_factor(&self) -> f32 {
        self.physical.height as f32 / self.virtual_height as f32
    }

    /// Flushes performed so far; one per backend submission.
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    pub fn resize(&mut self, physical: winit::dpi::PhysicalSize<u32>) {
        self.physical = physical;
        let width = physical.width.max(1) as f32;
        let height = physical.height.max(1) as f32;
        self.virtual_width = (self.virtual_height as f32 * width / height) as i32;
        self.backend.configure(
            (self.virtual_width as f32, self.virtual_height as f32),
            physical,
        );
    }

    pub fn begin_frame(&mut self) {
        self.backend.begin_frame();
    }

    /// Flush whatever is pending and finish the frame.
    pub fn end_frame(&mut self) {
        self.flush();
        self.backend.end_frame();
    }

    /// Queue an untextured rounded/bordered quad.
    pub fn queue(&mut self, quad: &QuadInstance) {
        self.ensure_state(false, None);
        self.push_quad(quad, UvRegion::FULL, quad.size.to_f32());
    }

    /// Queue a textured quad; the widget's box attributes still apply, so a
    /// rounded border around an image works through the same contract.
    pub fn queue_textured(&mut self, quad: &QuadInstance, region: UvRegion, atlas: Uuid, tint: Rgba) {
        self.ensure_state(true, Some(atlas));
        let tinted = QuadInstance {
            color: tint,
            ..*quad
        };
        self.push_quad(&tinted, region, quad.size.to_f32());
    }

    /// Queue one glyph. Glyphs stamp a zero size so the fragment stage
    /// treats them as plain textured surfaces.
    pub fn queue_glyph(&mut self, glyph: &GlyphQuad, atlas: Uuid, color: Rgba) {
        self.ensure_state(true, Some(atlas));
        let quad = QuadInstance {
            position: Position::new(glyph.x as i32, glyph.y as i32),
            size: Size::new(glyph.width.ceil() as i32, glyph.height.ceil() as i32),
            color,
            angle: 0.0,
            corner_radius: 0.0,
            border_thickness: 0.0,
            border_color: [0.0; 4],
        };
        let region = UvRegion {
            min: glyph.uv_min,
            max: glyph.uv_max,
        };
        self.push_quad(&quad, region, (0.0, 0.0));
    }

    /// Flush the pending batch to the backend, in queue order.
    pub fn flush(&mut self) {
        if self.batch.quads == 0 {
            return;
        }
        let texture = if self.batch.textured {
            self.batch.texture
        } else {
            None
        };
        self.backend.submit(&self.batch.vertices, texture);
        self.flush_count += 1;
        self.batch.reset();
    }

    /// Clip rectangles are backend-global: flush before changing state so
    /// already-queued quads keep the clip they were queued under.
    pub fn enable_scissor(&mut self, rect: Rectangle) {
        self.flush();
        self.backend.set_scissor(Some(self.to_physical(rect)));
    }

    pub fn disable_scissor(&mut self) {
        self.flush();
        self.backend.set_scissor(None);
    }

    fn to_physical(&self, rect: Rectangle) -> ScissorRect {
        let scale = self.scale_factor();
        let x = ((rect.x as f32 * scale) as i64).clamp(0, self.physical.width as i64) as u32;
        let y = ((rect.y as f32 * scale) as i64).clamp(0, self.physical.height as i64) as u32;
        let w = ((rect.width as f32 * scale) as i64)
            .clamp(0, (self.physical.width - x) as i64) as u32;
        let h = ((rect.height as f32 * scale) as i64)
            .clamp(0, (self.physical.height - y) as i64) as u32;
        ScissorRect {
            x,
            y,
            width: w,
            height: h,
        }
    }

    fn ensure_state(&mut self, textured: bool, texture: Option<Uuid>) {
        if self.batch.quads > 0 && !self.batch.matches(textured, texture) {
            self.flush();
        }
        self.batch.textured = textured;
        self.batch.texture = texture;
    }

    fn push_quad(&mut self, quad: &QuadInstance, region: UvRegion, size_stamp: (f32, f32)) {
        if self.batch.quads == MAX_QUADS {
            self.flush();
        }

        let (w, h) = quad.size.to_f32();
        let (x, y) = quad.position.to_f32();
        let cx = x + w * 0.5;
        let cy = y + h * 0.5;
        let radians = quad.angle.to_radians();
        let (sin, cos) = radians.sin_cos();

        // corner order: tl, tr, br, bl; rotation pivots at the quad center
        let rotate = |dx: f32, dy: f32| -> [f32; 3] {
            [cx + dx * cos - dy * sin, cy + dx * sin + dy * cos, 0.0]
        };
        let hw = w * 0.5;
        let hh = h * 0.5;
        let corners = [
            rotate(-hw, -hh),
            rotate(hw, -hh),
            rotate(hw, hh),
            rotate(-hw, hh),
        ];
        let uvs = [
            [region.min[0], region.min[1]],
            [region.max[0], region.min[1]],
            [region.max[0], region.max[1]],
            [region.min[0], region.max[1]],
        ];
        let locals = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

        let vertex = |i: usize| Vertex {
            position: corners[i],
            color: quad.color,
            uv: uvs[i],
            size: [size_stamp.0, size_stamp.1],
            corner_radius: quad.corner_radius,
            local_uv: locals[i],
            border_thickness: quad.border_thickness,
            border_color: quad.border_color,
        };

        // two triangles sharing the tl-br diagonal
        for i in [0, 1, 2, 0, 2, 3] {
            self.batch.vertices.push(vertex(i));
        }
        self.batch.quads += 1;
    }
}
