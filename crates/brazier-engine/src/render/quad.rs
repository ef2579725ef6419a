//! Unit-quad geometry, GPU uniform layout and the pass that replays recorded draws.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::shader::{ShaderRegistry, WgpuShaderBackend};
use crate::render::surface::{QuadDraw, RenderSurface};
use crate::render::texture::TextureStore;
use crate::render::{RenderCtx, RenderTarget};

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Unit quad centered on the origin, drawn as a 4-vertex triangle strip.
///
/// UV v runs top-down, so images appear upright with +Y up in world space.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-0.5, -0.5], uv: [0.0, 1.0] },
    QuadVertex { position: [0.5, -0.5], uv: [1.0, 1.0] },
    QuadVertex { position: [-0.5, 0.5], uv: [0.0, 0.0] },
    QuadVertex { position: [0.5, 0.5], uv: [1.0, 0.0] },
];

// ── uniforms ──────────────────────────────────────────────────────────────

/// Per-draw uniform block. Field order and size match `QuadUniforms` in WGSL.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub tint_color: [f32; 4],
    /// x = time (seconds), y = outline size, zw unused.
    pub params: [f32; 4],
}

impl QuadUniforms {
    pub const SIZE: u64 = std::mem::size_of::<QuadUniforms>() as u64;

    pub fn from_draw(draw: &QuadDraw, projection: glam::Mat4, view: glam::Mat4) -> Self {
        let u = &draw.uniforms;
        Self {
            projection: projection.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            model: draw.model.to_cols_array_2d(),
            color: [u.color.x, u.color.y, u.color.z, u.alpha],
            tint_color: u.tint.to_array(),
            params: [u.time, u.outline_size, 0.0, 0.0],
        }
    }
}

// ── layouts ───────────────────────────────────────────────────────────────

/// Bind group and pipeline layouts shared by every quad program.
///
/// - group 0: [`QuadUniforms`] with a dynamic offset
/// - group 1: texture + filtering sampler (always bound; untextured draws get a white texel)
#[derive(Debug, Clone)]
pub struct QuadLayouts {
    pub uniforms: wgpu::BindGroupLayout,
    pub texture: wgpu::BindGroupLayout,
    pub pipeline: wgpu::PipelineLayout,
    /// Distance between consecutive uniform blocks in the per-frame buffer.
    pub uniform_stride: u64,
}

impl QuadLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniforms = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("brazier quad uniforms bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(QuadUniforms::SIZE),
                },
                count: None,
            }],
        });

        let texture = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("brazier quad texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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

        let pipeline = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("brazier quad pipeline layout"),
            bind_group_layouts: &[&uniforms, &texture],
            immediate_size: 0,
        });

        let align = u64::from(device.limits().min_uniform_buffer_offset_alignment);

        Self {
            uniforms,
            texture,
            pipeline,
            uniform_stride: align_up(QuadUniforms::SIZE, align),
        }
    }
}

fn align_up(value: u64, align: u64) -> u64 {
    if align <= 1 {
        return value;
    }
    value.div_ceil(align) * align
}

// ── pass ──────────────────────────────────────────────────────────────────

/// Replays a [`RenderSurface`]'s recorded draws in order.
///
/// Owns the quad vertex buffer and a per-frame uniform buffer that grows on demand.
pub struct QuadPass {
    vbo: wgpu::Buffer,
    uniforms_bgl: wgpu::BindGroupLayout,
    stride: u64,

    ubo: Option<wgpu::Buffer>,
    ubo_capacity: usize,
    bind_group: Option<wgpu::BindGroup>,

    staging: Vec<u8>,
}

impl QuadPass {
    pub fn new(device: &wgpu::Device, layouts: &QuadLayouts) -> Self {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("brazier quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            vbo,
            uniforms_bgl: layouts.uniforms.clone(),
            stride: layouts.uniform_stride,
            ubo: None,
            ubo_capacity: 0,
            bind_group: None,
            staging: Vec::new(),
        }
    }

    /// Draws every recorded quad on top of the target's current contents.
    ///
    /// Draws whose program id is unknown to `registry` are skipped.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        surface: &RenderSurface,
        registry: &ShaderRegistry<WgpuShaderBackend>,
        textures: &TextureStore,
    ) {
        let draws = surface.draws();
        if draws.is_empty() {
            return;
        }

        self.ensure_capacity(ctx, draws.len());
        self.write_uniforms(ctx, surface);

        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("brazier quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_vertex_buffer(0, self.vbo.slice(..));

        for (i, draw) in draws.iter().enumerate() {
            let Some(program) = registry.program(draw.program) else { continue };
            let texture_group = draw
                .uniforms
                .texture
                .and_then(|h| textures.bind_group(h))
                .unwrap_or_else(|| textures.fallback_bind_group());

            let offset = (i as u64 * self.stride) as u32;
            rpass.set_pipeline(program.pipeline());
            rpass.set_bind_group(0, bind_group, &[offset]);
            rpass.set_bind_group(1, texture_group, &[]);
            rpass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
        }
    }

    fn ensure_capacity(&mut self, ctx: &RenderCtx<'_>, draws: usize) {
        if draws <= self.ubo_capacity && self.ubo.is_some() {
            return;
        }

        let new_cap = draws.next_power_of_two().max(64);
        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("brazier quad ubo"),
            size: new_cap as u64 * self.stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("brazier quad uniforms"),
            layout: &self.uniforms_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &ubo,
                    offset: 0,
                    size: wgpu::BufferSize::new(QuadUniforms::SIZE),
                }),
            }],
        });

        log::debug!("quad uniform buffer grown to {new_cap} draws");
        self.ubo = Some(ubo);
        self.bind_group = Some(bind_group);
        self.ubo_capacity = new_cap;
    }

    fn write_uniforms(&mut self, ctx: &RenderCtx<'_>, surface: &RenderSurface) {
        let Some(ubo) = self.ubo.as_ref() else { return };

        let projection = surface.projection();
        let view = surface.view();
        let stride = self.stride as usize;

        self.staging.clear();
        self.staging.resize(surface.draws().len() * stride, 0);
        for (i, draw) in surface.draws().iter().enumerate() {
            let u = QuadUniforms::from_draw(draw, projection, view);
            let start = i * stride;
            self.staging[start..start + QuadUniforms::SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&u));
        }

        ctx.queue.write_buffer(ubo, 0, &self.staging);
    }
}
