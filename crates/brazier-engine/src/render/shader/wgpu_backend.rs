use crate::render::quad::{QuadLayouts, QuadVertex};

use super::{validate_program, ShaderBackend, ShaderError, ShaderSource, FRAGMENT_ENTRY, VERTEX_ENTRY};

/// A compiled quad program: one render pipeline.
#[derive(Debug)]
pub struct WgpuProgram {
    pipeline: wgpu::RenderPipeline,
}

impl WgpuProgram {
    #[inline]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

/// Builds render pipelines for the shared quad layout and a fixed target format.
pub struct WgpuShaderBackend {
    device: wgpu::Device,
    format: wgpu::TextureFormat,
    layouts: QuadLayouts,
}

impl WgpuShaderBackend {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        Self {
            device: device.clone(),
            format,
            layouts: QuadLayouts::new(device),
        }
    }

    #[inline]
    pub fn layouts(&self) -> &QuadLayouts {
        &self.layouts
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

impl ShaderBackend for WgpuShaderBackend {
    type Program = WgpuProgram;

    fn compile(&mut self, name: &str, source: &ShaderSource) -> Result<WgpuProgram, ShaderError> {
        // wgpu reports invalid WGSL through the device error handler, so reject it first.
        validate_program(name, source)?;

        let vertex = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(name),
            source: wgpu::ShaderSource::Wgsl(source.vertex.clone()),
        });
        let fragment = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(name),
            source: wgpu::ShaderSource::Wgsl(source.fragment.clone()),
        });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(name),
            layout: Some(&self.layouts.pipeline),

            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    // Colors are straight (non-premultiplied) alpha.
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(WgpuProgram { pipeline })
    }
}
