use wgpu::util::DeviceExt;

use crate::{
    data_structures::{model::Vertex, texture},
    resources::font::{Font, GlyphVertex, build_glyph_vertices},
};

/// Screen-space text state as it is stored on the GPU. Uniforms require
/// 16 byte spacing, hence the padding after the vec2 and the vec3.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextUniform {
    pub screen_size: [f32; 2],
    pub _padding: [f32; 2],
    pub color: [f32; 3],
    pub _padding2: f32,
}

/// Bitmap-font text overlay drawn on top of the scene.
///
/// Owns one font, one alpha-blended pipeline and a reusable glyph vertex
/// buffer. `draw` lays the string out, streams the quads into the buffer and
/// issues a single draw, so overlay text costs one bind and one draw per
/// string.
pub struct TextOverlay {
    font: Font,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    capacity: u32,
}

impl TextOverlay {
    /// `capacity` is the largest number of glyphs one `draw` call can show.
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        font: Font,
        capacity: u32,
    ) -> Self {
        let uniform = TextUniform {
            screen_size: [config.width as f32, config.height as f32],
            _padding: [0.0; 2],
            color: [1.0, 1.0, 1.0],
            _padding2: 0.0,
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Text Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
                label: Some("text_bind_group_layout"),
            });

        let sampler = font
            .texture
            .sampler
            .clone()
            .unwrap_or_else(|| texture::create_default_sampler(device));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&font.texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
            label: Some("text_bind_group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Text Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Text Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("text_shader.wgsl").into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            cache: None,
            label: Some("Text Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[GlyphVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // the overlay draws last and over everything, so it never tests
            // or writes depth
            depth_stencil: Some(wgpu::DepthStencilState {
                format: texture::Texture::DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let zeroed = vec![
            GlyphVertex {
                position: [0.0; 2],
                uv: [0.0; 2],
            };
            capacity as usize * 6
        ];
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Glyph Vertex Buffer"),
            contents: bytemuck::cast_slice(&zeroed),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            font,
            pipeline,
            bind_group,
            uniform_buffer,
            vertex_buffer,
            capacity,
        }
    }

    /// Draw `text` at pixel position (x, y) from the top-left corner.
    pub fn draw(
        &mut self,
        queue: &wgpu::Queue,
        render_pass: &mut wgpu::RenderPass<'_>,
        text: &str,
        x: f32,
        y: f32,
        screen_size: [f32; 2],
        color: [f32; 3],
    ) {
        let mut vertices = build_glyph_vertices(&self.font.metrics, text, x, y);
        let max = self.capacity as usize * 6;
        if vertices.len() > max {
            log::warn!(
                "text overlay overflowed its glyph buffer ({} glyphs), truncating",
                self.capacity
            );
            vertices.truncate(max);
        }
        if vertices.is_empty() {
            return;
        }

        let uniform = TextUniform {
            screen_size,
            _padding: [0.0; 2],
            color,
            _padding2: 0.0,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..vertices.len() as u32, 0..1);
    }
}
