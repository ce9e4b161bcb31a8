use image::RgbaImage;

use crate::layer::LayerError;
use crate::render::{RenderCtx, RenderTarget};

use super::node::{ImageLayerNode, LayerVertex};
use super::uniforms::LayerUniforms;

/// Image-layer renderer.
///
/// Owns the pipeline and bind group layout shared by all layer nodes; the
/// per-layer resources live in [`ImageLayerNode`]. The pipeline is rebuilt
/// lazily when the surface format changes.
pub struct ImageLayerRenderer {
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl ImageLayerRenderer {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("strata layer bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: std::num::NonZeroU64::new(
                                std::mem::size_of::<LayerUniforms>() as u64,
                            ),
                        },
                        count: None,
                    },
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
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        Self {
            bind_group_layout,
            pipeline_format: None,
            pipeline: None,
        }
    }

    /// Uploads a decoded image and returns a node ready for mutation.
    ///
    /// `mirrored` selects ping-pong tiling; the image is pre-flipped before
    /// upload so tile 0 renders upright.
    pub fn create_node(
        &self,
        ctx: &RenderCtx<'_>,
        image: &RgbaImage,
        mirrored: bool,
    ) -> Result<ImageLayerNode, LayerError> {
        ImageLayerNode::new(ctx, &self.bind_group_layout, image, mirrored)
    }

    /// Publishes pending node state and draws `nodes` back-to-front in slice
    /// order.
    ///
    /// `clear` paints the target first; pass `None` to composite over
    /// existing content.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        clear: Option<wgpu::Color>,
        nodes: &mut [&mut ImageLayerNode],
    ) {
        self.ensure_pipeline(ctx);

        for node in nodes.iter_mut() {
            node.set_viewport(ctx.viewport);
            node.publish(ctx.queue);
        }

        let load = match clear {
            Some(color) => wgpu::LoadOp::Clear(color),
            None => wgpu::LoadOp::Load,
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("strata layer pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        rpass.set_pipeline(pipeline);

        for node in nodes.iter() {
            node.draw(&mut rpass);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader_src = include_str!("shaders/image_layer.wgsl");
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("strata layer shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("strata layer pipeline layout"),
                    bind_group_layouts: &[&self.bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("strata layer pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[LayerVertex::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        // Decoded images are straight-alpha, so classic
                        // src-alpha blending rather than premultiplied.
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
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

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),

                multiview_mask: None,
                cache: None,
            });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }
}
