use bytemuck::{Pod, Zeroable};
use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::coords::{Rect, Viewport};
use crate::layer::LayerError;
use crate::render::RenderCtx;

use super::uniforms::UniformState;

/// Per-layer GPU state: one texture, one quad, one uniform block.
///
/// The node owns its resources exclusively; dropping it releases them. All
/// mutators are cheap CPU writes — nothing reaches the GPU until
/// [`publish`](Self::publish), which uploads only what actually changed.
pub struct ImageLayerNode {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    uniform_buf: wgpu::Buffer,
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,

    state: UniformState,
    vertices: [LayerVertex; 4],

    natural_width: f32,
    natural_height: f32,
}

impl ImageLayerNode {
    /// Uploads `image` and builds the node's GPU resources.
    ///
    /// Mirrored layers pre-flip the image horizontally before upload: the
    /// mirror formula treats even tiles as the reflected ones, so the flip
    /// keeps the first visible tile upright.
    ///
    /// Fails with [`LayerError::DegenerateTexture`] for zero-sized images.
    pub(super) fn new(
        ctx: &RenderCtx<'_>,
        bind_group_layout: &wgpu::BindGroupLayout,
        image: &RgbaImage,
        mirrored: bool,
    ) -> Result<Self, LayerError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(LayerError::DegenerateTexture { width, height });
        }

        let flipped;
        let pixels: &RgbaImage = if mirrored {
            flipped = image::imageops::flip_horizontal(image);
            &flipped
        } else {
            image
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("strata layer texture"),
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

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels.as_raw(),
            wgpu::TexelCopyBufferLayout {
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

        // Repeat addressing does the tiling; the shader only shifts/reflects.
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("strata layer sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let uniform_buf = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("strata layer ubo"),
            size: std::mem::size_of::<super::uniforms::LayerUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Geometry starts empty, like a freshly attached scene node; the
        // first set_bounds gives it area.
        let vertices = quad_vertices(Rect::empty());

        let vertex_buf = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("strata layer vbo"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

        let index_buf = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("strata layer ibo"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("strata layer bind group"),
            layout: bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let mut state = UniformState::new();
        state.set_mirrored(mirrored);

        Ok(Self {
            texture,
            bind_group,
            uniform_buf,
            vertex_buf,
            index_buf,
            state,
            vertices,
            natural_width: width as f32,
            natural_height: height as f32,
        })
    }

    /// Natural image width in texture pixels.
    pub fn natural_width(&self) -> f32 {
        self.natural_width
    }

    /// Natural image height in texture pixels.
    pub fn natural_height(&self) -> f32 {
        self.natural_height
    }

    /// Rewrites the quad to cover `bounds` with full-unit UVs.
    ///
    /// Empty rects are accepted; the quad collapses and draws nothing. The
    /// orchestrator normally reports "no node" before that can happen.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.vertices = quad_vertices(bounds);
        self.state.mark_geometry_dirty();
    }

    /// Stores the horizontal scroll offset in pixels.
    pub fn set_horizontal_offset(&mut self, pixels: f32) {
        self.state
            .set_horizontal_offset(pixels, self.natural_width);
    }

    /// Stores the vertical scroll offset in pixels.
    pub fn set_vertical_offset(&mut self, pixels: f32) {
        self.state
            .set_vertical_offset(pixels, self.natural_height);
    }

    pub fn set_mirrored(&mut self, mirrored: bool) {
        self.state.set_mirrored(mirrored);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.state.set_opacity(opacity);
    }

    pub(super) fn set_viewport(&mut self, viewport: Viewport) {
        self.state.set_viewport(viewport);
    }

    /// Uploads pending state, skipping anything the GPU already has.
    pub(super) fn publish(&mut self, queue: &wgpu::Queue) {
        if self.state.take_geometry() {
            queue.write_buffer(&self.vertex_buf, 0, bytemuck::cast_slice(&self.vertices));
        }

        if let Some(block) = self.state.take_material() {
            queue.write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(&block));
        }
    }

    pub(super) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rpass.set_index_buffer(self.index_buf.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }

    /// Size of the backing texture, for diagnostics.
    pub fn texture_size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct LayerVertex {
    pos: [f32; 2], // logical px
    uv: [f32; 2],
}

impl LayerVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LayerVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

fn quad_vertices(bounds: Rect) -> [LayerVertex; 4] {
    let r = bounds.normalized();
    let min = r.origin;
    let max = r.origin + r.size;

    [
        LayerVertex { pos: [min.x, min.y], uv: [0.0, 0.0] },
        LayerVertex { pos: [max.x, min.y], uv: [1.0, 0.0] },
        LayerVertex { pos: [max.x, max.y], uv: [1.0, 1.0] },
        LayerVertex { pos: [min.x, max.y], uv: [0.0, 1.0] },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── quad geometry ─────────────────────────────────────────────────────

    #[test]
    fn quad_covers_bounds_with_unit_uvs() {
        let q = quad_vertices(Rect::new(10.0, 20.0, 100.0, 50.0));

        assert_eq!(q[0].pos, [10.0, 20.0]);
        assert_eq!(q[1].pos, [110.0, 20.0]);
        assert_eq!(q[2].pos, [110.0, 70.0]);
        assert_eq!(q[3].pos, [10.0, 70.0]);

        assert_eq!(q[0].uv, [0.0, 0.0]);
        assert_eq!(q[2].uv, [1.0, 1.0]);
    }

    #[test]
    fn empty_bounds_collapse_the_quad() {
        let q = quad_vertices(Rect::empty());

        for v in &q {
            assert_eq!(v.pos, [0.0, 0.0]);
            assert!(v.pos[0].is_finite() && v.pos[1].is_finite());
        }
        // UVs keep the unit mapping even when the quad has no area.
        assert_eq!(q[0].uv, [0.0, 0.0]);
        assert_eq!(q[2].uv, [1.0, 1.0]);
    }

    #[test]
    fn negative_size_bounds_are_folded() {
        let q = quad_vertices(Rect::new(10.0, 10.0, -4.0, -2.0));

        assert_eq!(q[0].pos, [6.0, 8.0]);
        assert_eq!(q[2].pos, [10.0, 10.0]);
        for v in &q {
            assert!(v.pos[0].is_finite() && v.pos[1].is_finite());
        }
    }
}
