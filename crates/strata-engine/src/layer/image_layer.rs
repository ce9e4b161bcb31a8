use crate::coords::{Rect, Vec2};
use crate::render::layer::{ImageLayerNode, ImageLayerRenderer};
use crate::render::RenderCtx;

use super::scroll::ScrollTarget;
use super::{LayerError, LayerSource, LayerType, SourceResolver};

/// A scrolling, texture-tiled background layer.
///
/// Holds declared configuration (source, tiling mode, opacity) plus the live
/// scroll offsets, and rebuilds or updates its render node whenever the host
/// requests a repaint. Offsets are mutated every tick by a
/// [`ScrollBehavior`](super::ScrollBehavior) through the [`ScrollTarget`]
/// interface and read back on repaint.
///
/// Single-threaded by design: tick, geometry change, and repaint all happen
/// on the frame thread in that order, and one layer's state is never shared
/// with another.
#[derive(Debug)]
pub struct ImageLayer {
    source: LayerSource,
    layer_type: LayerType,
    opacity: f32,

    horizontal_offset: f32,
    vertical_offset: f32,

    // Cached from the node's texture on first paint; zero until then.
    image_width: f32,
    image_height: f32,

    bounds: Rect,

    geometry_changed: bool,
    layer_type_changed: bool,
    source_changed: bool,
}

impl ImageLayer {
    pub fn new(source: LayerSource, layer_type: LayerType) -> Self {
        Self {
            source,
            layer_type,
            opacity: 1.0,
            horizontal_offset: 0.0,
            vertical_offset: 0.0,
            image_width: 0.0,
            image_height: 0.0,
            bounds: Rect::empty(),
            geometry_changed: false,
            layer_type_changed: false,
            source_changed: false,
        }
    }

    pub fn source(&self) -> &LayerSource {
        &self.source
    }

    /// Changes the image source. The current node (and its cached natural
    /// size) is discarded on the next repaint.
    pub fn set_source(&mut self, source: LayerSource) {
        if self.source == source {
            return;
        }
        self.source = source;
        self.source_changed = true;
    }

    pub fn layer_type(&self) -> LayerType {
        self.layer_type
    }

    /// Switches between plain and mirrored tiling.
    ///
    /// Takes effect on the next repaint via the mirror uniform; the texture
    /// itself is only re-uploaded if the node is recreated.
    pub fn set_layer_type(&mut self, layer_type: LayerType) {
        if self.layer_type == layer_type {
            return;
        }
        self.layer_type = layer_type;
        self.layer_type_changed = true;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Updates the layer's paint area.
    ///
    /// Empty rects are stored (they make the next repaint yield no node) but
    /// do not flag a geometry rebuild. Non-finite rects are ignored; they
    /// would poison the aspect-ratio math.
    pub fn set_bounds(&mut self, bounds: Rect) {
        if !bounds.is_finite() {
            return;
        }
        if self.bounds == bounds {
            return;
        }
        self.bounds = bounds;
        if !bounds.is_empty() {
            self.geometry_changed = true;
        }
    }

    /// Natural image width in texture pixels (zero before the first paint).
    pub fn image_width(&self) -> f32 {
        self.image_width
    }

    /// Natural image height in texture pixels (zero before the first paint).
    pub fn image_height(&self) -> f32 {
        self.image_height
    }

    pub fn horizontal_offset(&self) -> f32 {
        self.horizontal_offset
    }

    pub fn vertical_offset(&self) -> f32 {
        self.vertical_offset
    }

    /// Synchronizes the render node with the layer state.
    ///
    /// Per-frame contract:
    /// 1. empty paint area → the old node is dropped, `Ok(None)`;
    /// 2. no node → resolve + decode the source, build a node, cache the
    ///    natural size;
    /// 3. push both scroll offsets (the node diff-suppresses repeats);
    /// 4. on a pending geometry change, recompute the content rect and push
    ///    it;
    /// 5. on a pending layer-type change, push the mirror flag.
    ///
    /// Errors from source resolution, decoding, or a zero-sized image
    /// propagate; there is no partial success.
    pub fn update_paint_node(
        &mut self,
        ctx: &RenderCtx<'_>,
        renderer: &ImageLayerRenderer,
        resolver: &SourceResolver,
        old_node: Option<ImageLayerNode>,
    ) -> Result<Option<ImageLayerNode>, LayerError> {
        if self.bounds.is_empty() {
            // Dropping the old node here releases its GPU resources.
            return Ok(None);
        }

        let mut node = old_node;
        if self.source_changed {
            self.source_changed = false;
            node = None;
        }

        let mut node = match node {
            Some(n) => n,
            None => {
                let path = resolver.resolve(&self.source)?;
                let img = image::open(&path)
                    .map_err(|source| LayerError::Decode {
                        uri: self.source.display_uri(),
                        source,
                    })?
                    .to_rgba8();

                let n = renderer.create_node(ctx, &img, self.layer_type.is_mirrored())?;

                self.image_width = n.natural_width();
                self.image_height = n.natural_height();

                let (tex_w, tex_h) = n.texture_size();
                log::debug!(
                    "layer node created: {} ({tex_w}x{tex_h})",
                    self.source.display_uri(),
                );

                // A fresh node starts with empty geometry.
                self.geometry_changed = true;
                n
            }
        };

        node.set_horizontal_offset(self.horizontal_offset);
        node.set_vertical_offset(self.vertical_offset);
        node.set_opacity(self.opacity);

        if self.layer_type_changed {
            node.set_mirrored(self.layer_type.is_mirrored());
            self.layer_type_changed = false;
        }

        if self.geometry_changed {
            let rect = content_rect(self.bounds.size.y, self.image_width, self.image_height);
            node.set_bounds(rect);
            self.geometry_changed = false;
        }

        Ok(Some(node))
    }
}

impl ScrollTarget for ImageLayer {
    fn offset(&self) -> Vec2 {
        Vec2::new(self.horizontal_offset, self.vertical_offset)
    }

    fn set_offset(&mut self, offset: Vec2) {
        self.horizontal_offset = offset.x;
        self.vertical_offset = offset.y;
    }

    fn natural_size(&self) -> Vec2 {
        Vec2::new(self.image_width, self.image_height)
    }

    fn layer_type(&self) -> LayerType {
        self.layer_type
    }
}

/// Content rect for the node: height-driven, width follows the image aspect
/// ratio.
///
/// Known limitation inherited from the behavior this reproduces: only
/// height-driven resizes come out right. Resizing to a width independent of
/// height is not handled, and the intended semantics for that case
/// (letterbox, crop, stretch) were never pinned down, so this deliberately
/// does not guess.
fn content_rect(height: f32, image_width: f32, image_height: f32) -> Rect {
    if image_height <= 0.0 {
        return Rect::empty();
    }

    let factor = image_width / image_height;
    Rect::new(0.0, 0.0, height * factor, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── content rect ──────────────────────────────────────────────────────

    #[test]
    fn content_rect_preserves_aspect_ratio() {
        let r = content_rect(300.0, 200.0, 100.0);
        assert_eq!(r, Rect::new(0.0, 0.0, 600.0, 300.0));
    }

    #[test]
    fn content_rect_square_image() {
        let r = content_rect(128.0, 64.0, 64.0);
        assert_eq!(r.size.x, 128.0);
        assert_eq!(r.size.y, 128.0);
    }

    #[test]
    fn content_rect_degenerate_image_is_empty() {
        assert!(content_rect(300.0, 200.0, 0.0).is_empty());
    }

    // ── dirty flags ───────────────────────────────────────────────────────

    #[test]
    fn empty_bounds_do_not_flag_geometry() {
        let mut layer = ImageLayer::new(
            LayerSource::from_uri("pack://sky.png"),
            LayerType::Normal,
        );

        layer.set_bounds(Rect::empty());
        assert!(!layer.geometry_changed);

        layer.set_bounds(Rect::new(0.0, 0.0, 800.0, 600.0));
        assert!(layer.geometry_changed);
    }

    #[test]
    fn non_finite_bounds_are_ignored() {
        let mut layer = ImageLayer::new(
            LayerSource::from_uri("pack://sky.png"),
            LayerType::Normal,
        );

        let good = Rect::new(0.0, 0.0, 800.0, 600.0);
        layer.set_bounds(good);
        layer.geometry_changed = false;

        layer.set_bounds(Rect::new(0.0, 0.0, f32::NAN, 600.0));
        assert_eq!(layer.bounds(), good);
        assert!(!layer.geometry_changed);

        layer.set_bounds(Rect::new(0.0, 0.0, f32::INFINITY, 600.0));
        assert_eq!(layer.bounds(), good);
        assert!(!layer.geometry_changed);
    }

    #[test]
    fn same_bounds_do_not_reflag_geometry() {
        let mut layer = ImageLayer::new(
            LayerSource::from_uri("pack://sky.png"),
            LayerType::Normal,
        );

        let b = Rect::new(0.0, 0.0, 800.0, 600.0);
        layer.set_bounds(b);
        layer.geometry_changed = false;

        layer.set_bounds(b);
        assert!(!layer.geometry_changed);
    }

    #[test]
    fn layer_type_change_is_flagged_once() {
        let mut layer = ImageLayer::new(
            LayerSource::from_uri("pack://sky.png"),
            LayerType::Normal,
        );

        layer.set_layer_type(LayerType::Normal);
        assert!(!layer.layer_type_changed);

        layer.set_layer_type(LayerType::Mirrored);
        assert!(layer.layer_type_changed);
        assert_eq!(layer.layer_type(), LayerType::Mirrored);
    }

    #[test]
    fn source_change_is_flagged() {
        let mut layer = ImageLayer::new(
            LayerSource::from_uri("pack://sky.png"),
            LayerType::Normal,
        );

        layer.set_source(LayerSource::from_uri("pack://sky.png"));
        assert!(!layer.source_changed);

        layer.set_source(LayerSource::from_uri("pack://hills.png"));
        assert!(layer.source_changed);
    }

    // ── scroll target view ────────────────────────────────────────────────

    #[test]
    fn scroll_target_round_trips_offsets() {
        let mut layer = ImageLayer::new(
            LayerSource::from_uri("pack://sky.png"),
            LayerType::Mirrored,
        );

        layer.set_offset(Vec2::new(-12.0, -3.0));
        assert_eq!(layer.offset(), Vec2::new(-12.0, -3.0));
        assert_eq!(layer.horizontal_offset(), -12.0);
        assert_eq!(layer.vertical_offset(), -3.0);
        assert_eq!(ScrollTarget::layer_type(&layer), LayerType::Mirrored);
    }
}
