use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;

/// GPU uniform block for the image-layer shader.
///
/// `scroll` is the offset in texture space: `-pixels / natural_dim` per axis.
/// `mirrored` is 1.0/0.0 (shaders have no booleans).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct LayerUniforms {
    pub viewport: [f32; 2],
    pub scroll: [f32; 2],
    pub mirrored: f32,
    pub opacity: f32,
    pub _pad: [f32; 2], // 16-byte alignment
}

impl Default for LayerUniforms {
    fn default() -> Self {
        Self {
            viewport: [0.0, 0.0],
            scroll: [0.0, 0.0],
            mirrored: 0.0,
            opacity: 1.0,
            _pad: [0.0, 0.0],
        }
    }
}

/// Pending uniform values plus the last-published snapshot.
///
/// Mutators write into `pending` and flag the material dirty only when the
/// value actually changed; `take_material` republishes only when the pending
/// block differs from what the GPU already has. Both dirty flags are
/// transient and cleared once consumed.
#[derive(Debug, Default)]
pub(super) struct UniformState {
    pending: LayerUniforms,
    published: Option<LayerUniforms>,
    material_dirty: bool,
    geometry_dirty: bool,
}

impl UniformState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the horizontal scroll offset, normalized against the natural
    /// image width. A zero-width image degrades to offset 0 rather than
    /// dividing by zero.
    pub fn set_horizontal_offset(&mut self, pixels: f32, natural_width: f32) {
        let normalized = if natural_width > 0.0 {
            -(pixels / natural_width)
        } else {
            0.0
        };
        self.set_scroll_x(normalized);
    }

    /// Vertical counterpart of [`set_horizontal_offset`].
    pub fn set_vertical_offset(&mut self, pixels: f32, natural_height: f32) {
        let normalized = if natural_height > 0.0 {
            -(pixels / natural_height)
        } else {
            0.0
        };
        self.set_scroll_y(normalized);
    }

    pub fn set_mirrored(&mut self, mirrored: bool) {
        let value = if mirrored { 1.0 } else { 0.0 };
        if self.pending.mirrored != value {
            self.pending.mirrored = value;
            self.material_dirty = true;
        }
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        if self.pending.opacity != opacity {
            self.pending.opacity = opacity;
            self.material_dirty = true;
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        let value = [viewport.width, viewport.height];
        if self.pending.viewport != value {
            self.pending.viewport = value;
            self.material_dirty = true;
        }
    }

    pub fn mark_geometry_dirty(&mut self) {
        self.geometry_dirty = true;
    }

    /// Consumes the geometry flag.
    pub fn take_geometry(&mut self) -> bool {
        std::mem::take(&mut self.geometry_dirty)
    }

    /// Returns the uniform block to upload, or `None` if the published state
    /// is already current. The first call always publishes (nothing on the
    /// GPU yet).
    pub fn take_material(&mut self) -> Option<LayerUniforms> {
        self.material_dirty = false;

        if self.published == Some(self.pending) {
            return None;
        }

        self.published = Some(self.pending);
        Some(self.pending)
    }

    fn set_scroll_x(&mut self, normalized: f32) {
        if self.pending.scroll[0] != normalized {
            self.pending.scroll[0] = normalized;
            self.material_dirty = true;
        }
    }

    fn set_scroll_y(&mut self, normalized: f32) {
        if self.pending.scroll[1] != normalized {
            self.pending.scroll[1] = normalized;
            self.material_dirty = true;
        }
    }

    #[cfg(test)]
    pub fn pending(&self) -> &LayerUniforms {
        &self.pending
    }

    #[cfg(test)]
    pub fn is_material_dirty(&self) -> bool {
        self.material_dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── normalization ─────────────────────────────────────────────────────

    #[test]
    fn offset_is_normalized_against_natural_size() {
        let mut state = UniformState::new();
        state.set_horizontal_offset(25.0, 100.0);
        state.set_vertical_offset(10.0, 50.0);

        assert_eq!(state.pending().scroll, [-0.25, -0.2]);
    }

    #[test]
    fn normalized_offset_round_trips_to_pixels() {
        let mut state = UniformState::new();
        let pixels = -37.0;
        let width = 128.0;
        state.set_horizontal_offset(pixels, width);

        let recovered = -state.pending().scroll[0] * width;
        assert!((recovered - pixels).abs() < 1e-4);
    }

    #[test]
    fn zero_width_image_degrades_to_zero_offset() {
        let mut state = UniformState::new();
        state.set_horizontal_offset(25.0, 0.0);

        assert_eq!(state.pending().scroll[0], 0.0);
        assert!(!state.is_material_dirty());
    }

    // ── diff suppression ──────────────────────────────────────────────────

    #[test]
    fn first_publish_always_pushes() {
        let mut state = UniformState::new();
        assert!(state.take_material().is_some());
        assert!(state.take_material().is_none());
    }

    #[test]
    fn repeating_an_offset_does_not_redirty() {
        let mut state = UniformState::new();
        state.set_horizontal_offset(25.0, 100.0);
        assert!(state.take_material().is_some());

        state.set_horizontal_offset(25.0, 100.0);
        assert!(!state.is_material_dirty());
        assert!(state.take_material().is_none());
    }

    #[test]
    fn changing_an_offset_republishes() {
        let mut state = UniformState::new();
        state.set_horizontal_offset(25.0, 100.0);
        assert!(state.take_material().is_some());

        state.set_horizontal_offset(30.0, 100.0);
        let block = state.take_material().expect("changed offset must publish");
        assert_eq!(block.scroll[0], -0.3);
    }

    #[test]
    fn mirrored_flag_publishes_as_float() {
        let mut state = UniformState::new();
        state.set_mirrored(true);
        assert_eq!(state.pending().mirrored, 1.0);

        state.set_mirrored(true);
        let _ = state.take_material();
        state.set_mirrored(true);
        assert!(state.take_material().is_none());

        state.set_mirrored(false);
        assert_eq!(state.take_material().map(|u| u.mirrored), Some(0.0));
    }

    #[test]
    fn viewport_change_marks_material() {
        let mut state = UniformState::new();
        state.set_viewport(Viewport::new(800.0, 600.0));
        let _ = state.take_material();

        state.set_viewport(Viewport::new(800.0, 600.0));
        assert!(state.take_material().is_none());

        state.set_viewport(Viewport::new(1024.0, 600.0));
        assert!(state.take_material().is_some());
    }

    // ── geometry flag ─────────────────────────────────────────────────────

    #[test]
    fn geometry_flag_is_transient() {
        let mut state = UniformState::new();
        assert!(!state.take_geometry());

        state.mark_geometry_dirty();
        assert!(state.take_geometry());
        assert!(!state.take_geometry());
    }
}
