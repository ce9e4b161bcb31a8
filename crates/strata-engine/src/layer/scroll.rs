use crate::coords::Vec2;

use super::LayerType;

/// Narrow view of a scrollable layer.
///
/// The scroll behavior only needs offsets, the natural image size, and the
/// tiling mode; it must not depend on a concrete layer type.
pub trait ScrollTarget {
    /// Current scroll offset in pixels. Always `<= 0` on both axes.
    fn offset(&self) -> Vec2;

    fn set_offset(&mut self, offset: Vec2);

    /// Natural image size in texture pixels. Zero until the backing texture
    /// has been created; offsets stay pinned at 0 until then.
    fn natural_size(&self) -> Vec2;

    fn layer_type(&self) -> LayerType;
}

/// Advances a layer's scroll offsets by a fixed per-axis step each tick,
/// wrapping them back into `[-(dim * modifier), 0]` so the tiled image
/// appears to scroll forever.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScrollBehavior {
    pub horizontal_step: f32,
    pub vertical_step: f32,
}

impl ScrollBehavior {
    #[inline]
    pub const fn new(horizontal_step: f32, vertical_step: f32) -> Self {
        Self {
            horizontal_step,
            vertical_step,
        }
    }

    /// Applies one scroll tick to `target`.
    ///
    /// `dt` is accepted for interface symmetry with the frame clock but does
    /// not scale the step; each tick advances exactly one step.
    pub fn advance(&self, target: &mut dyn ScrollTarget, dt: f32) {
        let _ = dt;

        let size = target.natural_size();
        let modifier = target.layer_type().wrap_modifier();
        let current = target.offset();

        let x = wrap_axis(current.x, self.horizontal_step, size.x * modifier);
        let y = wrap_axis(current.y, self.vertical_step, size.y * modifier);

        target.set_offset(Vec2::new(x, y));
    }
}

/// Advances one axis and renormalizes into `(-period, 0]`.
///
/// The far-end check runs before the origin check; keep that order, it
/// decides which bound wins on boundary-exact inputs. The result is rounded
/// with `ceil` so sub-pixel error cannot accumulate across ticks.
fn wrap_axis(offset: f32, step: f32, period: f32) -> f32 {
    let mut next = offset + step;

    if next <= -period {
        next = 0.0;
    } else if next >= 0.0 {
        next = -period;
    }

    next.ceil()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal stand-in for a layer.
    struct Fixture {
        offset: Vec2,
        size: Vec2,
        layer_type: LayerType,
    }

    impl Fixture {
        fn new(width: f32, height: f32, layer_type: LayerType) -> Self {
            Self {
                offset: Vec2::zero(),
                size: Vec2::new(width, height),
                layer_type,
            }
        }
    }

    impl ScrollTarget for Fixture {
        fn offset(&self) -> Vec2 {
            self.offset
        }
        fn set_offset(&mut self, offset: Vec2) {
            self.offset = offset;
        }
        fn natural_size(&self) -> Vec2 {
            self.size
        }
        fn layer_type(&self) -> LayerType {
            self.layer_type
        }
    }

    // ── wrap scenarios ────────────────────────────────────────────────────

    #[test]
    fn normal_layer_wraps_at_image_width() {
        let behavior = ScrollBehavior::new(-5.0, 0.0);
        let mut layer = Fixture::new(100.0, 50.0, LayerType::Normal);

        for _ in 0..19 {
            behavior.advance(&mut layer, 0.016);
        }
        assert_eq!(layer.offset.x, -95.0);

        // 20th tick reaches -100 <= -100 and wraps to the origin.
        behavior.advance(&mut layer, 0.016);
        assert_eq!(layer.offset.x, 0.0);
    }

    #[test]
    fn mirrored_layer_wraps_at_double_width() {
        let behavior = ScrollBehavior::new(-5.0, 0.0);
        let mut layer = Fixture::new(100.0, 50.0, LayerType::Mirrored);

        layer.offset = Vec2::new(-195.0, 0.0);
        behavior.advance(&mut layer, 0.016);
        assert_eq!(layer.offset.x, 0.0);
    }

    #[test]
    fn far_end_overshoot_still_wraps_to_origin() {
        let behavior = ScrollBehavior::new(-5.0, 0.0);
        let mut layer = Fixture::new(100.0, 50.0, LayerType::Mirrored);

        // -201 - 5 = -206 <= -200, same branch as the exact hit.
        layer.offset = Vec2::new(-201.0, 0.0);
        behavior.advance(&mut layer, 0.016);
        assert_eq!(layer.offset.x, 0.0);
    }

    #[test]
    fn positive_drift_snaps_to_far_end() {
        let behavior = ScrollBehavior::new(3.0, 0.0);
        let mut layer = Fixture::new(100.0, 50.0, LayerType::Normal);

        layer.offset = Vec2::new(-2.0, 0.0);
        behavior.advance(&mut layer, 0.016);
        assert_eq!(layer.offset.x, -100.0);
    }

    #[test]
    fn offsets_stay_in_wrap_range() {
        let behavior = ScrollBehavior::new(-7.0, -3.0);
        let mut layer = Fixture::new(64.0, 48.0, LayerType::Mirrored);

        for _ in 0..500 {
            behavior.advance(&mut layer, 0.016);
            assert!(layer.offset.x <= 0.0 && layer.offset.x > -128.0 - 7.0);
            assert!(layer.offset.y <= 0.0 && layer.offset.y > -96.0 - 3.0);
        }
    }

    // ── step edge cases ───────────────────────────────────────────────────

    #[test]
    fn zero_step_pins_interior_offset() {
        let behavior = ScrollBehavior::new(0.0, 0.0);
        let mut layer = Fixture::new(100.0, 50.0, LayerType::Normal);

        layer.offset = Vec2::new(-40.0, -10.0);
        for _ in 0..10 {
            behavior.advance(&mut layer, 0.016);
        }
        assert_eq!(layer.offset, Vec2::new(-40.0, -10.0));
    }

    #[test]
    fn fractional_steps_are_rounded_with_ceil() {
        let behavior = ScrollBehavior::new(-2.5, 0.0);
        let mut layer = Fixture::new(100.0, 50.0, LayerType::Normal);

        behavior.advance(&mut layer, 0.016);
        // ceil(-2.5) = -2, toward zero for negative offsets.
        assert_eq!(layer.offset.x, -2.0);

        behavior.advance(&mut layer, 0.016);
        assert_eq!(layer.offset.x, -4.0);
    }

    #[test]
    fn vertical_axis_wraps_independently() {
        let behavior = ScrollBehavior::new(0.0, -25.0);
        let mut layer = Fixture::new(100.0, 50.0, LayerType::Normal);

        layer.offset = Vec2::new(-40.0, -30.0);
        behavior.advance(&mut layer, 0.016);
        // y reaches -55 <= -50 and wraps; x sits still only because its
        // offset is interior and its step is zero.
        assert_eq!(layer.offset, Vec2::new(-40.0, 0.0));
    }

    #[test]
    fn zero_size_image_pins_at_origin() {
        // Before the first paint the natural size is unknown; the wrap range
        // collapses and the offset must stay at 0 instead of running away.
        let behavior = ScrollBehavior::new(-5.0, -5.0);
        let mut layer = Fixture::new(0.0, 0.0, LayerType::Normal);

        for _ in 0..3 {
            behavior.advance(&mut layer, 0.016);
        }
        assert_eq!(layer.offset, Vec2::zero());
    }
}
