//! CPU reference of the tiling formula in `shaders/image_layer.wgsl`.
//!
//! The fragment shader and this module must agree exactly; tests pin the
//! behavior here so shader edits have a ground truth to check against.

use crate::coords::Vec2;

/// Maps a texture coordinate plus a normalized scroll offset to the
/// coordinate actually sampled.
///
/// Non-mirrored layers simply shift; the repeat-addressing sampler tiles
/// anything outside `[0, 1)`. Mirrored layers ping-pong: even integer tiles
/// reflect the coordinate (the uploaded image is pre-flipped, so tile 0
/// still renders upright).
#[inline]
pub fn tiled_coord(uv: Vec2, offset: Vec2, mirrored: bool) -> Vec2 {
    Vec2::new(
        tiled_axis(uv.x, offset.x, mirrored),
        tiled_axis(uv.y, offset.y, mirrored),
    )
}

/// One axis of [`tiled_coord`].
///
/// `rem_euclid` matches GLSL/WGSL `mod` for negative coordinates, which
/// occur as soon as the layer scrolls left or up.
#[inline]
pub fn tiled_axis(coord: f32, offset: f32, mirrored: bool) -> f32 {
    let shifted = coord + offset;

    if mirrored && shifted.rem_euclid(2.0) < 1.0 {
        return 1.0 - coord - offset;
    }

    shifted
}
