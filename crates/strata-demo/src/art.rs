//! Procedural demo art.
//!
//! The demo ships no asset files; the backdrop images are generated at
//! startup and written into a scratch pack directory that the source
//! resolver points at.

use image::{Rgba, RgbaImage};

/// Vertical sky gradient, fully opaque. Tiles cleanly on the horizontal
/// axis, so the far layer can use plain repeat tiling.
pub fn sky(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        let t = y as f32 / height.max(1) as f32;
        let r = lerp(18.0, 90.0, t) as u8;
        let g = lerp(24.0, 140.0, t) as u8;
        let b = lerp(64.0, 200.0, t) as u8;
        Rgba([r, g, b, 255])
    })
}

/// Rolling-hill silhouette with a transparent sky above it.
///
/// Deliberately NOT horizontally tileable (the sine phase doesn't close),
/// which is exactly what mirrored tiling is for.
pub fn hills(width: u32, height: u32, base: f32, amplitude: f32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let phase = x as f32 / width.max(1) as f32 * std::f32::consts::PI * 2.7;
        let crest = base + amplitude * phase.sin();
        if (y as f32) >= crest * height as f32 {
            Rgba(color)
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
