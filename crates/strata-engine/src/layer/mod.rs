//! Background-layer state.
//!
//! Responsibilities:
//! - hold declared layer configuration (source, layer type, opacity)
//! - track scroll offsets and wrap them each tick
//! - synchronize a GPU render node on repaint with minimal invalidation
//!
//! Everything here is renderer-agnostic except [`ImageLayer::update_paint_node`],
//! which bridges into `render::layer`.

mod error;
mod image_layer;
mod scroll;
mod source;

pub use error::LayerError;
pub use image_layer::ImageLayer;
pub use scroll::{ScrollBehavior, ScrollTarget};
pub use source::{LayerSource, SourceResolver};

/// Tiling mode of a background layer.
///
/// `Mirrored` alternates reflected copies of the image (ping-pong tiling) to
/// hide the seam a plain repeat shows for non-tileable art. It also doubles
/// the wrap period used when clamping scroll offsets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LayerType {
    #[default]
    Normal,
    Mirrored,
}

impl LayerType {
    /// Multiplier applied to the natural image size when wrapping offsets.
    ///
    /// A mirrored layer repeats every two tiles, so its wrap period is twice
    /// the image dimension.
    #[inline]
    pub fn wrap_modifier(self) -> f32 {
        match self {
            LayerType::Normal => 1.0,
            LayerType::Mirrored => 2.0,
        }
    }

    #[inline]
    pub fn is_mirrored(self) -> bool {
        self == LayerType::Mirrored
    }
}
