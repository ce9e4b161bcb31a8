use std::fmt;

/// Failure while building or refreshing a layer's render node.
///
/// An empty paint area is not an error; `update_paint_node` reports it as
/// `Ok(None)` (a valid "nothing to render" state).
#[derive(Debug)]
pub enum LayerError {
    /// The decoded image has a zero dimension. A render node over such a
    /// texture cannot normalize offsets; construction fails hard instead of
    /// rendering garbage.
    DegenerateTexture { width: u32, height: u32 },

    /// The layer source could not be mapped to a local path.
    UnresolvedSource { uri: String },

    /// The resolved file could not be opened or decoded.
    Decode {
        uri: String,
        source: image::ImageError,
    },
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerError::DegenerateTexture { width, height } => {
                write!(f, "degenerate texture: {width}x{height} source image")
            }
            LayerError::UnresolvedSource { uri } => {
                write!(f, "unresolved layer source: {uri}")
            }
            LayerError::Decode { uri, source } => {
                write!(f, "failed to decode layer source {uri}: {source}")
            }
        }
    }
}

impl std::error::Error for LayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayerError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}
