//! GPU rendering subsystem.
//!
//! The layer renderer consumes `layer` state and issues GPU commands via
//! wgpu. Each renderer owns its pipeline; each node owns its texture,
//! geometry, and uniform snapshot.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - The vertex shader converts to NDC using a viewport uniform.

mod ctx;
pub mod layer;

pub use ctx::{RenderCtx, RenderTarget};
pub use layer::{ImageLayerNode, ImageLayerRenderer};
