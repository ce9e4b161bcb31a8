//! Image-layer rendering.
//!
//! Split the same way as the CPU/GPU boundary:
//! - `sampler` — the wrap/mirror coordinate formula (CPU reference of the
//!   fragment shader)
//! - `uniforms` — pending/published uniform snapshot with dirty tracking
//! - `node` — per-layer GPU resources (texture, quad, uniform buffer)
//! - `renderer` — shared pipeline + render pass

mod node;
mod renderer;
pub mod sampler;
mod uniforms;

pub use node::ImageLayerNode;
pub use renderer::ImageLayerRenderer;
