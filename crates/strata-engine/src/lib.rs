//! Strata engine crate.
//!
//! Strata renders scrolling, texture-tiled background layers — the kind of
//! infinitely repeating parallax backdrop used behind side-scrolling scenes.
//! The crate owns the layer state machine (scroll offsets, wrap-around), the
//! GPU-side render node that keeps texture/geometry/uniforms in sync, and the
//! device plumbing needed to drive both.

pub mod coords;
pub mod device;
pub mod layer;
pub mod logging;
pub mod render;
pub mod time;
