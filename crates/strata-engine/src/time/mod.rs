//! Frame timing.
//!
//! The scroll state machine is fixed-step (one advance per tick); the clock
//! exists to pace the host loop and to hand layers a delta value on each tick.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
