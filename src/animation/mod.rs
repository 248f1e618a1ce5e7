//! Time-based position animation.
//!
//! All motion in the viewer (wheel groups, camera moves) is expressed as
//! named [`PositionTween`]s advanced by a [`TweenScheduler`] from an
//! injected monotonic timestamp, so headless tests drive animation with
//! synthetic clocks instead of waiting on wall time.

pub mod scheduler;
pub mod tween;

pub use scheduler::TweenScheduler;
pub use tween::{Easing, PositionTween};
