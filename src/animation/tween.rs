use glam::Vec3;

use crate::scene::NodeHandle;

/// Interpolation curve for a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Slow start, fast middle, slow stop. The default for all viewer moves.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Maps normalized time `t` in `[0, 1]` onto the curve.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// A position interpolation task targeting one scene node.
///
/// Sampling is a pure function of `(start, end, now)`: stepping is
/// idempotent and frame-rate independent.
#[derive(Debug, Clone)]
pub struct PositionTween {
    pub target: NodeHandle,
    pub start: Vec3,
    pub end: Vec3,
    /// Timestamp (seconds) the tween was started at.
    pub start_time: f64,
    /// Duration in seconds; non-positive durations complete immediately.
    pub duration: f32,
    pub easing: Easing,
}

impl PositionTween {
    /// Samples the tween at `now`. Returns the position and whether the
    /// tween has finished. On and after the end time the returned position
    /// is exactly `end`, not an interpolated approximation.
    #[must_use]
    pub fn sample(&self, now: f64) -> (Vec3, bool) {
        let elapsed = (now - self.start_time) as f32;
        if self.duration <= 0.0 || elapsed >= self.duration {
            return (self.end, true);
        }
        let t = (elapsed / self.duration).max(0.0);
        let k = self.easing.apply(t);
        (self.start.lerp(self.end, k), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_in_out_endpoints_and_midpoint() {
        let e = Easing::CubicInOut;
        assert!((e.apply(0.0)).abs() < 1e-6);
        assert!((e.apply(1.0) - 1.0).abs() < 1e-6);
        assert!((e.apply(0.5) - 0.5).abs() < 1e-6);
        // Ease-in: first half stays below linear
        assert!(e.apply(0.25) < 0.25);
        assert!(e.apply(0.75) > 0.75);
        assert!((Easing::Linear.apply(0.3) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn sample_clamps_to_exact_end() {
        let tween = PositionTween {
            target: NodeHandle::default(),
            start: Vec3::ZERO,
            end: Vec3::new(1.0, 2.0, 3.0),
            start_time: 10.0,
            duration: 0.5,
            easing: Easing::CubicInOut,
        };
        let (pos, done) = tween.sample(11.0);
        assert!(done);
        assert_eq!(pos, Vec3::new(1.0, 2.0, 3.0));

        // Before the start, the curve holds at the start value.
        let (pos, done) = tween.sample(9.0);
        assert!(!done);
        assert_eq!(pos, Vec3::ZERO);
    }
}
