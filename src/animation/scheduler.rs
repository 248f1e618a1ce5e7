use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::animation::tween::{Easing, PositionTween};
use crate::scene::{NodeHandle, Scene};

/// Advances a collection of named position tweens.
///
/// Names are stable task identities: starting a tween under a name that is
/// already animating replaces the old task, so a second explode toggle
/// re-targets each wheel group smoothly from wherever it currently is.
/// Completed tweens write their exact end value before being dropped,
/// which is what makes implode land on bit-identical rest positions.
#[derive(Default)]
pub struct TweenScheduler {
    tweens: FxHashMap<String, PositionTween>,
}

impl TweenScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or replaces) the tween named `name`, animating `target` from
    /// its current local position to `end` over `duration` seconds.
    pub fn start(
        &mut self,
        name: impl Into<String>,
        scene: &Scene,
        target: NodeHandle,
        end: Vec3,
        duration: f32,
        now: f64,
    ) {
        let Some(node) = scene.get_node(target) else {
            return;
        };
        self.tweens.insert(
            name.into(),
            PositionTween {
                target,
                start: node.transform.position,
                end,
                start_time: now,
                duration,
                easing: Easing::CubicInOut,
            },
        );
    }

    /// Steps every task to `now`, writing node positions. Finished tasks
    /// are removed after snapping to their exact end value.
    pub fn advance(&mut self, scene: &mut Scene, now: f64) {
        self.tweens.retain(|_, tween| {
            let (pos, done) = tween.sample(now);
            if let Some(node) = scene.get_node_mut(tween.target) {
                node.transform.position = pos;
                node.transform.mark_dirty();
                !done
            } else {
                // Target was removed (asset teardown); drop the task.
                false
            }
        });
    }

    pub fn cancel(&mut self, name: &str) {
        self.tweens.remove(name);
    }

    /// Drops every task without touching the scene. Part of the teardown
    /// path that must run before a new asset is accepted.
    pub fn clear(&mut self) {
        self.tweens.clear();
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tweens.contains_key(name)
    }
}
