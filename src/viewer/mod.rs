//! Viewer controller.
//!
//! All viewer state lives in one struct: the current asset root, the
//! derived classification sets, the wheel groups, the explode flag, and the
//! animation scheduler. Hosts own a `Viewer`, feed it monotonic timestamps
//! once per frame, and read back notices and anchors; multiple independent
//! viewers can coexist.

pub mod camera;
pub mod classify;
pub mod config;
pub mod explode;
pub mod hotspots;
pub mod loading;
pub mod paint;
pub mod spatial;
pub mod wheels;

pub use camera::{CameraFraming, ViewPreset};
pub use classify::{Classification, ClassifierConfig};
pub use config::ViewerConfig;
pub use explode::ExplodeController;
pub use hotspots::HotspotAnchors;
pub use loading::LoadingIndicator;
pub use paint::Finish;
pub use wheels::{Quadrant, WheelGroup};

use std::path::Path;

use bitflags::bitflags;
use glam::Vec3;

use crate::animation::TweenScheduler;
use crate::assets::GltfLoader;
use crate::errors::Result;
use crate::resources::geometry::BoundingBox;
use crate::resources::material::MaterialData;
use crate::scene::{MaterialKey, NodeHandle, Scene};

/// Uniform scale target: the largest extent of a normalized asset.
const TARGET_SIZE: f32 = 6.5;
/// Rest height of the asset root above the ground plane.
const REST_HEIGHT: f32 = 0.7;
/// Diagnostic highlight duration.
const HIGHLIGHT_SECS: f64 = 0.5;
/// Diagnostic highlight emissive (orange) and intensity.
const HIGHLIGHT_EMISSIVE: Vec3 = Vec3::new(1.0, 0.266, 0.0);
const HIGHLIGHT_INTENSITY: f32 = 0.9;
/// Camera preset move duration.
const CAMERA_MOVE_SECS: f32 = 0.65;
const CAMERA_TASK: &str = "camera";
const DEFAULT_FOV_DEGREES: f32 = 55.0;

bitflags! {
    /// Transient view options.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ViewFlags: u32 {
        const AUTOROTATE    = 1 << 0;
        const WIREFRAME     = 1 << 1;
        const SHOW_HOTSPOTS = 1 << 2;
    }
}

impl Default for ViewFlags {
    fn default() -> Self {
        ViewFlags::AUTOROTATE | ViewFlags::SHOW_HOTSPOTS
    }
}

/// Saved emissive state for the diagnostic candidate highlight.
struct Highlight {
    entries: Vec<(MaterialKey, Vec3, f32)>,
    until: f64,
}

pub struct Viewer {
    pub scene: Scene,

    classifier_config: ClassifierConfig,
    camera_node: Option<NodeHandle>,
    camera_target: Vec3,
    fov_degrees: f32,

    car_root: Option<NodeHandle>,
    car_bbox: Option<BoundingBox>,
    body_parts: Vec<NodeHandle>,
    glass_parts: Vec<NodeHandle>,
    wheel_groups: Vec<WheelGroup>,

    explode: ExplodeController,
    scheduler: TweenScheduler,
    flags: ViewFlags,
    loading: LoadingIndicator,
    highlight: Option<Highlight>,
    notices: Vec<String>,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            classifier_config: ClassifierConfig::default(),
            camera_node: None,
            camera_target: Vec3::ZERO,
            fov_degrees: DEFAULT_FOV_DEGREES,
            car_root: None,
            car_bbox: None,
            body_parts: Vec::new(),
            glass_parts: Vec::new(),
            wheel_groups: Vec::new(),
            explode: ExplodeController::new(),
            scheduler: TweenScheduler::new(),
            flags: ViewFlags::default(),
            loading: LoadingIndicator::new(),
            highlight: None,
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_classifier_config(mut self, config: ClassifierConfig) -> Self {
        self.classifier_config = config;
        self
    }

    /// Creates the viewer-owned camera node. Optional: headless hosts can
    /// skip this and framing becomes a no-op.
    pub fn enable_camera(&mut self, fov_degrees: f32) -> NodeHandle {
        let node = self.scene.create_node_with_name("Camera");
        self.camera_node = Some(node);
        self.fov_degrees = fov_degrees;
        node
    }

    // ========================================================================
    // Asset loading
    // ========================================================================

    /// Loads an asset, replacing the current one.
    ///
    /// The previous asset and everything derived from it (wheel groups,
    /// classification sets, in-flight tweens, highlight, explode flag) is
    /// torn down before the new file is read, so a stale animation can
    /// never touch the new scene. On error the viewer is left empty but
    /// functional.
    pub fn load_asset(&mut self, path: impl AsRef<Path>, now: f64) -> Result<()> {
        self.loading.begin(now);
        self.dispose_current();
        let result = match GltfLoader::load(path.as_ref(), &mut self.scene) {
            Ok(root) => {
                self.present_root(root, now);
                Ok(())
            }
            Err(err) => Err(err),
        };
        self.loading.finish();
        result
    }

    /// Accepts an already-instantiated scene subtree as the current asset.
    ///
    /// This is the core entry point: the loaded scene graph is an opaque
    /// input, and [`Viewer::load_asset`] is merely glTF glue over it. The
    /// previous asset is torn down first, so `root` must not belong to it.
    pub fn adopt_root(&mut self, root: NodeHandle, now: f64) {
        self.dispose_current();
        self.present_root(root, now);
    }

    /// Marks an externally-driven (e.g. network) load as started so the
    /// indicator and its UX timeout cover host-side transfers too.
    pub fn begin_external_load(&mut self, now: f64) {
        self.loading.begin(now);
    }

    pub fn finish_external_load(&mut self) {
        self.loading.finish();
    }

    /// Loads `path`, falling back to a known-good asset on failure. Both
    /// failures surface as notices; neither is fatal.
    pub fn load_or_fallback(
        &mut self,
        path: impl AsRef<Path>,
        fallback: impl AsRef<Path>,
        now: f64,
    ) {
        let path = path.as_ref();
        if let Err(err) = self.load_asset(path, now) {
            log::warn!("Failed to load {}: {err}", path.display());
            self.notice(format!(
                "Could not load \"{}\"; loading the demo model.",
                path.display()
            ));
            if let Err(err) = self.load_asset(fallback.as_ref(), now) {
                log::error!("Failed to load fallback asset: {err}");
                self.notice("Could not load the demo model.".to_owned());
            }
        }
    }

    /// Runs the presentation pipeline on a freshly adopted root:
    /// normalize → classify → highlight → group → paint → frame.
    fn present_root(&mut self, root: NodeHandle, now: f64) {
        self.normalize(root);
        self.scene.update_matrix_world();
        let bbox = self
            .scene
            .compute_world_bbox(root)
            .unwrap_or(BoundingBox::EMPTY);

        let classification =
            classify::classify(&self.scene, root, &bbox, &self.classifier_config);
        self.highlight_candidates(&classification.wheel_candidates, now);

        let groups =
            wheels::group_by_quadrant(&mut self.scene, &classification.wheel_candidates, bbox.center());
        self.scene.update_matrix_world();

        paint::apply_default_paint(&mut self.scene, &classification.body_parts);

        self.body_parts = classification.body_parts;
        self.glass_parts = classification.glass_parts;
        self.wheel_groups = groups;
        self.car_root = Some(root);
        // Degenerate boxes stay None so consumers (hotspots, framing) skip
        // instead of propagating NaN.
        self.car_bbox = bbox.is_valid().then_some(bbox);

        self.frame_camera();

        log::info!(
            "Model ready: {} body parts, {} glass parts, {} wheel groups",
            self.body_parts.len(),
            self.glass_parts.len(),
            self.wheel_groups.len(),
        );
    }

    /// Uniformly scales and recenters the asset so differently sized files
    /// present identically. Malformed bounds (empty or non-finite) skip
    /// normalization and use fixed default placement instead.
    fn normalize(&mut self, root: NodeHandle) {
        self.scene.update_matrix_world();
        let bbox = self.scene.compute_world_bbox(root);

        match bbox {
            Some(b) if b.is_valid() => {
                let size = b.size();
                let dim = |v: f32| if v > 0.0 { v } else { 1.0 };
                let max_dim = dim(size.x).max(dim(size.y)).max(dim(size.z));
                let scale = TARGET_SIZE / max_dim;

                if let Some(node) = self.scene.get_node_mut(root) {
                    node.transform.scale = Vec3::splat(scale);
                }
                self.scene.update_subtree(root);

                // Recenter against the post-scale box.
                if let Some(scaled) = self.scene.compute_world_bbox(root) {
                    let center = scaled.center();
                    if let Some(node) = self.scene.get_node_mut(root) {
                        node.transform.position -= center;
                        node.transform.position.y = REST_HEIGHT;
                    }
                }
                self.scene.update_subtree(root);
            }
            _ => {
                log::warn!("Empty or non-finite bounds; skipping scale/center normalization");
                if let Some(node) = self.scene.get_node_mut(root) {
                    node.transform.position = Vec3::new(0.0, REST_HEIGHT, 0.0);
                    node.transform.scale = Vec3::ONE;
                }
                self.scene.update_subtree(root);
            }
        }
    }

    /// Tears down the previous asset and every derived structure. Must run
    /// to completion before a new root is accepted.
    fn dispose_current(&mut self) {
        self.scheduler.clear();
        self.highlight = None;

        for group in std::mem::take(&mut self.wheel_groups) {
            self.scene.remove_node(group.node);
        }
        if let Some(root) = self.car_root.take() {
            self.scene.remove_node(root);
        }

        self.body_parts.clear();
        self.glass_parts.clear();
        self.car_bbox = None;
        self.explode.reset_state();
    }

    // ========================================================================
    // Frame update
    // ========================================================================

    /// Advances animations and housekeeping to `now` (monotonic seconds).
    /// Call once per display refresh; each step is idempotent in `now`.
    pub fn update(&mut self, now: f64) {
        self.scheduler.advance(&mut self.scene, now);
        self.scene.update_matrix_world();

        if let Some(camera) = self.camera_node {
            let target = self.camera_target;
            if let Some(node) = self.scene.get_node_mut(camera) {
                node.transform.look_at(target, Vec3::Y);
            }
        }

        if self
            .highlight
            .as_ref()
            .is_some_and(|h| now >= h.until)
        {
            self.revert_highlight();
        }

        if self.loading.check_timeout(now) {
            self.notice("Loading the model is taking too long.".to_owned());
        }
    }

    // ========================================================================
    // Explode
    // ========================================================================

    /// Toggles the explode animation. With no wheel groups this is a no-op
    /// apart from a user-visible notice.
    pub fn toggle_explode(&mut self, now: f64) {
        let toggled = match self.car_root {
            Some(root) => self.explode.toggle(
                &mut self.scene,
                root,
                &self.wheel_groups,
                &mut self.scheduler,
                now,
            ),
            None => false,
        };
        if !toggled {
            self.notice("No wheels detected in the model.".to_owned());
        }
    }

    #[must_use]
    pub fn is_exploded(&self) -> bool {
        self.explode.is_exploded()
    }

    // ========================================================================
    // Paint & finish
    // ========================================================================

    pub fn set_body_color(&mut self, color: Vec3) {
        paint::set_body_color(&mut self.scene, &self.body_parts, color);
    }

    pub fn set_finish(&mut self, finish: Finish) {
        paint::set_finish(&mut self.scene, &self.body_parts, finish);
    }

    /// Finish inferred from the first body material; `Gloss` when there is
    /// nothing to inspect.
    #[must_use]
    pub fn current_finish(&self) -> Finish {
        self.first_body_material()
            .map_or(Finish::Gloss, paint::infer_finish)
    }

    /// Current body color; white when nothing is loaded.
    #[must_use]
    pub fn current_body_color(&self) -> Vec3 {
        self.first_body_material()
            .and_then(crate::resources::material::Material::as_physical)
            .map_or(paint::DEFAULT_BODY_COLOR, |m| m.color.truncate())
    }

    fn first_body_material(&self) -> Option<&crate::resources::material::Material> {
        let handle = self.body_parts.first()?;
        let key = self.scene.node_material_keys(*handle).first().copied()?;
        self.scene.get_material(key)
    }

    // ========================================================================
    // View flags
    // ========================================================================

    #[must_use]
    pub fn flags(&self) -> ViewFlags {
        self.flags
    }

    pub fn set_autorotate(&mut self, enabled: bool) {
        self.flags.set(ViewFlags::AUTOROTATE, enabled);
    }

    pub fn set_show_hotspots(&mut self, enabled: bool) {
        self.flags.set(ViewFlags::SHOW_HOTSPOTS, enabled);
    }

    /// Wireframe applies to body and glass materials; wheels keep their
    /// authored look.
    pub fn set_wireframe(&mut self, enabled: bool) {
        self.flags.set(ViewFlags::WIREFRAME, enabled);
        let mut keys: Vec<MaterialKey> = Vec::new();
        for &handle in self.body_parts.iter().chain(self.glass_parts.iter()) {
            for key in self.scene.node_material_keys(handle) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        for key in keys {
            if let Some(material) = self.scene.get_material_mut(key) {
                material.settings.wireframe = enabled;
            }
        }
    }

    // ========================================================================
    // Camera
    // ========================================================================

    /// Snaps the camera to frame the current asset.
    pub fn frame_camera(&mut self) {
        let (Some(camera), Some(bbox)) = (self.camera_node, self.car_bbox) else {
            return;
        };
        let framing = camera::fit_to_bbox(&bbox, self.fov_degrees);
        self.camera_target = framing.target;
        if let Some(node) = self.scene.get_node_mut(camera) {
            node.transform.position = framing.position;
            node.transform.look_at(framing.target, Vec3::Y);
        }
        self.scene.update_subtree(camera);
    }

    /// Tweens the camera to a canned viewpoint. A new move replaces any
    /// in-flight one.
    pub fn move_camera_to(&mut self, preset: ViewPreset, now: f64) {
        let (Some(camera), Some(bbox)) = (self.camera_node, self.car_bbox) else {
            return;
        };
        // Manual viewpoints pause the turntable, as interactive controls do.
        self.flags.remove(ViewFlags::AUTOROTATE);
        let end = camera::preset_position(&bbox, preset);
        self.scheduler
            .start(CAMERA_TASK, &self.scene, camera, end, CAMERA_MOVE_SECS, now);
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Restores paint, finish, and view flags to defaults, settles all
    /// wheel groups back to their rest positions (whatever the current
    /// toggle state), and reframes the camera. Safe to call in any state,
    /// including before any asset is loaded.
    pub fn reset(&mut self, now: f64) {
        self.set_body_color(paint::DEFAULT_BODY_COLOR);
        self.set_finish(Finish::Gloss);
        self.set_wireframe(false);
        self.set_autorotate(true);

        self.explode
            .settle(&self.scene, &self.wheel_groups, &mut self.scheduler, now);

        self.frame_camera();
    }

    // ========================================================================
    // Config persistence
    // ========================================================================

    #[must_use]
    pub fn current_config(&self) -> ViewerConfig {
        ViewerConfig {
            color: self.current_body_color().to_array(),
            finish: self.current_finish(),
            autorotate: self.flags.contains(ViewFlags::AUTOROTATE),
        }
    }

    pub fn save_config(&self, path: impl AsRef<Path>) -> Result<()> {
        self.current_config().save(path)
    }

    pub fn apply_config(&mut self, config: &ViewerConfig) {
        self.set_body_color(Vec3::from_array(config.color));
        self.set_finish(config.finish);
        self.set_autorotate(config.autorotate);
    }

    pub fn load_config(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let config = ViewerConfig::load(path)?;
        self.apply_config(&config);
        Ok(())
    }

    // ========================================================================
    // Queries & notices
    // ========================================================================

    #[must_use]
    pub fn car_root(&self) -> Option<NodeHandle> {
        self.car_root
    }

    #[must_use]
    pub fn car_bbox(&self) -> Option<BoundingBox> {
        self.car_bbox
    }

    #[must_use]
    pub fn body_parts(&self) -> &[NodeHandle] {
        &self.body_parts
    }

    #[must_use]
    pub fn glass_parts(&self) -> &[NodeHandle] {
        &self.glass_parts
    }

    #[must_use]
    pub fn wheel_groups(&self) -> &[WheelGroup] {
        &self.wheel_groups
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.is_visible()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.scheduler.is_idle()
    }

    /// Hotspot anchors for the host's UI markers, when an asset is loaded.
    #[must_use]
    pub fn hotspot_anchors(&self) -> Option<HotspotAnchors> {
        self.car_bbox.as_ref().map(hotspots::anchors)
    }

    /// Drains queued user-visible notices.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn notice(&mut self, message: String) {
        log::info!("{message}");
        self.notices.push(message);
    }

    // ========================================================================
    // Diagnostic highlight
    // ========================================================================

    /// Cosmetic operator feedback: pulses candidate materials emissive for
    /// a short moment. Fully reverted by `update`; no effect on
    /// classification output.
    fn highlight_candidates(&mut self, candidates: &[NodeHandle], now: f64) {
        let mut entries: Vec<(MaterialKey, Vec3, f32)> = Vec::new();

        let mesh_handles: Vec<NodeHandle> = candidates
            .iter()
            .flat_map(|&c| self.scene.collect_subtree(c))
            .collect();

        for handle in mesh_handles {
            for key in self.scene.node_material_keys(handle) {
                if entries.iter().any(|(k, _, _)| *k == key) {
                    continue;
                }
                if let Some(material) = self.scene.get_material_mut(key)
                    && let MaterialData::Physical(m) = &mut material.data
                {
                    entries.push((key, m.emissive, m.emissive_intensity));
                    m.emissive = HIGHLIGHT_EMISSIVE;
                    m.emissive_intensity = HIGHLIGHT_INTENSITY;
                }
            }
        }

        if !entries.is_empty() {
            self.highlight = Some(Highlight {
                entries,
                until: now + HIGHLIGHT_SECS,
            });
        }
    }

    fn revert_highlight(&mut self) {
        let Some(highlight) = self.highlight.take() else {
            return;
        };
        for (key, emissive, intensity) in highlight.entries {
            if let Some(material) = self.scene.get_material_mut(key)
                && let MaterialData::Physical(m) = &mut material.data
            {
                m.emissive = emissive;
                m.emissive_intensity = intensity;
            }
        }
    }
}
