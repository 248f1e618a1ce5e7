//! Viewer Controller Tests
//!
//! Tests for:
//! - Adopting a loaded scene graph: normalize → classify → group → paint
//! - Explode toggle notices and reset composite behavior
//! - Teardown on asset replacement
//! - Paint/finish, wireframe, config persistence, loading timeout

use glam::{Vec3, Vec4};
use showroom::resources::{Geometry, Material, MaterialData, Mesh};
use showroom::scene::{NodeHandle, Scene};
use showroom::viewer::loading::{LOADING_TIMEOUT_SECS, LoadingIndicator};
use showroom::{Finish, ViewFlags, Viewer, ViewerConfig};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const WHEEL_SLOTS: [Vec3; 4] = [
    Vec3::new(1.5, 0.4, 0.9),
    Vec3::new(1.5, 0.4, -0.9),
    Vec3::new(-1.5, 0.4, 0.9),
    Vec3::new(-1.5, 0.4, -0.9),
];

/// Builds a classifiable car (PBR chassis, named glass, four named wheels)
/// directly in the viewer's scene and returns its root.
fn build_car(scene: &mut Scene) -> NodeHandle {
    let root = scene.create_node_with_name("Car");
    let mat = scene.add_material(Material::new_physical(Vec4::ONE));

    let chassis = Mesh::new(
        "Chassis",
        Geometry::from_min_max(Vec3::new(-2.2, -0.6, -1.0), Vec3::new(2.2, 0.6, 1.0)),
        vec![mat],
    );
    let chassis = scene.add_mesh_to_parent(chassis, root);
    scene.get_node_mut(chassis).unwrap().transform.position = Vec3::new(0.0, 1.3, 0.0);

    let glass = Mesh::new(
        "Windshield",
        Geometry::from_min_max(Vec3::new(-0.4, -0.3, -0.9), Vec3::new(0.4, 0.3, 0.9)),
        vec![mat],
    );
    let glass = scene.add_mesh_to_parent(glass, root);
    scene.get_node_mut(glass).unwrap().transform.position = Vec3::new(0.5, 1.6, 0.0);

    for (i, slot) in WHEEL_SLOTS.iter().enumerate() {
        let mesh = Mesh::new(
            &format!("Wheel_{i}"),
            Geometry::from_min_max(Vec3::splat(-0.4), Vec3::splat(0.4)),
            vec![mat],
        );
        let handle = scene.add_mesh_to_parent(mesh, root);
        scene.get_node_mut(handle).unwrap().transform.position = *slot;
    }

    root
}

fn car_viewer() -> Viewer {
    let mut viewer = Viewer::new();
    let root = build_car(&mut viewer.scene);
    viewer.adopt_root(root, 0.0);
    viewer
}

// ============================================================================
// Adoption Pipeline
// ============================================================================

#[test]
fn adopt_root_classifies_groups_and_paints() {
    init_logging();
    let viewer = car_viewer();

    assert_eq!(viewer.body_parts().len(), 1);
    assert_eq!(viewer.glass_parts().len(), 1);
    assert_eq!(viewer.wheel_groups().len(), 4);
    assert!(viewer.car_root().is_some());
    assert!(viewer.car_bbox().is_some());

    // Default paint applied: body material is physical white gloss
    let key = viewer.scene.node_material_keys(viewer.body_parts()[0])[0];
    let material = viewer.scene.get_material(key).unwrap();
    assert!(material.supports_pbr());
    assert_eq!(viewer.current_finish(), Finish::Gloss);
}

#[test]
fn adopt_root_normalizes_scale_and_height() {
    init_logging();
    let viewer = car_viewer();

    let bbox = viewer.car_bbox().unwrap();
    let size = bbox.size();
    let max_dim = size.x.max(size.y).max(size.z);
    assert!(
        (max_dim - 6.5).abs() < 1e-3,
        "Largest extent should be normalized to 6.5, got {max_dim}"
    );
    // Horizontally centered
    assert!(bbox.center().x.abs() < 1e-3);
    assert!(bbox.center().z.abs() < 1e-3);
}

#[test]
fn adopting_new_root_tears_down_previous_asset() {
    init_logging();
    let mut viewer = car_viewer();

    let old_root = viewer.car_root().unwrap();
    let old_groups: Vec<NodeHandle> = viewer.wheel_groups().iter().map(|g| g.node).collect();
    let old_body = viewer.body_parts()[0];

    viewer.toggle_explode(0.0);
    assert!(viewer.is_exploded());

    let new_root = build_car(&mut viewer.scene);
    viewer.adopt_root(new_root, 1.0);

    assert!(viewer.scene.get_node(old_root).is_none());
    assert!(viewer.scene.get_node(old_body).is_none());
    for group in old_groups {
        assert!(viewer.scene.get_node(group).is_none());
    }
    // Derived state reset along with the subtree
    assert!(!viewer.is_exploded());
    assert!(!viewer.is_animating());
    assert_eq!(viewer.car_root(), Some(new_root));
    assert_eq!(viewer.wheel_groups().len(), 4);
}

// ============================================================================
// Explode via the Controller
// ============================================================================

#[test]
fn toggle_without_asset_notices_and_keeps_state() {
    init_logging();
    let mut viewer = Viewer::new();

    viewer.toggle_explode(0.0);

    assert!(!viewer.is_exploded());
    let notices = viewer.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("No wheels"));
    // Drained
    assert!(viewer.take_notices().is_empty());
}

#[test]
fn toggle_roundtrip_restores_rest_positions() {
    init_logging();
    let mut viewer = car_viewer();

    viewer.toggle_explode(0.0);
    viewer.update(5.0);
    assert!(viewer.is_exploded());

    viewer.toggle_explode(5.0);
    viewer.update(10.0);
    assert!(!viewer.is_exploded());

    let rests: Vec<(NodeHandle, Vec3)> = viewer
        .wheel_groups()
        .iter()
        .map(|g| (g.node, g.rest_position))
        .collect();
    for (node, rest) in rests {
        let pos = viewer.scene.get_node(node).unwrap().transform.position;
        assert_eq!(pos, rest);
    }
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn reset_restores_defaults_from_any_state() {
    init_logging();
    let mut viewer = car_viewer();

    viewer.set_body_color(Vec3::new(0.8, 0.1, 0.1));
    viewer.set_finish(Finish::Matte);
    viewer.set_wireframe(true);
    viewer.set_autorotate(false);
    viewer.toggle_explode(0.0);
    viewer.update(5.0);

    viewer.reset(5.0);
    viewer.update(10.0);

    assert_eq!(viewer.current_body_color(), Vec3::ONE);
    assert_eq!(viewer.current_finish(), Finish::Gloss);
    assert!(viewer.flags().contains(ViewFlags::AUTOROTATE));
    assert!(!viewer.flags().contains(ViewFlags::WIREFRAME));
    assert!(!viewer.is_exploded());

    let rests: Vec<(NodeHandle, Vec3)> = viewer
        .wheel_groups()
        .iter()
        .map(|g| (g.node, g.rest_position))
        .collect();
    for (node, rest) in rests {
        let pos = viewer.scene.get_node(node).unwrap().transform.position;
        assert_eq!(pos, rest);
    }
}

#[test]
fn reset_before_any_asset_is_safe() {
    init_logging();
    let mut viewer = Viewer::new();
    viewer.reset(0.0);
    viewer.update(1.0);
    assert!(viewer.take_notices().is_empty());
}

// ============================================================================
// Paint, Finish & Wireframe
// ============================================================================

#[test]
fn set_body_color_only_touches_body_materials() {
    init_logging();
    let mut viewer = car_viewer();

    viewer.set_body_color(Vec3::new(0.1, 0.2, 0.9));
    assert_eq!(viewer.current_body_color(), Vec3::new(0.1, 0.2, 0.9));

    // Glass kept its own material untouched by paint
    let glass_key = viewer.scene.node_material_keys(viewer.glass_parts()[0])[0];
    let glass_material = viewer.scene.get_material(glass_key).unwrap();
    if let MaterialData::Physical(m) = &glass_material.data {
        assert_ne!(m.color.truncate(), Vec3::new(0.1, 0.2, 0.9));
    }
}

#[test]
fn finish_presets_roundtrip_through_inference() {
    init_logging();
    let mut viewer = car_viewer();

    for finish in [Finish::Gloss, Finish::Satin, Finish::Matte] {
        viewer.set_finish(finish);
        assert_eq!(viewer.current_finish(), finish);
    }
}

#[test]
fn wireframe_flag_writes_material_settings() {
    init_logging();
    let mut viewer = car_viewer();

    viewer.set_wireframe(true);
    assert!(viewer.flags().contains(ViewFlags::WIREFRAME));
    let key = viewer.scene.node_material_keys(viewer.body_parts()[0])[0];
    assert!(viewer.scene.get_material(key).unwrap().settings.wireframe);

    viewer.set_wireframe(false);
    let key = viewer.scene.node_material_keys(viewer.body_parts()[0])[0];
    assert!(!viewer.scene.get_material(key).unwrap().settings.wireframe);
}

// ============================================================================
// Config Persistence
// ============================================================================

#[test]
fn config_roundtrips_through_json() {
    init_logging();
    let config = ViewerConfig {
        color: [0.8, 0.1, 0.1],
        finish: Finish::Satin,
        autorotate: false,
    };

    let path = std::env::temp_dir().join(format!("showroom-config-{}.json", std::process::id()));
    config.save(&path).unwrap();
    let loaded = ViewerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
}

#[test]
fn viewer_applies_and_captures_config() {
    init_logging();
    let mut viewer = car_viewer();

    let config = ViewerConfig {
        color: [0.2, 0.6, 0.3],
        finish: Finish::Matte,
        autorotate: false,
    };
    viewer.apply_config(&config);

    assert_eq!(viewer.current_body_color(), Vec3::new(0.2, 0.6, 0.3));
    assert_eq!(viewer.current_finish(), Finish::Matte);
    assert!(!viewer.flags().contains(ViewFlags::AUTOROTATE));

    let captured = viewer.current_config();
    assert_eq!(captured, config);
}

#[test]
fn missing_config_file_is_an_error_not_a_panic() {
    init_logging();
    let mut viewer = Viewer::new();
    let result = viewer.load_config("/nonexistent/showroom-config.json");
    assert!(result.is_err());
}

// ============================================================================
// Loading Indicator & Timeout
// ============================================================================

#[test]
fn loading_timeout_dismisses_exactly_once() {
    let mut indicator = LoadingIndicator::new();
    indicator.begin(0.0);
    assert!(indicator.is_visible());

    assert!(!indicator.check_timeout(5.0));
    assert!(indicator.is_visible());

    assert!(indicator.check_timeout(LOADING_TIMEOUT_SECS + 0.1));
    assert!(!indicator.is_visible());

    // Already dismissed; must not fire again
    assert!(!indicator.check_timeout(LOADING_TIMEOUT_SECS + 1.0));
}

#[test]
fn stalled_external_load_produces_a_notice() {
    init_logging();
    let mut viewer = Viewer::new();

    viewer.begin_external_load(0.0);
    viewer.update(1.0);
    assert!(viewer.is_loading());
    assert!(viewer.take_notices().is_empty());

    viewer.update(LOADING_TIMEOUT_SECS + 1.0);
    assert!(!viewer.is_loading());
    let notices = viewer.take_notices();
    assert_eq!(notices.len(), 1);

    // The timeout is UX-only: a late finish still lands normally
    viewer.finish_external_load();
    assert!(!viewer.is_loading());
}

#[test]
fn timer_timestamps_drive_the_viewer() {
    init_logging();
    let mut timer = showroom::utils::Timer::new();
    let mut viewer = car_viewer();

    viewer.toggle_explode(timer.elapsed_seconds());
    timer.tick();
    viewer.update(timer.elapsed_seconds());

    assert_eq!(timer.frame_count, 1);
    assert!(timer.dt_seconds() >= 0.0);
    assert!(viewer.is_exploded());
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn hotspot_anchors_follow_the_scene_box() {
    init_logging();
    let viewer = car_viewer();
    let bbox = viewer.car_bbox().unwrap();
    let anchors = viewer.hotspot_anchors().unwrap();

    assert!(anchors.body.y > bbox.center().y);
    assert!((anchors.wheel.x - bbox.max.x).abs() < 1e-5);

    let empty = Viewer::new();
    assert!(empty.hotspot_anchors().is_none());
}

#[test]
fn camera_preset_move_lands_and_pauses_autorotate() {
    init_logging();
    let mut viewer = Viewer::new();
    let camera = viewer.enable_camera(55.0);
    let root = build_car(&mut viewer.scene);
    viewer.adopt_root(root, 0.0);

    let before = viewer.scene.get_node(camera).unwrap().transform.position;

    viewer.move_camera_to(showroom::ViewPreset::Top, 0.0);
    assert!(!viewer.flags().contains(ViewFlags::AUTOROTATE));
    viewer.update(5.0);

    let after = viewer.scene.get_node(camera).unwrap().transform.position;
    assert_ne!(before, after);
    assert!(after.y > before.y || after.y > viewer.car_bbox().unwrap().max.y);
}

#[test]
fn load_or_fallback_surfaces_notices_on_failure() {
    init_logging();
    let mut viewer = Viewer::new();

    viewer.load_or_fallback("/nonexistent/a.glb", "/nonexistent/b.glb", 0.0);

    let notices = viewer.take_notices();
    assert_eq!(notices.len(), 2, "one notice per failed load");
    assert!(viewer.car_root().is_none());
    assert!(!viewer.is_loading());
}
