//! Classifier Tests
//!
//! Tests for:
//! - Glass detection: keywords, transparency flag, opacity scalar
//! - Wheel detection: name keywords, position heuristic, container pre-screen
//! - Body assignment and the no-PBR fallback rule
//! - Set disjointness and tunable thresholds

use glam::{Vec3, Vec4};
use showroom::resources::{Geometry, Material, Mesh};
use showroom::scene::{MaterialKey, NodeHandle, Scene};
use showroom::viewer::classify::{ClassifierConfig, classify};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn pbr_material(scene: &mut Scene) -> MaterialKey {
    scene.add_material(Material::new_physical(Vec4::ONE))
}

fn unlit_material(scene: &mut Scene) -> MaterialKey {
    scene.add_material(Material::new_unlit(Vec4::ONE))
}

fn add_box(
    scene: &mut Scene,
    parent: NodeHandle,
    name: &str,
    position: Vec3,
    half_extent: Vec3,
    material: MaterialKey,
) -> NodeHandle {
    let mesh = Mesh::new(
        name,
        Geometry::from_min_max(-half_extent, half_extent),
        vec![material],
    );
    let handle = scene.add_mesh_to_parent(mesh, parent);
    scene.get_node_mut(handle).unwrap().transform.position = position;
    handle
}

/// Chassis at (0, 1.3, 0) with half extents (2.2, 0.6, 1.0); wheel slots at
/// (±1.5, 0.4, ±0.9) with half extent 0.4. Scene box ends up roughly
/// 4.4 × 1.9 × 2.6 around (0, 0.95, 0).
fn chassis(scene: &mut Scene, root: NodeHandle, material: MaterialKey) -> NodeHandle {
    add_box(
        scene,
        root,
        "Chassis",
        Vec3::new(0.0, 1.3, 0.0),
        Vec3::new(2.2, 0.6, 1.0),
        material,
    )
}

const WHEEL_SLOTS: [Vec3; 4] = [
    Vec3::new(1.5, 0.4, 0.9),
    Vec3::new(1.5, 0.4, -0.9),
    Vec3::new(-1.5, 0.4, 0.9),
    Vec3::new(-1.5, 0.4, -0.9),
];

fn classify_root(
    scene: &mut Scene,
    root: NodeHandle,
    config: &ClassifierConfig,
) -> showroom::viewer::classify::Classification {
    scene.update_matrix_world();
    let bbox = scene.compute_world_bbox(root).unwrap();
    classify(scene, root, &bbox, config)
}

// ============================================================================
// Named Wheels Scenario
// ============================================================================

#[test]
fn named_wheels_and_pbr_chassis() {
    init_logging();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Car");
    let mat = pbr_material(&mut scene);

    let body = chassis(&mut scene, root, mat);
    let names = ["Wheel_FL", "Wheel_FR", "Wheel_RL", "Wheel_RR"];
    for (name, slot) in names.iter().zip(WHEEL_SLOTS) {
        add_box(&mut scene, root, name, slot, Vec3::splat(0.4), mat);
    }

    let result = classify_root(&mut scene, root, &ClassifierConfig::default());

    assert_eq!(result.body_parts, vec![body]);
    assert!(result.glass_parts.is_empty());
    assert_eq!(result.wheel_candidates.len(), 4);
}

// ============================================================================
// Position-Only Wheels
// ============================================================================

#[test]
fn unnamed_low_offcenter_meshes_become_wheels() {
    init_logging();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Car");
    let mat = pbr_material(&mut scene);

    let body = chassis(&mut scene, root, mat);
    let mut blobs = Vec::new();
    for (i, slot) in WHEEL_SLOTS.iter().enumerate() {
        blobs.push(add_box(
            &mut scene,
            root,
            &format!("Blob{i}"),
            *slot,
            Vec3::splat(0.4),
            mat,
        ));
    }

    let result = classify_root(&mut scene, root, &ClassifierConfig::default());

    assert_eq!(result.wheel_candidates.len(), 4);
    for blob in &blobs {
        assert!(result.wheel_candidates.contains(blob));
        assert!(!result.body_parts.contains(blob), "wheels are not paintable");
    }
    assert_eq!(result.body_parts, vec![body]);
}

#[test]
fn high_or_central_meshes_are_not_wheels() {
    init_logging();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Car");
    let mat = pbr_material(&mut scene);

    chassis(&mut scene, root, mat);
    // Low but central: fails the horizontal-distance test
    let central = add_box(
        &mut scene,
        root,
        "Sump",
        Vec3::new(0.0, 0.3, 0.0),
        Vec3::splat(0.3),
        mat,
    );
    // Off-center but high: fails the ground test
    let mirror = add_box(
        &mut scene,
        root,
        "Mirror",
        Vec3::new(2.0, 1.6, 0.9),
        Vec3::splat(0.2),
        mat,
    );

    let result = classify_root(&mut scene, root, &ClassifierConfig::default());

    assert!(result.wheel_candidates.is_empty());
    assert!(result.body_parts.contains(&central));
    assert!(result.body_parts.contains(&mirror));
}

// ============================================================================
// Glass Detection
// ============================================================================

#[test]
fn glass_by_name_keyword() {
    init_logging();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Car");
    let mat = pbr_material(&mut scene);

    chassis(&mut scene, root, mat);
    let windshield = add_box(
        &mut scene,
        root,
        "Windshield_Main",
        Vec3::new(0.5, 1.6, 0.0),
        Vec3::new(0.4, 0.3, 0.9),
        mat,
    );

    let result = classify_root(&mut scene, root, &ClassifierConfig::default());

    assert_eq!(result.glass_parts, vec![windshield]);
    assert!(!result.body_parts.contains(&windshield));
}

#[test]
fn glass_by_transparent_flag_and_opacity() {
    init_logging();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Car");
    let mat = pbr_material(&mut scene);

    let mut blend = Material::new_physical(Vec4::ONE);
    blend.settings.transparent = true;
    let blend = scene.add_material(blend);

    let mut faded = Material::new_physical(Vec4::ONE);
    faded.as_physical_mut().unwrap().opacity = 0.5;
    let faded = scene.add_material(faded);

    chassis(&mut scene, root, mat);
    let canopy = add_box(
        &mut scene,
        root,
        "Canopy",
        Vec3::new(-0.5, 1.6, 0.0),
        Vec3::splat(0.3),
        blend,
    );
    let dome = add_box(
        &mut scene,
        root,
        "Dome",
        Vec3::new(0.8, 1.6, 0.0),
        Vec3::splat(0.3),
        faded,
    );

    let result = classify_root(&mut scene, root, &ClassifierConfig::default());

    assert!(result.glass_parts.contains(&canopy));
    assert!(result.glass_parts.contains(&dome));
    assert_eq!(result.glass_parts.len(), 2);
}

#[test]
fn glass_wins_over_wheel_name() {
    init_logging();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Car");
    let mat = pbr_material(&mut scene);

    chassis(&mut scene, root, mat);
    // Name matches both keyword sets; glass has priority
    let part = add_box(
        &mut scene,
        root,
        "Wheel_Window",
        WHEEL_SLOTS[0],
        Vec3::splat(0.4),
        mat,
    );

    let result = classify_root(&mut scene, root, &ClassifierConfig::default());

    assert!(result.glass_parts.contains(&part));
    assert!(!result.wheel_candidates.contains(&part));
}

// ============================================================================
// Container Pre-Screen
// ============================================================================

#[test]
fn pregrouped_wheel_container_is_one_candidate() {
    init_logging();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Car");
    let mat = pbr_material(&mut scene);

    chassis(&mut scene, root, mat);

    let assembly = scene.create_node_with_name("AxleAssembly");
    scene.attach(assembly, root);
    let part_a = add_box(
        &mut scene,
        assembly,
        "PartA",
        Vec3::new(1.5, 0.4, 0.9),
        Vec3::splat(0.4),
        mat,
    );
    let part_b = add_box(
        &mut scene,
        assembly,
        "PartB",
        Vec3::new(1.3, 0.4, 0.7),
        Vec3::splat(0.4),
        mat,
    );

    let result = classify_root(&mut scene, root, &ClassifierConfig::default());

    assert_eq!(result.wheel_candidates, vec![assembly]);
    // Descendants of the container are not independently re-evaluated
    assert!(!result.body_parts.contains(&part_a));
    assert!(!result.body_parts.contains(&part_b));
}

// ============================================================================
// Body Assignment & Fallback
// ============================================================================

#[test]
fn unlit_meshes_excluded_from_body_when_pbr_exists() {
    init_logging();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Car");
    let pbr = pbr_material(&mut scene);
    let unlit = unlit_material(&mut scene);

    let painted = chassis(&mut scene, root, pbr);
    let decal = add_box(
        &mut scene,
        root,
        "Decal",
        Vec3::new(0.0, 1.8, 0.0),
        Vec3::splat(0.2),
        unlit,
    );

    let result = classify_root(&mut scene, root, &ClassifierConfig::default());

    assert_eq!(result.body_parts, vec![painted]);
    assert!(!result.body_parts.contains(&decal));
}

#[test]
fn fallback_assigns_all_non_glass_meshes_to_body() {
    init_logging();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Car");
    let unlit = unlit_material(&mut scene);

    let body = chassis(&mut scene, root, unlit);
    let wheel = add_box(
        &mut scene,
        root,
        "Wheel_FL",
        WHEEL_SLOTS[0],
        Vec3::splat(0.4),
        unlit,
    );
    let glass = add_box(
        &mut scene,
        root,
        "Window",
        Vec3::new(0.5, 1.6, 0.0),
        Vec3::splat(0.3),
        unlit,
    );

    let result = classify_root(&mut scene, root, &ClassifierConfig::default());

    // No mesh passes the capability test, so body = every non-glass mesh,
    // wheels included.
    assert!(result.body_parts.contains(&body));
    assert!(result.body_parts.contains(&wheel));
    assert!(!result.body_parts.contains(&glass));
    assert_eq!(result.glass_parts, vec![glass]);
    assert_eq!(result.wheel_candidates, vec![wheel]);
}

// ============================================================================
// Disjointness & Configuration
// ============================================================================

#[test]
fn sets_are_disjoint() {
    init_logging();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Car");
    let mat = pbr_material(&mut scene);

    chassis(&mut scene, root, mat);
    add_box(
        &mut scene,
        root,
        "Windshield",
        Vec3::new(0.5, 1.6, 0.0),
        Vec3::splat(0.3),
        mat,
    );
    for (i, slot) in WHEEL_SLOTS.iter().enumerate() {
        add_box(&mut scene, root, &format!("Wheel_{i}"), *slot, Vec3::splat(0.4), mat);
    }

    let result = classify_root(&mut scene, root, &ClassifierConfig::default());

    for handle in &result.body_parts {
        assert!(!result.glass_parts.contains(handle));
        assert!(!result.wheel_candidates.contains(handle));
    }
    for handle in &result.glass_parts {
        assert!(!result.wheel_candidates.contains(handle));
    }
}

#[test]
fn thresholds_are_tunable() {
    init_logging();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Car");
    let mat = pbr_material(&mut scene);

    chassis(&mut scene, root, mat);
    for (i, slot) in WHEEL_SLOTS.iter().enumerate() {
        add_box(&mut scene, root, &format!("Blob{i}"), *slot, Vec3::splat(0.4), mat);
    }

    // An impossible horizontal threshold disables the position heuristic
    let config = ClassifierConfig {
        horizontal_fraction: 2.0,
        ..ClassifierConfig::default()
    };
    let result = classify_root(&mut scene, root, &config);

    assert!(result.wheel_candidates.is_empty());
    assert_eq!(result.body_parts.len(), 5);
}

#[test]
fn empty_scene_classifies_to_nothing() {
    init_logging();
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Empty");
    scene.update_matrix_world();

    let result = classify(
        &scene,
        root,
        &showroom::BoundingBox::EMPTY,
        &ClassifierConfig::default(),
    );

    assert!(result.body_parts.is_empty());
    assert!(result.glass_parts.is_empty());
    assert!(result.wheel_candidates.is_empty());
}
