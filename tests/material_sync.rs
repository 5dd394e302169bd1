//! Integration tests for material synchronization.
//!
//! These tests drive [`Material::sync`] through the full stack: scene
//! double, resource registry over the null backend, and change tracker.
//!
//! # Test Categories
//!
//! - **Shared Resolution Tests**: Verify texture resources and handles
//!   deduplicate across materials
//! - **Strategy Tests**: Verify the legacy/indirect split per settings,
//!   capabilities, and texture kind
//! - **Bind Cycle Tests**: Verify draw-time unit binding driven by synced
//!   state
//! - **Concurrency Tests**: Verify shared caches build each entry once
//!
//! ```bash
//! cargo test --test material_sync
//! ```

mod common;

use std::sync::Arc;

use rstest::rstest;

use common::{
    create_material, create_registry, create_scene, sync_material, WOOD_DIFFUSE, WOOD_MATERIAL,
};
use shadegraph::backend::BindRecord;
use shadegraph::textures::TextureResource;
use shadegraph::types::{TextureId, TextureKey};
use shadegraph::{
    BindTarget, ChangeTracker, CompiledNetwork, ContextCaps, MaterialParam, ParamValue,
    RenderSettings, SamplerParameters, TextureBinder, TextureKind, TextureUnitMap,
};

fn textured_network(kind: TextureKind) -> CompiledNetwork {
    CompiledNetwork::new()
        .with_fragment_source("surface() {}")
        .with_param(MaterialParam::texture(
            "colorMap",
            WOOD_DIFFUSE,
            kind,
            ParamValue::Vec3([1.0, 0.0, 1.0]),
        ))
}

// ============================================================================
// Shared Resolution Tests
// ============================================================================

#[test]
fn test_two_materials_share_resolved_resource() {
    let (_backend, registry) = create_registry(false);
    let id = TextureId::from_raw(42);
    let resource = Arc::new(TextureResource::constant_color(
        registry.backend().clone(),
        [0.8, 0.6, 0.4, 1.0],
    ));
    registry.insert_texture_resource(TextureKey::for_resource(id), resource.clone());

    let scene = create_scene(WOOD_MATERIAL, ContextCaps::default())
        .with_texture_id(WOOD_DIFFUSE, id);
    let settings = RenderSettings::new(false);
    let tracker = ChangeTracker::new();

    let mut first = create_material(WOOD_MATERIAL, textured_network(TextureKind::Image2d));
    let mut second = create_material(WOOD_MATERIAL, textured_network(TextureKind::Image2d));
    sync_material(&mut first, &scene, &registry, &settings, &tracker);
    sync_material(&mut second, &scene, &registry, &settings, &tracker);

    let first_textures = first.surface_shader().legacy_textures();
    let second_textures = second.surface_shader().legacy_textures();
    assert_eq!(first_textures.len(), 1);
    assert_eq!(second_textures.len(), 1);
    assert!(Arc::ptr_eq(
        &first_textures[0].handle,
        &second_textures[0].handle
    ));
    assert!(Arc::ptr_eq(
        &first_textures[0].handle.resource().unwrap(),
        &resource
    ));
    // The shared cache answered; the scene was never asked to load.
    assert_eq!(scene.load_count(), 0);
}

#[test]
fn test_fresh_load_repoints_the_shared_handle() {
    let (_backend, registry) = create_registry(false);
    let id = TextureId::from_raw(43);
    let loaded = Arc::new(TextureResource::constant_color(
        registry.backend().clone(),
        [0.2, 0.2, 0.9, 1.0],
    ));

    let scene = create_scene(WOOD_MATERIAL, ContextCaps::default())
        .with_texture_id(WOOD_DIFFUSE, id)
        .with_texture_resource(WOOD_DIFFUSE, loaded.clone());
    let settings = RenderSettings::new(false);
    let tracker = ChangeTracker::new();

    let mut first = create_material(WOOD_MATERIAL, textured_network(TextureKind::Image2d));
    let mut second = create_material(WOOD_MATERIAL, textured_network(TextureKind::Image2d));
    sync_material(&mut first, &scene, &registry, &settings, &tracker);
    sync_material(&mut second, &scene, &registry, &settings, &tracker);

    let first_textures = first.surface_shader().legacy_textures();
    let second_textures = second.surface_shader().legacy_textures();
    assert!(Arc::ptr_eq(
        &first_textures[0].handle,
        &second_textures[0].handle
    ));
    assert!(Arc::ptr_eq(
        &second_textures[0].handle.resource().unwrap(),
        &loaded
    ));
    // The resource cache stays scene-populated; each sync loaded afresh.
    assert_eq!(scene.load_count(), 2);
}

#[test]
fn test_vanished_resource_does_not_repoint_the_shared_handle() {
    let (_backend, registry) = create_registry(false);
    let id = TextureId::from_raw(44);
    let loaded = Arc::new(TextureResource::constant_color(
        registry.backend().clone(),
        [0.1, 0.7, 0.3, 1.0],
    ));

    let scene = create_scene(WOOD_MATERIAL, ContextCaps::default())
        .with_texture_id(WOOD_DIFFUSE, id)
        .with_texture_resource(WOOD_DIFFUSE, loaded.clone());
    let settings = RenderSettings::new(false);
    let tracker = ChangeTracker::new();

    let mut material = create_material(WOOD_MATERIAL, textured_network(TextureKind::Image2d));
    let mut sibling = create_material(WOOD_MATERIAL, textured_network(TextureKind::Image2d));
    sync_material(&mut material, &scene, &registry, &settings, &tracker);
    sync_material(&mut sibling, &scene, &registry, &settings, &tracker);

    let shared = sibling.surface_shader().legacy_textures()[0].handle.clone();
    assert!(Arc::ptr_eq(&shared.resource().unwrap(), &loaded));

    // The texture vanishes: the id still resolves, nothing loads anymore.
    let gone = create_scene(WOOD_MATERIAL, ContextCaps::default())
        .with_texture_id(WOOD_DIFFUSE, id);
    sync_material(&mut material, &gone, &registry, &settings, &tracker);
    assert_eq!(gone.load_count(), 1);

    // The resyncing material degrades to a private fallback while the
    // sibling keeps sampling the last resolved texture.
    let textures = material.surface_shader().legacy_textures();
    assert_eq!(textures.len(), 1);
    assert!(!Arc::ptr_eq(&textures[0].handle, &shared));
    assert!(Arc::ptr_eq(&shared.resource().unwrap(), &loaded));
}

// ============================================================================
// Strategy Tests
// ============================================================================

#[rstest]
#[case::legacy_no_bindless(false, false, 0, 1, 0)]
#[case::legacy_bindless(false, true, 0, 1, 0)]
#[case::indirect_no_bindless(true, false, 1, 0, 0)]
#[case::indirect_bindless(true, true, 1, 0, 1)]
fn test_strategy_selection(
    #[case] indirect: bool,
    #[case] bindless: bool,
    #[case] expected_named: usize,
    #[case] expected_legacy: usize,
    #[case] expected_specs: usize,
) {
    let (_backend, registry) = create_registry(bindless);
    let scene = create_scene(WOOD_MATERIAL, ContextCaps::new(bindless));
    let settings = RenderSettings::new(indirect);
    let tracker = ChangeTracker::new();

    let mut material = create_material(WOOD_MATERIAL, textured_network(TextureKind::Image2d));
    sync_material(&mut material, &scene, &registry, &settings, &tracker);

    let shader = material.surface_shader();
    assert_eq!(shader.named_textures().len(), expected_named);
    assert_eq!(shader.legacy_textures().len(), expected_legacy);
    assert_eq!(shader.buffer_specs().len(), expected_specs);
}

#[test]
fn test_udim_always_resolves_through_the_legacy_path() {
    let (_backend, registry) = create_registry(true);
    let scene = create_scene(WOOD_MATERIAL, ContextCaps::new(true));
    let settings = RenderSettings::new(true);
    let tracker = ChangeTracker::new();

    let mut material = create_material(WOOD_MATERIAL, textured_network(TextureKind::Udim));
    sync_material(&mut material, &scene, &registry, &settings, &tracker);

    // Udim never allocates through the handle strategy; unresolvable and
    // not 2D, it degrades to nothing at all.
    assert!(material.surface_shader().named_textures().is_empty());
    assert!(material.surface_shader().legacy_textures().is_empty());
    assert_eq!(registry.texture_handle_count(), 0);
}

#[test]
fn test_indirect_sync_attaches_handles_and_specs() {
    let (_backend, registry) = create_registry(true);
    let scene = create_scene(WOOD_MATERIAL, ContextCaps::new(true));
    let settings = RenderSettings::new(true);
    let tracker = ChangeTracker::new();

    let network = CompiledNetwork::new()
        .with_fragment_source("surface() {}")
        .with_param(MaterialParam::fallback(
            "tint",
            ParamValue::Vec4([1.0, 1.0, 1.0, 1.0]),
        ))
        .with_param(MaterialParam::texture(
            "colorMap",
            WOOD_DIFFUSE,
            TextureKind::Image2d,
            ParamValue::default(),
        ))
        .with_param(MaterialParam::texture(
            "density",
            "/materials/wood/density",
            TextureKind::Field,
            ParamValue::default(),
        ));
    let mut material = create_material(WOOD_MATERIAL, network);
    sync_material(&mut material, &scene, &registry, &settings, &tracker);

    let shader = material.surface_shader();
    let named = shader.named_textures();
    assert_eq!(named.len(), 2);
    assert_eq!(named[0].name, "colorMap");
    assert_eq!(named[1].name, "density");
    assert_eq!(registry.texture_handle_count(), 2);

    let spec_names: Vec<String> = shader
        .buffer_specs()
        .into_iter()
        .map(|spec| spec.name)
        .collect();
    assert_eq!(
        spec_names,
        vec!["tint", "colorMap", "density", "densitySamplingTransform"]
    );
    // Value params upload immediately; texture sources arrive at commit.
    let source_names: Vec<String> = shader
        .buffer_sources()
        .iter()
        .map(|source| source.name().to_string())
        .collect();
    assert_eq!(source_names, vec!["tint"]);
}

#[test]
fn test_indirect_handles_deduplicate_across_materials() {
    let (backend, registry) = create_registry(true);
    let scene = create_scene(WOOD_MATERIAL, ContextCaps::new(true));
    let settings = RenderSettings::new(true);
    let tracker = ChangeTracker::new();

    let mut first = create_material(WOOD_MATERIAL, textured_network(TextureKind::Image2d));
    let mut second = create_material(WOOD_MATERIAL, textured_network(TextureKind::Image2d));
    sync_material(&mut first, &scene, &registry, &settings, &tracker);
    sync_material(&mut second, &scene, &registry, &settings, &tracker);

    let first_named = first.surface_shader().named_textures();
    let second_named = second.surface_shader().named_textures();
    assert!(Arc::ptr_eq(&first_named[0].handle, &second_named[0].handle));
    assert_eq!(registry.texture_handle_count(), 1);
    assert_eq!(backend.alive_textures(), 1);
}

#[test]
fn test_flag_flip_switches_strategy_on_resync() {
    let (_backend, registry) = create_registry(true);
    let scene = create_scene(WOOD_MATERIAL, ContextCaps::new(true));
    let tracker = ChangeTracker::new();

    let mut material = create_material(WOOD_MATERIAL, textured_network(TextureKind::Image2d));
    sync_material(
        &mut material,
        &scene,
        &registry,
        &RenderSettings::new(false),
        &tracker,
    );
    assert_eq!(material.surface_shader().legacy_textures().len(), 1);
    assert!(material.surface_shader().named_textures().is_empty());

    sync_material(
        &mut material,
        &scene,
        &registry,
        &RenderSettings::new(true),
        &tracker,
    );
    assert!(material.surface_shader().legacy_textures().is_empty());
    assert_eq!(material.surface_shader().named_textures().len(), 1);
}

// ============================================================================
// Bind Cycle Tests
// ============================================================================

#[test]
fn test_bind_cycle_records_units_without_bindless() {
    let (backend, registry) = create_registry(false);
    let caps = ContextCaps::new(false);
    let scene = create_scene(WOOD_MATERIAL, caps);
    let settings = RenderSettings::new(true);
    let tracker = ChangeTracker::new();

    let network = CompiledNetwork::new()
        .with_fragment_source("surface() {}")
        .with_param(MaterialParam::texture(
            "colorMap",
            WOOD_DIFFUSE,
            TextureKind::Image2d,
            ParamValue::default(),
        ))
        .with_param(MaterialParam::texture(
            "density",
            "/materials/wood/density",
            TextureKind::Field,
            ParamValue::default(),
        ))
        .with_param(MaterialParam::texture(
            "faces",
            "/materials/wood/faces",
            TextureKind::Ptex,
            ParamValue::default(),
        ));
    let mut material = create_material(WOOD_MATERIAL, network);
    sync_material(&mut material, &scene, &registry, &settings, &tracker);

    let named = material.surface_shader().named_textures();
    assert_eq!(named.len(), 3);

    let mut units = TextureUnitMap::new();
    units.assign_for_handles(&named).unwrap();
    assert_eq!(units.unit_for("colorMap"), Some(0));
    assert_eq!(units.unit_for("density"), Some(1));
    assert_eq!(units.unit_for("faces"), Some(2));
    assert_eq!(units.unit_for("faces_layout"), Some(3));

    let binder = TextureBinder::new(caps);
    backend.clear_bind_log();
    binder.bind_resources(&named, &units, registry.backend().as_ref());

    let log = backend.bind_log();
    let textures: Vec<(u32, BindTarget)> = log
        .iter()
        .filter_map(|record| match record {
            BindRecord::Texture { unit, target, id } => {
                assert_ne!(*id, 0);
                Some((*unit, *target))
            }
            BindRecord::Sampler { .. } => None,
        })
        .collect();
    assert_eq!(
        textures,
        vec![
            (0, BindTarget::Texture2d),
            (1, BindTarget::Texture3d),
            (2, BindTarget::Texture2dArray),
            (3, BindTarget::BufferTexture),
        ]
    );
    // Ptex has no sampler object to bind.
    let sampler_units: Vec<u32> = log
        .iter()
        .filter_map(|record| match record {
            BindRecord::Sampler { unit, .. } => Some(*unit),
            BindRecord::Texture { .. } => None,
        })
        .collect();
    assert_eq!(sampler_units, vec![0, 1]);

    backend.clear_bind_log();
    binder.unbind_resources(&named, &units, registry.backend().as_ref());
    let unbind_log = backend.bind_log();
    assert_eq!(unbind_log.len(), 6);
    assert!(unbind_log.iter().all(|record| match record {
        BindRecord::Texture { id, .. } => *id == 0,
        BindRecord::Sampler { id, .. } => *id == 0,
    }));
}

#[test]
fn test_bind_cycle_is_noop_with_bindless() {
    let (backend, registry) = create_registry(true);
    let caps = ContextCaps::new(true);
    let scene = create_scene(WOOD_MATERIAL, caps);
    let settings = RenderSettings::new(true);
    let tracker = ChangeTracker::new();

    let mut material = create_material(WOOD_MATERIAL, textured_network(TextureKind::Image2d));
    sync_material(&mut material, &scene, &registry, &settings, &tracker);
    let named = material.surface_shader().named_textures();

    let units = TextureUnitMap::new();
    let binder = TextureBinder::new(caps);
    backend.clear_bind_log();
    binder.bind_resources(&named, &units, registry.backend().as_ref());
    binder.unbind_resources(&named, &units, registry.backend().as_ref());
    assert!(backend.bind_log().is_empty());
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[test]
fn test_concurrent_allocation_builds_once() {
    let (backend, registry) = create_registry(true);
    let registry = Arc::new(registry);
    let id = TextureId::from_raw(7);

    let mut handles = Vec::new();
    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                scope.spawn(move || {
                    registry
                        .allocate_texture_handle(
                            id,
                            TextureKind::Image2d,
                            SamplerParameters::default(),
                            0,
                            true,
                        )
                        .unwrap()
                })
            })
            .collect();
        for worker in workers {
            handles.push(worker.join().unwrap());
        }
    });

    for handle in &handles[1..] {
        assert!(Arc::ptr_eq(&handles[0], handle));
    }
    assert_eq!(registry.texture_handle_count(), 1);
    assert_eq!(backend.alive_textures(), 1);
    assert_eq!(backend.alive_samplers(), 1);
}
