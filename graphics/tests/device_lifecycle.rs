//! Device and resource lifecycle tests against the dummy backend.
//!
//! Sequence tests are parameterized with `rstest` over several seeds.

mod common;

use common::{Lcg, ReleaseLog, TestContext};
use hearth_graphics::{
    BackendEvent, GraphicsError, PresentStatus, ProviderState, ResourceKind, ResourceRegistry,
    SurfaceChange, SurfaceDescriptor, TextureDescriptor, TextureFormat,
};
use rstest::rstest;

// ============================================================================
// Presentation and loss
// ============================================================================

#[test]
fn test_present_loss_and_reinitialize() {
    let mut ctx = TestContext::new();
    let surface = SurfaceDescriptor::offscreen(800, 600);

    let first = ctx.provider.initialize(&surface).unwrap();
    assert_eq!(ctx.provider.present().unwrap(), PresentStatus::Presented);

    ctx.backend.lose_device();
    assert_eq!(ctx.provider.present().unwrap(), PresentStatus::DeviceLost);
    assert_eq!(ctx.provider.state(), ProviderState::Lost);

    let second = ctx.provider.initialize(&surface).unwrap();
    assert!(second.generation() > first.generation());
    assert_eq!(ctx.provider.present().unwrap(), PresentStatus::Presented);

    let target = ctx.provider.target().unwrap();
    assert_eq!((target.width(), target.height()), (800, 600));
}

#[test]
fn test_failed_reinitialize_stays_lost() {
    let mut ctx = TestContext::initialized(320, 240);
    ctx.backend.lose_device();
    assert!(ctx.provider.present().unwrap().is_device_lost());

    ctx.backend.fail_next_device_creations(1);
    let surface = SurfaceDescriptor::offscreen(320, 240);
    assert!(matches!(
        ctx.provider.initialize(&surface),
        Err(GraphicsError::DeviceCreation(_))
    ));
    assert_eq!(ctx.provider.state(), ProviderState::Lost);
    assert_eq!(ctx.provider.device().unwrap_err(), GraphicsError::DeviceLost);

    ctx.provider.initialize(&surface).unwrap();
    assert!(ctx.provider.is_ready());
}

#[test]
fn test_unavailable_adapter_reports_creation_error() {
    let mut ctx = TestContext::new();
    ctx.backend.set_available(false);
    let err = ctx
        .provider
        .initialize(&SurfaceDescriptor::offscreen(64, 64))
        .unwrap_err();
    assert!(matches!(err, GraphicsError::DeviceCreation(_)));
    assert_eq!(ctx.provider.state(), ProviderState::Uninitialized);
}

// ============================================================================
// Staleness
// ============================================================================

#[test]
fn test_resources_stale_after_device_replacement() {
    let mut ctx = TestContext::initialized(256, 256);
    let desc = TextureDescriptor::new_2d(8, 8, TextureFormat::Rgba8Unorm).with_label("albedo");
    let texture = ctx
        .provider
        .create_texture(&mut ctx.registry, &desc, None)
        .unwrap();
    assert!(ctx.registry.validate(texture.handle()).is_ok());

    ctx.backend.lose_device();
    assert!(ctx.provider.present().unwrap().is_device_lost());
    ctx.initialize(SurfaceDescriptor::offscreen(256, 256));

    assert!(matches!(
        ctx.registry.validate(texture.handle()),
        Err(GraphicsError::ResourceStale { .. })
    ));

    // Backing memory went with the old device: no explicit destroy happened.
    let destroyed = ctx
        .backend
        .events()
        .into_iter()
        .filter(|event| matches!(event, BackendEvent::ResourceDestroyed { .. }))
        .count();
    assert_eq!(destroyed, 0);

    let fresh = ctx
        .provider
        .create_texture(&mut ctx.registry, &desc, None)
        .unwrap();
    assert_ne!(fresh.handle(), texture.handle());
    assert!(ctx.registry.validate(fresh.handle()).is_ok());
}

#[test]
fn test_replacement_invalidates_registry_without_manual_switch() {
    let mut ctx = TestContext::initialized(128, 128);
    let mut registry = ResourceRegistry::new();
    let desc = TextureDescriptor::new_2d(4, 4, TextureFormat::Rgba8Unorm).with_label("old");
    let texture = ctx
        .provider
        .create_texture(&mut registry, &desc, None)
        .unwrap();

    ctx.backend.lose_device();
    assert!(ctx.provider.present().unwrap().is_device_lost());
    let generation = ctx.initialize(SurfaceDescriptor::offscreen(128, 128));

    assert_eq!(registry.generation(), generation);
    assert!(registry.is_empty());
    assert!(matches!(
        registry.validate(texture.handle()),
        Err(GraphicsError::ResourceStale { .. })
    ));
    assert!(!registry.release(texture.handle()));
    assert_eq!(registry.release_all(), 0);
    assert_eq!(ctx.backend.stray_destroys(), 0);
}

#[test]
fn test_failed_recreation_drops_resources_of_destroyed_device() {
    let mut ctx = TestContext::initialized(128, 128);
    for label in ["a", "b"] {
        let desc = TextureDescriptor::new_2d(1, 1, TextureFormat::R8Unorm).with_label(label);
        ctx.provider
            .create_texture(&mut ctx.registry, &desc, None)
            .unwrap();
    }
    let held = ctx.registry.live_handles();

    ctx.backend.lose_device();
    assert!(ctx.provider.present().unwrap().is_device_lost());
    ctx.backend.fail_next_device_creations(1);
    assert!(
        ctx.provider
            .initialize(&SurfaceDescriptor::offscreen(128, 128))
            .is_err()
    );
    assert_eq!(ctx.backend.live_device_count(), 0);

    assert_eq!(ctx.registry.generation(), 0);
    for handle in held {
        assert!(ctx.registry.validate(handle).is_err());
    }
    assert_eq!(ctx.registry.release_all(), 0);
    ctx.provider.dispose();

    assert_eq!(ctx.backend.stray_destroys(), 0);
    assert!(
        !ctx.backend
            .events()
            .iter()
            .any(|event| matches!(event, BackendEvent::ResourceDestroyed { .. }))
    );
}

#[test]
fn test_resize_keeps_resources_valid() {
    let mut ctx = TestContext::initialized(800, 600);
    let desc = TextureDescriptor::new_2d(8, 8, TextureFormat::Rgba8Unorm);
    let texture = ctx
        .provider
        .create_texture(&mut ctx.registry, &desc, None)
        .unwrap();

    let change = ctx
        .provider
        .on_surface_changed(&SurfaceDescriptor::offscreen(1280, 720))
        .unwrap();
    assert_eq!(change, SurfaceChange::TargetReplaced);
    assert!(ctx.registry.validate(texture.handle()).is_ok());
}

#[test]
fn test_teardown_destroys_in_reverse_order() {
    let mut ctx = TestContext::initialized(64, 64);
    for label in ["a", "b", "c"] {
        let desc = TextureDescriptor::new_2d(1, 1, TextureFormat::R8Unorm).with_label(label);
        ctx.provider
            .create_texture(&mut ctx.registry, &desc, None)
            .unwrap();
    }
    ctx.backend.clear_events();

    assert_eq!(ctx.registry.release_all(), 3);
    ctx.provider.dispose();

    let labels: Vec<String> = ctx
        .backend
        .events()
        .into_iter()
        .filter_map(|event| match event {
            BackendEvent::ResourceDestroyed { label, .. } => Some(label),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["c", "b", "a"]);
    assert!(matches!(
        ctx.backend.events().last(),
        Some(BackendEvent::DeviceDestroyed(_))
    ));
}

// ============================================================================
// Registry ordering properties
// ============================================================================

#[rstest]
#[case::seed_1(1)]
#[case::seed_7(7)]
#[case::seed_42(42)]
#[case::seed_1234(1234)]
#[case::seed_99991(99991)]
fn test_release_all_is_reverse_registration_order(#[case] seed: u64) {
    let mut rng = Lcg::new(seed);
    let log = ReleaseLog::default();
    let mut registry = ResourceRegistry::new();
    let mut live = Vec::new();
    let mut released_early = Vec::new();

    for tag in 0..64 {
        let handle = registry.register(ResourceKind::Custom, format!("r{tag}"), log.callback(tag));
        live.push((tag, handle));

        if rng.next_below(3) == 0 && !live.is_empty() {
            let index = rng.next_below(live.len() as u64) as usize;
            let (tag, handle) = live.remove(index);
            assert!(registry.release(handle));
            released_early.push(tag);
        }
    }

    assert_eq!(log.released(), released_early);
    registry.release_all();

    let mut expected = released_early.clone();
    expected.extend(live.iter().rev().map(|(tag, _)| *tag));
    assert_eq!(log.released(), expected);
}

#[rstest]
#[case::single(1)]
#[case::many(16)]
fn test_double_release_is_noop(#[case] count: u64) {
    let log = ReleaseLog::default();
    let mut registry = ResourceRegistry::new();
    let handles: Vec<_> = (0..count)
        .map(|tag| registry.register(ResourceKind::Buffer, "b", log.callback(tag)))
        .collect();

    for handle in &handles {
        assert!(registry.release(*handle));
        assert!(!registry.release(*handle));
    }
    assert_eq!(log.released(), (0..count).collect::<Vec<_>>());
    assert_eq!(registry.release_all(), 0);
}
