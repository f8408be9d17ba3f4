//! Content loader behavior against the dummy backend.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Harness, png};
use hearth_content::ContentError;
use hearth_graphics::{Buffer, GraphicsError, ShaderModule, ShaderStage, Texture};
use rstest::rstest;

// ============================================================================
// Caching per generation
// ============================================================================

#[test]
fn test_same_generation_returns_same_instance() {
    let mut h = Harness::new();
    let (loader, mut ctx) = h.ctx();

    let first = loader.load::<Texture>("textures/brick.png", &mut ctx).unwrap();
    let second = loader.load::<Texture>("textures/brick.png", &mut ctx).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!((first.width(), first.height()), (4, 2));
    assert_eq!(first.label(), Some("textures/brick.png"));

    let stats = loader.stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
    assert_eq!(h.registry.len(), 1);
}

#[rstest]
#[case::doubled_separator("textures//brick.png")]
#[case::dot_segment("./textures/brick.png")]
#[case::backslash("textures\\brick.png")]
#[case::explicit_mount("game/textures/brick.png")]
fn test_equivalent_names_share_cache_entry(#[case] alias: &str) {
    let mut h = Harness::new();
    let (loader, mut ctx) = h.ctx();

    let canonical = loader.load::<Texture>("textures/brick.png", &mut ctx).unwrap();
    let aliased = loader.load::<Texture>(alias, &mut ctx).unwrap();
    if alias.starts_with("game/") {
        // Different cache key, same bytes.
        assert!(!Arc::ptr_eq(&canonical, &aliased));
    } else {
        assert!(Arc::ptr_eq(&canonical, &aliased));
    }
}

#[test]
fn test_new_generation_builds_new_instance() {
    let mut h = Harness::new();
    let before = {
        let (loader, mut ctx) = h.ctx();
        loader.load::<Texture>("textures/brick.png", &mut ctx).unwrap()
    };

    h.replace_device();

    let (loader, mut ctx) = h.ctx();
    let after = loader.load::<Texture>("textures/brick.png", &mut ctx).unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(after.generation() > before.generation());
    assert_eq!(loader.stats().invalidations, 1);

    assert!(matches!(
        h.registry.validate(before.handle()),
        Err(GraphicsError::ResourceStale { .. })
    ));
    assert!(h.registry.validate(after.handle()).is_ok());
}

#[test]
fn test_invalidations_count_only_dropped_caches() {
    let mut h = Harness::new();
    h.loader.invalidate();
    assert_eq!(h.loader.stats().invalidations, 0);

    {
        let (loader, mut ctx) = h.ctx();
        loader.load::<Texture>("textures/brick.png", &mut ctx).unwrap();
    }
    h.replace_device();
    h.loader.invalidate();
    h.loader.invalidate();
    assert_eq!(h.loader.stats().invalidations, 1);
    assert_eq!(h.loader.cached_len(), 0);
}

#[test]
fn test_load_while_lost_fails_fast() {
    let mut h = Harness::new();
    h.backend.lose_device();
    assert!(h.provider.present().unwrap().is_device_lost());

    let (loader, mut ctx) = h.ctx();
    let err = loader
        .load::<Texture>("textures/brick.png", &mut ctx)
        .unwrap_err();
    assert!(err.is_device_lost());
    assert_eq!(loader.cached_len(), 0);
}

#[test]
fn test_loss_during_construction_is_reported() {
    let mut h = Harness::new();
    // The provider has not noticed yet; creation on the backend fails.
    h.backend.lose_device();

    let (loader, mut ctx) = h.ctx();
    let err = loader
        .load::<ShaderModule>("shaders/quad.wgsl", &mut ctx)
        .unwrap_err();
    assert!(err.is_device_lost());
    assert!(h.provider.is_lost());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_asset_is_not_found() {
    let mut h = Harness::new();
    let (loader, mut ctx) = h.ctx();
    let err = loader
        .load::<Texture>("textures/missing.png", &mut ctx)
        .unwrap_err();
    assert!(matches!(err, ContentError::AssetNotFound { ref name } if name == "textures/missing.png"));
    assert!(h.registry.is_empty());
}

#[test]
fn test_corrupt_texture_is_format_error() {
    let mut h = Harness::new();
    let (loader, mut ctx) = h.ctx();
    let err = loader
        .load::<Texture>("textures/corrupt.png", &mut ctx)
        .unwrap_err();
    assert!(matches!(err, ContentError::AssetFormat { .. }));
    assert_eq!(loader.cached_len(), 0);
}

#[test]
fn test_invalid_wgsl_is_format_error() {
    let mut h = Harness::new();
    let (loader, mut ctx) = h.ctx();
    match loader.load::<ShaderModule>("shaders/broken.wgsl", &mut ctx) {
        Err(ContentError::AssetFormat { name, reason }) => {
            assert_eq!(name, "shaders/broken.wgsl");
            assert!(!reason.is_empty());
        }
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn test_empty_blob_is_format_error() {
    let mut h = Harness::new();
    let (loader, mut ctx) = h.ctx();
    assert!(matches!(
        loader.load::<Buffer>("data/empty.bin", &mut ctx),
        Err(ContentError::AssetFormat { .. })
    ));
}

#[test]
fn test_unregistered_type_has_no_reader() {
    let mut h = Harness::new();
    let (loader, mut ctx) = h.ctx();
    assert!(matches!(
        loader.load::<String>("data/mesh.bin", &mut ctx),
        Err(ContentError::NoReader { .. })
    ));
}

// ============================================================================
// Readers
// ============================================================================

#[test]
fn test_shader_entry_points() {
    let mut h = Harness::new();
    let (loader, mut ctx) = h.ctx();
    let shader = loader
        .load::<ShaderModule>("shaders/quad.wgsl", &mut ctx)
        .unwrap();
    assert_eq!(shader.entry_point(ShaderStage::Vertex), Some("vs_main"));
    assert_eq!(shader.entry_point(ShaderStage::Fragment), Some("fs_main"));
    assert_eq!(shader.entry_point(ShaderStage::Compute), None);
}

#[test]
fn test_blob_becomes_buffer() {
    let mut h = Harness::new();
    let (loader, mut ctx) = h.ctx();
    let buffer = loader.load::<Buffer>("data/mesh.bin", &mut ctx).unwrap();
    assert_eq!(buffer.size(), 48);
}

#[test]
fn test_assets_added_after_startup_are_visible() {
    let mut h = Harness::new();
    h.source.insert("textures/late.png", png(1, 1));
    let (loader, mut ctx) = h.ctx();
    assert!(loader.load::<Texture>("textures/late.png", &mut ctx).is_ok());
}

// ============================================================================
// Background requests
// ============================================================================

#[test]
fn test_request_then_poll() {
    let mut h = Harness::new();
    assert!(h.loader.request::<Texture>("textures/brick.png").unwrap());
    assert!(!h.loader.request::<Texture>("textures//brick.png").unwrap());
    assert!(h.loader.request::<Texture>("textures/missing.png").unwrap());
    assert_eq!(h.loader.pending_len(), 2);

    let (loader, mut ctx) = h.ctx();
    let mut outcomes = loader.wait_completed(&mut ctx, Duration::from_secs(5));
    outcomes.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(ContentError::AssetNotFound { .. })
    ));

    assert!(loader.is_cached::<Texture>("textures/brick.png"));
    loader.load::<Texture>("textures/brick.png", &mut ctx).unwrap();
    assert_eq!(loader.stats().hits, 1);
}

#[test]
fn test_fetched_bytes_wait_for_device() {
    let mut h = Harness::new();
    h.backend.lose_device();
    assert!(h.provider.present().unwrap().is_device_lost());

    h.loader.request::<ShaderModule>("shaders/quad.wgsl").unwrap();
    {
        let (loader, mut ctx) = h.ctx();
        let outcomes = loader.wait_completed(&mut ctx, Duration::from_millis(200));
        assert!(outcomes.is_empty());
        assert_eq!(loader.pending_len(), 1);
    }

    h.provider
        .initialize(&hearth_graphics::SurfaceDescriptor::offscreen(800, 600))
        .unwrap();

    let (loader, mut ctx) = h.ctx();
    let outcomes = loader.poll_completed(&mut ctx);
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].result.is_ok());
    assert_eq!(loader.pending_len(), 0);
}
