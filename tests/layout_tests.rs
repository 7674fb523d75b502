use glam::Vec3;
use indexmap::IndexMap;

use layerscape::layout::{FALLBACK_COLOR, LayoutConfig, layout_model};
use layerscape::{LayoutSession, TensorRecord};

fn tensor(name: &str, numel: u64) -> TensorRecord {
    TensorRecord {
        model_name: "m".to_string(),
        name: name.to_string(),
        numel,
        shape: vec![numel],
        id: 0,
        extra: IndexMap::new(),
    }
}

fn test_config() -> LayoutConfig {
    LayoutConfig {
        min_size: 100.0,
        max_size: 2000.0,
        thickness: 40.0,
        spacing_multiplier: 2.0,
        origin: Vec3::ZERO,
        direction: Vec3::NEG_X,
    }
}

#[test]
fn sizes_interpolate_on_a_log_scale() {
    let tensors = vec![tensor("a", 10), tensor("b", 100), tensor("c", 1000)];
    let config = test_config();
    let layout = layout_model(&tensors, &config);

    let sizes: Vec<f32> = layout.placements.iter().map(|p| p.size).collect();
    assert_eq!(sizes[0], config.min_size);
    assert_eq!(sizes[2], config.max_size);
    assert!(sizes[1] > config.min_size && sizes[1] < config.max_size);
    // ln(100) sits exactly halfway between ln(10) and ln(1000).
    let midpoint = config.min_size + 0.5 * (config.max_size - config.min_size);
    assert!((sizes[1] - midpoint).abs() < 1e-2, "got {}", sizes[1]);
}

#[test]
fn equal_numels_produce_equal_finite_sizes() {
    let tensors = vec![tensor("a", 64), tensor("b", 64), tensor("c", 64)];
    let config = test_config();
    let layout = layout_model(&tensors, &config);

    for placement in &layout.placements {
        assert!(placement.size.is_finite());
        assert_eq!(placement.size, config.min_size);
    }
}

#[test]
fn zero_numel_does_not_poison_the_interpolation() {
    let tensors = vec![tensor("a", 0), tensor("b", 0)];
    let layout = layout_model(&tensors, &test_config());
    assert!(layout.placements.iter().all(|p| p.size.is_finite()));
}

#[test]
fn positions_advance_by_a_fixed_stride() {
    // Wildly different numels; the stride must not care.
    let tensors = vec![
        tensor("a", 1),
        tensor("b", 1_000_000),
        tensor("c", 10),
        tensor("d", 500_000),
    ];
    let config = test_config();
    let layout = layout_model(&tensors, &config);

    let stride = config.thickness * config.spacing_multiplier;
    assert_eq!(layout.placements[0].position, config.origin);
    for pair in layout.placements.windows(2) {
        let step = pair[1].position - pair[0].position;
        assert!((step.length() - stride).abs() < 1e-3);
        // Strictly increasing along the layout axis.
        assert!(pair[1].position.dot(config.direction) > pair[0].position.dot(config.direction));
    }
}

#[test]
fn extent_and_center_are_exact() {
    let tensors = vec![tensor("a", 10), tensor("b", 20), tensor("c", 30)];
    let config = test_config();
    let layout = layout_model(&tensors, &config);

    let stride = config.thickness * config.spacing_multiplier;
    assert_eq!(layout.total_extent, stride * tensors.len() as f32);
    let expected_center = config.origin + Vec3::NEG_X * (layout.total_extent / 2.0);
    assert_eq!(layout.center, expected_center);
    assert_eq!(layout.suggested_camera_radius(), layout.total_extent * 1.5);
}

#[test]
fn empty_tensor_list_is_not_an_error() {
    let config = test_config();
    let layout = layout_model(&[], &config);
    assert!(layout.placements.is_empty());
    assert_eq!(layout.total_extent, 0.0);
    assert_eq!(layout.center, config.origin);
}

#[test]
fn cleaned_names_share_colors_in_first_seen_order() {
    let tensors = vec![
        tensor("a.0.w", 10),
        tensor("a.1.w", 20),
        tensor("b.w", 30),
    ];
    let layout = layout_model(&tensors, &test_config());

    assert_eq!(layout.placements[0].clean_name, "a.w");
    assert_eq!(layout.placements[1].clean_name, "a.w");
    assert_eq!(layout.placements[2].clean_name, "b.w");
    assert_eq!(layout.placements[0].color, layout.placements[1].color);
    assert_ne!(layout.placements[0].color, layout.placements[2].color);
}

#[test]
fn color_order_resets_between_sessions() {
    let config = test_config();
    let first = layout_model(&[tensor("x.w", 10), tensor("y.w", 20)], &config);
    let second = layout_model(&[tensor("y.w", 20)], &config);

    // `y.w` is first-seen in the second session, so it takes slot 0 there.
    assert_eq!(second.placements[0].color, first.placements[0].color);
    assert_ne!(second.placements[0].color, first.placements[1].color);
}

#[test]
fn palette_exhaustion_assigns_the_fallback_color() {
    let tensors: Vec<TensorRecord> = (0..95)
        .map(|i| tensor(&format!("layer{i}.w"), 10 + i as u64))
        .collect();
    let config = test_config();
    let layout = LayoutSession::new(&config).layout(&tensors);

    assert_ne!(layout.placements[0].color, FALLBACK_COLOR);
    assert_ne!(layout.placements[88].color, FALLBACK_COLOR);
    for placement in &layout.placements[89..] {
        assert_eq!(placement.color, FALLBACK_COLOR);
    }
}
