use image::{Rgb, RgbImage};
use itemrec::{
    to_gray, DetectorConfig, ItemRecError, MatchConfig, Matcher, Method, OrbDetector,
    TemplateIndex, UNKNOWN_LABEL,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random 8x8 gray blocks: plenty of FAST corners.
fn textured(seed: u64, width: u32, height: u32) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let bw = width.div_ceil(8);
    let bh = height.div_ceil(8);
    let blocks: Vec<u8> = (0..bw * bh).map(|_| rng.random_range(0..=255)).collect();
    RgbImage::from_fn(width, height, |x, y| {
        let v = blocks[((y / 8) * bw + x / 8) as usize];
        Rgb([v, v, v])
    })
}

/// Smooth horizontal ramp: no FAST corners, non-zero variance.
fn h_gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / (width - 1)) as u8;
        Rgb([v, v, v])
    })
}

/// Smooth vertical ramp: no FAST corners, uncorrelated with `h_gradient`.
fn v_gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |_, y| {
        let v = (y * 255 / (height - 1)) as u8;
        Rgb([v, v, v])
    })
}

fn solid(width: u32, height: u32, value: u8) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([value, value, value]))
}

fn keypoint_count(img: &RgbImage) -> usize {
    OrbDetector::default()
        .detect_and_compute(&to_gray(img).unwrap())
        .len()
}

fn gradient_index() -> TemplateIndex {
    TemplateIndex::build(
        [("Sword", h_gradient(64, 64)), ("Shield", v_gradient(64, 64))],
        DetectorConfig::default(),
    )
    .unwrap()
}

fn textured_index() -> (TemplateIndex, RgbImage) {
    let sword = textured(7, 128, 128);
    let shield = textured(11, 128, 128);
    let index = TemplateIndex::build(
        [("Sword", sword.clone()), ("Shield", shield)],
        DetectorConfig::default(),
    )
    .unwrap();
    (index, sword)
}

#[test]
fn synthetic_images_have_expected_keypoints() {
    assert_eq!(keypoint_count(&h_gradient(64, 64)), 0);
    assert_eq!(keypoint_count(&v_gradient(64, 64)), 0);
    assert_eq!(keypoint_count(&solid(64, 64, 90)), 0);
    assert!(keypoint_count(&textured(7, 128, 128)) >= 8);
}

#[test]
fn identity_match_uses_correlation_without_keypoints() {
    let index = gradient_index();
    let query = h_gradient(64, 64);

    let rec = Matcher::new().recognize(&index, &query).unwrap();
    assert_eq!(rec.label, "Sword");
    assert_eq!(rec.method, Method::Corr);
    assert!((rec.score - 1.0).abs() < 1e-4, "score {}", rec.score);
}

#[test]
fn identity_match_uses_keypoints_when_textured() {
    let (index, query) = textured_index();

    let rec = Matcher::new().recognize(&index, &query).unwrap();
    assert_eq!(rec.label, "Sword");
    assert_eq!(rec.method, Method::Orb);
    assert!(rec.score >= 8.0, "score {}", rec.score);
}

#[test]
fn correlation_handles_resized_queries() {
    let index = gradient_index();
    let query = h_gradient(32, 48);

    let rec = Matcher::new().recognize(&index, &query).unwrap();
    assert_eq!(rec.label, "Sword");
    assert_eq!(rec.method, Method::Corr);
    assert!(rec.score > 0.95, "score {}", rec.score);
}

#[test]
fn constant_query_scores_zero_against_textured_templates() {
    let index = gradient_index();
    let rec = Matcher::new().recognize(&index, &solid(40, 30, 200)).unwrap();
    assert_eq!(rec.method, Method::Corr);
    // Both gradients score 0 against a flat query; the first name keeps the tie.
    assert_eq!(rec.score, 0.0);
    assert_eq!(rec.label, "Shield");
}

#[test]
fn solid_template_matches_itself_through_correlation() {
    let slot = solid(64, 64, 40);
    let index = TemplateIndex::build(
        [("Alpha", h_gradient(64, 64)), ("Slot", slot.clone())],
        DetectorConfig::default(),
    )
    .unwrap();

    let rec = Matcher::new().recognize(&index, &slot).unwrap();
    assert_eq!(rec.label, "Slot");
    assert_eq!(rec.method, Method::Corr);
    assert!((rec.score - 1.0).abs() < 1e-6, "score {}", rec.score);
}

#[test]
fn solid_color_blocks_resolve_to_their_own_templates() {
    let red = RgbImage::from_pixel(48, 48, Rgb([200, 30, 30]));
    let blue = RgbImage::from_pixel(48, 48, Rgb([20, 40, 220]));
    let index = TemplateIndex::build(
        [("Ruby", red.clone()), ("Amulet", h_gradient(48, 48))],
        DetectorConfig::default(),
    )
    .unwrap();
    let matcher = Matcher::new();

    let rec = matcher.recognize(&index, &red).unwrap();
    assert_eq!((rec.label.as_str(), rec.method), ("Ruby", Method::Corr));
    assert!((rec.score - 1.0).abs() < 1e-6);

    // A flat template scores 1.0 against any query, so it also wins here.
    let rec = matcher.recognize(&index, &blue).unwrap();
    assert_eq!(rec.label, "Ruby");

    let single = TemplateIndex::build([("Sapphire", blue.clone())], DetectorConfig::default())
        .unwrap();
    let rec = matcher.recognize(&single, &blue).unwrap();
    assert_eq!(rec.label, "Sapphire");
    assert_eq!(rec.method, Method::Corr);
}

#[test]
fn keypointless_query_returns_fallback_even_when_low() {
    // Zero query keypoints: the fallback answer is returned as-is, without
    // the 0.5 confidence gate.
    let index = TemplateIndex::build([("Sword", h_gradient(64, 64))], DetectorConfig::default())
        .unwrap();
    let query = v_gradient(64, 64);
    let rec = Matcher::new().recognize(&index, &query).unwrap();
    assert_eq!(rec.method, Method::Corr);
    assert_eq!(rec.label, "Sword");
    assert!(rec.score.abs() < 1e-4);
}

#[test]
fn ties_go_to_first_template_by_name() {
    let index = TemplateIndex::build(
        [("Beta", h_gradient(64, 64)), ("Alpha", h_gradient(64, 64))],
        DetectorConfig::default(),
    )
    .unwrap();
    let rec = Matcher::new()
        .recognize(&index, &h_gradient(64, 64))
        .unwrap();
    assert_eq!(rec.label, "Alpha");
}

#[test]
fn fallback_overrides_when_templates_have_no_descriptors() {
    let index = gradient_index();

    // Gradient with a bright square: the query has keypoints, the templates do not.
    let mut query = h_gradient(64, 64);
    for y in 28..36 {
        for x in 28..36 {
            query.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
    assert!(keypoint_count(&query) > 0);

    let rec = Matcher::new().recognize(&index, &query).unwrap();
    assert_eq!(rec.method, Method::Corr);
    assert_eq!(rec.label, "Sword");
    assert!(rec.score >= 0.5, "score {}", rec.score);
}

#[test]
fn weak_keypoints_and_weak_fallback_report_keypoint_sentinel() {
    let index = gradient_index();
    let query = textured(3, 96, 96);
    assert!(keypoint_count(&query) > 0);

    let rec = Matcher::new().recognize(&index, &query).unwrap();
    assert_eq!(rec.method, Method::Orb);
    assert_eq!(rec.label, UNKNOWN_LABEL);
    assert_eq!(rec.score, -1.0);
}

#[test]
fn fallback_below_cutoff_keeps_keypoint_result() {
    let (index, query) = textured_index();
    let matcher = Matcher::new().with_config(MatchConfig {
        min_good_matches: usize::MAX,
        fallback_min_score: 1.5,
        ..MatchConfig::default()
    });
    let rec = matcher.recognize(&index, &query).unwrap();
    assert_eq!(rec.method, Method::Orb);
    assert_eq!(rec.label, "Sword");
}

#[test]
fn raising_evidence_threshold_only_moves_toward_correlation() {
    let (index, query) = textured_index();
    let mut seen_corr = false;
    for min_good_matches in [0usize, 1, 4, 8, 16, 64, 256, 1024, usize::MAX] {
        let matcher = Matcher::new().with_config(MatchConfig {
            min_good_matches,
            ..MatchConfig::default()
        });
        let rec = matcher.recognize(&index, &query).unwrap();
        if seen_corr {
            assert_eq!(rec.method, Method::Corr, "threshold {min_good_matches}");
        }
        seen_corr |= rec.method == Method::Corr;
        assert_eq!(rec.label, "Sword");
    }
    assert!(seen_corr);
}

#[test]
fn repeated_calls_are_deterministic() {
    let (index, query) = textured_index();
    let matcher = Matcher::new();
    let first = matcher.recognize(&index, &query).unwrap();
    for _ in 0..3 {
        assert_eq!(matcher.recognize(&index, &query).unwrap(), first);
    }

    let (rebuilt, _) = textured_index();
    assert_eq!(matcher.recognize(&rebuilt, &query).unwrap(), first);
}

#[test]
fn empty_index_reports_unknown() {
    let index = TemplateIndex::build(Vec::<(String, RgbImage)>::new(), DetectorConfig::default())
        .unwrap();
    let matcher = Matcher::new();

    let rec = matcher.recognize(&index, &textured(5, 96, 96)).unwrap();
    assert_eq!(rec.label, UNKNOWN_LABEL);

    let rec = matcher.recognize(&index, &solid(16, 16, 0)).unwrap();
    assert_eq!(rec.label, UNKNOWN_LABEL);
    assert_eq!(rec.method, Method::Corr);
    assert_eq!(rec.score, -1.0);
}

#[test]
fn zero_area_region_is_invalid_input() {
    let index = gradient_index();
    let matcher = Matcher::new();
    for (w, h) in [(0u32, 10u32), (10, 0), (0, 0)] {
        let err = matcher.recognize(&index, &RgbImage::new(w, h)).unwrap_err();
        assert!(matches!(err, ItemRecError::InvalidInput(_)), "{w}x{h}: {err}");
    }
}

#[test]
fn tiny_regions_fall_back_to_correlation() {
    let index = gradient_index();
    let rec = Matcher::new().recognize(&index, &h_gradient(3, 2)).unwrap();
    assert_eq!(rec.method, Method::Corr);
    assert_eq!(rec.label, "Sword");
}

#[test]
fn direct_fallback_on_empty_raster_reports_sentinel() {
    let index = gradient_index();
    let rec = Matcher::new().correlate_fallback(&index, &image::GrayImage::new(0, 0));
    assert_eq!(rec.label, UNKNOWN_LABEL);
    assert_eq!(rec.method, Method::Corr);
    assert_eq!(rec.score, -1.0);
}
