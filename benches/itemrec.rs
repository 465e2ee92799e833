use criterion::{criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use itemrec::{DetectorConfig, MatchConfig, Matcher, OrbDetector, TemplateIndex};
use std::hint::black_box;

fn make_item(width: u32, height: u32, salt: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let (bx, by) = (x / 6, y / 6);
        let v = ((bx * 37 + salt) ^ (by * 91) ^ (bx * by * 13)) & 0xFF;
        Rgb([v as u8, (v / 2) as u8, (255 - v) as u8])
    })
}

fn make_index(count: u32) -> TemplateIndex {
    let templates = (0..count).map(|i| (format!("item_{i:03}"), make_item(96, 96, i * 17)));
    TemplateIndex::build(templates, DetectorConfig::default()).unwrap()
}

fn bench_recognize(c: &mut Criterion) {
    let index = make_index(40);
    let query = make_item(96, 96, 5 * 17);

    let keypoint = Matcher::new();
    c.bench_function("recognize_keypoint_40_templates", |b| {
        b.iter(|| keypoint.recognize(black_box(&index), black_box(&query)).unwrap())
    });

    let fallback = Matcher::new().with_config(MatchConfig {
        min_good_matches: usize::MAX,
        ..MatchConfig::default()
    });
    c.bench_function("recognize_fallback_40_templates", |b| {
        b.iter(|| fallback.recognize(black_box(&index), black_box(&query)).unwrap())
    });

    #[cfg(feature = "rayon")]
    {
        let parallel = Matcher::new().with_config(MatchConfig {
            parallel: true,
            ..MatchConfig::default()
        });
        c.bench_function("recognize_keypoint_40_templates_parallel", |b| {
            b.iter(|| parallel.recognize(black_box(&index), black_box(&query)).unwrap())
        });
    }
}

fn bench_features(c: &mut Criterion) {
    let detector = OrbDetector::default();
    let gray = itemrec::to_gray(&make_item(256, 256, 3)).unwrap();
    c.bench_function("detect_and_compute_256", |b| {
        b.iter(|| detector.detect_and_compute(black_box(&gray)))
    });
}

fn bench_index(c: &mut Criterion) {
    c.bench_function("build_index_40_templates", |b| b.iter(|| make_index(black_box(40))));
}

criterion_group!(benches, bench_recognize, bench_features, bench_index);
criterion_main!(benches);
