use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shiwake_core::{AttributeExtractor, Engine, EngineConfig, MediaEntry, ScanMode};

const INPUTS: &[&str] = &[
    "Movie.Name.2020.1080p.DD5.1.x264-GRP.mkv",
    "Movie Name (2020) 2160p HDR DUAL Atmos x265.mkv",
    "Movie.Name.2015.EXTENDED.1080p.AMZN.WEB-DL.DDP5.1.H.264.Latino.mkv",
    "[SubsPlease] Jujutsu Kaisen - 24 (1080p) [A1B2C3D4].mkv",
    "Show.S01E02.720p.WEBRip.x265.mkv",
];

fn bench_extract(c: &mut Criterion) {
    let extractor = AttributeExtractor::new().unwrap();

    c.bench_function("extract_single", |b| {
        b.iter(|| extractor.extract(black_box(INPUTS[0])));
    });

    c.bench_function("extract_batch_5", |b| {
        b.iter(|| {
            for input in INPUTS {
                black_box(extractor.extract(black_box(input)));
            }
        });
    });
}

fn bench_run(c: &mut Criterion) {
    let engine = Engine::new(EngineConfig {
        mode: ScanMode::MoviesAndSeries,
        ..EngineConfig::default()
    })
    .unwrap();

    let entries: Vec<MediaEntry> = (0..200)
        .map(|i| MediaEntry::new(INPUTS[i % INPUTS.len()], i as u64))
        .collect();

    c.bench_function("engine_run_200", |b| {
        b.iter(|| engine.run(black_box(entries.clone())));
    });
}

criterion_group!(benches, bench_extract, bench_run);
criterion_main!(benches);
