use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use sv_audio::fft::SpectrumAnalyzer;
use sv_core::block::AudioBlock;

fn bench_transform(c: &mut Criterion) {
    let mut analyzer = SpectrumAnalyzer::new(1024, 44_100);
    let block =
        AudioBlock::from_samples((0..1024).map(|i| (i as f32 * 0.013).sin()).collect());

    c.bench_function("transform_1024", |b| {
        b.iter(|| analyzer.transform(black_box(&block)));
    });
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
