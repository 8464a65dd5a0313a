//! Criterion benchmarks for grundton-synth
//!
//! Run with: cargo bench -p grundton-synth

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use grundton_synth::{OscillatorPair, Waveform};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[48, 128, 512];

fn bench_pair_waveforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("OscillatorPair");

    for waveform in Waveform::ALL {
        for &block_size in BLOCK_SIZES {
            let mut pair = OscillatorPair::new(SAMPLE_RATE, [waveform; 2], 0.5);
            pair.retune([110.0, 220.0], [0.5, 0.5]);

            group.bench_with_input(
                BenchmarkId::new(waveform.name(), block_size),
                &block_size,
                |b, &size| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for _ in 0..size {
                            let [l, r] = pair.next_frame();
                            sum += l + r;
                        }
                        black_box(sum)
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_pair_waveforms);
criterion_main!(benches);
