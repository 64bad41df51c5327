use blocksync::delta::{scan_delta_with_config, ScannerConfig};
use blocksync::signature::{build_signature_with_config, BuilderConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_test_data(size: usize) -> (Vec<u8>, Vec<u8>) {
    let mut original = Vec::with_capacity(size);

    let mut seed: u64 = 0xDEAD_BEEF;
    for _ in 0..size {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        original.push((seed >> 56) as u8);
    }

    let mut modified = original.clone();
    if size > 1000 {
        for i in (0..size).step_by(20) {
            modified[i] = modified[i].wrapping_add(1);
        }
        let insert_pos = size / 2;
        let insert_data: Vec<u8> = (0u8..100).map(|i| i.wrapping_mul(7)).collect();
        modified.splice(insert_pos..insert_pos, insert_data);
    }

    (original, modified)
}

const BLOCK_SIZES: [u32; 3] = [16, 64, 256];

fn benchmark_signature_generation(c: &mut Criterion) {
    let sizes = vec![1_000, 10_000, 100_000, 1_000_000];
    let mut group = c.benchmark_group("signature_generation");

    for size in sizes {
        let (original, _) = generate_test_data(size);
        for block_size in BLOCK_SIZES {
            let config = BuilderConfig {
                block_size,
                ..BuilderConfig::default()
            };
            group.bench_with_input(
                BenchmarkId::new(format!("block_size_{block_size}"), size),
                &size,
                |b, _| {
                    b.iter_batched(
                        || original.clone(),
                        |data| build_signature_with_config(&data[..], config).unwrap(),
                        criterion::BatchSize::LargeInput,
                    );
                },
            );
        }
    }

    group.finish();
}

fn benchmark_delta_scan(c: &mut Criterion) {
    let sizes = vec![1_000, 10_000, 100_000, 1_000_000];
    let mut group = c.benchmark_group("delta_scan");

    for size in sizes {
        let (original, modified) = generate_test_data(size);
        for block_size in BLOCK_SIZES {
            let config = BuilderConfig {
                block_size,
                ..BuilderConfig::default()
            };
            let signature = build_signature_with_config(&original[..], config).unwrap();

            group.bench_with_input(
                BenchmarkId::new(format!("block_size_{block_size}"), size),
                &size,
                |b, _| {
                    b.iter_batched(
                        || modified.clone(),
                        |data| {
                            scan_delta_with_config(&signature, &data[..], ScannerConfig::default())
                                .unwrap()
                        },
                        criterion::BatchSize::LargeInput,
                    );
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_signature_generation, benchmark_delta_scan);
criterion_main!(benches);
