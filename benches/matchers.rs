use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use bcdemux::{AnyMatcher, BarcodeSet, Classifier, PatternMatcher, Strategy};

const BASES: &[u8; 4] = b"ACGT";

fn random_seq(rng: &mut SmallRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| BASES[rng.random_range(0..4)]).collect()
}

// Helper to create a barcode set and reads with a barcode planted in most of them
fn create_test_data(num_barcodes: usize, num_reads: usize) -> (BarcodeSet, Vec<Vec<u8>>) {
    let mut rng = SmallRng::seed_from_u64(42);
    let barcodes: Vec<Vec<u8>> = (0..num_barcodes).map(|_| random_seq(&mut rng, 12)).collect();
    let reads = (0..num_reads)
        .map(|_| {
            let mut read = random_seq(&mut rng, 150);
            if rng.random_bool(0.8) {
                let bc = &barcodes[rng.random_range(0..num_barcodes)];
                let at = rng.random_range(0..read.len() - bc.len());
                read[at..at + bc.len()].copy_from_slice(bc);
            }
            read
        })
        .collect();
    (BarcodeSet::from_lines(barcodes), reads)
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    let (set, reads) = create_test_data(96, 10_000);

    for strategy in [Strategy::Aho, Strategy::Kmp, Strategy::BitParallel] {
        let matcher = AnyMatcher::build(strategy, set.patterns());
        group.bench_function(strategy.name(), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for read in &reads {
                    matcher.for_each_match(read, &mut |_| hits += 1);
                }
                black_box(hits)
            });
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let (set, reads) = create_test_data(96, 10_000);
    let matcher = AnyMatcher::build(Strategy::Aho, set.patterns());

    c.bench_function("classify", |b| {
        b.iter(|| {
            let mut classifier = Classifier::for_barcodes(&matcher, &set);
            for read in &reads {
                classifier.classify(b"read", read);
            }
            black_box(classifier.into_tally())
        });
    });
}

criterion_group!(benches, bench_strategies, bench_classify);
criterion_main!(benches);
