use addr_trie::{Address, AddressComparator, TrieKey, COUNT_COMPARATOR, HIGH_VALUE_COMPARATOR};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::net::{Ipv4Addr, Ipv6Addr};

fn v4_blocks(count: u32) -> Vec<Address> {
    (0..count)
        .map(|i| Address::from(Ipv4Addr::from(i.wrapping_mul(2_654_435_761))).to_prefix_block_len(8 + (i % 25) as u8))
        .collect()
}

fn v6_blocks(count: u32) -> Vec<Address> {
    (0..count)
        .map(|i| {
            let value = u128::from(i).wrapping_mul(0x9e37_79b9_7f4a_7c15_f39c_c060_5ced_c835);
            Address::from(Ipv6Addr::from(value)).to_prefix_block_len(16 + (i % 113) as u8)
        })
        .collect()
}

/// Benchmark sorting with each ordering
fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");

    for size in [1_000, 10_000].iter() {
        let v4 = v4_blocks(*size);
        let v6 = v6_blocks(*size);

        group.bench_with_input(BenchmarkId::new("count_v4", size), size, |b, _| {
            b.iter(|| {
                let mut items = v4.clone();
                items.sort_by(|one, two| COUNT_COMPARATOR.compare_addresses(one, two));
                black_box(items);
            });
        });
        group.bench_with_input(BenchmarkId::new("high_value_v4", size), size, |b, _| {
            b.iter(|| {
                let mut items = v4.clone();
                items.sort_by(|one, two| HIGH_VALUE_COMPARATOR.compare_addresses(one, two));
                black_box(items);
            });
        });
        group.bench_with_input(BenchmarkId::new("trie_order_v4", size), size, |b, _| {
            b.iter(|| {
                let mut items = v4.clone();
                items.sort_by(|one, two| one.compare(two));
                black_box(items);
            });
        });
        group.bench_with_input(BenchmarkId::new("count_v6", size), size, |b, _| {
            b.iter(|| {
                let mut items = v6.clone();
                items.sort_by(|one, two| COUNT_COMPARATOR.compare_addresses(one, two));
                black_box(items);
            });
        });
        group.bench_with_input(BenchmarkId::new("trie_order_v6", size), size, |b, _| {
            b.iter(|| {
                let mut items = v6.clone();
                items.sort_by(|one, two| one.compare(two));
                black_box(items);
            });
        });
    }

    group.finish();
}

/// Benchmark memoized block queries on fresh and warm values
fn bench_block_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_queries");
    let blocks = v6_blocks(1_000);

    let singles: Vec<(Address, u8)> = blocks
        .iter()
        .map(|block| (block.lower().without_prefix_len(), block.effective_prefix_len()))
        .collect();

    group.bench_function("prefix_len_for_single_block_cold", |b| {
        b.iter(|| {
            for (single, prefix_len) in &singles {
                let fresh = single.to_prefix_block_len(*prefix_len);
                black_box(fresh.prefix_len_for_single_block());
            }
        });
    });
    group.bench_function("prefix_len_for_single_block_warm", |b| {
        b.iter(|| {
            for block in &blocks {
                black_box(block.prefix_len_for_single_block());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_sort, bench_block_queries);
criterion_main!(benches);
