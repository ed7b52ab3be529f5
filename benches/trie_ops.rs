use addr_trie::{Address, Trie};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::net::Ipv4Addr;

/// Deterministic pseudo-random routes: /8 to /32 blocks spread over the space
fn routes(count: u32) -> Vec<Address> {
    let mut state = 0x9e37_79b9u32;
    (0..count)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let prefix_len = 8 + (i % 25) as u8;
            Address::from(Ipv4Addr::from(state)).to_prefix_block_len(prefix_len)
        })
        .collect()
}

fn build(routes: &[Address]) -> Trie<Address, u32> {
    let mut trie = Trie::new();
    for (index, route) in routes.iter().enumerate() {
        trie.put(route.clone(), index as u32);
    }
    trie
}

/// Benchmark single insert into tries of growing size
fn bench_single_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_insert");

    for size in [100, 1_000, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("Trie", size), size, |b, &size| {
            let mut trie = build(&routes(size));
            let next = Address::from(Ipv4Addr::new(203, 0, 113, 7));

            b.iter(|| {
                black_box(trie.add(next.clone()));
                trie.remove(&next); // Clean up for next iteration
            });
        });
    }

    group.finish();
}

/// Benchmark exact lookups, hit and miss
fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains");

    for size in [100, 1_000, 10_000, 100_000].iter() {
        let routes = routes(*size);
        let trie = build(&routes);
        let hit = routes[routes.len() / 2].clone();
        let miss = Address::from(Ipv4Addr::new(203, 0, 113, 7));

        group.bench_with_input(BenchmarkId::new("Trie_hit", size), size, |b, _| {
            b.iter(|| black_box(trie.contains(&hit)));
        });
        group.bench_with_input(BenchmarkId::new("Trie_miss", size), size, |b, _| {
            b.iter(|| black_box(trie.contains(&miss)));
        });
    }

    group.finish();
}

/// Benchmark longest-prefix match of single addresses
fn bench_longest_prefix_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("longest_prefix_match");

    for size in [1_000, 10_000, 100_000].iter() {
        let trie = build(&routes(*size));
        let queries: Vec<Address> = (0..256u32)
            .map(|i| Address::from(Ipv4Addr::from(i.wrapping_mul(0x0101_0101) ^ 0x5a5a_5a5a)))
            .collect();

        group.bench_with_input(BenchmarkId::new("Trie", size), size, |b, _| {
            b.iter(|| {
                for query in &queries {
                    black_box(trie.longest_prefix_match(query));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark remove followed by re-insert of an existing route
fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");

    for size in [1_000, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("Trie", size), size, |b, &size| {
            let routes = routes(size);
            let mut trie = build(&routes);
            let victim = routes[routes.len() / 3].clone();

            b.iter(|| {
                black_box(trie.remove(&victim));
                trie.add(victim.clone());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_insert,
    bench_contains,
    bench_longest_prefix_match,
    bench_remove
);
criterion_main!(benches);
