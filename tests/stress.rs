//! Randomized trie operations checked against a sorted reference model.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use addr_trie::{Address, Trie, TrieKey};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Block in a narrow slice of the address space so operations collide.
fn random_block(rng: &mut impl Rng) -> Address {
    let value = 0x0a00_0000 | (rng.random::<u32>() & 0x0000_ffff);
    let prefix_len = rng.random_range(8..=32);
    Address::from(Ipv4Addr::from(value)).to_prefix_block_len(prefix_len)
}

fn model_key(block: &Address) -> (u128, u8) {
    (block.value(), block.effective_prefix_len())
}

fn check_against_model(trie: &Trie<Address, u32>, model: &BTreeMap<(u128, u8), (Address, u32)>) {
    assert_eq!(trie.len(), model.len());

    let mut expected: Vec<&(Address, u32)> = model.values().collect();
    expected.sort_by(|one, two| one.0.compare(&two.0));
    let actual: Vec<(&Address, Option<&u32>)> = trie.iter().collect();
    assert_eq!(actual.len(), expected.len());
    for ((key, value), (expected_key, expected_value)) in actual.iter().zip(expected.iter()) {
        assert_eq!(key.compare(expected_key), Ordering::Equal, "{} vs {}", key, expected_key);
        assert_eq!(*value, Some(expected_value));
    }
}

#[test_log::test]
fn test_random_put_remove() {
    let mut rng = StdRng::seed_from_u64(0x5eed_1234);
    let mut trie: Trie<Address, u32> = Trie::new();
    let mut model = BTreeMap::new();

    for step in 0..4000u32 {
        let block = random_block(&mut rng);
        if rng.random_bool(0.6) {
            let previous = trie.put(block.clone(), step);
            let model_previous = model.insert(model_key(&block), (block.clone(), step)).map(|(_, value)| value);
            assert_eq!(previous, model_previous);
        } else {
            let removed = trie.remove_value(&block);
            let model_removed = model.remove(&model_key(&block)).map(|(_, value)| value);
            assert_eq!(removed, model_removed);
        }
        if step % 250 == 0 {
            trie.assert_consistent();
            check_against_model(&trie, &model);
        }
    }
    trie.assert_consistent();
    check_against_model(&trie, &model);
}

fn random_query(rng: &mut impl Rng) -> Address {
    if rng.random_bool(0.5) {
        Address::from(Ipv4Addr::from(0x0a00_0000 | (rng.random::<u32>() & 0x0000_ffff)))
    } else {
        random_block(rng)
    }
}

/// Closest block on one side of `query` in trie order.
fn nearest_model<'a>(blocks: &'a [Address], query: &Address, below: bool, inclusive: bool) -> Option<&'a Address> {
    let candidates = blocks.iter().filter(|block| match (below, block.compare(query)) {
        (_, Ordering::Equal) => inclusive,
        (true, ordering) => ordering == Ordering::Less,
        (false, ordering) => ordering == Ordering::Greater,
    });
    if below {
        candidates.max_by(|one, two| one.compare(two))
    } else {
        candidates.min_by(|one, two| one.compare(two))
    }
}

#[test_log::test]
fn test_random_lookups() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut trie: Trie<Address, u32> = Trie::new();
    let mut blocks = Vec::new();
    for index in 0..500 {
        let block = random_block(&mut rng);
        trie.put(block.clone(), index);
        blocks.push(block);
    }

    for _ in 0..2000 {
        // half single addresses, half blocks, some of which are in the trie
        let query = random_query(&mut rng);

        let containing: Vec<&Address> = blocks.iter().filter(|block| block.contains(&query)).collect();
        let longest = containing.iter().max_by_key(|block| block.effective_prefix_len());
        let shortest = containing.iter().min_by_key(|block| block.effective_prefix_len());
        assert_eq!(trie.longest_prefix_match(&query).map(model_key), longest.map(|block| model_key(block)));
        assert_eq!(trie.shortest_prefix_match(&query).map(model_key), shortest.map(|block| model_key(block)));
        assert_eq!(trie.elements_containing(&query).len(), {
            let mut distinct: Vec<_> = containing.iter().map(|block| model_key(block)).collect();
            distinct.sort_unstable();
            distinct.dedup();
            distinct.len()
        });

        let expectations = [
            (trie.lower_added_node(&query), nearest_model(&blocks, &query, true, false), "lower"),
            (trie.floor_added_node(&query), nearest_model(&blocks, &query, true, true), "floor"),
            (trie.higher_added_node(&query), nearest_model(&blocks, &query, false, false), "higher"),
            (trie.ceiling_added_node(&query), nearest_model(&blocks, &query, false, true), "ceiling"),
        ];
        for (actual, expected, name) in expectations {
            assert_eq!(
                actual.map(|node| model_key(node.key())),
                expected.map(model_key),
                "{} of {}",
                name,
                query
            );
        }
    }

    // every added block is its own floor and ceiling
    for block in &blocks {
        assert_eq!(trie.floor(block).map(model_key), Some(model_key(block)));
        assert_eq!(trie.ceiling(block).map(model_key), Some(model_key(block)));
    }
}

#[test_log::test]
fn test_remove_all_in_random_order() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut trie: Trie<Address> = Trie::new();
    let mut blocks: Vec<Address> = (0..300).map(|_| random_block(&mut rng)).collect();
    for block in &blocks {
        trie.add(block.clone());
    }
    // shuffle by random swaps
    for index in (1..blocks.len()).rev() {
        let other = rng.random_range(0..=index);
        blocks.swap(index, other);
    }
    for block in &blocks {
        trie.remove(block);
    }
    assert!(trie.is_empty());
    assert_eq!(trie.node_count(), 1);
    trie.assert_consistent();
}
