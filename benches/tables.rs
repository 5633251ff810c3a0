#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::{collections::HashMap, hint::black_box};

use criterion::{Criterion, criterion_group, criterion_main};
use proptest::{
    collection::vec,
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};
use quadchain::{ChainedTable, OpenAddressingTable, hash_functions::default_hash};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;
const INITIAL_CAPACITY: usize = 11;

fn hash_table_benches(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let items =
        vec(any::<(String, u64)>(), ITEMS_AMOUNT).new_tree(&mut runner).unwrap().current();

    let mut group = c.benchmark_group("Hash table comparison benchmark");
    group.sample_size(SAMPLE_SIZE);

    group.bench_function("quadratic probing put", |b| {
        b.iter(|| {
            let mut table = OpenAddressingTable::new(INITIAL_CAPACITY, default_hash);
            for (key, value) in &items {
                table.put(key, *value);
            }
            table
        });
    });
    group.bench_function("separate chaining put", |b| {
        b.iter(|| {
            let mut table = ChainedTable::new(INITIAL_CAPACITY, default_hash);
            for (key, value) in &items {
                table.put(key, *value);
            }
            table
        });
    });
    group.bench_function("rust std insert", |b| {
        b.iter(|| {
            let mut map = HashMap::new();
            for (key, value) in &items {
                map.insert(key.clone(), *value);
            }
            map
        });
    });

    let mut open = OpenAddressingTable::new(INITIAL_CAPACITY, default_hash);
    let mut chained = ChainedTable::new(ITEMS_AMOUNT, default_hash);
    let mut std_map = HashMap::new();
    for (key, value) in &items {
        open.put(key, *value);
        chained.put(key, *value);
        std_map.insert(key.clone(), *value);
    }

    group.bench_function("quadratic probing get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(open.get(key));
            }
        });
    });
    group.bench_function("separate chaining get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(chained.get(key));
            }
        });
    });
    group.bench_function("rust std get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                black_box(std_map.get(key));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, hash_table_benches);

criterion_main!(benches);
