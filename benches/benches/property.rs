// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_scene_property`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Once;
use std::vec::Vec;

use understory_scene_property::glam::{Mat4, Vec3};
use understory_scene_property::{
    NoParents, ObjectId, Priority, PropertyManager, PropertyMetadata, PropertyMetadataBuilder,
    PropertyQuery, PropertyStorage, PropertyType, Value,
};

fn bench_property(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: PropertyStorage<f32>={} PropertyStorage<Mat4>={} Value={}",
            core::mem::size_of::<PropertyStorage<f32>>(),
            core::mem::size_of::<PropertyStorage<Mat4>>(),
            core::mem::size_of::<Value>(),
        );
    });

    let mut manager = PropertyManager::new();
    let width = manager
        .define_type("LayoutWidth", PropertyMetadata::new(0.0_f32))
        .unwrap();
    let opacity = manager
        .define_type(
            "Opacity",
            PropertyMetadataBuilder::new(1.0_f32).inherits(true).build(),
        )
        .unwrap();
    let transform = manager
        .define_type("Transform", PropertyMetadata::new(Mat4::IDENTITY))
        .unwrap();

    let local = manager.create_object();
    manager.set(local, width, 100.0).unwrap();
    manager.set_relative(local, width, 5.0).unwrap();
    manager.set(local, transform, Mat4::from_scale(Vec3::splat(2.0))).unwrap();
    manager
        .set_relative(local, transform, Mat4::from_rotation_z(0.5))
        .unwrap();

    // Four groups, the second one winning on priority.
    let grouped = manager.create_object();
    for i in 0..4_u8 {
        let group = manager.create_group();
        manager.set(group.object(), width, f32::from(i)).unwrap();
        if i == 1 {
            manager.set_priority(group.object(), width, Priority::High);
        }
        manager.add_property_group(grouped, group).unwrap();
    }

    // A small inheritance chain: 0 <- 1 <- ... <- N-1
    let chain_len: usize = 16;
    let chain: Vec<ObjectId> = (0..chain_len).map(|_| manager.create_object()).collect();
    manager.set(chain[0], opacity, 0.5).unwrap();
    let leaf = chain[chain_len - 1];
    let graph = |node: ObjectId| {
        let index = chain.iter().position(|n| *n == node)?;
        index.checked_sub(1).map(|parent| chain[parent])
    };

    let mut group = c.benchmark_group("property/resolve");

    group.bench_function("local", |b| {
        b.iter(|| black_box(manager.get(local, width)))
    });

    group.bench_function("local_matrix", |b| {
        b.iter(|| black_box(manager.get(local, transform)))
    });

    group.bench_function("default", |b| {
        b.iter(|| black_box(manager.get_or_default(leaf, width)))
    });

    group.bench_function("groups", |b| {
        b.iter(|| black_box(manager.get(grouped, width)))
    });

    group.bench_function("erased", |b| {
        b.iter(|| black_box(manager.get_value(local, width)))
    });

    group.bench_function(BenchmarkId::new("inherited", chain_len), |b| {
        b.iter(|| black_box(manager.get_node(&graph, leaf, opacity)))
    });

    group.bench_function("query/3", |b| {
        let mut query = PropertyQuery::new(&manager, &NoParents);
        query.push_object(grouped);
        query.push_object(local);
        query.push_object(leaf);
        b.iter(|| black_box(query.get(width)))
    });

    group.finish();

    let mut group = c.benchmark_group("property/mutate");

    group.bench_function("set/f32", |b| {
        b.iter_batched(
            fresh_manager,
            |(mut manager, object, width)| {
                manager.set(object, width, 123.0).unwrap();
                black_box(manager);
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("remove_all", |b| {
        b.iter_batched(
            || {
                let (mut manager, object, width) = fresh_manager();
                manager.set(object, width, 1.0).unwrap();
                (manager, object)
            },
            |(mut manager, object)| {
                black_box(manager.remove_all(object));
                black_box(manager);
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn fresh_manager() -> (PropertyManager, ObjectId, PropertyType<f32>) {
    let mut manager = PropertyManager::new();
    let width = manager
        .define_type("LayoutWidth", PropertyMetadata::new(0.0_f32))
        .unwrap();
    manager.register_type(width).unwrap();
    let object = manager.create_object();
    (manager, object, width)
}

criterion_group!(benches, bench_property);
criterion_main!(benches);
