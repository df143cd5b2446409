use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mini_lru::{LruCache, SharedLruCache};

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hit_1000", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        for i in 0..1000u64 {
            cache.set(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 1000)).copied());
            counter += 1;
        });
    });

    group.finish();
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_new_with_eviction", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        let mut counter = 0u64;

        // Every insert past the first 1000 evicts the tail
        b.iter(|| {
            cache.set(black_box(counter), counter);
            counter += 1;
        });
    });

    group.bench_function("set_overwrite", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        for i in 0..1000u64 {
            cache.set(i, i);
        }

        let mut counter = 0u64;
        b.iter(|| {
            cache.set(black_box(counter % 1000), counter);
            counter += 1;
        });
    });

    group.finish();
}

fn bench_shared_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared_mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_read_50_write", |b| {
        let cache = SharedLruCache::new(1000).unwrap();
        cache.on_eviction(|key: &u64, value: &u64| {
            black_box((key, value));
        });

        let mut counter = 0u64;
        b.iter(|| {
            let key = counter % 2000;
            if counter % 2 == 0 {
                black_box(cache.get(&key));
            } else {
                cache.set(key, counter);
            }
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_set, bench_shared_mixed);
criterion_main!(benches);
