use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::TempDir;

use xtweet_kv::{KVStore, MemoryStore, RedbStore};

const DOC: &[u8] = br#"{"tweet":"hello world","author":"bench","like":0,"dislike":0}"#;

fn bench_redb_insert(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();

    c.bench_function("redb_insert", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("tweet:tweet:{}", i);
            store.compare_and_swap(black_box(&key), None, black_box(DOC)).unwrap();
            i += 1;
        });
    });
}

fn bench_redb_get(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();

    for i in 0..1000 {
        let key = format!("tweet:tweet:{:04}", i);
        store.compare_and_swap(&key, None, DOC).unwrap();
    }

    c.bench_function("redb_get", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("tweet:tweet:{:04}", i % 1000);
            let _ = store.get(black_box(&key)).unwrap();
            i += 1;
        });
    });
}

fn bench_redb_scan(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();

    for i in 0..1000 {
        let key = format!("tweet:tweet:{:04}", i);
        store.compare_and_swap(&key, None, DOC).unwrap();
    }

    c.bench_function("redb_scan_1000", |b| {
        b.iter(|| {
            let _ = store.scan(black_box("tweet:tweet:")).unwrap();
        });
    });
}

fn bench_memory_swap(c: &mut Criterion) {
    let store = MemoryStore::new();
    store.compare_and_swap("tweet:tweet:hot", None, b"0").unwrap();

    c.bench_function("memory_swap", |b| {
        let mut current = b"0".to_vec();
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            let next = n.to_string().into_bytes();
            store
                .compare_and_swap("tweet:tweet:hot", Some(&current), black_box(&next))
                .unwrap();
            current = next;
        });
    });
}

criterion_group!(
    benches,
    bench_redb_insert,
    bench_redb_get,
    bench_redb_scan,
    bench_memory_swap
);
criterion_main!(benches);
