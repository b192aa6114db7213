use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dupefind::duplicates::{DuplicateFinder, FinderConfig};
use dupefind::scanner::{HashAlgorithm, Hasher, PrefixMode, Walker, WalkerConfig};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

// Helper to create a test directory with a specific structure
fn setup_test_dir(depth: usize, files_per_dir: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    create_dir_recursive(temp_dir.path().to_path_buf(), depth, files_per_dir);
    temp_dir
}

fn create_dir_recursive(path: PathBuf, depth: usize, files_per_dir: usize) {
    if depth == 0 {
        return;
    }

    if !path.exists() {
        fs::create_dir_all(&path).expect("Failed to create dir");
    }

    for i in 0..files_per_dir {
        // Every third file repeats, the rest differ by a counter suffix.
        let content = format!("shared content block {:06}", i % 3);
        fs::write(path.join(format!("file_{i}.txt")), content).expect("Failed to write file");
    }

    if depth > 1 {
        for i in 0..2 {
            create_dir_recursive(path.join(format!("dir_{i}")), depth - 1, files_per_dir);
        }
    }
}

fn bench_walker(c: &mut Criterion) {
    let temp_dir = setup_test_dir(4, 10);

    c.bench_function("walker_150_files", |b| {
        b.iter(|| {
            let count = Arc::new(AtomicUsize::new(0));
            let sink = Arc::clone(&count);
            let walker = Walker::new(temp_dir.path(), WalkerConfig::default());
            let report = walker.walk(move |_| {
                sink.fetch_add(1, Ordering::Relaxed);
            });
            black_box((report.files_found, count.load(Ordering::Relaxed)));
        })
    });
}

fn bench_full_signature(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_signature");
    let temp_dir = TempDir::new().unwrap();

    for size_kb in [1usize, 1024, 10240] {
        let path = temp_dir.path().join(format!("file_{size_kb}kb.bin"));
        fs::write(&path, vec![0x5Au8; size_kb * 1024]).unwrap();
        group.throughput(Throughput::Bytes((size_kb * 1024) as u64));

        for algorithm in [HashAlgorithm::Xxh3, HashAlgorithm::Blake3] {
            let hasher = Hasher::new().with_algorithm(algorithm);
            group.bench_with_input(
                BenchmarkId::new(algorithm.to_string(), format!("{size_kb}KB")),
                &path,
                |b, path| b.iter(|| black_box(hasher.full_signature(path).unwrap())),
            );
        }
    }
    group.finish();
}

fn bench_partial_signature(c: &mut Criterion) {
    let mut group = c.benchmark_group("partial_signature");
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("file.bin");
    fs::write(&path, vec![1u8; 1024 * 1024]).unwrap();

    for mode in [PrefixMode::Bytes, PrefixMode::Hashed] {
        let hasher = Hasher::new().with_prefix_mode(mode);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{mode:?}")), &path, |b, path| {
            b.iter(|| black_box(hasher.partial_signature(path).unwrap()))
        });
    }
    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let temp_dir = setup_test_dir(4, 10);

    c.bench_function("find_duplicates_150_files", |b| {
        b.iter(|| {
            let finder = DuplicateFinder::new(FinderConfig::default());
            let (groups, _) = finder.find_duplicates(temp_dir.path()).unwrap();
            black_box(groups);
        })
    });
}

criterion_group!(
    benches,
    bench_walker,
    bench_full_signature,
    bench_partial_signature,
    bench_full_pipeline
);
criterion_main!(benches);
