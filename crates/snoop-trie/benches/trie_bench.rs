use criterion::{black_box, criterion_group, criterion_main, Criterion};
use snoop_trie::{write_paths, Recorder, Trie};

fn build_paths() -> Vec<String> {
    // Shaped like a compiler run: shared toolchain prefixes, many object files.
    let mut paths = Vec::new();
    for crate_idx in 0..50 {
        for file in 0..40 {
            paths.push(format!(
                "/home/user/project/target/debug/deps/crate{}-{}.o",
                crate_idx, file
            ));
        }
        paths.push(format!("/usr/lib/rustlib/x86_64/lib/libcrate{}.rlib", crate_idx));
    }
    paths
}

fn bench_insert(c: &mut Criterion) {
    let paths = build_paths();
    c.bench_function("trie_insert_2k_paths", |b| {
        b.iter(|| {
            let mut trie = Trie::new();
            for p in &paths {
                trie.insert(black_box(p.as_bytes())).unwrap();
            }
            trie
        })
    });
}

fn bench_recorder_reinsert(c: &mut Criterion) {
    let paths = build_paths();
    let recorder = Recorder::new();
    for p in &paths {
        recorder.insert(p.as_bytes());
    }
    // Steady state of a long-running process: every path already present.
    c.bench_function("recorder_reinsert_existing", |b| {
        b.iter(|| {
            for p in &paths {
                recorder.insert(black_box(p.as_bytes()));
            }
        })
    });
}

fn bench_dump(c: &mut Criterion) {
    let mut trie = Trie::new();
    for p in build_paths() {
        trie.insert(p.as_bytes()).unwrap();
    }
    let mut out = Vec::with_capacity(256 * 1024);
    c.bench_function("trie_dump_2k_paths", |b| {
        b.iter(|| {
            out.clear();
            write_paths(black_box(&trie), &mut out).unwrap()
        })
    });
}

criterion_group!(benches, bench_insert, bench_recorder_reinsert, bench_dump);
criterion_main!(benches);
