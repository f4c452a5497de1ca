use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ftrie::core::config::Config;
use ftrie::index::builder::{SortedEntry, SortedLoader};
use ftrie::index::trie::TrieIndex;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

// Random tokens with shared prefixes, like words in a text collection
fn random_tokens(count: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(2..10);
            (0..len).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())]).collect()
        })
        .collect()
}

fn build(config: Config, tokens: &[Vec<u8>]) -> TrieIndex {
    let mut trie = TrieIndex::new(config);
    for (i, token) in tokens.iter().enumerate() {
        trie.index(token, i as u32, 0).unwrap();
    }
    trie
}

fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_index");

    for count in [1_000, 10_000] {
        let tokens = random_tokens(count, 42);

        let configs = [
            ("backward", Config::default()),
            ("binary", Config::default().with_bulk_load(false)),
            ("forward_exact", Config::default().with_bulk_load(false).with_case_sensitive(true)),
        ];
        for (name, config) in configs {
            group.bench_with_input(BenchmarkId::new(name, count), &tokens, |b, tokens| {
                b.iter(|| black_box(build(config.clone(), tokens)));
            });
        }
    }

    group.finish();
}

fn bench_sorted_load(c: &mut Criterion) {
    let mut tokens = random_tokens(10_000, 7);
    let order = TrieIndex::new(Config::default()).order();
    tokens.sort_by(|a, b| {
        a.iter()
            .zip(b)
            .map(|(&x, &y)| order.cmp(x, y))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    });
    tokens.dedup_by(|a, b| a.eq_ignore_ascii_case(b));

    let entries: Vec<SortedEntry> = tokens
        .iter()
        .enumerate()
        .map(|(i, t)| SortedEntry::new(t.clone(), 1, (i as u64) << 12))
        .collect();

    c.bench_function("sorted_load_10k", |b| {
        b.iter(|| black_box(SortedLoader::new(Config::default()).load(&entries).unwrap()))
    });
}

fn bench_lookup(c: &mut Criterion) {
    let tokens = random_tokens(10_000, 42);
    let mut group = c.benchmark_group("trie_lookup");

    for (name, config) in [
        ("backward", Config::default()),
        ("binary", Config::default().with_bulk_load(false)),
    ] {
        let trie = build(config, &tokens);
        group.bench_function(name, |b| {
            b.iter(|| {
                for token in tokens.iter().take(1_000) {
                    black_box(trie.lookup(token).unwrap());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_index, bench_sorted_load, bench_lookup);
criterion_main!(benches);
