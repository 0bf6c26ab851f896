use bytehash::{
    DEFAULT_SEED, VerifyConfig, check_equivalence, find_collisions, hash_bytes,
    hash_bytes_runtime,
};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::hint::black_box;
use std::time::Instant;

const N_KEYS: usize = 1_000_000;
const MIN_LEN: usize = 0;
const MAX_LEN: usize = 64;
const GEN_SEED: u64 = 42;
const DEFAULT_BENCH_RUNS: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let runs = std::env::var("BYTEHASH_BENCH_RUNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_BENCH_RUNS)
        .max(1);

    let keys = gen_keys(N_KEYS, GEN_SEED);
    let total_bytes: usize = keys.iter().map(Vec::len).sum();

    println!("bytehash equivalence benchmark");
    println!("n = {} keys, {} bytes, runs = {}", N_KEYS, total_bytes, runs);
    println!("{}", "=".repeat(60));

    let start = Instant::now();
    let report = check_equivalence(&keys, &VerifyConfig::default())?;
    println!(
        "equivalence: {:.2} ms, tails covered = {}",
        start.elapsed().as_secs_f64() * 1e3,
        report.covers_all_tails()
    );

    let const_ns = median_ns_per_key(runs, &keys, |k| hash_bytes(k, DEFAULT_SEED));
    let runtime_ns = median_ns_per_key(runs, &keys, |k| hash_bytes_runtime(k, DEFAULT_SEED));
    println!("const path:   {:.2} ns/key", const_ns);
    println!("runtime path: {:.2} ns/key", runtime_ns);

    let collisions = find_collisions(&keys, DEFAULT_SEED);
    println!("collisions:   {}", collisions.len());
    Ok(())
}

fn gen_keys(n: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let mut key = vec![0u8; rng.gen_range(MIN_LEN..=MAX_LEN)];
            rng.fill_bytes(&mut key);
            key
        })
        .collect()
}

fn median_ns_per_key(runs: usize, keys: &[Vec<u8>], f: impl Fn(&[u8]) -> u64) -> f64 {
    let mut samples = Vec::with_capacity(runs);
    for _ in 0..runs {
        let start = Instant::now();
        let mut acc = 0u64;
        for k in keys {
            acc ^= f(black_box(k.as_slice()));
        }
        black_box(acc);
        samples.push(start.elapsed().as_nanos() as f64 / keys.len() as f64);
    }
    samples.sort_by(|a, b| a.total_cmp(b));
    samples[samples.len() / 2]
}
