//! Equivalence checking between the `const fn` path and the run-time oracle,
//! plus collision reporting over a corpus.
//!
//! A mismatch between the two paths is a defect and is returned as an error.
//! Collisions are expected for a 64-bit fingerprint and are only logged.

use crate::DEFAULT_SEED;
use crate::build_hasher::hash_bytes_runtime;
use crate::const_hash::hash_bytes;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use log::{debug, warn};
#[cfg(feature = "parallel")]
use rayon::ThreadPoolBuilder;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error(
        "hash mismatch at input {index} (len {len}): const {const_hash:#018x}, runtime {runtime_hash:#018x}"
    )]
    Mismatch {
        index: usize,
        len: usize,
        const_hash: u64,
        runtime_hash: u64,
    },
}

/// Configuration for [`check_equivalence`]
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub seed: u64,
    pub enable_parallel: bool,
    pub threads: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            enable_parallel: true,
            threads: detect_verify_threads(),
        }
    }
}

impl VerifyConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.enable_parallel = false;
        self
    }
}

/// What a successful equivalence run covered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivalenceReport {
    pub inputs: usize,
    pub bytes: usize,
    /// Inputs seen per `len % 8`.
    pub tail_residues: [usize; 8],
    /// Inputs longer than one block.
    pub multi_block: usize,
    pub empty: usize,
}

impl EquivalenceReport {
    fn record(&mut self, len: usize) {
        self.inputs += 1;
        self.bytes += len;
        self.tail_residues[len % 8] += 1;
        if len > 8 {
            self.multi_block += 1;
        }
        if len == 0 {
            self.empty += 1;
        }
    }

    /// Every tail length 0..=7, a multi-block input and the empty input were checked.
    pub fn covers_all_tails(&self) -> bool {
        self.tail_residues.iter().all(|&n| n > 0) && self.multi_block > 0 && self.empty > 0
    }
}

/// Two inputs in a corpus that share a hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub first: usize,
    pub second: usize,
    pub hash: u64,
}

/// Compares the compile-time and run-time paths on every input.
///
/// On divergence the lowest-index mismatch is returned.
pub fn check_equivalence<K>(
    inputs: &[K],
    config: &VerifyConfig,
) -> Result<EquivalenceReport, VerifyError>
where
    K: AsRef<[u8]> + Sync,
{
    let mismatch = first_mismatch_with_pool(inputs, config);
    if let Some(err) = mismatch {
        warn!("{err}");
        return Err(err);
    }

    let mut report = EquivalenceReport::default();
    for input in inputs {
        report.record(input.as_ref().len());
    }
    debug!(
        "equivalence ok: {} inputs, {} bytes, seed {:#x}",
        report.inputs, report.bytes, config.seed
    );
    Ok(report)
}

#[inline]
fn compare(index: usize, input: &[u8], seed: u64) -> Option<VerifyError> {
    let const_hash = hash_bytes(input, seed);
    let runtime_hash = hash_bytes_runtime(input, seed);
    (const_hash != runtime_hash).then_some(VerifyError::Mismatch {
        index,
        len: input.len(),
        const_hash,
        runtime_hash,
    })
}

#[cfg(feature = "parallel")]
fn first_mismatch_parallel<K>(inputs: &[K], seed: u64) -> Option<VerifyError>
where
    K: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .enumerate()
        .find_map_first(|(i, k)| compare(i, k.as_ref(), seed))
}

fn first_mismatch_sequential<K: AsRef<[u8]>>(inputs: &[K], seed: u64) -> Option<VerifyError> {
    inputs
        .iter()
        .enumerate()
        .find_map(|(i, k)| compare(i, k.as_ref(), seed))
}

#[cfg(feature = "parallel")]
fn first_mismatch_with_pool<K>(inputs: &[K], config: &VerifyConfig) -> Option<VerifyError>
where
    K: AsRef<[u8]> + Sync,
{
    if !config.enable_parallel {
        return first_mismatch_sequential(inputs, config.seed);
    }

    match ThreadPoolBuilder::new().num_threads(config.threads.max(1)).build() {
        Ok(pool) => pool.install(|| first_mismatch_parallel(inputs, config.seed)),
        Err(err) => {
            debug!("verify pool unavailable ({err}), checking sequentially");
            first_mismatch_sequential(inputs, config.seed)
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn first_mismatch_with_pool<K>(inputs: &[K], config: &VerifyConfig) -> Option<VerifyError>
where
    K: AsRef<[u8]> + Sync,
{
    first_mismatch_sequential(inputs, config.seed)
}

fn detect_verify_threads() -> usize {
    if let Some(v) = std::env::var_os("BYTEHASH_VERIFY_THREADS") {
        if let Ok(parsed) = v.to_string_lossy().parse::<usize>() {
            return parsed.max(1);
        }
    }
    std::thread::available_parallelism()
        .map(|n| n.get().clamp(1, 8))
        .unwrap_or(4)
}

/// Prefixes of `bytes` from the full slice down to the empty one.
pub fn truncations(bytes: &[u8]) -> impl Iterator<Item = &[u8]> + '_ {
    (0..=bytes.len()).rev().map(move |n| &bytes[..n])
}

/// Collisions between neighbouring inputs (`i`, `i + 1`).
pub fn adjacent_collisions<K: AsRef<[u8]>>(inputs: &[K], seed: u64) -> Vec<Collision> {
    let hashes: Vec<u64> = inputs.iter().map(|k| hash_bytes(k.as_ref(), seed)).collect();
    let collisions: Vec<Collision> = hashes
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0] == w[1])
        .map(|(i, w)| Collision {
            first: i,
            second: i + 1,
            hash: w[0],
        })
        .collect();
    for c in &collisions {
        warn!(
            "adjacent inputs {} and {} collide on {:#018x}",
            c.first, c.second, c.hash
        );
    }
    collisions
}

/// Every input whose hash was already produced by an earlier input.
///
/// `first` is the earliest input with that hash.
pub fn find_collisions<K: AsRef<[u8]>>(inputs: &[K], seed: u64) -> Vec<Collision> {
    let mut seen: HashMap<u64, usize> = HashMap::with_capacity(inputs.len());
    let mut collisions = Vec::new();
    for (i, input) in inputs.iter().enumerate() {
        let h = hash_bytes(input.as_ref(), seed);
        match seen.entry(h) {
            Entry::Occupied(e) => {
                let c = Collision {
                    first: *e.get(),
                    second: i,
                    hash: h,
                };
                warn!("inputs {} and {} collide on {:#018x}", c.first, c.second, c.hash);
                collisions.push(c);
            }
            Entry::Vacant(e) => {
                e.insert(i);
            }
        }
    }
    debug!(
        "collision scan: {} inputs, {} collisions",
        inputs.len(),
        collisions.len()
    );
    collisions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncations_run_from_full_to_empty() {
        let all: Vec<&[u8]> = truncations(b"abc").collect();
        let expected: [&[u8]; 4] = [b"abc", b"ab", b"a", b""];
        assert_eq!(all, expected);
        assert_eq!(truncations(b"").count(), 1);
    }

    #[test]
    fn report_tracks_tail_coverage() {
        let inputs: Vec<Vec<u8>> = (0..=17).map(|n| vec![0xA5; n]).collect();
        let report = check_equivalence(&inputs, &VerifyConfig::default().sequential()).unwrap();
        assert_eq!(report.inputs, 18);
        assert_eq!(report.bytes, (0..=17).sum::<usize>());
        assert_eq!(report.empty, 1);
        assert_eq!(report.multi_block, 9);
        assert!(report.covers_all_tails());

        let short = check_equivalence(&[b"abc"], &VerifyConfig::default()).unwrap();
        assert_eq!(short.tail_residues[3], 1);
        assert!(!short.covers_all_tails());
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let inputs: Vec<Vec<u8>> = (0..500u32)
            .map(|i| i.to_le_bytes().repeat(i as usize % 7))
            .collect();
        let cfg = VerifyConfig {
            seed: 99,
            enable_parallel: true,
            threads: 3,
        };
        let par = check_equivalence(&inputs, &cfg).unwrap();
        let seq = check_equivalence(&inputs, &cfg.clone().sequential()).unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn mismatch_error_names_both_values() {
        let err = VerifyError::Mismatch {
            index: 3,
            len: 9,
            const_hash: 1,
            runtime_hash: 2,
        };
        assert_eq!(
            err.to_string(),
            "hash mismatch at input 3 (len 9): const 0x0000000000000001, runtime 0x0000000000000002"
        );
    }

    #[test]
    fn duplicates_are_reported_as_collisions() {
        let inputs: [&[u8]; 5] = [b"a", b"b", b"a", b"c", b"c"];
        let all = find_collisions(&inputs, DEFAULT_SEED);
        assert_eq!(
            all,
            vec![
                Collision {
                    first: 0,
                    second: 2,
                    hash: hash_bytes(b"a", DEFAULT_SEED),
                },
                Collision {
                    first: 3,
                    second: 4,
                    hash: hash_bytes(b"c", DEFAULT_SEED),
                },
            ]
        );
        let adjacent = adjacent_collisions(&inputs, DEFAULT_SEED);
        assert_eq!(adjacent.len(), 1);
        assert_eq!((adjacent[0].first, adjacent[0].second), (3, 4));
    }
}
