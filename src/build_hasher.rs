use crate::{DEFAULT_SEED, MIX_MUL, MIX_SHIFT};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::hash::{BuildHasher, Hasher};

/// Run-time counterpart of [`crate::hash_bytes`].
///
/// Written independently of the `const fn` path (slice chunking, folded tail)
/// so that comparing the two catches drift in either one.
#[inline]
pub fn hash_bytes_runtime(bytes: &[u8], seed: u64) -> u64 {
    let mut h = seed ^ (bytes.len() as u64).wrapping_mul(MIX_MUL);

    let mut chunks = bytes.chunks_exact(8);
    for chunk in &mut chunks {
        let mut block = [0u8; 8];
        block.copy_from_slice(chunk);
        let mut k = u64::from_le_bytes(block).wrapping_mul(MIX_MUL);
        k ^= k >> MIX_SHIFT;
        k = k.wrapping_mul(MIX_MUL);
        h ^= k;
        h = h.wrapping_mul(MIX_MUL);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let k = tail.iter().rev().fold(0u64, |acc, &b| (acc << 8) | b as u64);
        h ^= k;
        h = h.wrapping_mul(MIX_MUL);
    }

    h ^= h >> MIX_SHIFT;
    h = h.wrapping_mul(MIX_MUL);
    h ^ (h >> MIX_SHIFT)
}

/// `Hasher` over [`hash_bytes_runtime`].
///
/// One `write` gives exactly `hash_bytes_runtime(bytes, seed)`. Later writes
/// use the current state as their seed, so `write(a); write(b)` is not the
/// hash of `a ++ b`. Integers are written little-endian on every host.
#[derive(Debug, Clone)]
pub struct ByteHasher {
    seed: u64,
    state: u64,
    written: bool,
}

impl ByteHasher {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            state: seed,
            written: false,
        }
    }
}

impl Default for ByteHasher {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl Hasher for ByteHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.state = hash_bytes_runtime(bytes, self.state);
        self.written = true;
    }

    #[inline]
    fn finish(&self) -> u64 {
        if self.written {
            self.state
        } else {
            hash_bytes_runtime(&[], self.seed)
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.write(&[i]);
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.write(&i.to_le_bytes());
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.write(&i.to_le_bytes());
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.write(&i.to_le_bytes());
    }

    #[inline]
    fn write_u128(&mut self, i: u128) {
        self.write(&i.to_le_bytes());
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        // Widen so 32- and 64-bit hosts agree.
        self.write_u64(i as u64);
    }
}

/// Seed-carrying `BuildHasher` for hash tables keyed by byte strings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteBuildHasher {
    seed: u64,
}

impl ByteBuildHasher {
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Hashes a whole byte string, bypassing `Hash` impls.
    #[inline]
    pub fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        hash_bytes_runtime(bytes, self.seed)
    }
}

impl Default for ByteBuildHasher {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl BuildHasher for ByteBuildHasher {
    type Hasher = ByteHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        ByteHasher::with_seed(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::const_hash::hash_bytes;

    #[test]
    fn single_write_matches_oracle() {
        let build = ByteBuildHasher::default();
        let mut hasher = build.build_hasher();
        hasher.write(b"This is my test string.");
        assert_eq!(
            hasher.finish(),
            hash_bytes_runtime(b"This is my test string.", DEFAULT_SEED)
        );
        assert_eq!(hasher.finish(), build.hash_bytes(b"This is my test string."));
    }

    #[test]
    fn unwritten_hasher_finishes_with_empty_hash() {
        let hasher = ByteHasher::default();
        assert_eq!(hasher.finish(), 0x9bfa_e0a4_e613_fc3c);
        let seeded = ByteHasher::with_seed(7);
        assert_eq!(seeded.finish(), hash_bytes_runtime(b"", 7));
    }

    #[test]
    fn chained_writes_reseed() {
        let mut hasher = ByteHasher::with_seed(11);
        hasher.write(b"ab");
        hasher.write(b"cd");
        let expected = hash_bytes_runtime(b"cd", hash_bytes_runtime(b"ab", 11));
        assert_eq!(hasher.finish(), expected);
        assert_ne!(hasher.finish(), hash_bytes_runtime(b"abcd", 11));
    }

    #[test]
    fn integers_are_packed_little_endian() {
        let mut a = ByteHasher::default();
        a.write_u32(0x0403_0201);
        let mut b = ByteHasher::default();
        b.write(&[1, 2, 3, 4]);
        assert_eq!(a.finish(), b.finish());

        let mut c = ByteHasher::default();
        c.write_usize(5);
        let mut d = ByteHasher::default();
        d.write_u64(5);
        assert_eq!(c.finish(), d.finish());
    }

    #[test]
    fn oracle_agrees_with_const_path_for_every_tail() {
        let data: Vec<u8> = (0u8..=40).collect();
        for len in 0..=data.len() {
            for seed in [0, 1, DEFAULT_SEED, u64::MAX] {
                assert_eq!(
                    hash_bytes_runtime(&data[..len], seed),
                    hash_bytes(&data[..len], seed),
                    "len {len} seed {seed:#x}"
                );
            }
        }
    }

    #[test]
    fn works_as_hashbrown_hasher() {
        let mut map: hashbrown::HashMap<Vec<u8>, usize, ByteBuildHasher> =
            hashbrown::HashMap::with_hasher(ByteBuildHasher::with_seed(3));
        for i in 0..100usize {
            map.insert(i.to_le_bytes().to_vec(), i);
        }
        for i in 0..100usize {
            assert_eq!(map.get(i.to_le_bytes().as_slice()), Some(&i));
        }
        assert_eq!(map.hasher().seed(), 3);
    }
}
