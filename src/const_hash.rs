//! Compile-time evaluable core.
//!
//! Every function here is a `const fn` over `u64` with wrapping arithmetic, so
//! the compiler and the running program perform the same sequence of
//! operations. Blocks are 8 bytes read little-endian; the 0..=7 byte tail is
//! folded in with a single multiply before the final avalanche.

use crate::{DEFAULT_SEED, MIX_MUL, MIX_SHIFT};

#[inline(always)]
const fn mul_mix(x: u64) -> u64 {
    x.wrapping_mul(MIX_MUL)
}

#[inline(always)]
const fn xor_shift(x: u64) -> u64 {
    x ^ (x >> MIX_SHIFT)
}

/// Reads `n <= 8` bytes starting at `at`, little-endian, zero-filling the high bytes.
#[inline(always)]
const fn fetch(data: &[u8], at: usize, n: usize) -> u64 {
    let mut v = 0u64;
    let mut i = 0usize;
    while i < n {
        v |= (data[at + i] as u64) << (8 * i);
        i += 1;
    }
    v
}

#[inline(always)]
const fn finalize(h: u64) -> u64 {
    xor_shift(mul_mix(xor_shift(h)))
}

#[inline(always)]
const fn mix_block(h: u64, k: u64) -> u64 {
    mul_mix(h ^ mul_mix(xor_shift(mul_mix(k))))
}

// Tail gets one multiply only, no xor-shift before it.
#[inline(always)]
const fn mix_tail(data: &[u8], at: usize, n: usize, h: u64) -> u64 {
    if n == 0 { h } else { mul_mix(h ^ fetch(data, at, n)) }
}

/// Hashes `data` under `seed`.
///
/// Total over every input: empty slices and any seed are valid, overflow wraps.
#[inline]
pub const fn hash_bytes(data: &[u8], seed: u64) -> u64 {
    let len = data.len();
    let mut h = seed ^ mul_mix(len as u64);
    let mut at = 0usize;
    while len - at >= 8 {
        h = mix_block(h, fetch(data, at, 8));
        at += 8;
    }
    finalize(mix_tail(data, at, len - at, h))
}

#[inline]
pub const fn hash_str(s: &str, seed: u64) -> u64 {
    hash_bytes(s.as_bytes(), seed)
}

/// `hash_bytes` under [`DEFAULT_SEED`].
#[inline]
pub const fn hash_default(data: &[u8]) -> u64 {
    hash_bytes(data, DEFAULT_SEED)
}
