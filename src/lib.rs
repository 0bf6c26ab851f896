//! bytehash — seedable 64-bit byte hash, identical at compile time and run time.
//!
//! - `hash_bytes` is a `const fn`: literal keys can be pre-hashed by the compiler.
//! - `hash_bytes_runtime` is the independent run-time implementation; both paths
//!   must agree bit-for-bit for every input and seed.
//! - Not cryptographic. Collisions are expected and left to the consuming table.

pub mod build_hasher;
pub mod const_hash;
pub mod fingerprint;
pub mod verify;

pub use build_hasher::{ByteBuildHasher, ByteHasher, hash_bytes_runtime};
pub use const_hash::{hash_bytes, hash_default, hash_str};
pub use fingerprint::{Fingerprint, FingerprintError};
pub use verify::{
    Collision, EquivalenceReport, VerifyConfig, VerifyError, adjacent_collisions,
    check_equivalence, find_collisions, truncations,
};

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 0xe17a_1465;

/// Odd multiplier applied by every multiplicative mixing step.
pub const MIX_MUL: u64 = 0xc6a4_a793_5bd1_e995;

/// Right shift used by the xor-shift step.
pub const MIX_SHIFT: u32 = 47;

/// Hashes a string literal at compile time.
///
/// ```
/// const KEY: u64 = bytehash::prehash!("user_id");
/// assert_eq!(KEY, bytehash::hash_bytes_runtime(b"user_id", bytehash::DEFAULT_SEED));
/// ```
#[macro_export]
macro_rules! prehash {
    ($s:expr) => {
        $crate::prehash!($s, $crate::DEFAULT_SEED)
    };
    ($s:expr, $seed:expr) => {{
        const HASH: u64 = $crate::const_hash::hash_str($s, $seed);
        HASH
    }};
}

/// Hashes a byte-string literal at compile time.
///
/// ```
/// const KEY: u64 = bytehash::prehash_bytes!(b"\x00\x01\x02");
/// assert_eq!(KEY, bytehash::hash_bytes_runtime(&[0, 1, 2], bytehash::DEFAULT_SEED));
/// ```
#[macro_export]
macro_rules! prehash_bytes {
    ($b:expr) => {
        $crate::prehash_bytes!($b, $crate::DEFAULT_SEED)
    };
    ($b:expr, $seed:expr) => {{
        const HASH: u64 = $crate::const_hash::hash_bytes($b, $seed);
        HASH
    }};
}
