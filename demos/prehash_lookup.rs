use bytehash::{ByteBuildHasher, DEFAULT_SEED, Fingerprint, hash_bytes_runtime, prehash};
use hashbrown::HashMap;

// Keys known at build time, hashed by the compiler.
const USER_ID: u64 = prehash!("user_id");
const SESSION: u64 = prehash!("session");
const MISSING: Fingerprint = Fingerprint::of(b"not_in_table");

const FIELDS: &[&str] = &["user_id", "session", "created_at", "locale", "theme"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // Table built at run time, keyed by run-time fingerprints.
    let mut table: HashMap<u64, &str> = HashMap::with_capacity(FIELDS.len());
    for &field in FIELDS {
        table.insert(hash_bytes_runtime(field.as_bytes(), DEFAULT_SEED), field);
    }

    println!("prehash lookup");
    println!("{}", "=".repeat(40));
    for (name, key) in [("user_id", USER_ID), ("session", SESSION), ("missing", MISSING.get())] {
        match table.get(&key) {
            Some(field) => println!("{name:<10} {key:#018x} -> {field}"),
            None => println!("{name:<10} {key:#018x} -> (absent)"),
        }
    }

    // The same keys through a seeded BuildHasher.
    let build = ByteBuildHasher::default();
    let mut by_bytes: HashMap<Vec<u8>, usize, ByteBuildHasher> = HashMap::with_hasher(build);
    for (i, field) in FIELDS.iter().enumerate() {
        by_bytes.insert(field.as_bytes().to_vec(), i);
    }
    println!("{}", "=".repeat(40));
    println!("seed {:#x}, {} entries", build.seed(), by_bytes.len());
    println!("user_id slot: {:?}", by_bytes.get(b"user_id".as_slice()));

    let parsed: Fingerprint = format!("{:#x}", USER_ID).parse()?;
    println!("round-tripped fingerprint: {parsed}");
    Ok(())
}
