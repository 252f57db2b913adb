use xxhash_rust::xxh3::xxh3_64;

///
/// Content hash of a compiled schema artifact.
///
/// Stored in the database so a runtime can tell whether the descriptor it
/// loaded matches the ids the database describes.
/// - **Deterministic** across platforms and runs
/// - **Not cryptographic**; it detects drift, not tampering
///
#[must_use]
pub fn content_hash(bytes: &[u8]) -> u64 {
    xxh3_64(bytes)
}

///
/// TESTS
///
