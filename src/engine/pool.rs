use rand::{Rng, RngCore};

/// Draw one line from a response pool, each element equally likely.
///
/// Empty pools are rejected at config load and never reach selection; the
/// debug assert documents that contract for hand-built callers.
pub fn pick<'a>(pool: &'a [String], rng: &mut dyn RngCore) -> &'a str {
    debug_assert!(!pool.is_empty(), "response pools are validated non-empty");
    &pool[rng.random_range(0..pool.len())]
}
