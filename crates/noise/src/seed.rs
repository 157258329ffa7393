use rand::SeedableRng;
use rand::rngs::StdRng;

/// Seed used when none is configured: the current UNIX epoch second
pub fn default_seed() -> i64 {
  chrono::Utc::now().timestamp()
}

/// A generator owned by one strategy instance
pub(crate) fn seeded_rng(seed: i64) -> StdRng {
  StdRng::seed_from_u64(seed as u64)
}
