//! Seed modes and per-path seed derivation.
//!
//! Every path draws from its own generator seeded by
//! `derive_path_seed(base, factor, index)`, so the numbers a path sees do not
//! depend on which thread simulates it or in which order.

/// How the base seed of a simulation is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeedMode {
    /// Reproducible draws from a given seed.
    Fixed(u64),
    /// A new base seed for every simulation.
    #[default]
    Fresh,
}

impl SeedMode {
    /// Base seed for one simulation run.
    pub fn resolve(&self) -> u64 {
        match self {
            SeedMode::Fixed(seed) => *seed,
            SeedMode::Fresh => rand::random(),
        }
    }

    /// Whether repeated runs reproduce the same paths.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self, SeedMode::Fixed(_))
    }
}

/// SplitMix64 finaliser.
#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// 64-bit FNV-1a hash.
#[inline]
pub fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xCBF2_9CE4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;
    bytes
        .iter()
        .fold(OFFSET, |h, &b| (h ^ b as u64).wrapping_mul(PRIME))
}

/// Seed of path `index` of risk factor `factor` under base seed `base`.
///
/// ```rust
/// use pricer_pricing::rng::derive_path_seed;
///
/// let a = derive_path_seed(42, "gbm", 0);
/// assert_eq!(a, derive_path_seed(42, "gbm", 0));
/// assert_ne!(a, derive_path_seed(42, "gbm", 1));
/// assert_ne!(a, derive_path_seed(42, "jd", 0));
/// ```
#[inline]
pub fn derive_path_seed(base: u64, factor: &str, index: u64) -> u64 {
    let stream = splitmix64(base ^ fnv1a(factor.as_bytes()));
    splitmix64(stream ^ splitmix64(index))
}
