//! Reuse of fixed-seed path sets.
//!
//! A [`PathSet`] is fully determined by the market states, the simulation
//! configuration, the correlation factor and the time grid. [`PathCache`]
//! keys simulations by a stable fingerprint of those inputs, so risk sweeps
//! that revisit an unchanged configuration skip the simulation. Fresh-seed
//! runs bypass the cache and always draw new paths.

use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use pricer_core::types::PricingError;
use pricer_models::models::{CholeskyFactor, MarketState, ModelKind};
use tracing::debug;

use super::config::SimulationConfig;
use super::grid::TimeGrid;
use super::paths::PathSet;
use super::simulation::PathSimulator;
use crate::rng::splitmix64;

/// Default number of cached simulations.
pub const DEFAULT_CAPACITY: usize = 32;

/// FNV-1a hasher; unlike `DefaultHasher` its output is fixed across
/// builds and processes.
struct StableHasher(u64);

impl StableHasher {
    fn new() -> Self {
        Self(0xCBF2_9CE4_8422_2325)
    }

    fn write_f64(&mut self, x: f64) {
        // -0.0 and 0.0 describe the same market.
        let x = if x == 0.0 { 0.0 } else { x };
        self.write_u64(x.to_bits());
    }
}

impl Hasher for StableHasher {
    fn finish(&self) -> u64 {
        splitmix64(self.0)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 ^ b as u64).wrapping_mul(0x0000_0100_0000_01B3);
        }
    }
}

fn hash_state(h: &mut StableHasher, state: &MarketState) {
    state.name().hash(h);
    state.pricing_date().hash(h);
    state.model_kind().hash(h);
    state.day_count().hash(h);
    state.currency().hash(h);
    for x in [
        state.initial_value(),
        state.volatility(),
        state.initial_variance(),
        state.short_rate(),
    ] {
        h.write_f64(x);
    }
    let dynamics = state.dynamics();
    if let Some(j) = dynamics.jumps() {
        for x in [j.intensity, j.mean, j.volatility] {
            h.write_f64(x);
        }
    }
    if let Some(v) = dynamics.variance() {
        for x in [v.mean_reversion, v.long_run_variance, v.vol_of_vol, v.correlation] {
            h.write_f64(x);
        }
    }
}

fn hash_config(h: &mut StableHasher, config: &SimulationConfig) {
    config.n_paths().hash(h);
    config.frequency().hash(h);
    config.seed_mode().hash(h);
    config.antithetic().hash(h);
    config.moment_matching().hash(h);
    config.variance_floor().hash(h);
    for kind in ModelKind::ALL {
        config.scheme(kind).hash(h);
    }
}

/// Stable fingerprint of a joint simulation's inputs.
pub fn fingerprint(
    states: &[&MarketState],
    cholesky: &CholeskyFactor,
    config: &SimulationConfig,
    grid: &TimeGrid,
) -> u64 {
    let mut h = StableHasher::new();
    states.len().hash(&mut h);
    for state in states {
        hash_state(&mut h, state);
    }
    let n = cholesky.dim();
    n.hash(&mut h);
    for i in 0..n {
        for j in 0..=i {
            h.write_f64(cholesky.get(i, j));
        }
    }
    hash_config(&mut h, config);
    grid.dates().hash(&mut h);
    for &t in grid.times() {
        h.write_f64(t);
    }
    h.finish()
}

#[derive(Default)]
struct Entries {
    map: HashMap<u64, Arc<Vec<PathSet>>>,
    order: VecDeque<u64>,
}

/// Bounded, thread-safe store of simulated path sets.
///
/// Entries are evicted oldest first once `capacity` is reached.
pub struct PathCache {
    capacity: usize,
    entries: Mutex<Entries>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for PathCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}

impl PathCache {
    /// Cache holding at most `capacity` simulations (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Maximum number of cached simulations.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached simulations.
    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Fixed-seed lookups that had to simulate.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Drop every entry. Hit and miss counters are kept.
    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.map.clear();
        entries.order.clear();
    }

    /// Return cached paths for these inputs, simulating on a miss.
    ///
    /// Fresh-seed configurations are simulated every time and not stored.
    ///
    /// # Errors
    ///
    /// Propagates [`PathSimulator::simulate_correlated`] errors.
    pub fn get_or_simulate(
        &self,
        simulator: &PathSimulator,
        states: &[&MarketState],
        cholesky: &CholeskyFactor,
        grid: &TimeGrid,
    ) -> Result<Arc<Vec<PathSet>>, PricingError> {
        if !simulator.config().seed_mode().is_fixed() {
            return simulator.simulate_correlated(states, cholesky, grid).map(Arc::new);
        }

        let key = fingerprint(states, cholesky, simulator.config(), grid);
        if let Some(paths) = self.lock().map.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key, factors = states.len(), "path cache hit");
            return Ok(Arc::clone(paths));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let paths = Arc::new(simulator.simulate_correlated(states, cholesky, grid)?);

        let mut entries = self.lock();
        if !entries.map.contains_key(&key) {
            while entries.map.len() >= self.capacity {
                match entries.order.pop_front() {
                    Some(old) => {
                        entries.map.remove(&old);
                    }
                    None => break,
                }
            }
            entries.order.push_back(key);
            entries.map.insert(key, Arc::clone(&paths));
        }
        Ok(paths)
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        // The map stays consistent even if a holder panicked.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::Frequency;
    use pricer_core::types::Date;
    use pricer_models::models::MarketParameter;

    fn start() -> Date {
        Date::from_ymd(2015, 1, 1).unwrap()
    }

    fn state() -> MarketState {
        MarketState::builder("gbm")
            .pricing_date(start())
            .initial_value(36.0)
            .volatility(0.2)
            .short_rate(0.06)
            .build()
            .unwrap()
    }

    fn grid() -> TimeGrid {
        TimeGrid::new(
            start(),
            Date::from_ymd(2015, 6, 30).unwrap(),
            Frequency::Monthly,
            &[],
            Default::default(),
        )
        .unwrap()
    }

    fn simulator(seed: Option<u64>) -> PathSimulator {
        let builder = SimulationConfig::builder().n_paths(200);
        let builder = match seed {
            Some(s) => builder.seed(s),
            None => builder,
        };
        PathSimulator::new(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_fingerprint_tracks_inputs() {
        let s = state();
        let g = grid();
        let chol = CholeskyFactor::identity(1);
        let config = SimulationConfig::builder().n_paths(200).seed(1).build().unwrap();
        let base = fingerprint(&[&s], &chol, &config, &g);
        assert_eq!(base, fingerprint(&[&s], &chol, &config, &g));

        let bumped = s.with_parameter(MarketParameter::Volatility, 0.25).unwrap();
        assert_ne!(base, fingerprint(&[&bumped], &chol, &config, &g));

        let other_seed = config.with_seed_mode(crate::rng::SeedMode::Fixed(2));
        assert_ne!(base, fingerprint(&[&s], &chol, &other_seed, &g));
    }

    #[test]
    fn test_fixed_seed_hits() {
        let cache = PathCache::new(4);
        let sim = simulator(Some(11));
        let s = state();
        let chol = CholeskyFactor::identity(1);
        let a = cache.get_or_simulate(&sim, &[&s], &chol, &grid()).unwrap();
        let b = cache.get_or_simulate(&sim, &[&s], &chol, &grid()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_fresh_seed_bypasses_cache() {
        let cache = PathCache::default();
        let sim = simulator(None);
        let s = state();
        let chol = CholeskyFactor::identity(1);
        let a = cache.get_or_simulate(&sim, &[&s], &chol, &grid()).unwrap();
        let b = cache.get_or_simulate(&sim, &[&s], &chol, &grid()).unwrap();
        assert_ne!(a[0].levels(), b[0].levels());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction_is_bounded() {
        let cache = PathCache::new(2);
        let chol = CholeskyFactor::identity(1);
        let base = state();
        for k in 0..5 {
            let s = base
                .with_parameter(MarketParameter::InitialValue, 30.0 + k as f64)
                .unwrap();
            cache
                .get_or_simulate(&simulator(Some(3)), &[&s], &chol, &grid())
                .unwrap();
        }
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
