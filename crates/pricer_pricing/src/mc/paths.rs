//! Simulated path storage.
//!
//! # Memory Layout
//!
//! Paths are stored in row-major order: `levels[path_idx * n_times + time_idx]`
//! where `time_idx = 0` holds the initial value. Stochastic-volatility
//! models carry a parallel variance array with the same layout.

/// Simulated paths of one risk factor on one time grid.
///
/// Produced by [`PathSimulator`](super::PathSimulator) and immutable
/// afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSet {
    factor: String,
    seed: u64,
    n_paths: usize,
    n_times: usize,
    levels: Vec<f64>,
    variances: Option<Vec<f64>>,
}

impl PathSet {
    /// Wrap simulated buffers.
    ///
    /// # Panics
    ///
    /// Panics if a buffer length differs from `n_paths * n_times`.
    pub fn new(
        factor: impl Into<String>,
        seed: u64,
        n_paths: usize,
        n_times: usize,
        levels: Vec<f64>,
        variances: Option<Vec<f64>>,
    ) -> Self {
        assert_eq!(levels.len(), n_paths * n_times, "level buffer size mismatch");
        if let Some(v) = &variances {
            assert_eq!(v.len(), n_paths * n_times, "variance buffer size mismatch");
        }
        Self {
            factor: factor.into(),
            seed,
            n_paths,
            n_times,
            levels,
            variances,
        }
    }

    /// Risk factor name.
    #[inline]
    pub fn factor(&self) -> &str {
        &self.factor
    }

    /// Base seed the paths were drawn from.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time points per path.
    #[inline]
    pub fn n_times(&self) -> usize {
        self.n_times
    }

    /// Levels of path `p` over the whole grid.
    #[inline]
    pub fn path(&self, p: usize) -> &[f64] {
        &self.levels[p * self.n_times..(p + 1) * self.n_times]
    }

    /// Level of path `p` at time index `k`.
    #[inline]
    pub fn level(&self, p: usize, k: usize) -> f64 {
        self.levels[p * self.n_times + k]
    }

    /// Terminal level of path `p`.
    #[inline]
    pub fn terminal(&self, p: usize) -> f64 {
        self.level(p, self.n_times - 1)
    }

    /// Levels of every path at time index `k`.
    pub fn slice_at(&self, k: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.n_paths).map(move |p| self.level(p, k))
    }

    /// Variance path `p`, for stochastic-volatility models.
    pub fn variance_path(&self, p: usize) -> Option<&[f64]> {
        self.variances
            .as_ref()
            .map(|v| &v[p * self.n_times..(p + 1) * self.n_times])
    }

    /// Whether a variance array is present.
    #[inline]
    pub fn has_variance(&self) -> bool {
        self.variances.is_some()
    }

    /// Raw level buffer.
    #[inline]
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let set = PathSet::new("gbm", 1, 2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], None);
        assert_eq!(set.path(1), &[4.0, 5.0, 6.0]);
        assert_eq!(set.level(0, 1), 2.0);
        assert_eq!(set.terminal(0), 3.0);
        assert_eq!(set.slice_at(2).collect::<Vec<_>>(), vec![3.0, 6.0]);
        assert!(set.variance_path(0).is_none());
        assert!(!set.has_variance());
    }

    #[test]
    #[should_panic(expected = "level buffer size mismatch")]
    fn test_size_mismatch_panics() {
        PathSet::new("gbm", 1, 2, 3, vec![1.0], None);
    }
}
