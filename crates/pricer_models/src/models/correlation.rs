//! Correlation matrices across risk factors and their Cholesky factors.
//!
//! Given independent standard normals `Z`, correlated normals are
//! `W = L Z` where `C = L L^T`. The factorisation here accepts positive
//! semi-definite matrices: a pivot that is zero up to rounding (for example
//! two perfectly correlated factors) yields a zero column instead of an
//! error, while a clearly negative pivot means the matrix is not PSD.
//!
//! ```
//! use pricer_models::models::CorrelationMatrix;
//!
//! let corr = CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap();
//! let chol = corr.cholesky().unwrap();
//! let w = chol.transform(&[0.5, 0.8]);
//! assert_eq!(w.len(), 2);
//! assert!((w[0] - 0.5).abs() < 1e-15);
//! ```

use pricer_core::types::PricingError;
use thiserror::Error;

/// Tolerance on diagonal, symmetry and pivot checks.
const TOLERANCE: f64 = 1e-10;

/// Error types for correlation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    /// Matrix is not positive semi-definite.
    #[error("Correlation matrix is not positive semi-definite (pivot {pivot:e} at row {index})")]
    NotPositiveSemiDefinite {
        /// Row at which factorisation failed
        index: usize,
        /// Offending pivot
        pivot: f64,
    },
    /// Number of elements does not match the dimension.
    #[error("Invalid matrix dimensions: expected {expected} elements, got {got}")]
    InvalidDimensions {
        /// Expected element count
        expected: usize,
        /// Supplied element count
        got: usize,
    },
    /// Diagonal element is not 1.
    #[error("Diagonal element at index {index} is {value}, expected 1.0")]
    InvalidDiagonal {
        /// Diagonal index
        index: usize,
        /// Value found
        value: f64,
    },
    /// Matrix is not symmetric.
    #[error("Matrix is not symmetric at ({i}, {j})")]
    NotSymmetric {
        /// Row
        i: usize,
        /// Column
        j: usize,
    },
    /// Correlation outside [-1, 1] or not finite.
    #[error("Correlation at ({i}, {j}) is {value}, must be in [-1, 1]")]
    OutOfRange {
        /// Row
        i: usize,
        /// Column
        j: usize,
        /// Value found
        value: f64,
    },
}

impl From<CorrelationError> for PricingError {
    fn from(err: CorrelationError) -> Self {
        PricingError::SingularCorrelation(err.to_string())
    }
}

/// Symmetric correlation matrix with unit diagonal.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix {
    data: Vec<f64>,
    dim: usize,
}

impl CorrelationMatrix {
    /// Create a correlation matrix from row-major elements.
    ///
    /// Validates element count, unit diagonal, symmetry and range. Positive
    /// semi-definiteness is checked by [`cholesky`](Self::cholesky).
    pub fn new(data: &[f64], dim: usize) -> Result<Self, CorrelationError> {
        let expected = dim * dim;
        if data.len() != expected {
            return Err(CorrelationError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }

        for i in 0..dim {
            let diag = data[i * dim + i];
            if (diag - 1.0).abs() > TOLERANCE {
                return Err(CorrelationError::InvalidDiagonal { index: i, value: diag });
            }
        }

        for i in 0..dim {
            for j in (i + 1)..dim {
                let v = data[i * dim + j];
                if !v.is_finite() || !(-1.0..=1.0).contains(&v) {
                    return Err(CorrelationError::OutOfRange { i, j, value: v });
                }
                if (v - data[j * dim + i]).abs() > TOLERANCE {
                    return Err(CorrelationError::NotSymmetric { i, j });
                }
            }
        }

        Ok(Self {
            data: data.to_vec(),
            dim,
        })
    }

    /// Build from pairwise entries `(i, j, rho)`; unspecified pairs are 0.
    pub fn from_pairs(dim: usize, pairs: &[(usize, usize, f64)]) -> Result<Self, CorrelationError> {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        for &(i, j, rho) in pairs {
            if i >= dim || j >= dim {
                return Err(CorrelationError::InvalidDimensions {
                    expected: dim,
                    got: i.max(j) + 1,
                });
            }
            if i == j {
                if (rho - 1.0).abs() > TOLERANCE {
                    return Err(CorrelationError::InvalidDiagonal { index: i, value: rho });
                }
                continue;
            }
            data[i * dim + j] = rho;
            data[j * dim + i] = rho;
        }
        Self::new(&data, dim)
    }

    /// Identity matrix (independent factors).
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        Self { data, dim }
    }

    /// Matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dim + j]
    }

    /// Whether every off-diagonal element is zero.
    pub fn is_identity(&self) -> bool {
        (0..self.dim).all(|i| (0..self.dim).all(|j| i == j || self.get(i, j) == 0.0))
    }

    /// Lower-triangular factor `L` with `C = L L^T`.
    pub fn cholesky(&self) -> Result<CholeskyFactor, CorrelationError> {
        let n = self.dim;
        let mut lower = vec![0.0; n * n];

        for j in 0..n {
            let sum: f64 = (0..j).map(|k| lower[j * n + k] * lower[j * n + k]).sum();
            let pivot = self.get(j, j) - sum;
            if pivot < -TOLERANCE {
                return Err(CorrelationError::NotPositiveSemiDefinite { index: j, pivot });
            }
            let l_jj = if pivot <= TOLERANCE { 0.0 } else { pivot.sqrt() };
            lower[j * n + j] = l_jj;

            for i in (j + 1)..n {
                let s: f64 = (0..j).map(|k| lower[i * n + k] * lower[j * n + k]).sum();
                let residual = self.get(i, j) - s;
                if l_jj == 0.0 {
                    // A zero pivot leaves nothing to explain; any residual
                    // correlation means the matrix is indefinite.
                    if residual.abs() > 1e-8 {
                        return Err(CorrelationError::NotPositiveSemiDefinite {
                            index: i,
                            pivot: -residual.abs(),
                        });
                    }
                    lower[i * n + j] = 0.0;
                } else {
                    lower[i * n + j] = residual / l_jj;
                }
            }
        }

        Ok(CholeskyFactor { data: lower, dim: n })
    }
}

/// Lower-triangular Cholesky factor of a correlation matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct CholeskyFactor {
    data: Vec<f64>,
    dim: usize,
}

impl CholeskyFactor {
    /// Identity factor.
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        Self { data, dim }
    }

    /// Matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element `(i, j)`; zero above the diagonal.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if j > i {
            0.0
        } else {
            self.data[i * self.dim + j]
        }
    }

    /// `W = L Z` for independent normals `z`.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform(&self, z: &[f64]) -> Vec<f64> {
        let mut w = z[..self.dim].to_vec();
        self.transform_inplace(&mut w);
        w
    }

    /// `W = L Z` in place; row `i` only reads `z[..=i]`, so walking rows
    /// from the bottom up needs no scratch buffer.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform_inplace(&self, z: &mut [f64]) {
        assert!(
            z.len() >= self.dim,
            "Input vector length {} is less than matrix dimension {}",
            z.len(),
            self.dim
        );
        let n = self.dim;
        for i in (0..n).rev() {
            let row = &self.data[i * n..i * n + i + 1];
            let w: f64 = row.iter().zip(z.iter()).map(|(l, x)| l * x).sum();
            z[i] = w;
        }
    }
}
