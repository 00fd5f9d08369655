//! Option exercise styles.

use std::fmt;

/// When an option can be exercised.
///
/// # Examples
/// ```
/// use pricer_models::instruments::ExerciseStyle;
///
/// assert_eq!(ExerciseStyle::default(), ExerciseStyle::European);
/// assert!(ExerciseStyle::American.is_early_exercise());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExerciseStyle {
    /// Exercise only at maturity.
    #[default]
    European,
    /// Exercise at any simulation date up to maturity.
    American,
}

impl ExerciseStyle {
    /// Whether the holder may exercise before maturity.
    #[inline]
    pub fn is_early_exercise(&self) -> bool {
        matches!(self, ExerciseStyle::American)
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseStyle::European => f.write_str("European"),
            ExerciseStyle::American => f.write_str("American"),
        }
    }
}
