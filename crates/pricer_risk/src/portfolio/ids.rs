//! Identifier types for portfolio entities.

use std::fmt;

/// Unique name of a position within a portfolio.
///
/// # Examples
///
/// ```
/// use pricer_risk::portfolio::PositionId;
///
/// let id = PositionId::new("am_put_pos");
/// assert_eq!(id.as_str(), "am_put_pos");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionId(String);

impl PositionId {
    /// Creates a new position ID.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PositionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PositionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_id_ordering() {
        let mut ids = vec![PositionId::from("b"), PositionId::from("a".to_string())];
        ids.sort();
        assert_eq!(ids[0].as_str(), "a");
        assert_eq!(format!("{}", ids[1]), "b");
    }
}
