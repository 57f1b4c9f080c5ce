//! Borrowed point view.

use std::fmt;
use std::ops::Index;

use crate::format::real;

/// Coordinates of one point, borrowed from whatever buffer holds them.
///
/// Invariant: `dimension() == coordinates().len()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<'a> {
    coordinates: &'a [f64],
}

impl<'a> Point<'a> {
    #[inline]
    pub fn new(coordinates: &'a [f64]) -> Self {
        Self { coordinates }
    }

    /// View with an explicit dimension; panics if the slice length disagrees.
    pub fn with_dimension(dimension: usize, coordinates: &'a [f64]) -> Self {
        assert_eq!(
            coordinates.len(),
            dimension,
            "point dimension {dimension} does not match {} coordinates",
            coordinates.len()
        );
        Self { coordinates }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.coordinates.len()
    }

    #[inline]
    pub fn coordinates(&self) -> &'a [f64] {
        self.coordinates
    }

    #[inline]
    pub fn to_vec(&self) -> Vec<f64> {
        self.coordinates.to_vec()
    }
}

impl Index<usize> for Point<'_> {
    type Output = f64;
    #[inline]
    fn index(&self, k: usize) -> &f64 {
        &self.coordinates[k]
    }
}

impl fmt::Display for Point<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &x in self.coordinates {
            write!(f, " {}", real(x))?;
        }
        Ok(())
    }
}
