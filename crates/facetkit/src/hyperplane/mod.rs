//! Hyperplanes `n · x + offset = 0` over borrowed normal storage.
//!
//! Purpose
//! - Evaluate signed point distance, approximate equality and normal length
//!   for plane equations whose coordinates live in a facet buffer owned
//!   elsewhere.
//!
//! Numerics
//! - `distance` sums `offset + Σ n_k x_k` left to right in index order. The
//!   dimension-specialized forms for d = 2..=8 keep that exact grouping, so
//!   they agree bit for bit with `distance_generic`.
//! - `equals` checks `|Δoffset| <= distance_eps` and then
//!   `Σ (Δn_k)^2 <= angle_eps`. The first bound is linear, the second squared;
//!   they are not combined into one metric.

mod print;

pub use print::PrintHyperplane;

use nalgebra::DVectorView;
use serde::{Deserialize, Serialize};

use crate::context::NumericContext;
use crate::point::Point;

/// Plane equation bound to a `NumericContext` for its tolerances.
///
/// Invariants:
/// - `coordinates` is valid only while its owning buffer lives (`'a`).
/// - `dimension() == coordinates().len()`.
#[derive(Clone, Copy, Debug)]
pub struct Hyperplane<'a> {
    coordinates: &'a [f64],
    offset: f64,
    ctx: &'a NumericContext,
}

impl<'a> Hyperplane<'a> {
    /// Zero-dimensional hyperplane with offset 0.
    pub fn empty(ctx: &'a NumericContext) -> Self {
        Self {
            coordinates: &[],
            offset: 0.0,
            ctx,
        }
    }

    #[inline]
    pub fn new(ctx: &'a NumericContext, coordinates: &'a [f64], offset: f64) -> Self {
        Self {
            coordinates,
            offset,
            ctx,
        }
    }

    /// Rebuild from a flat `[n_0, .., n_{d-1}, offset]` block.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_flat(ctx: &'a NumericContext, flat: &'a [f64]) -> Option<Self> {
        let (&offset, coordinates) = flat.split_last()?;
        Some(Self::new(ctx, coordinates, offset))
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
    pub fn offset(&self) -> f64 {
        self.offset
    }
    #[inline]
    pub fn context(&self) -> &'a NumericContext {
        self.ctx
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Normal as a linear-algebra view over the same storage.
    pub fn normal(&self) -> DVectorView<'a, f64> {
        DVectorView::from_slice(self.coordinates, self.coordinates.len())
    }

    /// Signed distance; positive means the point lies above (outside).
    ///
    /// Panics if the dimensions differ.
    pub fn distance(&self, p: &Point<'_>) -> f64 {
        let x = p.coordinates();
        assert_eq!(
            x.len(),
            self.dimension(),
            "point dimension {} does not match hyperplane dimension {}",
            x.len(),
            self.dimension()
        );
        let n = self.coordinates;
        let o = self.offset;
        match x.len() {
            2 => o + x[0] * n[0] + x[1] * n[1],
            3 => o + x[0] * n[0] + x[1] * n[1] + x[2] * n[2],
            4 => o + x[0] * n[0] + x[1] * n[1] + x[2] * n[2] + x[3] * n[3],
            5 => o + x[0] * n[0] + x[1] * n[1] + x[2] * n[2] + x[3] * n[3] + x[4] * n[4],
            6 => {
                o + x[0] * n[0]
                    + x[1] * n[1]
                    + x[2] * n[2]
                    + x[3] * n[3]
                    + x[4] * n[4]
                    + x[5] * n[5]
            }
            7 => {
                o + x[0] * n[0]
                    + x[1] * n[1]
                    + x[2] * n[2]
                    + x[3] * n[3]
                    + x[4] * n[4]
                    + x[5] * n[5]
                    + x[6] * n[6]
            }
            8 => {
                o + x[0] * n[0]
                    + x[1] * n[1]
                    + x[2] * n[2]
                    + x[3] * n[3]
                    + x[4] * n[4]
                    + x[5] * n[5]
                    + x[6] * n[6]
                    + x[7] * n[7]
            }
            _ => self.distance_generic(p),
        }
    }

    /// Reference loop for `distance`, any dimension.
    pub fn distance_generic(&self, p: &Point<'_>) -> f64 {
        let x = p.coordinates();
        assert_eq!(
            x.len(),
            self.dimension(),
            "point dimension {} does not match hyperplane dimension {}",
            x.len(),
            self.dimension()
        );
        let mut dist = self.offset;
        for (xk, nk) in x.iter().zip(self.coordinates) {
            dist += xk * nk;
        }
        dist
    }

    /// Approximate equality under this hyperplane's context tolerances.
    pub fn equals(&self, other: &Hyperplane<'_>) -> bool {
        if self.dimension() != other.dimension() {
            return false;
        }
        let d = (self.offset - other.offset).abs();
        if d > self.ctx.distance_eps() {
            return false;
        }
        if std::ptr::eq(self.coordinates.as_ptr(), other.coordinates.as_ptr()) {
            return true;
        }
        let mut dist2 = 0.0_f64;
        for (a, b) in self.coordinates.iter().zip(other.coordinates) {
            let diff = a - b;
            dist2 += diff * diff;
        }
        if dist2 > self.ctx.angle_eps() {
            return false;
        }
        true
    }

    /// Euclidean length of the normal (offset excluded).
    pub fn norm(&self) -> f64 {
        let mut d = 0.0_f64;
        for c in self.coordinates {
            d += c * c;
        }
        d.sqrt()
    }

    /// Flat export: coordinates followed by the offset.
    pub fn to_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.dimension() + 1);
        out.extend_from_slice(self.coordinates);
        out.push(self.offset);
        out
    }

    /// Owned export detached from the context.
    pub fn to_record(&self) -> HyperplaneRecord {
        HyperplaneRecord {
            normal: self.coordinates.to_vec(),
            offset: self.offset,
        }
    }

    /// Labeled text rendering; see [`PrintHyperplane`].
    pub fn print<'p>(
        &'p self,
        label: Option<&'p str>,
        offset_label: Option<&'p str>,
    ) -> PrintHyperplane<'p> {
        PrintHyperplane::new(self, label, offset_label)
    }
}

impl PartialEq for Hyperplane<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/// Owned plane equation for interchange (JSON and friends).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HyperplaneRecord {
    pub normal: Vec<f64>,
    pub offset: f64,
}

impl HyperplaneRecord {
    /// Borrow as a hyperplane bound to `ctx`.
    pub fn as_hyperplane<'a>(&'a self, ctx: &'a NumericContext) -> Hyperplane<'a> {
        Hyperplane::new(ctx, &self.normal, self.offset)
    }
}

#[cfg(test)]
mod tests;
