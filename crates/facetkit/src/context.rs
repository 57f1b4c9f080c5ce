//! Numeric context: tolerances plus one owned engine session.

use std::fmt;

use crate::cfg::NumericCfg;
use crate::engine::{Engine, RboxEngine};

/// Tolerances and the engine session they belong to.
///
/// Invariants:
/// - Exactly one owner. The type is neither `Clone` nor `Copy`; hyperplanes
///   and points borrow it and cannot outlive it.
/// - The session is always present once constructed.
/// - Not `Sync`-safe by contract: one thread at a time.
pub struct NumericContext {
    cfg: NumericCfg,
    session: Box<dyn Engine>,
}

impl NumericContext {
    /// Context backed by the built-in `RboxEngine`.
    pub fn new(cfg: NumericCfg) -> Self {
        Self::with_engine(cfg, Box::new(RboxEngine::new()))
    }

    pub fn with_engine(cfg: NumericCfg, session: Box<dyn Engine>) -> Self {
        Self { cfg, session }
    }

    #[inline]
    pub fn cfg(&self) -> &NumericCfg {
        &self.cfg
    }

    /// Tolerance on `|offset - other.offset|`.
    #[inline]
    pub fn distance_eps(&self) -> f64 {
        self.cfg.distance_eps
    }

    /// Tolerance on the squared normal difference.
    #[inline]
    pub fn angle_eps(&self) -> f64 {
        self.cfg.angle_eps
    }

    pub fn set_cfg(&mut self, cfg: NumericCfg) {
        self.cfg = cfg;
    }

    #[inline]
    pub fn session_mut(&mut self) -> &mut dyn Engine {
        self.session.as_mut()
    }
}

impl Default for NumericContext {
    fn default() -> Self {
        Self::new(NumericCfg::default())
    }
}

impl fmt::Debug for NumericContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericContext")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}
