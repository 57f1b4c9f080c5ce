//! Plane-equation evaluation and engine-driven point generation.
//!
//! - `Hyperplane`: signed distance, tolerance-aware equality and norm for a
//!   plane equation whose normal lives in storage owned elsewhere.
//! - `NumericContext`: the two equality tolerances plus one engine session.
//! - `PointGenerator`: submits textual generation commands to the engine,
//!   accumulates points and captures diagnostic text.
//! - `EngineError`: code plus rendered message, built from printf-style
//!   templates with typed arguments.
//!
//! Threading: one thread per `NumericContext`. Nothing here locks.

pub mod cfg;
pub mod context;
pub mod engine;
pub mod error;
pub mod format;
pub mod generator;
pub mod hyperplane;
pub mod point;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{CfgError, NumericCfg};
pub use context::NumericContext;
pub use engine::{DiagnosticSink, Engine, EngineStatus, Generated, RboxEngine};
pub use error::{EngineError, ErrorArg, ErrorKind};
pub use generator::{ErrorMode, PointGenerator};
pub use hyperplane::{Hyperplane, HyperplaneRecord, PrintHyperplane};
pub use point::Point;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::NumericCfg;
    pub use crate::context::NumericContext;
    pub use crate::engine_error;
    pub use crate::error::{EngineError, ErrorArg, ErrorKind};
    pub use crate::generator::{ErrorMode, PointGenerator};
    pub use crate::hyperplane::{Hyperplane, HyperplaneRecord};
    pub use crate::point::Point;
}
