//! Engine seam: the external point-generation session and its diagnostics.
//!
//! An engine interprets a textual generation command and returns a flat
//! row-major coordinate block. Free-form diagnostic text never goes to a
//! global stream; it is handed to the `DiagnosticSink` passed into the call.
//!
//! Message codes
//! - `MSG_ERROR..MSG_WARNING`: errors (the call will fail).
//! - `MSG_WARNING..MSG_TRACE`: warnings.
//! - `MSG_TRACE..`: trace output.

pub mod rbox;

pub use rbox::RboxEngine;

/// First error message code.
pub const MSG_ERROR: i32 = 6000;
/// First warning message code.
pub const MSG_WARNING: i32 = 7000;
/// First trace message code.
pub const MSG_TRACE: i32 = 8000;

/// Return status of an engine call. `NONE` is success.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EngineStatus(pub i32);

impl EngineStatus {
    pub const NONE: Self = Self(0);
    pub const INPUT: Self = Self(1);
    pub const SINGULAR: Self = Self(2);
    pub const PREC: Self = Self(3);
    pub const MEM: Self = Self(4);
    pub const QHULL: Self = Self(5);
    pub const OTHER: Self = Self(6);

    #[inline]
    pub fn code(self) -> i32 {
        self.0
    }
    #[inline]
    pub fn is_ok(self) -> bool {
        self == Self::NONE
    }
}

/// Points produced by one engine call.
///
/// Invariant: `coordinates.len() == count * dimension` for a well-behaved
/// engine; the generator checks it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Generated {
    pub dimension: usize,
    pub count: usize,
    pub coordinates: Vec<f64>,
}

/// Receiver of engine diagnostic text.
pub trait DiagnosticSink {
    fn emit(&mut self, msg_code: i32, text: &str);
}

impl DiagnosticSink for String {
    fn emit(&mut self, _msg_code: i32, text: &str) {
        self.push_str(text);
    }
}

/// One engine session. Holds mutable per-session state; not shared.
pub trait Engine {
    /// Run `command`, streaming diagnostics into `sink`.
    fn generate(
        &mut self,
        command: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Generated, EngineStatus>;
}
