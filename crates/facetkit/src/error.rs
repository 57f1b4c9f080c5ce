//! Structured engine errors.
//!
//! An `EngineError` is built from a numeric code plus a printf-style template
//! and an ordered list of typed arguments; the message is rendered once, at
//! construction. Codes in `FIRST_ERROR..=LAST_ERROR` belong to this library;
//! every other code (engine status, engine message codes) is kept as given.

use thiserror::Error;

use crate::engine::{EngineStatus, MSG_ERROR, MSG_WARNING};
use crate::format::sprintf;

/// First code reserved for errors raised by this library.
pub const FIRST_ERROR: i32 = 10000;
/// Last code reserved for errors raised by this library.
pub const LAST_ERROR: i32 = 10073;

/// Session was poisoned by an earlier fatal failure.
pub const ERR_POISONED: i32 = 10001;
/// Empty generation command.
pub const ERR_EMPTY_COMMAND: i32 = 10062;
/// Command dimension differs from the stored points.
pub const ERR_DIMENSION: i32 = 10063;
/// Caller left a partial point in the buffer.
pub const ERR_EXTRA_COORDINATES: i32 = 10067;
/// Engine delivered a different number of points than announced.
pub const ERR_COUNT_MISMATCH: i32 = 10068;

#[inline]
pub fn is_library_code(code: i32) -> bool {
    (FIRST_ERROR..=LAST_ERROR).contains(&code)
}

/// One typed argument of an error template.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorArg {
    Int(i32),
    Wide(i64),
    Real(f64),
    Text(String),
    Address(usize),
}

impl ErrorArg {
    /// Raw address argument, rendered by `%x` or `%p`.
    pub fn address<T: ?Sized>(ptr: *const T) -> Self {
        Self::Address(ptr.cast::<()>() as usize)
    }

    pub(crate) fn as_wide(&self) -> Option<i64> {
        match *self {
            Self::Int(v) => Some(i64::from(v)),
            Self::Wide(v) => Some(v),
            Self::Real(v) => Some(v as i64),
            Self::Address(v) => Some(v as i64),
            Self::Text(_) => None,
        }
    }

    pub(crate) fn as_unsigned(&self) -> Option<u64> {
        match *self {
            // C reinterprets a negative int as its 32-bit pattern.
            Self::Int(v) => Some(u64::from(v as u32)),
            Self::Wide(v) => Some(v as u64),
            Self::Real(v) => Some(v as i64 as u64),
            Self::Address(v) => Some(v as u64),
            Self::Text(_) => None,
        }
    }

    pub(crate) fn as_real(&self) -> Option<f64> {
        match *self {
            Self::Int(v) => Some(f64::from(v)),
            Self::Wide(v) => Some(v as f64),
            Self::Real(v) => Some(v),
            Self::Address(v) => Some(v as f64),
            Self::Text(_) => None,
        }
    }
}

impl From<i32> for ErrorArg {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}
impl From<i64> for ErrorArg {
    fn from(v: i64) -> Self {
        Self::Wide(v)
    }
}
impl From<usize> for ErrorArg {
    fn from(v: usize) -> Self {
        Self::Wide(i64::try_from(v).unwrap_or(i64::MAX))
    }
}
impl From<f64> for ErrorArg {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}
impl From<f32> for ErrorArg {
    fn from(v: f32) -> Self {
        Self::Real(f64::from(v))
    }
}
impl From<&str> for ErrorArg {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}
impl From<String> for ErrorArg {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Recoverability of an engine failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed command or input; the session stays usable.
    User,
    /// Session state can no longer be trusted.
    Fatal,
}

impl ErrorKind {
    /// Classify an engine status or engine message code.
    pub fn of_engine_code(code: i32) -> Self {
        if code == EngineStatus::INPUT.code() || (MSG_ERROR..MSG_WARNING).contains(&code) {
            Self::User
        } else {
            Self::Fatal
        }
    }
}

/// Error raised at the generator boundary. Displays as its rendered message.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{message}")]
pub struct EngineError {
    code: i32,
    kind: ErrorKind,
    message: String,
}

impl EngineError {
    pub fn new(code: i32, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code,
            kind,
            message: message.into(),
        }
    }

    /// Render `template` with `args` (printf directives, consumed in order).
    pub fn format(code: i32, kind: ErrorKind, template: &str, args: &[ErrorArg]) -> Self {
        Self::new(code, kind, sprintf(template, args))
    }

    /// Wrap an engine-reported code; the code passes through unchanged.
    pub fn from_engine(code: i32, message: impl Into<String>) -> Self {
        Self::new(code, ErrorKind::of_engine_code(code), message)
    }

    #[inline]
    pub fn code(&self) -> i32 {
        self.code
    }
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.kind == ErrorKind::Fatal
    }
    #[inline]
    pub fn is_library_error(&self) -> bool {
        is_library_code(self.code)
    }
}

/// Build an [`EngineError`] from a code, a kind, a template and its arguments.
///
/// ```
/// use facetkit::{engine_error, ErrorKind};
/// let e = engine_error!(10068, ErrorKind::Fatal, "expected %d points, got %d", 4, 3);
/// assert_eq!(e.to_string(), "expected 4 points, got 3");
/// ```
#[macro_export]
macro_rules! engine_error {
    ($code:expr, $kind:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $crate::error::EngineError::format(
            $code,
            $kind,
            $template,
            &[$($crate::error::ErrorArg::from($arg)),*],
        )
    };
}
