//! Point generation through an engine session.
//!
//! Purpose
//! - Own one `NumericContext` (and therefore one engine session), submit
//!   generation commands to it, and accumulate the resulting points in a
//!   row-major buffer.
//! - Capture every byte of engine diagnostic text into a caller-visible
//!   buffer instead of any output stream.
//!
//! Failure model
//! - `ErrorMode::Raise` (default): a failed command returns `Err(EngineError)`.
//! - `ErrorMode::Record`: a failed command returns `Ok(())`; the caller polls
//!   `status()` and `message()`.
//! - In both modes the status and diagnostic text are updated, and points
//!   from earlier commands are never removed.
//! - A fatal failure poisons the session; later commands fail with
//!   `ERR_POISONED` until the generator is dropped.

use crate::context::NumericContext;
use crate::engine::{DiagnosticSink, EngineStatus, MSG_ERROR, MSG_WARNING};
use crate::engine_error;
use crate::error::{
    EngineError, ErrorKind, ERR_COUNT_MISMATCH, ERR_DIMENSION, ERR_EMPTY_COMMAND,
    ERR_EXTRA_COORDINATES, ERR_POISONED,
};
use crate::point::Point;

/// How `append_points` reports an engine failure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Return the failure as `Err`.
    #[default]
    Raise,
    /// Record status and message only; return `Ok`.
    Record,
}

/// Accumulating point generator.
///
/// Invariants:
/// - `dimension` is 0 until the first points arrive, then fixed.
/// - Only caller-appended coordinates can leave a partial trailing point.
/// - Sole owner of its `NumericContext`; neither `Clone` nor `Copy`.
#[derive(Debug)]
pub struct PointGenerator {
    ctx: NumericContext,
    mode: ErrorMode,
    dimension: usize,
    coordinates: Vec<f64>,
    new_count: usize,
    status: i32,
    message: String,
    comment: String,
    poisoned: bool,
}

/// Sink handed to the engine: appends text, remembers the first error code.
struct Capture<'m> {
    message: &'m mut String,
    error_code: i32,
}

impl DiagnosticSink for Capture<'_> {
    fn emit(&mut self, msg_code: i32, text: &str) {
        self.message.push_str(text);
        if self.error_code == 0 && (MSG_ERROR..MSG_WARNING).contains(&msg_code) {
            self.error_code = msg_code;
        }
    }
}

impl Default for PointGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PointGenerator {
    /// Empty generator over the built-in engine, raising on failure.
    pub fn new() -> Self {
        Self::with_context(NumericContext::default(), ErrorMode::Raise)
    }

    pub fn with_mode(mode: ErrorMode) -> Self {
        Self::with_context(NumericContext::default(), mode)
    }

    /// Take ownership of `ctx` and its engine session.
    pub fn with_context(ctx: NumericContext, mode: ErrorMode) -> Self {
        Self {
            ctx,
            mode,
            dimension: 0,
            coordinates: Vec::new(),
            new_count: 0,
            status: 0,
            message: String::new(),
            comment: String::new(),
            poisoned: false,
        }
    }

    /// Generator seeded with the points of `command`.
    pub fn from_command(command: &str) -> Result<Self, EngineError> {
        let mut pg = Self::new();
        pg.append_points(command)?;
        Ok(pg)
    }

    /// Run `command` on the engine and append its points.
    pub fn append_points(&mut self, command: &str) -> Result<(), EngineError> {
        match self.try_append(command) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(
                    code = err.code(),
                    fatal = err.is_fatal(),
                    command,
                    "append_points failed"
                );
                self.status = err.code();
                if err.is_fatal() {
                    self.poisoned = true;
                }
                match self.mode {
                    ErrorMode::Raise => Err(err),
                    ErrorMode::Record => Ok(()),
                }
            }
        }
    }

    fn try_append(&mut self, command: &str) -> Result<(), EngineError> {
        if self.poisoned {
            return Err(self.note(engine_error!(
                ERR_POISONED,
                ErrorKind::Fatal,
                "generator error: session corrupted by an earlier fatal error, refusing '%s'",
                command,
            )));
        }
        if command.trim().is_empty() {
            return Err(self.note(engine_error!(
                ERR_EMPTY_COMMAND,
                ErrorKind::User,
                "generator error: empty generation command",
            )));
        }
        let extra = self.extra_coordinate_count();
        if extra != 0 {
            return Err(self.note(engine_error!(
                ERR_EXTRA_COORDINATES,
                ErrorKind::User,
                "generator error: %d extra coordinates pending before '%s'; buffer was '%s'",
                extra,
                command,
                self.comment.as_str(),
            )));
        }

        let start = self.message.len();
        let mut capture = Capture {
            message: &mut self.message,
            error_code: 0,
        };
        let result = self.ctx.session_mut().generate(command, &mut capture);
        let error_code = capture.error_code;

        let generated = match result {
            Ok(generated) => generated,
            Err(status) => {
                let status = if status.is_ok() {
                    EngineStatus::OTHER
                } else {
                    status
                };
                let code = if error_code != 0 {
                    error_code
                } else {
                    status.code()
                };
                let text = self.message[start..].trim_end().to_string();
                if text.is_empty() {
                    return Err(self.note(engine_error!(
                        code,
                        ErrorKind::of_engine_code(code),
                        "engine error: '%s' failed with status %d",
                        command,
                        status.code(),
                    )));
                }
                return Err(EngineError::from_engine(code, text));
            }
        };

        if generated.coordinates.len() != generated.count * generated.dimension {
            return Err(self.note(engine_error!(
                ERR_COUNT_MISMATCH,
                ErrorKind::Fatal,
                "generator error: engine announced %d points in dimension %d but delivered %d coordinates for '%s'",
                generated.count,
                generated.dimension,
                generated.coordinates.len(),
                command,
            )));
        }
        if self.dimension == 0 {
            self.dimension = generated.dimension;
        } else if generated.dimension != self.dimension {
            return Err(self.note(engine_error!(
                ERR_DIMENSION,
                ErrorKind::User,
                "generator error: dimension %d of '%s' does not match dimension %d of existing points",
                generated.dimension,
                command,
                self.dimension,
            )));
        }

        self.new_count = generated.count;
        self.reserve_points();
        self.coordinates.extend_from_slice(&generated.coordinates);
        if !self.comment.is_empty() {
            self.comment.push(' ');
        }
        self.comment.push_str(command.trim());
        tracing::debug!(
            command,
            generated = generated.count,
            total = self.count(),
            "append_points"
        );
        Ok(())
    }

    /// Copy a library-raised failure into the diagnostic buffer.
    fn note(&mut self, err: EngineError) -> EngineError {
        self.message.push_str(err.message());
        self.message.push('\n');
        err
    }

    /// Reserve room for `new_count()` more points. No semantic effect.
    pub fn reserve_points(&mut self) {
        let want = self
            .count()
            .checked_add(self.new_count)
            .and_then(|n| n.checked_mul(self.dimension));
        if let Some(want) = want {
            // Capacity only; an oversized request is skipped.
            let _ = self
                .coordinates
                .try_reserve(want.saturating_sub(self.coordinates.len()));
        }
    }

    /// Append raw coordinates; requires a set dimension.
    pub fn append_coordinates(&mut self, coordinates: &[f64]) {
        assert!(
            self.dimension > 0,
            "append_coordinates before the dimension is set"
        );
        self.coordinates.extend_from_slice(coordinates);
    }

    /// Fix the dimension; panics when changing it under existing coordinates.
    pub fn set_dimension(&mut self, dimension: usize) {
        assert!(
            self.coordinates.is_empty() || dimension == self.dimension,
            "cannot change dimension {} to {dimension} with stored coordinates",
            self.dimension
        );
        self.dimension = dimension;
    }

    pub fn set_new_count(&mut self, count: usize) {
        self.new_count = count;
    }

    /// Points added by the most recent successful command.
    #[inline]
    pub fn new_count(&self) -> usize {
        self.new_count
    }

    /// Complete points stored.
    #[inline]
    pub fn count(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.coordinates.len() / self.dimension
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Trailing coordinates that do not form a complete point.
    #[inline]
    pub fn extra_coordinate_count(&self) -> usize {
        if self.dimension == 0 {
            self.coordinates.len()
        } else {
            self.coordinates.len() % self.dimension
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Row-major coordinates of every stored point.
    #[inline]
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    pub fn point(&self, i: usize) -> Option<Point<'_>> {
        if i >= self.count() {
            return None;
        }
        let d = self.dimension;
        Some(Point::new(&self.coordinates[i * d..(i + 1) * d]))
    }

    pub fn points(&self) -> impl Iterator<Item = Point<'_>> + '_ {
        let d = self.dimension.max(1);
        self.coordinates[..self.count() * self.dimension]
            .chunks_exact(d)
            .map(Point::new)
    }

    /// 0 when no failure has been recorded since the last `clear_message`.
    #[inline]
    pub fn status(&self) -> i32 {
        self.status
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn has_message(&self) -> bool {
        !self.message.is_empty()
    }

    /// Clear diagnostic text and status.
    pub fn clear_message(&mut self) {
        self.message.clear();
        self.status = 0;
    }

    /// Accepted commands, space separated.
    #[inline]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    #[inline]
    pub fn mode(&self) -> ErrorMode {
        self.mode
    }

    #[inline]
    pub fn context(&self) -> &NumericContext {
        &self.ctx
    }

    #[inline]
    pub fn context_mut(&mut self) -> &mut NumericContext {
        &mut self.ctx
    }
}
