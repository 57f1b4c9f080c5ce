//! Built-in `rbox`-style point generator.
//!
//! Grammar (options may be separated by spaces or written back to back; a
//! leading `rbox` word is ignored):
//! - `<n>`      number of random points (default 1000, or 0 when only `P`
//!   points are requested)
//! - `D<d>`     dimension (default 3)
//! - `s`        random points on the sphere of radius `B` instead of in the cube
//! - `c`        add the 2^d cube corners `±B`
//! - `d`        add the 2d diamond points `±B` on each axis
//! - `B<b>`     box half-width (default 0.5, or 1e6 with `z`)
//! - `O<o>`     offset every coordinate by `o`
//! - `z`        round coordinates to integers
//! - `t[<s>]`   seed; bare `t` derives a seed from the command text
//! - `P<x>,...` explicit point, missing trailing coordinates are 0
//!
//! Output order: explicit points, random points, cube corners, diamond points.

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{DiagnosticSink, Engine, EngineStatus, Generated, MSG_ERROR, MSG_WARNING};
use crate::cfg::{DEFAULT_BOX, DEFAULT_DIMENSION, DEFAULT_POINT_COUNT, DEFAULT_SEED};

/// Box half-width used with `z` when no `B` is given.
const INTEGER_BOX: f64 = 1e6;
/// Above this dimension `c` would produce an unreasonable number of corners.
const MAX_CUBE_DIMENSION: usize = 24;
/// Largest coordinate block a single command may request.
const MAX_COORDINATES: usize = 1 << 24;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Seed {
    Default,
    FromCommand,
    Fixed(u64),
}

/// Parsed generation request.
///
/// A request returned by `parse` has a total coordinate count within
/// `MAX_COORDINATES` and a box whose full width is finite.
#[derive(Clone, Debug, PartialEq)]
struct Request {
    count: Option<usize>,
    dimension: usize,
    sphere: bool,
    cube: bool,
    diamond: bool,
    integer: bool,
    box_size: Option<f64>,
    offset: f64,
    seed: Seed,
    points: Vec<Vec<f64>>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            count: None,
            dimension: DEFAULT_DIMENSION,
            sphere: false,
            cube: false,
            diamond: false,
            integer: false,
            box_size: None,
            offset: 0.0,
            seed: Seed::Default,
            points: Vec::new(),
        }
    }
}

impl Request {
    fn box_half_width(&self) -> f64 {
        self.box_size
            .unwrap_or(if self.integer { INTEGER_BOX } else { DEFAULT_BOX })
    }

    fn random_count(&self) -> usize {
        self.count
            .unwrap_or(if self.points.is_empty() { DEFAULT_POINT_COUNT } else { 0 })
    }

    /// Requires `dimension <= MAX_CUBE_DIMENSION` when `cube` is set.
    fn corner_count(&self) -> usize {
        if self.cube {
            1usize << self.dimension
        } else {
            0
        }
    }

    /// Total points, or `None` on overflow.
    fn total_points(&self) -> Option<usize> {
        let diamonds = if self.diamond {
            self.dimension.checked_mul(2)?
        } else {
            0
        };
        self.points
            .len()
            .checked_add(self.random_count())?
            .checked_add(self.corner_count())?
            .checked_add(diamonds)
    }
}

/// Parse failure: message code plus text for the sink.
#[derive(Debug)]
struct ParseError {
    code: i32,
    text: String,
}

impl ParseError {
    fn new(code: i32, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }
}

/// Session state of the built-in engine.
#[derive(Clone, Debug, Default)]
pub struct RboxEngine {
    last_seed: Option<u64>,
}

impl RboxEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed used by the most recent successful call; replays the same draw
    /// when passed back as `t<seed>`.
    pub fn last_seed(&self) -> Option<u64> {
        self.last_seed
    }
}

impl Engine for RboxEngine {
    fn generate(
        &mut self,
        command: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Generated, EngineStatus> {
        let req = match parse(command) {
            Ok(req) => req,
            Err(err) => {
                sink.emit(err.code, &err.text);
                return Err(EngineStatus::INPUT);
            }
        };
        let seed = match req.seed {
            Seed::Default => DEFAULT_SEED,
            Seed::FromCommand => mix_text(command),
            Seed::Fixed(s) => s,
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let out = build(&req, &mut rng);
        if out.count == 0 {
            sink.emit(
                MSG_WARNING + 1,
                &format!("rbox warning: no points generated for '{}'\n", command.trim()),
            );
        }
        tracing::trace!(
            seed,
            dimension = out.dimension,
            count = out.count,
            "rbox generated"
        );
        self.last_seed = Some(seed);
        Ok(out)
    }
}

fn parse(command: &str) -> Result<Request, ParseError> {
    let mut req = Request::default();
    let mut rest = command.trim_start();
    if let Some(after) = rest.strip_prefix("rbox") {
        if after.is_empty() || after.starts_with(char::is_whitespace) {
            rest = after;
        }
    }
    loop {
        rest = rest.trim_start();
        let Some(c) = rest.chars().next() else {
            break;
        };
        if c.is_ascii_digit() {
            let (count, tail) = take_count(rest)?;
            req.count = Some(count);
            rest = tail;
            continue;
        }
        rest = &rest[c.len_utf8()..];
        tracing::trace!(option = %c, "rbox option");
        match c {
            'D' => {
                let (d, tail) = take_count(rest)
                    .map_err(|_| ParseError::new(MSG_ERROR + 2, "rbox error: 'D' needs a dimension\n"))?;
                req.dimension = d;
                rest = tail;
            }
            's' => req.sphere = true,
            'c' => req.cube = true,
            'd' => req.diamond = true,
            'z' => req.integer = true,
            'B' => {
                let (b, tail) = take_real(rest, 'B')?;
                if !(b.is_finite() && b > 0.0) {
                    return Err(ParseError::new(
                        MSG_ERROR + 5,
                        format!("rbox error: box size B{b} must be positive\n"),
                    ));
                }
                if !(2.0 * b).is_finite() {
                    return Err(ParseError::new(
                        MSG_ERROR + 5,
                        format!("rbox error: box size B{b} is too large\n"),
                    ));
                }
                req.box_size = Some(b);
                rest = tail;
            }
            'O' => {
                let (o, tail) = take_real(rest, 'O')?;
                req.offset = o;
                rest = tail;
            }
            't' => {
                if rest.starts_with(|ch: char| ch.is_ascii_digit()) {
                    let (s, tail) = take_digits(rest);
                    let seed = s.parse::<u64>().map_err(|_| {
                        ParseError::new(MSG_ERROR + 2, format!("rbox error: bad seed 't{s}'\n"))
                    })?;
                    req.seed = Seed::Fixed(seed);
                    rest = tail;
                } else {
                    req.seed = Seed::FromCommand;
                }
            }
            'P' => {
                let mut point = Vec::new();
                loop {
                    let (v, tail) = take_real(rest, 'P')?;
                    point.push(v);
                    rest = tail;
                    match rest.strip_prefix(',') {
                        Some(tail) => rest = tail,
                        None => break,
                    }
                }
                req.points.push(point);
            }
            other => {
                return Err(ParseError::new(
                    MSG_ERROR + 1,
                    format!("rbox error: unknown option '{other}' in '{}'\n", command.trim()),
                ));
            }
        }
    }
    if req.dimension == 0 {
        return Err(ParseError::new(
            MSG_ERROR + 3,
            "rbox error: dimension must be at least 1\n",
        ));
    }
    if let Some(p) = req.points.iter().find(|p| p.len() > req.dimension) {
        return Err(ParseError::new(
            MSG_ERROR + 4,
            format!(
                "rbox error: point P with {} coordinates exceeds dimension {}\n",
                p.len(),
                req.dimension
            ),
        ));
    }
    if req.cube && req.dimension > MAX_CUBE_DIMENSION {
        return Err(ParseError::new(
            MSG_ERROR + 6,
            format!(
                "rbox error: 'c' in dimension {} exceeds {MAX_CUBE_DIMENSION}\n",
                req.dimension
            ),
        ));
    }
    let coordinates = req
        .total_points()
        .and_then(|n| n.checked_mul(req.dimension))
        .filter(|&n| n <= MAX_COORDINATES);
    if coordinates.is_none() {
        return Err(ParseError::new(
            MSG_ERROR + 7,
            format!(
                "rbox error: '{}' requests more than {MAX_COORDINATES} coordinates\n",
                command.trim()
            ),
        ));
    }
    Ok(req)
}

fn take_digits(s: &str) -> (&str, &str) {
    let n = s.bytes().take_while(u8::is_ascii_digit).count();
    s.split_at(n)
}

fn take_count(s: &str) -> Result<(usize, &str), ParseError> {
    let (digits, tail) = take_digits(s);
    let n = digits.parse::<usize>().map_err(|_| {
        ParseError::new(MSG_ERROR + 2, format!("rbox error: bad count at '{s}'\n"))
    })?;
    Ok((n, tail))
}

/// Leading real number of `s`: sign, digits, fraction, exponent.
fn take_real(s: &str, option: char) -> Result<(f64, &str), ParseError> {
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while b.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;
    if b.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }
    if mantissa_digits > 0 && matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        if b.get(j).is_some_and(u8::is_ascii_digit) {
            while b.get(j).is_some_and(u8::is_ascii_digit) {
                j += 1;
            }
            i = j;
        }
    }
    let (num, tail) = s.split_at(i);
    match num.parse::<f64>() {
        Ok(v) if mantissa_digits > 0 => Ok((v, tail)),
        _ => Err(ParseError::new(
            MSG_ERROR + 2,
            format!("rbox error: '{option}' needs a number at '{s}'\n"),
        )),
    }
}

fn build(req: &Request, rng: &mut StdRng) -> Generated {
    let dim = req.dimension;
    let b = req.box_half_width();
    let random = req.random_count();
    let corners = req.corner_count();
    let diamonds = if req.diamond { 2 * dim } else { 0 };
    let count = req.points.len() + random + corners + diamonds;

    let mut coords = Vec::with_capacity(count * dim);
    for p in &req.points {
        coords.extend((0..dim).map(|k| p.get(k).copied().unwrap_or(0.0)));
    }
    for _ in 0..random {
        if req.sphere {
            coords.extend(sphere_point(rng, dim).iter().map(|x| x * b));
        } else {
            coords.extend((0..dim).map(|_| rng.gen_range(-b..=b)));
        }
    }
    for corner in 0..corners {
        coords.extend((0..dim).map(|k| if (corner >> k) & 1 == 1 { b } else { -b }));
    }
    for k in 0..diamonds {
        let axis = k / 2;
        let v = if k % 2 == 0 { b } else { -b };
        coords.extend((0..dim).map(|j| if j == axis { v } else { 0.0 }));
    }
    for x in &mut coords {
        *x += req.offset;
        if req.integer {
            *x = x.round();
        }
    }
    Generated {
        dimension: dim,
        count,
        coordinates: coords,
    }
}

/// Uniform direction by rejection from the unit ball.
fn sphere_point(rng: &mut StdRng, dim: usize) -> DVector<f64> {
    loop {
        let v = DVector::from_fn(dim, |_, _| rng.gen_range(-1.0..=1.0));
        let n = v.norm();
        if n > 1e-6 && n <= 1.0 {
            return v / n;
        }
    }
}

/// Stable seed from command text (SplitMix64 mixing over the bytes).
fn mix_text(command: &str) -> u64 {
    fn mix(mut x: u64) -> u64 {
        x ^= x >> 30;
        x = x.wrapping_mul(0xbf58476d1ce4e5b9);
        x ^= x >> 27;
        x = x.wrapping_mul(0x94d049bb133111eb);
        x ^ (x >> 31)
    }
    command
        .bytes()
        .fold(0x9e3779b97f4a7c15, |acc, b| mix(acc ^ u64::from(b)))
}
