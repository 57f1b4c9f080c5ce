//! printf-style rendering for message templates and real numbers.
//!
//! Supported directives: `%d %i %u %x %X %o %c %s %f %F %e %E %g %G %p %%`
//! with flags `- + space 0 #`, a decimal width, a precision, and the length
//! modifiers `h l ll z j L` (accepted and ignored).
//!
//! Arguments are consumed left to right. Integer and real arguments are
//! coerced to whatever the directive asks for; a text argument under a numeric
//! directive is rendered as text. A directive with no argument left is copied
//! into the output unchanged.

use crate::error::ErrorArg;

#[derive(Clone, Copy, Debug, Default)]
struct Conversion {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alt: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conv: char,
}

/// Render `template` against `args`.
pub fn sprintf(template: &str, args: &[ErrorArg]) -> String {
    let mut out = String::with_capacity(template.len() + 16 * args.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let directive = &rest[pos..];
        match parse_conversion(directive) {
            Some((fs, len)) => {
                if fs.conv == '%' {
                    out.push('%');
                } else if let Some(arg) = args.next() {
                    render(&mut out, &fs, arg);
                } else {
                    out.push_str(&directive[..len]);
                }
                rest = &directive[len..];
            }
            None => {
                out.push('%');
                rest = &directive[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// `%g` rendering of a real: six significant digits, trailing zeros dropped.
pub fn real(v: f64) -> String {
    let mut out = String::new();
    render(
        &mut out,
        &Conversion {
            conv: 'g',
            ..Conversion::default()
        },
        &ErrorArg::Real(v),
    );
    out
}

fn parse_conversion(s: &str) -> Option<(Conversion, usize)> {
    let bytes = s.as_bytes();
    let mut fs = Conversion::default();
    let mut i = 1;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'-' => fs.left = true,
            b'+' => fs.plus = true,
            b' ' => fs.space = true,
            b'0' => fs.zero = true,
            b'#' => fs.alt = true,
            _ => break,
        }
        i += 1;
    }
    let (width, n) = digits(&bytes[i..]);
    fs.width = width;
    i += n;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let (precision, n) = digits(&bytes[i..]);
        fs.precision = Some(precision.unwrap_or(0));
        i += n;
    }
    while matches!(bytes.get(i), Some(b'h' | b'l' | b'z' | b'j' | b'L')) {
        i += 1;
    }
    let conv = *bytes.get(i)?;
    if !b"diuxXocsfFeEgGp%".contains(&conv) {
        return None;
    }
    fs.conv = conv as char;
    Some((fs, i + 1))
}

fn digits(bytes: &[u8]) -> (Option<usize>, usize) {
    let n = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if n == 0 {
        return (None, 0);
    }
    let value = std::str::from_utf8(&bytes[..n])
        .ok()
        .and_then(|s| s.parse().ok());
    (value, n)
}

fn render(out: &mut String, fs: &Conversion, arg: &ErrorArg) {
    match fs.conv {
        'd' | 'i' => match arg.as_wide() {
            Some(v) => {
                let sign = sign_of(v < 0, fs);
                let digits = min_digits(v.unsigned_abs().to_string(), fs.precision);
                pad(out, fs, sign, "", &digits, fs.precision.is_none());
            }
            None => render_text(out, fs, arg),
        },
        'u' | 'x' | 'X' | 'o' => match arg.as_unsigned() {
            Some(v) => {
                let (digits, prefix) = match fs.conv {
                    'u' => (v.to_string(), ""),
                    'x' => (format!("{v:x}"), if fs.alt && v != 0 { "0x" } else { "" }),
                    'X' => (format!("{v:X}"), if fs.alt && v != 0 { "0X" } else { "" }),
                    _ => (format!("{v:o}"), if fs.alt && v != 0 { "0" } else { "" }),
                };
                let digits = min_digits(digits, fs.precision);
                pad(out, fs, "", prefix, &digits, fs.precision.is_none());
            }
            None => render_text(out, fs, arg),
        },
        'p' => match arg.as_unsigned() {
            Some(v) => pad(out, fs, "", "0x", &format!("{v:x}"), false),
            None => render_text(out, fs, arg),
        },
        'c' => match arg {
            ErrorArg::Text(s) => {
                let c: String = s.chars().take(1).collect();
                pad(out, fs, "", "", &c, false);
            }
            other => {
                let c = other
                    .as_unsigned()
                    .and_then(|v| u32::try_from(v).ok())
                    .and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_default();
                pad(out, fs, "", "", &c, false);
            }
        },
        's' => render_text(out, fs, arg),
        _ => match arg.as_real() {
            Some(v) => {
                let sign = sign_of(v.is_sign_negative() && !v.is_nan(), fs);
                let body = float_body(fs.conv, fs.precision, fs.alt, v.abs());
                pad(out, fs, sign, "", &body, v.is_finite());
            }
            None => render_text(out, fs, arg),
        },
    }
}

fn render_text(out: &mut String, fs: &Conversion, arg: &ErrorArg) {
    let text = match arg {
        ErrorArg::Text(s) => s.clone(),
        ErrorArg::Int(v) => v.to_string(),
        ErrorArg::Wide(v) => v.to_string(),
        ErrorArg::Real(v) => real(*v),
        ErrorArg::Address(v) => format!("0x{v:x}"),
    };
    let text = match fs.precision {
        Some(p) if fs.conv == 's' => text.chars().take(p).collect(),
        _ => text,
    };
    pad(out, fs, "", "", &text, false);
}

fn sign_of(negative: bool, fs: &Conversion) -> &'static str {
    if negative {
        "-"
    } else if fs.plus {
        "+"
    } else if fs.space {
        " "
    } else {
        ""
    }
}

fn min_digits(digits: String, precision: Option<usize>) -> String {
    match precision {
        Some(p) if digits.len() < p => format!("{}{digits}", "0".repeat(p - digits.len())),
        _ => digits,
    }
}

fn pad(out: &mut String, fs: &Conversion, sign: &str, prefix: &str, body: &str, zero_ok: bool) {
    let len = sign.len() + prefix.len() + body.chars().count();
    let fill = fs.width.map_or(0, |w| w.saturating_sub(len));
    if fs.left {
        out.push_str(sign);
        out.push_str(prefix);
        out.push_str(body);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if fs.zero && zero_ok {
        out.push_str(sign);
        out.push_str(prefix);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(body);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(sign);
        out.push_str(prefix);
        out.push_str(body);
    }
}

/// Digits of a non-negative real for `conv` in `f F e E g G`.
fn float_body(conv: char, precision: Option<usize>, alt: bool, a: f64) -> String {
    let upper = conv.is_ascii_uppercase();
    let body = if a.is_nan() {
        "nan".to_string()
    } else if a.is_infinite() {
        "inf".to_string()
    } else {
        let p = precision.unwrap_or(6);
        match conv.to_ascii_lowercase() {
            'f' => {
                let mut s = format!("{:.*}", p, a);
                if alt && p == 0 {
                    s.push('.');
                }
                s
            }
            'e' => exp_form(a, p, alt),
            _ => general(a, p, alt),
        }
    };
    if upper {
        body.to_ascii_uppercase()
    } else {
        body
    }
}

fn exp_form(a: f64, p: usize, alt: bool) -> String {
    let s = format!("{:.*e}", p, a);
    let (mant, exp) = s.split_once('e').unwrap_or((s.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let dot = if alt && p == 0 { "." } else { "" };
    let exp_sign = if exp < 0 { '-' } else { '+' };
    format!("{mant}{dot}e{exp_sign}{:02}", exp.unsigned_abs())
}

fn general(a: f64, p: usize, alt: bool) -> String {
    let p = p.max(1);
    let x = if a == 0.0 { 0 } else { decimal_exponent(a, p) };
    let p = p as i32;
    let mut s = if x < p && x >= -4 {
        format!("{:.*}", (p - 1 - x) as usize, a)
    } else {
        exp_form(a, (p - 1) as usize, false)
    };
    if !alt {
        strip_fraction_zeros(&mut s);
    }
    s
}

/// Exponent of `a` once rounded to `p` significant digits.
fn decimal_exponent(a: f64, p: usize) -> i32 {
    let s = format!("{:.*e}", p - 1, a);
    s.split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0)
}

fn strip_fraction_zeros(s: &mut String) {
    let split = s.find('e').unwrap_or(s.len());
    let (mant, exp) = s.split_at(split);
    if !mant.contains('.') {
        return;
    }
    let mant = mant.trim_end_matches('0').trim_end_matches('.');
    *s = format!("{mant}{exp}");
}
