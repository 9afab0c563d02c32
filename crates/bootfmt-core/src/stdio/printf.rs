//! printf formatting engine.
//!
//! A format string is walked twice with the same grammar: once by the
//! argument scanner (see [`super::args`]) to learn how many arguments there
//! are and how wide each one is, and once here to render. Rendering goes
//! through a [`BoundedWriter`], so the same pass measures, fills a fixed
//! buffer, or fills a buffer sized by an earlier dry run.
//!
//! Supported directive syntax:
//!
//! ```text
//! %[N$][-][0][width][.precision][h|hh|l|ll|z]conversion
//! ```
//!
//! with conversions `d u x X p s c C %`, plus `pG` and `ur` when the `efi`
//! feature is on. Unknown conversion letters are emitted as plain characters
//! and consume no argument.

use super::args::{ArgumentList, FormatArgument, Referent};
use super::writer::BoundedWriter;
use crate::stdlib::conversion::{IntStyle, format_int, parse_decimal};
use crate::string::utf8::encode_utf8;

// ---------------------------------------------------------------------------
// Format spec types
// ---------------------------------------------------------------------------

/// Length modifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LengthMod {
    #[default]
    None,
    Hh, // 'hh'
    H,  // 'h'
    L,  // 'l'
    Ll, // 'll'
    Z,  // 'z', only before d/u/x/X
}

/// What a directive renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Signed,    // 'd'
    Unsigned,  // 'u'
    LowerHex,  // 'x'
    UpperHex,  // 'X'
    Pointer,   // 'p'
    Str,       // 's'
    Char,      // 'c'
    Codepoint, // 'C'
    Percent,   // '%'
    /// `%pG`: GUID behind a reference.
    #[cfg(feature = "efi")]
    Guid,
    /// `%ur`: firmware status code.
    #[cfg(feature = "efi")]
    EfiStatus,
    /// Unrecognized letter, emitted verbatim.
    Literal(u8),
}

impl Conversion {
    /// True if the directive reads a value from the argument list.
    #[must_use]
    pub const fn takes_argument(self) -> bool {
        !matches!(self, Self::Percent | Self::Literal(_))
    }
}

/// A parsed directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    /// 1-based index from an `N$` prefix.
    pub position: Option<u64>,
    pub left_justify: bool,
    /// Width digits started with `0`.
    pub zero_fill: bool,
    pub width: usize,
    pub precision: Option<usize>,
    pub length: LengthMod,
    pub conversion: Conversion,
}

impl FormatSpec {
    /// Padding byte for numeric fields. Left-justified fields always pad
    /// with spaces.
    #[must_use]
    pub const fn numeric_fill(&self) -> u8 {
        if self.zero_fill && !self.left_justify {
            b'0'
        } else {
            b' '
        }
    }
}

/// A piece of a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// Bytes to emit verbatim.
    Literal(&'a [u8]),
    /// A `%` directive.
    Spec(FormatSpec),
    /// The format ended inside a directive; the raw tail, `%` included.
    Incomplete(&'a [u8]),
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Flags, width and precision read before the length modifier.
#[derive(Debug, Clone, Copy, Default)]
struct Field {
    left_justify: bool,
    zero_fill: bool,
    width: usize,
    precision: Option<usize>,
}

/// Read `[-][digits][.digits]` at `pos`.
///
/// With `allow_position`, digits directly followed by `$` are returned as a
/// position (with the `$` consumed) instead of being read as a width, and
/// parsing stops there.
fn parse_field(fmt: &[u8], mut pos: usize, allow_position: bool) -> (Field, Option<u64>, usize) {
    let mut field = Field::default();

    if fmt.get(pos) == Some(&b'-') {
        field.left_justify = true;
        pos += 1;
    }

    let start = pos;
    while fmt.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    if pos > start {
        let value = parse_decimal(&fmt[start..pos]);
        if allow_position && fmt.get(pos) == Some(&b'$') {
            return (field, Some(value), pos + 1);
        }
        field.zero_fill = fmt[start] == b'0';
        field.width = usize::try_from(value).unwrap_or(usize::MAX);
    }

    if fmt.get(pos) == Some(&b'.') {
        pos += 1;
        let start = pos;
        while fmt.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
        }
        if pos > start {
            let value = parse_decimal(&fmt[start..pos]);
            field.precision = Some(usize::try_from(value).unwrap_or(usize::MAX));
        }
    }

    (field, None, pos)
}

/// Parse a single directive starting right after its `%`.
///
/// Returns `(spec, bytes_consumed)`, or `None` if the format ends before a
/// conversion letter.
pub fn parse_format_spec(fmt: &[u8]) -> Option<(FormatSpec, usize)> {
    // First attempt reads flags and width; if the digits turn out to be an
    // `N$` position, start over after the `$` with a clean field.
    let (mut field, position, mut pos) = parse_field(fmt, 0, true);
    if position.is_some() {
        (field, _, pos) = parse_field(fmt, pos, false);
    }

    let length = match fmt.get(pos) {
        Some(b'h') => {
            pos += 1;
            if fmt.get(pos) == Some(&b'h') {
                pos += 1;
                LengthMod::Hh
            } else {
                LengthMod::H
            }
        }
        Some(b'l') => {
            pos += 1;
            if fmt.get(pos) == Some(&b'l') {
                pos += 1;
                LengthMod::Ll
            } else {
                LengthMod::L
            }
        }
        Some(b'z') if matches!(fmt.get(pos + 1), Some(b'd' | b'u' | b'x' | b'X')) => {
            pos += 1;
            LengthMod::Z
        }
        _ => LengthMod::None,
    };

    let letter = *fmt.get(pos)?;
    pos += 1;

    let conversion = match letter {
        b'd' => Conversion::Signed,
        #[cfg(feature = "efi")]
        b'u' if fmt.get(pos) == Some(&b'r') => {
            pos += 1;
            Conversion::EfiStatus
        }
        b'u' => Conversion::Unsigned,
        b'x' => Conversion::LowerHex,
        b'X' => Conversion::UpperHex,
        #[cfg(feature = "efi")]
        b'p' if fmt.get(pos) == Some(&b'G') => {
            pos += 1;
            Conversion::Guid
        }
        b'p' => Conversion::Pointer,
        b's' => Conversion::Str,
        b'c' => Conversion::Char,
        b'C' => Conversion::Codepoint,
        b'%' => Conversion::Percent,
        other => Conversion::Literal(other),
    };

    Some((
        FormatSpec {
            position,
            left_justify: field.left_justify,
            zero_fill: field.zero_fill,
            width: field.width,
            precision: field.precision,
            length,
            conversion,
        },
        pos,
    ))
}

/// Iterator over the directives of a format string.
#[derive(Debug, Clone)]
pub struct Directives<'a> {
    fmt: &'a [u8],
    pos: usize,
}

/// Split `fmt` into directives. The format ends at its first NUL byte.
#[must_use]
pub fn directives(fmt: &[u8]) -> Directives<'_> {
    let end = fmt.iter().position(|&b| b == 0).unwrap_or(fmt.len());
    Directives {
        fmt: &fmt[..end],
        pos: 0,
    }
}

impl<'a> Iterator for Directives<'a> {
    type Item = Directive<'a>;

    fn next(&mut self) -> Option<Directive<'a>> {
        let fmt = self.fmt;
        let start = self.pos;
        if start >= fmt.len() {
            return None;
        }

        if fmt[start] != b'%' {
            let end = fmt[start..]
                .iter()
                .position(|&b| b == b'%')
                .map_or(fmt.len(), |off| start + off);
            self.pos = end;
            return Some(Directive::Literal(&fmt[start..end]));
        }

        match parse_format_spec(&fmt[start + 1..]) {
            Some((spec, consumed)) => {
                self.pos = start + 1 + consumed;
                Some(Directive::Spec(spec))
            }
            None => {
                self.pos = fmt.len();
                Some(Directive::Incomplete(&fmt[start..]))
            }
        }
    }
}

/// Positional counter shared by the scanner and the renderer.
///
/// Every argument-taking directive advances it, positional or not.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ArgCursor {
    next: usize,
}

impl ArgCursor {
    /// Index for `spec`, or `None` when an `N$` prefix names no valid slot.
    pub(crate) fn advance(&mut self, spec: &FormatSpec) -> Option<usize> {
        let current = self.next;
        self.next += 1;
        match spec.position {
            Some(n) => n.checked_sub(1).and_then(|i| usize::try_from(i).ok()),
            None => Some(current),
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Render `fmt` with already-extracted arguments into `out`.
///
/// Directives whose index falls outside `args` produce nothing.
pub fn render(out: &mut BoundedWriter<'_>, fmt: &[u8], args: &ArgumentList<'_>) {
    let mut cursor = ArgCursor::default();

    for directive in directives(fmt) {
        let spec = match directive {
            Directive::Literal(bytes) | Directive::Incomplete(bytes) => {
                out.write_bytes(bytes);
                continue;
            }
            Directive::Spec(spec) => spec,
        };

        match spec.conversion {
            Conversion::Percent => {
                out.push(b'%');
                continue;
            }
            Conversion::Literal(c) => {
                out.push(c);
                continue;
            }
            _ => {}
        }

        let Some(arg) = cursor.advance(&spec).and_then(|i| args.get(i)) else {
            continue;
        };
        render_one(out, &spec, arg);
    }
}

fn render_one(out: &mut BoundedWriter<'_>, spec: &FormatSpec, arg: &FormatArgument<'_>) {
    match spec.conversion {
        Conversion::Signed => format_integer(out, arg.value, IntStyle::Signed, spec),
        Conversion::Unsigned => format_integer(out, arg.value, IntStyle::Unsigned, spec),
        Conversion::LowerHex => format_integer(out, arg.value, IntStyle::LowerHex, spec),
        Conversion::UpperHex => format_integer(out, arg.value, IntStyle::UpperHex, spec),
        Conversion::Pointer => {
            out.write_bytes(b"0x");
            format_integer(out, arg.value, IntStyle::LowerHex, spec);
        }
        Conversion::Str => {
            let s = match arg.referent {
                Referent::Bytes(bytes) => bytes,
                _ => &b"(null)"[..],
            };
            format_str(out, s, spec);
        }
        Conversion::Char => out.push(arg.value as u8),
        Conversion::Codepoint => out.write_bytes(encode_utf8(arg.value as u32).as_bytes()),
        #[cfg(feature = "efi")]
        Conversion::Guid => super::efi::format_guid(out, arg),
        #[cfg(feature = "efi")]
        Conversion::EfiStatus => super::efi::format_status(out, arg.value as u64, spec),
        Conversion::Percent | Conversion::Literal(_) => {}
    }
}

/// Render an integer payload, padded to the field width.
pub fn format_integer(out: &mut BoundedWriter<'_>, value: i64, style: IntStyle, spec: &FormatSpec) {
    let digits = format_int(value, style);
    pad_field(out, digits.as_bytes(), spec.width, spec.left_justify, spec.numeric_fill());
}

/// Render a string argument: stops at a NUL byte or after `precision`
/// bytes, padded with spaces to the field width.
pub fn format_str(out: &mut BoundedWriter<'_>, s: &[u8], spec: &FormatSpec) {
    let mut len = s.iter().position(|&b| b == 0).unwrap_or(s.len());
    if let Some(max) = spec.precision {
        len = len.min(max);
    }
    pad_field(out, &s[..len], spec.width, spec.left_justify, b' ');
}

pub(crate) fn pad_field(
    out: &mut BoundedWriter<'_>,
    body: &[u8],
    width: usize,
    left_justify: bool,
    fill: u8,
) {
    let pad = width.saturating_sub(body.len());
    if left_justify {
        out.write_bytes(body);
        out.fill(b' ', pad);
    } else {
        out.fill(fill, pad);
        out.write_bytes(body);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
