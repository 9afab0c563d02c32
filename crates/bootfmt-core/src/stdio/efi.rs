//! Firmware-specific conversions: `%pG` and `%ur`.

use super::args::{FormatArgument, Referent};
use super::printf::{FormatSpec, format_integer, format_str};
use super::writer::BoundedWriter;
use crate::stdlib::conversion::IntStyle;

/// A firmware GUID in its native field layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    #[must_use]
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }
}

const HEX: &[u8; 16] = b"0123456789abcdef";

fn push_hex(out: &mut BoundedWriter<'_>, value: u64, digits: u32) {
    for i in (0..digits).rev() {
        out.push(HEX[((value >> (i * 4)) & 0xf) as usize]);
    }
}

/// `%pG`: `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`, lower case. Field width
/// and flags do not apply. A missing GUID renders as `(null)`.
pub fn format_guid(out: &mut BoundedWriter<'_>, arg: &FormatArgument<'_>) {
    let Referent::Guid(guid) = arg.referent else {
        out.write_bytes(b"(null)");
        return;
    };

    push_hex(out, u64::from(guid.data1), 8);
    out.push(b'-');
    push_hex(out, u64::from(guid.data2), 4);
    out.push(b'-');
    push_hex(out, u64::from(guid.data3), 4);
    out.push(b'-');
    for &b in &guid.data4[..2] {
        push_hex(out, u64::from(b), 2);
    }
    out.push(b'-');
    for &b in &guid.data4[2..] {
        push_hex(out, u64::from(b), 2);
    }
}

// ---------------------------------------------------------------------------
// Status codes
// ---------------------------------------------------------------------------

const ERROR_BIT: u64 = 1 << (usize::BITS - 1);

const WARNINGS: [&str; 8] = [
    "Success",
    "Warning Unknown Glyph",
    "Warning Delete Failure",
    "Warning Write Failure",
    "Warning Buffer Too Small",
    "Warning Stale Data",
    "Warning File System",
    "Warning Reset Required",
];

const ERRORS: [&str; 34] = [
    "",
    "Load Error",
    "Invalid Parameter",
    "Unsupported",
    "Bad Buffer Size",
    "Buffer Too Small",
    "Not Ready",
    "Device Error",
    "Write Protected",
    "Out of Resources",
    "Volume Corrupt",
    "Volume Full",
    "No Media",
    "Media changed",
    "Not Found",
    "Access Denied",
    "No Response",
    "No mapping",
    "Time out",
    "Not started",
    "Already started",
    "Aborted",
    "ICMP Error",
    "TFTP Error",
    "Protocol Error",
    "Incompatible Version",
    "Security Violation",
    "CRC Error",
    "End of Media",
    "",
    "",
    "End of File",
    "Invalid Language",
    "Compromised Data",
];

/// Name of a status code, if it is a known one.
#[must_use]
pub fn status_name(status: u64) -> Option<&'static str> {
    let name = if status & ERROR_BIT != 0 {
        let code = usize::try_from(status & !ERROR_BIT).ok()?;
        *ERRORS.get(code)?
    } else {
        *WARNINGS.get(usize::try_from(status).ok()?)?
    };
    (!name.is_empty()).then_some(name)
}

/// `%ur`: a known status renders as its name, padded like `%s`; anything
/// else as `0x` followed by hex digits padded like `%x`.
pub fn format_status(out: &mut BoundedWriter<'_>, status: u64, spec: &FormatSpec) {
    match status_name(status) {
        Some(name) => format_str(out, name.as_bytes(), spec),
        None => {
            out.write_bytes(b"0x");
            format_integer(out, status as i64, IntStyle::LowerHex, spec);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::malloc::SystemHeap;
    use crate::stdio::args::{Arg, ArgumentList};
    use crate::stdio::printf::render;

    fn run(fmt: &str, args: &[Arg<'_>]) -> String {
        let list = ArgumentList::collect(fmt.as_bytes(), args, &SystemHeap);
        let mut buf = vec![0u8; 128];
        let mut w = BoundedWriter::new(&mut buf);
        render(&mut w, fmt.as_bytes(), &list);
        let n = w.finish();
        String::from_utf8(buf[..n].to_vec()).unwrap()
    }

    const LOADED_IMAGE: Guid = Guid::new(
        0x5b1b_31a1,
        0x9562,
        0x11d2,
        [0x8e, 0x3f, 0x00, 0xa0, 0xc9, 0x69, 0x72, 0x3b],
    );

    #[test]
    fn test_guid() {
        assert_eq!(
            run("%pG", &[Arg::from(&LOADED_IMAGE)]),
            "5b1b31a1-9562-11d2-8e3f-00a0c969723b"
        );
    }

    #[test]
    fn test_guid_ignores_width_and_null() {
        assert_eq!(
            run("[%40pG]", &[Arg::from(&LOADED_IMAGE)]),
            "[5b1b31a1-9562-11d2-8e3f-00a0c969723b]"
        );
        assert_eq!(run("%pG", &[Arg::Guid(None)]), "(null)");
    }

    #[test]
    fn test_status_names() {
        assert_eq!(status_name(0), Some("Success"));
        assert_eq!(status_name(4), Some("Warning Buffer Too Small"));
        assert_eq!(status_name(ERROR_BIT | 14), Some("Not Found"));
        assert_eq!(status_name(ERROR_BIT | 33), Some("Compromised Data"));
        assert_eq!(status_name(ERROR_BIT | 29), None);
        assert_eq!(status_name(99), None);
    }

    #[test]
    fn test_status_rendering() {
        let not_found = Arg::Uint(ERROR_BIT | 14);
        assert_eq!(run("%ur", &[not_found]), "Not Found");
        assert_eq!(run("[%12ur]", &[not_found]), "[   Not Found]");
        assert_eq!(run("%08ur", &[Arg::Uint(0x99)]), "0x00000099");
        assert_eq!(run("%ur!", &[Arg::Uint(0)]), "Success!");
    }
}
