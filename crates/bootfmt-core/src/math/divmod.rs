//! Software 64-bit division.
//!
//! Firmware targets may lack a 64-bit divide instruction, and the compiler's
//! runtime helper for `u64 / u64` is not always linked in early boot code.
//! [`divmod64`] produces quotient and remainder using only shifts, compares
//! and subtraction once either operand leaves the 32-bit range.

/// Quotient and remainder of `n / d`.
///
/// Panics if `d == 0`, matching the native operator.
#[must_use]
pub fn divmod64(n: u64, d: u64) -> (u64, u64) {
    assert!(d != 0, "divmod64: division by zero");

    // 32-bit division is cheap everywhere we run.
    if n <= u64::from(u32::MAX) && d <= u64::from(u32::MAX) {
        let (n32, d32) = (n as u32, d as u32);
        return (u64::from(n32 / d32), u64::from(n32 % d32));
    }

    restoring_divmod(n, d)
}

/// Quotient of `n / d`.
#[inline]
#[must_use]
pub fn div64(n: u64, d: u64) -> u64 {
    divmod64(n, d).0
}

/// Remainder of `n / d`.
#[inline]
#[must_use]
pub fn mod64(n: u64, d: u64) -> u64 {
    divmod64(n, d).1
}

/// Binary long division, one quotient bit per iteration, most significant
/// bit first.
///
/// The running remainder `m` never exceeds `d` before the shift, so the
/// shift only overflows when `d` has bit 63 set; that case is tracked with
/// the carried-out bit.
fn restoring_divmod(mut n: u64, d: u64) -> (u64, u64) {
    let mut q = 0u64;
    let mut m = 0u64;

    for _ in 0..64 {
        let carry = m >> 63;
        m = (m << 1) | (n >> 63);
        n <<= 1;
        q <<= 1;

        if carry != 0 || m >= d {
            m = m.wrapping_sub(d);
            q |= 1;
        }
    }

    (q, m)
}
