// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Human-readable rendering of metric values.
//!
//! These wrappers fix the exact textual form used by the logger sink, so that lines are stable
//! and can be parsed by other tools.

use std::fmt::{self, Write as _};

use jiff::SignedDuration;

/// Displays an `f64` using the shortest representation that round-trips.
///
/// Values whose decimal exponent is below `-4` or at least `6` use exponent notation with an
/// explicit sign and at least two exponent digits. Integral values have no fractional part.
///
/// ```
/// # use tally_core::DisplayFloat;
/// assert_eq!(DisplayFloat(1024.0).to_string(), "1024");
/// assert_eq!(DisplayFloat(0.25).to_string(), "0.25");
/// assert_eq!(DisplayFloat(1e6).to_string(), "1e+06");
/// assert_eq!(DisplayFloat(1.5e-7).to_string(), "1.5e-07");
/// assert_eq!(DisplayFloat(f64::INFINITY).to_string(), "+Inf");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayFloat(pub f64);

impl fmt::Display for DisplayFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            return f.write_str("NaN");
        }
        if value.is_infinite() {
            return f.write_str(if value > 0.0 { "+Inf" } else { "-Inf" });
        }
        if value == 0.0 {
            // keeps the sign of negative zero
            return write!(f, "{value}");
        }

        // `{:e}` produces the shortest round-tripping mantissa, e.g. `1.234567e6`
        let mut scientific = String::with_capacity(24);
        write!(scientific, "{value:e}")?;
        let Some((mantissa, exponent)) = scientific.split_once('e') else {
            return write!(f, "{value}");
        };
        let Ok(exponent) = exponent.parse::<i32>() else {
            return write!(f, "{value}");
        };

        if !(-4..6).contains(&exponent) {
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(f, "{mantissa}e{sign}{:02}", exponent.unsigned_abs())
        } else {
            write!(f, "{value}")
        }
    }
}

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Displays a [`SignedDuration`] with unit suffixes, largest unit first.
///
/// Durations under a second use a single unit (`ns`, `µs` or `ms`) with a fractional part when
/// needed. Longer durations are split into hours, minutes and (fractional) seconds, where the
/// leading zero units are omitted.
///
/// ```
/// # use tally_core::{DisplayDuration, SignedDuration};
/// assert_eq!(DisplayDuration(SignedDuration::from_secs(2)).to_string(), "2s");
/// assert_eq!(DisplayDuration(SignedDuration::from_secs(90)).to_string(), "1m30s");
/// assert_eq!(DisplayDuration(SignedDuration::from_secs(3600)).to_string(), "1h0m0s");
/// assert_eq!(DisplayDuration(SignedDuration::from_millis(300)).to_string(), "300ms");
/// assert_eq!(DisplayDuration(SignedDuration::from_nanos(1500)).to_string(), "1.5µs");
/// assert_eq!(DisplayDuration(SignedDuration::from_millis(-1500)).to_string(), "-1.5s");
/// assert_eq!(DisplayDuration(SignedDuration::ZERO).to_string(), "0s");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayDuration(pub SignedDuration);

impl fmt::Display for DisplayDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos();
        if nanos == 0 {
            return f.write_str("0s");
        }
        if nanos < 0 {
            f.write_str("-")?;
        }
        let nanos = nanos.unsigned_abs();

        if nanos < NANOS_PER_SEC {
            let (unit, suffix) = if nanos < NANOS_PER_MICRO {
                (1, "ns")
            } else if nanos < NANOS_PER_MILLI {
                (NANOS_PER_MICRO, "µs")
            } else {
                (NANOS_PER_MILLI, "ms")
            };
            write_fraction(f, nanos, unit)?;
            return f.write_str(suffix);
        }

        let whole_secs = nanos / NANOS_PER_SEC;
        let hours = whole_secs / 3600;
        let minutes = (whole_secs / 60) % 60;
        if hours > 0 {
            write!(f, "{hours}h{minutes}m")?;
        } else if minutes > 0 {
            write!(f, "{minutes}m")?;
        }
        write_fraction(f, nanos % (60 * NANOS_PER_SEC), NANOS_PER_SEC)?;
        f.write_str("s")
    }
}

/// Write `nanos / unit` with the remainder as a decimal fraction without trailing zeros.
fn write_fraction(f: &mut fmt::Formatter<'_>, nanos: u128, unit: u128) -> fmt::Result {
    write!(f, "{}", nanos / unit)?;
    let remainder = nanos % unit;
    if remainder == 0 {
        return Ok(());
    }
    // unit is a power of ten, so the fraction has one digit per zero of the unit
    let width = unit.ilog10() as usize;
    let mut digits = format!("{remainder:0width$}");
    while digits.ends_with('0') {
        digits.pop();
    }
    write!(f, ".{digits}")
}
