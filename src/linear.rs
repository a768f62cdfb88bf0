//! Linear scale codec
//!
//! Scales cross the public boundary as a `whole + nano` pair, the same way
//! IIO reports `val` and `val2`. Internally they are folded into a single
//! `u64` so that gain arithmetic stays exact.

use core::fmt;

use crate::{GtsError, Result};

/// Fixed precision of the fractional part of a [`Scale`].
pub const NANO: u64 = 1_000_000_000;

/// A scale split into its integer part and its fractional part in nanos.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Scale {
    /// Integer part of the scale.
    pub whole: u32,
    /// Fractional part of the scale, in units of 10^-9.
    pub nano: u32,
}

impl Scale {
    pub const fn new(whole: u32, nano: u32) -> Self {
        Self { whole, nano }
    }

    /// Folds the scale into a linear value at [`NANO`] precision.
    pub fn linear(self) -> Result<u64> {
        linearize(self.whole, self.nano, NANO)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.whole, self.nano)
    }
}

fn check_precision(precision: u64) -> Result<()> {
    if precision == 0 || precision > NANO {
        return Err(GtsError::InvalidPrecision);
    }
    Ok(())
}

/// Converts a `whole + nano` scale into a single linear value.
///
/// `precision` is the number of linear steps per whole unit and must be in
/// `1..=NANO`. Fractions finer than `NANO / precision` are truncated.
pub fn linearize(whole: u32, nano: u32, precision: u64) -> Result<u64> {
    check_precision(precision)?;

    // Divide the divider rather than multiply-then-divide the fraction
    Ok(u64::from(whole) * precision + u64::from(nano) / (NANO / precision))
}

/// Splits a linear value back into its `whole + nano` form.
pub fn delinearize(value: u64, precision: u64) -> Result<Scale> {
    check_precision(precision)?;

    let whole = u32::try_from(value / precision).map_err(|_| GtsError::InvalidScale)?;
    // The remainder is below `precision`, so the product stays below NANO
    let nano = (value % precision) * (NANO / precision);

    Ok(Scale {
        whole,
        nano: nano as u32,
    })
}
