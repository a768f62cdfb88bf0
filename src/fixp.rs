//! Guarded fixed-point multiply/divide
//!
//! The lux polynomial multiplies 10^7 scaled coefficients with squared
//! channel values. Products are first attempted in 32 bits. A 64-bit product
//! is computed alongside, and the 32-bit result is only used when both agree.

/// Above this an intermediate is divided before it is multiplied by a gain.
pub(crate) const MUL_FIRST_LIMIT: u64 = 0xF_FFFF_FFFF_FFFF;

/// A product tracked both in 32 bits (wrapping) and in 64 bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Product {
    narrow: u32,
    wide: u64,
}

impl Product {
    pub(crate) fn of(a: u32, b: u32) -> Self {
        Self {
            narrow: a.wrapping_mul(b),
            wide: u64::from(a) * u64::from(b),
        }
    }

    /// Multiplies the product by `v`.
    ///
    /// The 64-bit side saturates, which can never match a 32-bit value.
    pub(crate) fn times(self, v: u32) -> Self {
        Self {
            narrow: self.narrow.wrapping_mul(v),
            wide: self.wide.saturating_mul(u64::from(v)),
        }
    }

    /// Whether the 32-bit product was not truncated.
    pub(crate) fn fits(self) -> bool {
        u64::from(self.narrow) == self.wide
    }

    pub(crate) fn wide(self) -> u64 {
        self.wide
    }

    /// Divides the product, in 32 bits if neither side needs more.
    pub(crate) fn div(self, div: u64) -> u64 {
        match u32::try_from(div) {
            Ok(d) if self.fits() => u64::from(self.narrow / d),
            _ => {
                log::trace!("fixp: {} / {} needs 64 bits", self.wide, div);
                self.wide / div
            }
        }
    }
}

/// `value * mul / div`, dividing first when the multiplication could
/// overflow.
pub(crate) fn mul_then_div(value: u64, mul: u64, div: u64) -> u64 {
    if value < MUL_FIRST_LIMIT {
        if let Some(v) = value.checked_mul(mul) {
            return v / div;
        }
    }

    log::trace!("fixp: {} dividing before multiplying", value);
    (value / div).saturating_mul(mul)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_fits() {
        let p = Product::of(65535, 65535);
        assert!(p.fits());
        assert_eq!(p.div(65535), 65535);

        let p = Product::of(31265280, 1000);
        assert!(!p.fits());
        assert_eq!(p.wide(), 31_265_280_000);
        assert_eq!(p.div(1000), 31265280);
    }

    #[test]
    fn test_product_times() {
        let p = Product::of(3, 5).times(7);
        assert!(p.fits());
        assert_eq!(p.wide(), 105);

        // wraps to exactly 0 in 32 bits
        let p = Product::of(1 << 16, 1 << 16);
        assert!(!p.fits());
        assert_eq!(p.div(1 << 16), 1 << 16);

        let p = Product::of(u32::MAX, u32::MAX).times(u32::MAX).times(u32::MAX);
        assert!(!p.fits());
        assert_eq!(p.wide(), u64::MAX);
    }

    #[test]
    fn test_product_wide_divisor() {
        let p = Product::of(10, 10);
        assert_eq!(p.div(u64::from(u32::MAX) + 1), 0);
    }

    #[test]
    fn test_mul_then_div() {
        assert_eq!(mul_then_div(10, 3, 4), 7);
        // divides first above the limit, losing the remainder
        assert_eq!(mul_then_div(MUL_FIRST_LIMIT + 3, 2, 4), (MUL_FIRST_LIMIT + 3) / 4 * 2);
        // would overflow, divides first
        assert_eq!(mul_then_div(1 << 40, 1 << 30, 1 << 20), 1 << 50);
        assert_eq!(mul_then_div(u64::MAX, u64::MAX, 1), u64::MAX);
    }
}
