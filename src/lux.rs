//! Lux estimation from two light channels
//!
//! The vendor formula for the BU27034 (in open air) is
//!
//! ```text
//! D0 = data0 / gain0 / meas_time_ms * 25600
//! D1 = data1 / gain1 / meas_time_ms * 25600
//!
//! D1/D0 < 0.87: lx = (0.001331 * D0 + 0.0000354 * D1) * ((D1/D0 - 0.87) * 3.45 + 1)
//! D1/D0 < 1:    lx = (0.001331 * D0 + 0.0000354 * D1) * ((D1/D0 - 0.87) * 0.385 + 1)
//! otherwise:    lx = (0.001331 * D0 + 0.0000354 * D1) * ((D1/D0 - 2) * -0.05 + 1)
//! ```
//!
//! Each branch expands to
//!
//! ```text
//! lx = [ A * ch1 * ch1 * gain0 / (ch0 * gain1 * gain1)
//!      + B * ch1 / gain1
//!      + C * ch0 / gain0 ] / meas_time
//! ```
//!
//! with the coefficients below stored as integers scaled by 10^7. Sensors
//! behind colored glass need their own coefficients.

use crate::fixp::{mul_then_div, Product};
use crate::{GtsError, Result};

/// Coefficients of one branch of the lux polynomial.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LuxCoefficients {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    /// Which of `a`, `b` and `c` are subtracted instead of added.
    pub negative: [bool; 3],
}

/// Coefficient sets for channel ratios below 0.87, below 1 and above.
pub const LUX_COEFFICIENTS: [LuxCoefficients; 3] = [
    LuxCoefficients {
        a: 31265280,   // 3.126528
        b: 1157400832, // 115.7400832
        c: 681982976,  // -68.1982976
        negative: [false, false, true],
    },
    LuxCoefficients {
        a: 3489024,   // 0.3489024
        b: 137210309, // 13.721030912
        c: 226606476, // 22.66064768
        negative: [false, false, false],
    },
    LuxCoefficients {
        a: 453120,    // -0.045312
        b: 7068160,   // -0.706816
        c: 374809600, // 37.48096
        negative: [true, true, false],
    },
];

/// Divisor applied on top of the integration time to undo the 10^7 scaling
/// (together with the microsecond time unit).
const LUX_DIVISOR: u64 = 10_000;

/// Estimates the illuminance in lux from a pair of channel samples.
///
/// `gain0` and `gain1` are the hardware gains of the channels and `time_us`
/// the integration time in microseconds. Zero samples are treated as 1. When the
/// polynomial turns negative the result is 0 lux.
pub fn estimate_lux(ch0: u16, ch1: u16, gain0: u32, gain1: u32, time_us: u32) -> Result<u64> {
    let sample = Sample::new(ch0, ch1, gain0, gain1, time_us)?;

    let set = match sample.d1_d0_ratio_scaled() {
        r if r < 87 => 0,
        r if r < 100 => 1,
        _ => 2,
    };

    sample.lux(set)
}

/// Evaluates the polynomial with the coefficient set `set` regardless of the
/// channel ratio.
pub fn lux_with_coefficients(
    ch0: u16,
    ch1: u16,
    gain0: u32,
    gain1: u32,
    time_us: u32,
    set: usize,
) -> Result<u64> {
    Sample::new(ch0, ch1, gain0, gain1, time_us)?.lux(set)
}

#[derive(Copy, Clone, Debug)]
struct Sample {
    ch0: u32,
    ch1: u32,
    gain0: u32,
    gain1: u32,
    time_us: u32,
}

impl Sample {
    fn new(ch0: u16, ch1: u16, gain0: u32, gain1: u32, time_us: u32) -> Result<Self> {
        if gain0 == 0 || gain1 == 0 || time_us == 0 {
            return Err(GtsError::InvalidLuxInput);
        }

        // Avoid div by zero
        Ok(Self {
            ch0: u32::from(ch0.max(1)),
            ch1: u32::from(ch1.max(1)),
            gain0,
            gain1,
            time_us,
        })
    }

    /// `100 * (ch1 / gain1) / (ch0 / gain0)`
    fn d1_d0_ratio_scaled(&self) -> u64 {
        let div = u64::from(self.ch0) * u64::from(self.gain1);

        Product::of(self.ch1, self.gain0).times(100).div(div)
    }

    /// `coeff * ch1 * ch1 * gain0 / (gain1 * gain1 * ch0)`
    fn term1(&self, coeff: u32) -> u64 {
        let helper = Product::of(coeff, self.ch1).times(self.ch1);
        let with_gain = helper.times(self.gain0);
        let gain1_sq = u64::from(self.gain1) * u64::from(self.gain1);
        let ch0 = u64::from(self.ch0);

        if helper.fits() && with_gain.fits() {
            return with_gain.wide() / gain1_sq / ch0;
        }

        // Multiplying with gain0 could overflow even the 64-bit value, so
        // divide by the bigger divisor before it
        let (first, second) = if gain1_sq > ch0 {
            (gain1_sq, ch0)
        } else {
            (ch0, gain1_sq)
        };

        mul_then_div(helper.wide() / first, u64::from(self.gain0), second)
    }

    /// `coeff * ch / gain`
    fn term23(coeff: u32, ch: u32, gain: u32) -> u64 {
        Product::of(coeff, ch).div(u64::from(gain))
    }

    fn lux(&self, set: usize) -> Result<u64> {
        let c = LUX_COEFFICIENTS
            .get(set)
            .ok_or(GtsError::InvalidCoefficientSet)?;

        let terms = [
            self.term1(c.a),
            Self::term23(c.b, self.ch1, self.gain1),
            Self::term23(c.c, self.ch0, self.gain0),
        ];

        let mut res = terms
            .iter()
            .zip(c.negative)
            .filter(|(_, neg)| !neg)
            .fold(0u64, |acc, (t, _)| acc.saturating_add(*t));

        // No positive term => zero lux
        if res == 0 {
            return Ok(0);
        }

        for (t, _) in terms.iter().zip(c.negative).filter(|(_, neg)| *neg) {
            // Negative illuminance is reported as darkness
            if *t >= res {
                return Ok(0);
            }
            res -= t;
        }

        Ok(res / (u64::from(self.time_us) * LUX_DIVISOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    // D1/D0 = 1, 400 ms
    #[case(1000, 1000, 1, 1, 400_000, 91)]
    #[case(1000, 700, 1, 1, 400_000, 35)]
    #[case(1000, 800, 1, 1, 100_000, 263)]
    #[case(30000, 24000, 16, 16, 200_000, 247)]
    #[case(1000, 900, 1, 1, 400_000, 88)]
    #[case(40000, 36000, 1, 1, 100_000, 14116)]
    #[case(200, 300, 1, 1, 1, 7263756)]
    #[case(65535, 65535, 1, 1, 1, 2407024005)]
    #[case(60000, 65535, 4096, 4096, 400_000, 1)]
    // fits 32 bits all the way
    #[case(3, 2, 1, 1, 1, 31053)]
    // gain1 squared is the bigger divisor
    #[case(10, 8, 4096, 4096, 1, 64)]
    fn test_estimate_lux(
        #[case] ch0: u16,
        #[case] ch1: u16,
        #[case] gain0: u32,
        #[case] gain1: u32,
        #[case] time_us: u32,
        #[case] expected: u64,
    ) {
        assert_eq!(estimate_lux(ch0, ch1, gain0, gain1, time_us), Ok(expected));
    }

    #[test]
    fn test_ratio_selection() {
        let sample = |ch0, ch1| Sample::new(ch0, ch1, 1, 1, 1).unwrap();
        assert_eq!(sample(1000, 869).d1_d0_ratio_scaled(), 86);
        assert_eq!(sample(1000, 870).d1_d0_ratio_scaled(), 87);
        assert_eq!(sample(1000, 1000).d1_d0_ratio_scaled(), 100);

        // ch1 * gain0 * 100 needs 64 bits
        let s = Sample::new(1, 65535, 4096, 1, 1).unwrap();
        assert_eq!(s.d1_d0_ratio_scaled(), 65535 * 4096 * 100);
    }

    #[test]
    fn test_zero_samples_are_clamped() {
        assert_eq!(estimate_lux(0, 0, 1, 1, 1), Ok(36728));
        assert_eq!(estimate_lux(0, 0, 1, 1, 50_000), Ok(0));
    }

    #[rstest]
    // ch0 term dominates, would be negative
    #[case(1000, 1, 1, 1, 400_000)]
    #[case(1000, 500, 1, 1, 400_000)]
    #[case(65535, 100, 1, 1, 1)]
    // ch1 terms dominate the high ratio set
    #[case(1, 65535, 1, 1, 1)]
    #[case(2, 65535, 4096, 1, 1)]
    fn test_negative_lux_is_zero(
        #[case] ch0: u16,
        #[case] ch1: u16,
        #[case] gain0: u32,
        #[case] gain1: u32,
        #[case] time_us: u32,
    ) {
        assert_eq!(estimate_lux(ch0, ch1, gain0, gain1, time_us), Ok(0));
    }

    #[test]
    fn test_no_positive_term() {
        // C * ch0 / gain0 rounds to 0, the only positive term of set 2
        assert_eq!(estimate_lux(1, 1, u32::MAX, 1, 1), Ok(0));
    }

    #[test]
    fn test_term1_divides_before_gain() {
        let s = Sample::new(1, 65535, 1, 1, 1).unwrap();
        assert_eq!(s.term1(LUX_COEFFICIENTS[0].a), 134279257128768000);
        assert_eq!(lux_with_coefficients(1, 65535, 1, 1, 1, 0), Ok(13435510671031));

        let s = Sample::new(1, 65535, 7, 1, 1).unwrap();
        assert_eq!(s.term1(LUX_COEFFICIENTS[0].a), 939954799901376000);
        assert_eq!(lux_with_coefficients(1, 65535, 7, 1, 400_000, 0), Ok(235007662));
    }

    #[test]
    fn test_terms() {
        let s = Sample::new(1000, 700, 1, 1, 1).unwrap();
        let c = LUX_COEFFICIENTS[0];
        assert_eq!(s.term1(c.a), 15319987200);
        assert_eq!(Sample::term23(c.b, s.ch1, s.gain1), 810180582400);
        assert_eq!(Sample::term23(c.c, s.ch0, s.gain0), 681982976000);
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(estimate_lux(1, 1, 0, 1, 1), Err(GtsError::InvalidLuxInput));
        assert_eq!(estimate_lux(1, 1, 1, 0, 1), Err(GtsError::InvalidLuxInput));
        assert_eq!(estimate_lux(1, 1, 1, 1, 0), Err(GtsError::InvalidLuxInput));
        assert_eq!(
            lux_with_coefficients(1, 1, 1, 1, 1, 3),
            Err(GtsError::InvalidCoefficientSet)
        );
    }

    proptest! {
        #[test]
        fn estimate_lux_accepts_any_nonzero_setup(
            ch0 in any::<u16>(),
            ch1 in any::<u16>(),
            gain0 in 1u32..=u32::MAX,
            gain1 in 1u32..=u32::MAX,
            time_us in 1u32..=u32::MAX,
        ) {
            prop_assert!(estimate_lux(ch0, ch1, gain0, gain1, time_us).is_ok());
        }

        #[test]
        fn dark_ch0_heavy_light_is_zero(ch0 in 1000u16..=u16::MAX, gain in 1u32..=4096) {
            prop_assert_eq!(estimate_lux(ch0, 1, gain, gain, 50_000), Ok(0));
        }
    }
}
