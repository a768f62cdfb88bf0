//! Gain and integration time tables of the ROHM BU27034 ambient light sensor
//!
//! The sensor has hardware gains from 1x to 4096x and integration times of
//! 55, 100, 200 and 400 ms. Integration time scales the values linearly, so
//! the largest total gain is 4096 * 8 = 32768.
//!
//! With nano precision the scale at 1x has to be 64 so that the scale at
//! 32768x (0.001953125) is still exact.

use crate::linear::Scale;
use crate::table::{GainSel, Gts, ITimeSel};
use crate::{GtsError, Result};

/// Scale at total gain 1x.
pub const MAX_SCALE: Scale = Scale::new(64, 0);

pub const GSEL_1X: u32 = 0x00;
pub const GSEL_4X: u32 = 0x08;
pub const GSEL_16X: u32 = 0x0a;
pub const GSEL_32X: u32 = 0x0b;
pub const GSEL_64X: u32 = 0x0c;
pub const GSEL_256X: u32 = 0x18;
pub const GSEL_512X: u32 = 0x19;
pub const GSEL_1024X: u32 = 0x1a;
pub const GSEL_2048X: u32 = 0x1b;
pub const GSEL_4096X: u32 = 0x1c;

pub const MEAS_MODE_100MS: u32 = 0;
pub const MEAS_MODE_55MS: u32 = 1;
pub const MEAS_MODE_200MS: u32 = 2;
pub const MEAS_MODE_400MS: u32 = 4;

/// Supported hardware gains.
pub const GAINS: [GainSel; 10] = [
    GainSel::new(1, GSEL_1X),
    GainSel::new(4, GSEL_4X),
    GainSel::new(16, GSEL_16X),
    GainSel::new(32, GSEL_32X),
    GainSel::new(64, GSEL_64X),
    GainSel::new(256, GSEL_256X),
    GainSel::new(512, GSEL_512X),
    GainSel::new(1024, GSEL_1024X),
    GainSel::new(2048, GSEL_2048X),
    GainSel::new(4096, GSEL_4096X),
];

/// Supported integration times, longest (preferred) first.
///
/// The 55 ms mode is handled as 50 ms, the same way the vendor does in its
/// computations.
pub const ITIMES: [ITimeSel; 4] = [
    ITimeSel::from_ms(400, MEAS_MODE_400MS, 8),
    ITimeSel::from_ms(200, MEAS_MODE_200MS, 4),
    ITimeSel::from_ms(100, MEAS_MODE_100MS, 2),
    ITimeSel::from_ms(50, MEAS_MODE_55MS, 1),
];

/// Gain-time-scale context for the BU27034.
pub fn gts() -> Result<Gts<'static>> {
    Gts::new(MAX_SCALE.whole, MAX_SCALE.nano, &GAINS, &ITIMES)
}

/// Maps a requested integration time onto the table.
///
/// 55 ms is accepted and returned as the 50 ms table entry.
pub fn validate_int_time(gts: &Gts<'_>, time_us: u32) -> Result<u32> {
    if time_us == 55_000 {
        return Ok(50_000);
    }

    if gts.valid_time(time_us) {
        return Ok(time_us);
    }

    Err(GtsError::TimeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lux::estimate_lux;

    #[test]
    fn test_validate_int_time() {
        let gts = gts().unwrap();
        assert_eq!(validate_int_time(&gts, 55_000), Ok(50_000));
        assert_eq!(validate_int_time(&gts, 50_000), Ok(50_000));
        assert_eq!(validate_int_time(&gts, 400_000), Ok(400_000));
        assert_eq!(validate_int_time(&gts, 300_000), Err(GtsError::TimeNotFound));
    }

    #[test]
    fn test_max_total_gain() {
        let gts = gts().unwrap();
        assert_eq!(gts.total_gain_by_sel(GSEL_4096X, MEAS_MODE_400MS), Ok(32768));
        assert_eq!(gts.scale(4096, 400_000), Ok(Scale::new(0, 1_953_125)));
    }

    #[test]
    fn test_scale_write_then_lux() {
        // a driver writing scale 0.25 and then reading lux with the result
        let gts = gts().unwrap();
        let (gain_sel, time_sel) = gts
            .time_and_gain_sel_for_scale(Scale::new(0, 250_000_000))
            .unwrap();
        let gain = gts.gain_by_sel(gain_sel).unwrap();
        let time_us = gts.time_by_sel(time_sel).unwrap();
        assert_eq!((gain, time_us), (32, 400_000));

        assert_eq!(estimate_lux(32000, 32000, gain, gain, time_us), Ok(91));
    }
}
