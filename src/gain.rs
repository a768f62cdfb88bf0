//! Gain resolution
//!
//! Total gain is the hardware gain multiplied by the gain the integration
//! time causes. The scale of a channel is the maximum scale divided by it.

use crate::linear::{delinearize, Scale, NANO};
use crate::{GtsError, Gts, Result};

/// Total gain needed to bring `max` down to `scale`.
///
/// Returns the smallest `gain >= 1` for which `gain * scale >= max`.
pub fn gain_for_scale(max: u64, scale: u64) -> Result<u64> {
    if scale == 0 || scale > max {
        return Err(GtsError::InvalidScale);
    }

    if u64::MAX - max < scale {
        // max + scale would overflow, work on the part above one step
        let rest = max - scale;
        if rest == 0 {
            return Ok(1);
        }

        return Ok(1 + rest.div_ceil(scale));
    }

    Ok((max + scale - 1) / scale)
}

/// Splits `total` (the gain needed for `scale`) into `known * unknown` and
/// returns `unknown`.
///
/// The split has to be exact and the total gain has to reproduce `scale`
/// exactly, otherwise the scale can't be reached with `known`.
pub(crate) fn split_total_gain(max: u64, scale: u64, known: u32) -> Result<u32> {
    if known == 0 {
        return Err(GtsError::UnreachableScale);
    }

    let total = gain_for_scale(max, scale)?;
    if max / total != scale {
        return Err(GtsError::UnreachableScale);
    }

    let known = u64::from(known);
    let unknown = total / known;
    if unknown == 0 || unknown * known != total {
        return Err(GtsError::UnreachableScale);
    }

    u32::try_from(unknown).map_err(|_| GtsError::UnreachableScale)
}

impl Gts<'_> {
    /// Total gain of a tabled hardware gain combined with an integration time.
    ///
    /// Devices without an integration time table get the hardware gain back
    /// and `time_us` is ignored.
    pub fn total_gain(&self, gain: u32, time_us: u32) -> Result<u64> {
        if !self.valid_gain(gain) {
            return Err(GtsError::GainNotFound);
        }

        if !self.has_int_times() {
            return Ok(u64::from(gain));
        }

        let itime = self.find_itime_by_time(time_us)?;

        Ok(u64::from(gain) * u64::from(itime.mul))
    }

    /// Total gain of the gain and integration time the selectors pick.
    pub fn total_gain_by_sel(&self, gain_sel: u32, time_sel: u32) -> Result<u64> {
        let gain = self.gain_by_sel(gain_sel)?;
        let mul = self.int_time_gain_multiplier_by_sel(time_sel)?;

        Ok(u64::from(gain) * u64::from(mul))
    }

    pub(crate) fn scale_linear(&self, gain: u32, time_us: u32) -> Result<u64> {
        let total_gain = self.total_gain(gain, time_us)?;

        Ok(self.max_scale / total_gain)
    }

    /// Scale of a channel using `gain` and an integration time of `time_us`.
    pub fn scale(&self, gain: u32, time_us: u32) -> Result<Scale> {
        delinearize(self.scale_linear(gain, time_us)?, NANO)
    }
}
