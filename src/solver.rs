//! Scale to gain/time solving
//!
//! Drivers get a scale written from user-space and need to turn it back into
//! register values. The helpers here pick the hardware gain (and optionally
//! the integration time) that reproduce a scale exactly.

use crate::gain::split_total_gain;
use crate::linear::Scale;
use crate::{GtsError, Gts, Result};

impl Gts<'_> {
    /// Finds the hardware gain that gives `scale` with the integration time
    /// `time_sel` selects.
    ///
    /// Fails if no tabled gain reproduces the scale exactly at that time.
    pub fn gain_for_scale_using_time(&self, time_sel: u32, scale: Scale) -> Result<u32> {
        let scale_linear = scale.linear()?;
        let mul = self.int_time_gain_multiplier_by_sel(time_sel)?;

        let gain = split_total_gain(self.max_scale, scale_linear, mul)?;
        if !self.valid_gain(gain) {
            return Err(GtsError::GainNotFound);
        }

        Ok(gain)
    }

    /// Same as [`Gts::gain_for_scale_using_time`], but returns the gain
    /// selector.
    pub fn gain_sel_for_scale_using_time(&self, time_sel: u32, scale: Scale) -> Result<u32> {
        let gain = self.gain_for_scale_using_time(time_sel, scale)?;

        self.sel_by_gain(gain)
    }

    /// Finds a gain and integration time for `scale`.
    ///
    /// Times are tried in table order and the first one that can reach the
    /// scale wins, so a driver controls its preferred time by listing it
    /// first. Returns `(gain_sel, time_sel)`.
    pub fn time_and_gain_sel_for_scale(&self, scale: Scale) -> Result<(u32, u32)> {
        for itime in self.times {
            match self.gain_sel_for_scale_using_time(itime.sel, scale) {
                Ok(gain_sel) => {
                    log::debug!(
                        "gts: scale {} -> gain sel {:#x}, time {} us",
                        scale,
                        gain_sel,
                        itime.time_us
                    );
                    return Ok((gain_sel, itime.sel));
                }
                Err(e) => {
                    log::trace!("gts: scale {} not reachable at {} us: {}", scale, itime.time_us, e)
                }
            }
        }

        Err(GtsError::UnreachableScale)
    }

    /// Finds the gain that keeps the current scale when the integration time
    /// changes from `old_time_sel` to `new_time_sel`.
    pub fn new_gain_by_old_gain_time(
        &self,
        old_gain: u32,
        old_time_sel: u32,
        new_time_sel: u32,
    ) -> Result<u32> {
        let itime_old = self.find_itime_by_sel(old_time_sel)?;
        let itime_new = self.find_itime_by_sel(new_time_sel)?;

        let scale = self.scale_linear(old_gain, itime_old.time_us)?;

        let new_gain = split_total_gain(self.max_scale, scale, itime_new.mul)?;
        if !self.valid_gain(new_gain) {
            return Err(GtsError::GainNotFound);
        }

        Ok(new_gain)
    }
}
