//! Gain and integration time tables
//!
//! Light sensors usually select both the hardware gain and the integration
//! time through a register value (a selector). The tables below describe
//! which physical gains and times a device supports and which selectors
//! pick them.

use crate::linear::{linearize, NANO};
use crate::{GtsError, Result};

/// A supported hardware gain and the selector (register value) for it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GainSel {
    /// Gain (multiplication) value.
    pub gain: u32,
    /// Selector used to pick this gain.
    pub sel: u32,
}

impl GainSel {
    pub const fn new(gain: u32, sel: u32) -> Self {
        Self { gain, sel }
    }
}

/// A supported integration time.
///
/// Collecting light for longer scales the raw values the same way a gain
/// does. A sensor with 50, 100, 200 and 400 ms times would typically use
/// multipliers 1, 2, 4 and 8.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ITimeSel {
    /// Integration time in microseconds.
    pub time_us: u32,
    /// Selector used to pick this time.
    pub sel: u32,
    /// Gain caused by this integration time.
    pub mul: u32,
}

impl ITimeSel {
    pub const fn new(time_us: u32, sel: u32, mul: u32) -> Self {
        Self { time_us, sel, mul }
    }

    pub const fn from_ms(time_ms: u32, sel: u32, mul: u32) -> Self {
        Self::new(time_ms * 1000, sel, mul)
    }
}

/// Gain-time-scale context of one sensor.
///
/// Built once from static tables and read-only afterwards, so a single
/// instance can be shared by any number of callers.
///
/// The integration time table should list the preferred time first. Searches
/// such as [`Gts::time_and_gain_sel_for_scale`] walk the times in table order
/// and stop at the first match.
#[derive(Copy, Clone, Debug)]
pub struct Gts<'a> {
    /// Linear scale at total gain 1x, in [`NANO`] steps.
    pub(crate) max_scale: u64,
    pub(crate) gains: &'a [GainSel],
    pub(crate) times: &'a [ITimeSel],
}

impl<'a> Gts<'a> {
    /// Creates a context for the given tables.
    ///
    /// `max_scale_whole` and `max_scale_nano` describe the scale at total
    /// gain 1x. It has to be representable at nano precision for every total
    /// gain the tables can produce, otherwise precision is lost.
    pub fn new(
        max_scale_whole: u32,
        max_scale_nano: u32,
        gains: &'a [GainSel],
        times: &'a [ITimeSel],
    ) -> Result<Self> {
        let max_scale = linearize(max_scale_whole, max_scale_nano, NANO)?;

        log::debug!(
            "gts: max scale {}.{:09}, {} gains, {} times",
            max_scale_whole,
            max_scale_nano,
            gains.len(),
            times.len()
        );

        Ok(Self {
            max_scale,
            gains,
            times,
        })
    }

    /// Linear scale at total gain 1x.
    pub fn max_scale(&self) -> u64 {
        self.max_scale
    }

    pub fn gains(&self) -> &'a [GainSel] {
        self.gains
    }

    pub fn times(&self) -> &'a [ITimeSel] {
        self.times
    }

    /// Whether the device has selectable integration times at all.
    pub fn has_int_times(&self) -> bool {
        !self.times.is_empty()
    }

    pub fn valid_gain(&self, gain: u32) -> bool {
        self.sel_by_gain(gain).is_ok()
    }

    pub fn valid_time(&self, time_us: u32) -> bool {
        self.find_itime_by_time(time_us).is_ok()
    }

    pub fn sel_by_gain(&self, gain: u32) -> Result<u32> {
        self.gains
            .iter()
            .find(|g| g.gain == gain)
            .map(|g| g.sel)
            .ok_or(GtsError::GainNotFound)
    }

    pub fn gain_by_sel(&self, sel: u32) -> Result<u32> {
        self.gains
            .iter()
            .find(|g| g.sel == sel)
            .map(|g| g.gain)
            .ok_or(GtsError::GainNotFound)
    }

    pub fn time_by_sel(&self, sel: u32) -> Result<u32> {
        Ok(self.find_itime_by_sel(sel)?.time_us)
    }

    pub fn sel_by_time(&self, time_us: u32) -> Result<u32> {
        Ok(self.find_itime_by_time(time_us)?.sel)
    }

    /// Gain multiplier caused by the integration time `sel` selects.
    pub fn int_time_gain_multiplier_by_sel(&self, sel: u32) -> Result<u32> {
        Ok(self.find_itime_by_sel(sel)?.mul)
    }

    pub(crate) fn find_itime_by_time(&self, time_us: u32) -> Result<&'a ITimeSel> {
        self.find_itime(|t| t.time_us == time_us)
    }

    pub(crate) fn find_itime_by_sel(&self, sel: u32) -> Result<&'a ITimeSel> {
        self.find_itime(|t| t.sel == sel)
    }

    fn find_itime<F>(&self, pred: F) -> Result<&'a ITimeSel>
    where
        F: Fn(&ITimeSel) -> bool,
    {
        if self.times.is_empty() {
            return Err(GtsError::NoIntegrationTime);
        }

        self.times
            .iter()
            .find(|t| pred(t))
            .ok_or(GtsError::TimeNotFound)
    }
}
