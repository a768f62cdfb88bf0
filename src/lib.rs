//! This crate provides platform agnostic no_std gain-time-scale helpers for ambient light sensors.
//!
//! Many light sensors let the driver set both a hardware gain and an integration time through
//! register values. Both amplify the raw values, so the scale (physical units per raw count) of a
//! channel depends on their product. The helpers in this crate convert between scales and the
//! gain/time register values using exact integer arithmetic.
//!
//! ## Supported features
//! * Gain and integration time lookups by value or by selector (register value)
//! * Computing the scale for a gain and integration time
//! * Finding the gain (and integration time) for a requested scale
//! * Keeping the scale when the integration time changes
//! * Overflow-safe fixed-point lux estimation from two light channels
//! * Ready-made tables for the ROHM BU27034
//!
//! ## Unsupported features
//! * Register access (I2C, SPI, ...)
//! * Interrupts, triggers and buffering
//!
//! ## Usage
//!
//! ### Creating a context
//!
//! ```rust
//! use gain_time_scale::{GainSel, Gts, ITimeSel};
//!
//! static GAINS: [GainSel; 3] = [
//!     GainSel::new(1, 0x0),
//!     GainSel::new(2, 0x1),
//!     GainSel::new(64, 0x2),
//! ];
//!
//! // The preferred integration time goes first
//! static TIMES: [ITimeSel; 2] = [
//!     ITimeSel::from_ms(200, 0x1, 2),
//!     ITimeSel::from_ms(100, 0x0, 1),
//! ];
//!
//! let gts = Gts::new(16, 0, &GAINS, &TIMES).unwrap();
//! assert_eq!(gts.total_gain(64, 200_000), Ok(128));
//! ```
//!
//! ### Reading and writing the scale
//!
//! ```rust
//! use gain_time_scale::{bu27034, Scale};
//!
//! let gts = bu27034::gts().unwrap();
//!
//! // Scale of a channel with gain 64x and 200 ms integration time
//! let scale = gts.scale(64, 200_000).unwrap();
//! assert_eq!(scale, Scale::new(0, 250_000_000));
//!
//! // Register values for a scale written by the user
//! let (gain_sel, time_sel) = gts.time_and_gain_sel_for_scale(scale).unwrap();
//! assert_eq!(gain_sel, bu27034::GSEL_32X);
//! assert_eq!(time_sel, bu27034::MEAS_MODE_400MS);
//!
//! // Gain keeping the scale when switching from 400 ms to 200 ms
//! let gain = gts
//!     .new_gain_by_old_gain_time(32, bu27034::MEAS_MODE_400MS, bu27034::MEAS_MODE_200MS)
//!     .unwrap();
//! assert_eq!(gain, 64);
//! ```
//!
//! ### Estimating the illuminance
//!
//! ```rust
//! use gain_time_scale::estimate_lux;
//!
//! // Raw values of both channels, their hardware gains and the integration time in us
//! let lux = estimate_lux(1000, 1000, 1, 1, 400_000).unwrap();
//! assert_eq!(lux, 91);
//! ```
//!
//! All helpers are pure functions of an immutable [`Gts`], so a context can be shared between
//! threads freely. Serializing register updates against measurements is up to the driver.

#![cfg_attr(not(test), no_std)]

pub mod bu27034;
mod fixp;
mod gain;
mod linear;
mod lux;
mod solver;
mod table;

pub use gain::gain_for_scale;
pub use linear::{delinearize, linearize, Scale, NANO};
pub use lux::{estimate_lux, lux_with_coefficients, LuxCoefficients, LUX_COEFFICIENTS};
pub use table::{GainSel, Gts, ITimeSel};

/// Shorthand for all functions returning an error in this crate.
pub type Result<T> = core::result::Result<T, GtsError>;

/// Represents any error that may happen during a conversion.
///
/// All of these are invalid argument errors. None of them is transient, retrying with the same
/// arguments fails the same way.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, thiserror::Error)]
pub enum GtsError {
    /// The linearization precision is zero or finer than nano.
    #[error("precision must be in 1..=1000000000")]
    InvalidPrecision,
    /// The scale is zero, above the maximum scale, or too large to represent.
    #[error("scale out of range")]
    InvalidScale,
    /// The gain or gain selector is not in the gain table.
    #[error("gain not in table")]
    GainNotFound,
    /// The integration time or its selector is not in the time table.
    #[error("integration time not in table")]
    TimeNotFound,
    /// The device has no integration time table.
    #[error("no integration time support")]
    NoIntegrationTime,
    /// No integer gain/time combination reproduces the scale exactly.
    #[error("scale not reachable")]
    UnreachableScale,
    /// A lux estimation got a zero gain or a zero integration time.
    #[error("zero gain or integration time")]
    InvalidLuxInput,
    /// There is no lux coefficient set with the given index.
    #[error("unsupported lux coefficient set")]
    InvalidCoefficientSet,
}
