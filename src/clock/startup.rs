//! DAC Clock PLL Startup
//!
//! Sequences PLL bring-up: resolve the dividers, program them, then enable
//! the PLL. Register access belongs to the device behind [`PllControl`].
//! A failed resolution aborts before the device is touched.

use core::fmt;

use super::overrides::{OverrideEntry, DEFAULT_OVERRIDES};
use super::pll::{self, PllError};
use crate::types::{ClockPair, DividerSet};

/// Device side of the PLL startup
pub trait PllControl {
    /// Register access error
    type Error;

    /// Program the divider registers
    ///
    /// # Errors
    ///
    /// Device-specific register write failures.
    fn write_dividers(&mut self, dividers: &DividerSet) -> Result<(), Self::Error>;

    /// Enable the PLL once dividers are in place
    ///
    /// # Errors
    ///
    /// Device-specific register write failures.
    fn enable_pll(&mut self) -> Result<(), Self::Error>;
}

/// Clock startup failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartupError<E> {
    /// Dividers could not be resolved; the device was not touched
    Pll(PllError),
    /// Register programming failed
    Device(E),
}

impl<E> From<PllError> for StartupError<E> {
    fn from(err: PllError) -> Self {
        Self::Pll(err)
    }
}

impl<E: fmt::Display> fmt::Display for StartupError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pll(err) => write!(f, "PLL resolution failed: {err}"),
            Self::Device(err) => write!(f, "PLL programming failed: {err}"),
        }
    }
}

#[cfg(feature = "embedded")]
impl<E: defmt::Format> defmt::Format for StartupError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Pll(err) => defmt::write!(f, "PLL resolution failed: {}", err),
            Self::Device(err) => defmt::write!(f, "PLL programming failed: {}", err),
        }
    }
}

/// Bring up the DAC clock PLL using the built-in override table
///
/// # Errors
///
/// [`StartupError::Pll`] if no divider set exists, in which case nothing is
/// written. [`StartupError::Device`] if programming or enabling fails.
pub fn clock_startup<D: PllControl>(
    device: &mut D,
    clocks: ClockPair,
) -> Result<DividerSet, StartupError<D::Error>> {
    clock_startup_with(device, DEFAULT_OVERRIDES, clocks)
}

/// Bring up the DAC clock PLL using a caller-supplied override table
///
/// # Errors
///
/// Same as [`clock_startup`].
pub fn clock_startup_with<D: PllControl>(
    device: &mut D,
    overrides: &[OverrideEntry],
    clocks: ClockPair,
) -> Result<DividerSet, StartupError<D::Error>> {
    let resolution = match pll::resolve_with(overrides, clocks) {
        Ok(resolution) => resolution,
        Err(err) => {
            #[cfg(feature = "embedded")]
            defmt::error!("PLL startup aborted for {}: {}", clocks, err);
            return Err(err.into());
        }
    };
    let dividers = resolution.dividers;

    #[cfg(feature = "embedded")]
    defmt::info!("PLL dividers {} for {}", dividers, clocks);

    device
        .write_dividers(&dividers)
        .map_err(StartupError::Device)?;
    device.enable_pll().map_err(StartupError::Device)?;

    Ok(dividers)
}
