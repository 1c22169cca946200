//! Shared types used across the clock and data-path modules
//!
//! The PLL is described by a small set of integer dividers. These types keep
//! the input clock pair and the resolved dividers together so that the
//! frequency relationships can be checked wherever a divider set travels.

use core::fmt;

/// Input clocks for a PLL startup
///
/// Both frequencies are whole Hz. A reference such as 333.333... MHz is
/// carried truncated (333 333 333 Hz), which is why the override table exists.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockPair {
    dac_clock_hz: u64,
    ref_clock_hz: u64,
}

impl ClockPair {
    /// Create a clock pair from the requested DAC clock and the reference clock
    #[must_use]
    pub const fn new(dac_clock_hz: u64, ref_clock_hz: u64) -> Self {
        Self {
            dac_clock_hz,
            ref_clock_hz,
        }
    }

    /// Requested DAC clock in Hz
    #[must_use]
    pub const fn dac_clock_hz(self) -> u64 {
        self.dac_clock_hz
    }

    /// Reference clock in Hz
    #[must_use]
    pub const fn ref_clock_hz(self) -> u64 {
        self.ref_clock_hz
    }
}

impl fmt::Debug for ClockPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClockPair(dac={} Hz, ref={} Hz)",
            self.dac_clock_hz, self.ref_clock_hz
        )
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ClockPair {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "dac={=u64} Hz ref={=u64} Hz", self.dac_clock_hz, self.ref_clock_hz);
    }
}

/// The four PLL dividers chosen by the search or by an override row
///
/// The output feedback divider is not stored here; it is derived from the
/// feedback multiplier when a [`DividerSet`] is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PllDividers {
    /// Reference clock divider (1-4)
    pub reference_divider: u8,
    /// VCO pre-divider (1-4)
    pub pll_predivider: u8,
    /// Feedback multiplier n (5, 7, 8 or 11)
    pub feedback_multiplier: u8,
    /// Feedback divider m (2-50)
    pub feedback_divider: u8,
}

impl PllDividers {
    /// Create a divider tuple
    #[must_use]
    pub const fn new(
        reference_divider: u8,
        pll_predivider: u8,
        feedback_multiplier: u8,
        feedback_divider: u8,
    ) -> Self {
        Self {
            reference_divider,
            pll_predivider,
            feedback_multiplier,
            feedback_divider,
        }
    }
}

/// Fully resolved PLL configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DividerSet {
    /// Reference clock divider (1-4)
    pub reference_divider: u8,
    /// VCO pre-divider (1-4)
    pub pll_predivider: u8,
    /// Feedback multiplier n (5, 7, 8 or 11)
    pub feedback_multiplier: u8,
    /// Feedback divider m (2-50)
    pub feedback_divider: u8,
    /// Output feedback divider fb, fixed by n
    pub output_feedback_divider: u8,
}

impl DividerSet {
    /// Combine searched dividers with their output feedback divider
    #[must_use]
    pub const fn from_parts(dividers: PllDividers, output_feedback_divider: u8) -> Self {
        Self {
            reference_divider: dividers.reference_divider,
            pll_predivider: dividers.pll_predivider,
            feedback_multiplier: dividers.feedback_multiplier,
            feedback_divider: dividers.feedback_divider,
            output_feedback_divider,
        }
    }

    /// The four searched dividers, without fb
    #[must_use]
    pub const fn dividers(&self) -> PllDividers {
        PllDividers::new(
            self.reference_divider,
            self.pll_predivider,
            self.feedback_multiplier,
            self.feedback_divider,
        )
    }

    /// Phase-detector frequency for the given reference (truncating division)
    ///
    /// Returns `None` for a zero reference divider.
    #[must_use]
    pub fn phase_detector_hz(&self, ref_clock_hz: u64) -> Option<u64> {
        ref_clock_hz.checked_div(u64::from(self.reference_divider))
    }

    /// VCO frequency reached from the given reference
    ///
    /// Returns `None` on overflow or a zero reference divider.
    #[must_use]
    pub fn vco_hz(&self, ref_clock_hz: u64) -> Option<u64> {
        self.phase_detector_hz(ref_clock_hz)?
            .checked_mul(u64::from(self.feedback_multiplier))?
            .checked_mul(u64::from(self.feedback_divider))
    }

    /// Check `ref / r * n * m == dac * p` exactly
    #[must_use]
    pub fn reconstructs(&self, clocks: ClockPair) -> bool {
        let target = clocks
            .dac_clock_hz()
            .checked_mul(u64::from(self.pll_predivider));
        match (self.vco_hz(clocks.ref_clock_hz()), target) {
            (Some(vco), Some(target)) => vco == target,
            _ => false,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DividerSet {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "R={} P={} N={} M={} FB={}",
            self.reference_divider,
            self.pll_predivider,
            self.feedback_multiplier,
            self.feedback_divider,
            self.output_feedback_divider
        );
    }
}
