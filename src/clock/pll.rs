//! DAC Clock PLL Divider Resolution
//!
//! Finds integer divider values for the converter's on-chip clock PLL.
//! This module is pure and testable on the host.
//!
//! # Theory of Operation
//!
//! The PLL derives the DAC clock from a reference clock:
//! 1. Reference stage: FPFD = FREF / R where 1 ≤ R ≤ 4 and FPFD ≤ 750 MHz
//! 2. Feedback stage: FVCO = FPFD × N × M where N ∈ {5, 7, 8, 11}, 2 ≤ M ≤ 50
//! 3. Output stage: FDAC = FVCO / P where 1 ≤ P ≤ 4
//!
//! The search is first-fit: R ascending, then P ascending, then N in the
//! order 5, 7, 8, 11. A candidate is accepted only when the feedback chain
//! lands exactly on the VCO frequency in integer arithmetic.
//!
//! References that are repeating decimals (333.333... MHz) cannot satisfy
//! the exact check once truncated to whole Hz, so known-good pairs are
//! served from the override table before any search runs.

use core::fmt;

use super::overrides::{lookup, OverrideEntry, DEFAULT_OVERRIDES};
use crate::types::{ClockPair, DividerSet, PllDividers};

/// Maximum phase-detector frequency (750 MHz)
pub const PHASE_DETECTOR_MAX_HZ: u64 = 750_000_000;

/// Minimum VCO frequency (5.8 GHz)
pub const VCO_MIN_HZ: u64 = 5_800_000_000;
/// Maximum VCO frequency (12 GHz)
pub const VCO_MAX_HZ: u64 = 12_000_000_000;

/// Minimum reference divider
pub const REFERENCE_DIVIDER_MIN: u8 = 1;
/// Maximum reference divider
pub const REFERENCE_DIVIDER_MAX: u8 = 4;

/// Minimum VCO pre-divider
pub const PLL_PREDIVIDER_MIN: u8 = 1;
/// Maximum VCO pre-divider
pub const PLL_PREDIVIDER_MAX: u8 = 4;

/// Feedback multipliers in search priority order (not sorted)
pub const FEEDBACK_MULTIPLIERS: [u8; 4] = [5, 7, 8, 11];

/// Minimum feedback divider
pub const FEEDBACK_DIVIDER_MIN: u64 = 2;
/// Maximum feedback divider
pub const FEEDBACK_DIVIDER_MAX: u64 = 50;

/// PLL resolution error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PllError {
    /// No divider combination reproduces the DAC clock exactly
    NoSolutionFound,
    /// Feedback multiplier has no output feedback divider mapping
    InvalidFeedbackMultiplier(u8),
}

impl fmt::Display for PllError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSolutionFound => write!(f, "no valid PLL configuration"),
            Self::InvalidFeedbackMultiplier(n) => {
                write!(f, "invalid PLL feedback multiplier {n}")
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PllError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::NoSolutionFound => defmt::write!(f, "no valid PLL configuration"),
            Self::InvalidFeedbackMultiplier(n) => {
                defmt::write!(f, "invalid PLL feedback multiplier {}", n);
            }
        }
    }
}

/// Where a resolved divider set came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DividerSource {
    /// Exact match in the override table
    Override,
    /// Numeric search
    Search,
}

/// Divider set together with its origin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved dividers
    pub dividers: DividerSet,
    /// Override row or search
    pub source: DividerSource,
}

/// Resolve PLL dividers against the built-in override table
///
/// # Errors
///
/// [`PllError::NoSolutionFound`] when the search is exhausted,
/// [`PllError::InvalidFeedbackMultiplier`] when an override row carries an
/// unsupported multiplier.
pub fn resolve(dac_clock_hz: u64, ref_clock_hz: u64) -> Result<DividerSet, PllError> {
    resolve_with(DEFAULT_OVERRIDES, ClockPair::new(dac_clock_hz, ref_clock_hz))
        .map(|resolution| resolution.dividers)
}

/// Resolve PLL dividers against a caller-supplied override table
///
/// # Errors
///
/// Same as [`resolve`].
pub fn resolve_with(
    overrides: &[OverrideEntry],
    clocks: ClockPair,
) -> Result<Resolution, PllError> {
    let (dividers, source) = if let Some(entry) = lookup(overrides, clocks) {
        #[cfg(feature = "embedded")]
        defmt::debug!("PLL override hit for {}", clocks);
        (entry.dividers, DividerSource::Override)
    } else {
        let Some(found) = search(clocks) else {
            #[cfg(feature = "embedded")]
            defmt::warn!("PLL search exhausted for {}", clocks);
            return Err(PllError::NoSolutionFound);
        };
        (found, DividerSource::Search)
    };

    let fb = output_feedback_divider(dividers.feedback_multiplier)?;
    Ok(Resolution {
        dividers: DividerSet::from_parts(dividers, fb),
        source,
    })
}

/// Output feedback divider for a feedback multiplier
///
/// # Errors
///
/// [`PllError::InvalidFeedbackMultiplier`] for anything outside {5, 7, 8, 11}.
pub const fn output_feedback_divider(feedback_multiplier: u8) -> Result<u8, PllError> {
    match feedback_multiplier {
        5 => Ok(1),
        7 | 8 => Ok(2),
        11 => Ok(3),
        n => Err(PllError::InvalidFeedbackMultiplier(n)),
    }
}

/// First-fit numeric divider search, ignoring the override table
#[must_use]
pub fn search(clocks: ClockPair) -> Option<PllDividers> {
    for reference_divider in REFERENCE_DIVIDER_MIN..=REFERENCE_DIVIDER_MAX {
        let phase_detector_hz = clocks.ref_clock_hz() / u64::from(reference_divider);
        if phase_detector_hz == 0 || phase_detector_hz > PHASE_DETECTOR_MAX_HZ {
            continue;
        }

        for pll_predivider in PLL_PREDIVIDER_MIN..=PLL_PREDIVIDER_MAX {
            let Some(vco_hz) = clocks.dac_clock_hz().checked_mul(u64::from(pll_predivider)) else {
                continue;
            };
            if !(VCO_MIN_HZ..=VCO_MAX_HZ).contains(&vco_hz) {
                continue;
            }

            if let Some((feedback_multiplier, feedback_divider)) =
                match_feedback(phase_detector_hz, vco_hz)
            {
                #[cfg(feature = "embedded")]
                defmt::debug!(
                    "PLL search: R={} P={} N={} M={}",
                    reference_divider,
                    pll_predivider,
                    feedback_multiplier,
                    feedback_divider
                );
                return Some(PllDividers::new(
                    reference_divider,
                    pll_predivider,
                    feedback_multiplier,
                    feedback_divider,
                ));
            }
        }
    }

    None
}

/// First feedback (N, M) pair that lands exactly on the VCO frequency
fn match_feedback(phase_detector_hz: u64, vco_hz: u64) -> Option<(u8, u8)> {
    let total_feedback = vco_hz / phase_detector_hz;

    FEEDBACK_MULTIPLIERS.iter().find_map(|&n| {
        let m = total_feedback / u64::from(n);
        if !(FEEDBACK_DIVIDER_MIN..=FEEDBACK_DIVIDER_MAX).contains(&m) {
            return None;
        }
        // Both divisions above truncate; only an exact product is a lock
        if phase_detector_hz * u64::from(n) * m != vco_hz {
            return None;
        }
        u8::try_from(m).ok().map(|m| (n, m))
    })
}
