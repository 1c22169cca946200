//! Converter Channel Plan
//!
//! Per-channel NCO settings for the Rx (CDDC/FDDC) and Tx (CDUC/FDUC) paths
//! plus the global Rx front-end settings. Each channel has a main (coarse)
//! NCO and a channel (fine) NCO; frequencies are signed Hz, phases are
//! millidegrees. Tx channels also carry a linear gain scale and an enable.

use core::fmt;

/// Upper bound (exclusive) for NCO phases in millidegrees
pub const NCO_PHASE_MDEG_MAX: u32 = 360_000;

/// Channel plan validation error
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChannelConfigError {
    /// NCO phase is not below 360 000 mdeg
    PhaseOutOfRange(u32),
    /// Tx gain scale is outside 0..=1 or not a number
    GainScaleOutOfRange(f32),
}

impl fmt::Display for ChannelConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhaseOutOfRange(mdeg) => write!(f, "NCO phase {mdeg} mdeg out of range"),
            Self::GainScaleOutOfRange(scale) => write!(f, "gain scale {scale} out of range"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ChannelConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::PhaseOutOfRange(mdeg) => defmt::write!(f, "NCO phase {} mdeg out of range", mdeg),
            Self::GainScaleOutOfRange(scale) => defmt::write!(f, "gain scale {} out of range", scale),
        }
    }
}

/// One numerically controlled oscillator setting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NcoConfig {
    /// Frequency in Hz
    pub freq_hz: i64,
    /// Phase in millidegrees
    pub phase_mdeg: u32,
}

impl NcoConfig {
    /// Create an NCO setting
    #[must_use]
    pub const fn new(freq_hz: i64, phase_mdeg: u32) -> Self {
        Self {
            freq_hz,
            phase_mdeg,
        }
    }

    /// Check the phase range
    ///
    /// # Errors
    ///
    /// [`ChannelConfigError::PhaseOutOfRange`] for 360° and above.
    pub const fn validate(&self) -> Result<(), ChannelConfigError> {
        if self.phase_mdeg >= NCO_PHASE_MDEG_MAX {
            return Err(ChannelConfigError::PhaseOutOfRange(self.phase_mdeg));
        }
        Ok(())
    }
}

/// Rx channel: coarse and fine digital down-converter NCOs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RxChannelConfig {
    /// Main (CDDC) NCO
    pub main_nco: NcoConfig,
    /// Channel (FDDC) NCO
    pub channel_nco: NcoConfig,
}

impl RxChannelConfig {
    /// Create an Rx channel setting
    #[must_use]
    pub const fn new(main_nco: NcoConfig, channel_nco: NcoConfig) -> Self {
        Self {
            main_nco,
            channel_nco,
        }
    }

    /// Check both NCO phases
    ///
    /// # Errors
    ///
    /// The first out-of-range phase.
    pub fn validate(&self) -> Result<(), ChannelConfigError> {
        self.main_nco.validate()?;
        self.channel_nco.validate()
    }
}

/// Tx channel: coarse and fine digital up-converter NCOs, gain and enable
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TxChannelConfig {
    /// Channel output enabled
    pub enabled: bool,
    /// Channel NCO gain scale (0-1)
    pub gain_scale: f32,
    /// Main (CDUC) NCO
    pub main_nco: NcoConfig,
    /// Channel (FDUC) NCO
    pub channel_nco: NcoConfig,
}

impl TxChannelConfig {
    /// Create an enabled Tx channel setting
    #[must_use]
    pub const fn new(gain_scale: f32, main_nco: NcoConfig, channel_nco: NcoConfig) -> Self {
        Self {
            enabled: true,
            gain_scale,
            main_nco,
            channel_nco,
        }
    }

    /// Check gain scale and NCO phases
    ///
    /// # Errors
    ///
    /// [`ChannelConfigError::GainScaleOutOfRange`] or the first out-of-range
    /// phase.
    pub fn validate(&self) -> Result<(), ChannelConfigError> {
        if !(0.0..=1.0).contains(&self.gain_scale) {
            return Err(ChannelConfigError::GainScaleOutOfRange(self.gain_scale));
        }
        self.main_nco.validate()?;
        self.channel_nco.validate()
    }
}

/// Rx ADC test pattern
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RxTestMode {
    /// Normal sampling
    #[default]
    Off,
    /// Midscale short
    MidscaleShort,
    /// Positive full scale
    PosFullscale,
    /// Negative full scale
    NegFullscale,
    /// Checkerboard
    Checkerboard,
    /// Ramp
    Ramp,
}

impl RxTestMode {
    /// Attribute string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::MidscaleShort => "midscale_short",
            Self::PosFullscale => "pos_fullscale",
            Self::NegFullscale => "neg_fullscale",
            Self::Checkerboard => "checkerboard",
            Self::Ramp => "ramp",
        }
    }
}

/// Rx Nyquist zone
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NyquistZone {
    /// First, third, ... zone
    #[default]
    Odd,
    /// Second, fourth, ... zone
    Even,
}

impl NyquistZone {
    /// Attribute string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Odd => "odd",
            Self::Even => "even",
        }
    }
}

/// Settings that apply to every Rx channel at once
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RxGlobalConfig {
    /// ADC test pattern
    pub test_mode: RxTestMode,
    /// Nyquist zone
    pub nyquist_zone: NyquistZone,
    /// Loopback mode (0 = off)
    pub loopback_mode: u8,
}

/// Validate a full channel plan
///
/// # Errors
///
/// The first invalid channel, Rx before Tx.
pub fn validate_plan(
    rx: &[RxChannelConfig],
    tx: &[TxChannelConfig],
) -> Result<(), ChannelConfigError> {
    rx.iter().try_for_each(RxChannelConfig::validate)?;
    tx.iter().try_for_each(TxChannelConfig::validate)
}

#[cfg(feature = "embedded")]
impl defmt::Format for NcoConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=i64} Hz @ {=u32} mdeg", self.freq_hz, self.phase_mdeg);
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RxChannelConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "main {} / channel {}", self.main_nco, self.channel_nco);
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TxChannelConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "en={} gain={} main {} / channel {}",
            self.enabled,
            self.gain_scale,
            self.main_nco,
            self.channel_nco
        );
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RxGlobalConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "test_mode={=str} nyquist={=str} loopback={}",
            self.test_mode.as_str(),
            self.nyquist_zone.as_str(),
            self.loopback_mode
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_bound_is_exclusive() {
        assert!(NcoConfig::new(0, 359_999).validate().is_ok());
        assert_eq!(
            NcoConfig::new(0, 360_000).validate(),
            Err(ChannelConfigError::PhaseOutOfRange(360_000))
        );
    }

    #[test]
    fn gain_scale_bounds() {
        let nco = NcoConfig::new(0, 0);
        assert!(TxChannelConfig::new(0.0, nco, nco).validate().is_ok());
        assert!(TxChannelConfig::new(1.0, nco, nco).validate().is_ok());
        assert!(TxChannelConfig::new(1.01, nco, nco).validate().is_err());
        assert!(TxChannelConfig::new(-0.1, nco, nco).validate().is_err());
        assert!(TxChannelConfig::new(f32::NAN, nco, nco).validate().is_err());
    }

    #[test]
    fn plan_reports_first_bad_channel() {
        let nco = NcoConfig::new(0, 0);
        let rx = [RxChannelConfig::new(nco, nco)];
        let tx = [
            TxChannelConfig::new(0.5, nco, nco),
            TxChannelConfig::new(2.0, nco, nco),
        ];
        assert_eq!(
            validate_plan(&rx, &tx),
            Err(ChannelConfigError::GainScaleOutOfRange(2.0))
        );
        assert!(validate_plan(&rx, &tx[..1]).is_ok());
    }

    #[test]
    fn rx_checks_both_ncos() {
        let ok = NcoConfig::new(100_000_000, 1000);
        let bad = NcoConfig::new(10_000_000, 400_000);
        assert!(RxChannelConfig::new(ok, ok).validate().is_ok());
        assert!(RxChannelConfig::new(ok, bad).validate().is_err());
        assert!(RxChannelConfig::new(bad, ok).validate().is_err());
    }
}
