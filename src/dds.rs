//! DDS Tone Settings
//!
//! Each Tx channel pair has a DDS engine with two independent tones, each
//! with separate I and Q outputs. The firmware drives a single tone per
//! channel and derives the I/Q phase split automatically:
//! - Q carries the requested phase
//! - I sits 90° behind it
//! - Tone 2 is always muted (scale 0)
//!
//! Scales are linear in the engine's 0..=1 range; phases are in
//! millidegrees.

#[cfg(feature = "embedded")]
use micromath::F32Ext;

/// Requested single-tone configuration for one channel pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneConfig {
    /// Tone generator enabled
    pub enabled: bool,
    /// Tone frequency in Hz
    pub freq_hz: u64,
    /// Tone phase in degrees (Q component)
    pub phase_deg: f32,
    /// Tone level in dBFS (-inf to 0)
    pub scale_dbfs: f32,
}

impl ToneConfig {
    /// Enabled tone
    #[must_use]
    pub const fn new(freq_hz: u64, phase_deg: f32, scale_dbfs: f32) -> Self {
        Self {
            enabled: true,
            freq_hz,
            phase_deg,
            scale_dbfs,
        }
    }

    /// Disabled tone; both tones are muted
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            freq_hz: 0,
            phase_deg: 0.0,
            scale_dbfs: f32::NEG_INFINITY,
        }
    }

    /// Attribute values for the channel pair's DDS outputs
    #[must_use]
    pub fn settings(&self) -> DdsChannelSettings {
        if !self.enabled {
            return DdsChannelSettings {
                tone1_i: ToneSettings::MUTED,
                tone1_q: ToneSettings::MUTED,
                tone2_i: ToneSettings::MUTED,
                tone2_q: ToneSettings::MUTED,
                raw: false,
            };
        }

        let scale = dbfs_to_linear(self.scale_dbfs);
        DdsChannelSettings {
            tone1_i: ToneSettings {
                freq_hz: self.freq_hz,
                scale,
                phase_mdeg: to_mdeg(self.phase_deg - 90.0),
            },
            tone1_q: ToneSettings {
                freq_hz: self.freq_hz,
                scale,
                phase_mdeg: to_mdeg(self.phase_deg),
            },
            tone2_i: ToneSettings::MUTED,
            tone2_q: ToneSettings::MUTED,
            raw: true,
        }
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Attribute values for one DDS output
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneSettings {
    /// Frequency in Hz
    pub freq_hz: u64,
    /// Linear scale (0-1)
    pub scale: f32,
    /// Phase in millidegrees (0-359999)
    pub phase_mdeg: u32,
}

impl ToneSettings {
    /// Muted output
    pub const MUTED: Self = Self {
        freq_hz: 0,
        scale: 0.0,
        phase_mdeg: 0,
    };

    /// True if the output is silent
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.scale == 0.0
    }
}

/// All DDS attribute values for one channel pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DdsChannelSettings {
    /// Tone 1, I output
    pub tone1_i: ToneSettings,
    /// Tone 1, Q output
    pub tone1_q: ToneSettings,
    /// Tone 2, I output
    pub tone2_i: ToneSettings,
    /// Tone 2, Q output
    pub tone2_q: ToneSettings,
    /// DDS `raw` enable
    pub raw: bool,
}

/// Convert dBFS to the engine's linear scale, clamped to 0..=1
///
/// Non-finite input (NaN, ±inf) maps to 0.
#[must_use]
pub fn dbfs_to_linear(db: f32) -> f32 {
    if !db.is_finite() {
        return 0.0;
    }
    10.0f32.powf(db / 20.0).clamp(0.0, 1.0)
}

/// Wrap an angle into [0, 360)
///
/// Non-finite input maps to 0.
#[must_use]
pub fn normalize_degrees(deg: f32) -> f32 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = deg.rem_euclid(360.0);
    // -ε wraps to exactly 360 in f32
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_mdeg(deg: f32) -> u32 {
    (normalize_degrees(deg) * 1000.0) as u32
}
