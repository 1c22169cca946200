//! System configuration and hardware constants
//!
//! Compile-time board settings for the RF data converter: clock plan,
//! channel counts, Tx core register map, the default Rx/Tx channel plan and
//! the default DDS tone plan.

use crate::channels::{
    NcoConfig, NyquistZone, RxChannelConfig, RxGlobalConfig, RxTestMode, TxChannelConfig,
};
use crate::dds::ToneConfig;
use crate::types::ClockPair;

/// Board reference clock into the converter PLL (333.333... MHz, truncated)
pub const REF_CLOCK_HZ: u64 = 333_333_333;

/// Target DAC clock (12 GHz)
pub const DAC_CLOCK_HZ: u64 = 12_000_000_000;

/// Number of Tx I/Q channel pairs
pub const TX_CHANNEL_PAIRS: usize = 8;

/// Number of Rx I/Q channel pairs
pub const RX_CHANNEL_PAIRS: usize = 8;

/// Number of DAC channel-control registers (I and Q per pair)
#[allow(clippy::cast_possible_truncation)]
pub const TX_DAC_CHANNELS: u32 = (TX_CHANNEL_PAIRS * 2) as u32;

/// Base address of the per-channel DAC register blocks
pub const DAC_CH_REG_BASE: u32 = 0x400;

/// Stride between channel register blocks
pub const DAC_CH_REG_STEP: u32 = 0x40;

/// Offset of the channel-control (data select) register in a block
pub const DAC_CH_CTRL_OFFSET: u32 = 0x18;

/// Capacity of the runtime override table
pub const OVERRIDE_TABLE_CAPACITY: usize = 8;

/// Global Rx settings, applied through the first channel
pub const RX_GLOBAL: RxGlobalConfig = RxGlobalConfig {
    test_mode: RxTestMode::Off,
    nyquist_zone: NyquistZone::Odd,
    loopback_mode: 0,
};

/// Default Rx channel plan: main (CDDC) NCO, channel (FDDC) NCO
pub const RX_DEFAULT_CHANNELS: [RxChannelConfig; RX_CHANNEL_PAIRS] = [
    RxChannelConfig::new(NcoConfig::new(100_000_000, 1000), NcoConfig::new(10_000_000, 0)),
    RxChannelConfig::new(NcoConfig::new(200_000_000, 0), NcoConfig::new(20_000_000, 0)),
    RxChannelConfig::new(NcoConfig::new(100_000_000, 1000), NcoConfig::new(30_000_000, 0)),
    RxChannelConfig::new(NcoConfig::new(200_000_000, 0), NcoConfig::new(40_000_000, 0)),
    RxChannelConfig::new(NcoConfig::new(700_000_000, 1000), NcoConfig::new(50_000_000, 1000)),
    RxChannelConfig::new(NcoConfig::new(900_000_000, 1000), NcoConfig::new(60_000_000, 1000)),
    RxChannelConfig::new(NcoConfig::new(700_000_000, 1000), NcoConfig::new(70_000_000, 0)),
    RxChannelConfig::new(NcoConfig::new(900_000_000, 1000), NcoConfig::new(80_000_000, 1000)),
];

/// Default Tx channel plan: gain scale, main (CDUC) NCO, channel (FDUC) NCO
pub const TX_DEFAULT_CHANNELS: [TxChannelConfig; TX_CHANNEL_PAIRS] = [
    TxChannelConfig::new(1.0, NcoConfig::new(100_000_000, 0), NcoConfig::new(6_000_000, 0)),
    TxChannelConfig::new(0.700_122_1, NcoConfig::new(100_000_000, 0), NcoConfig::new(16_000_000, 0)),
    TxChannelConfig::new(0.569_963_3, NcoConfig::new(100_000_000, 0), NcoConfig::new(0, 0)),
    TxChannelConfig::new(0.500_122_1, NcoConfig::new(400_000_000, 0), NcoConfig::new(100_000_000, 2000)),
    TxChannelConfig::new(0.500_122_1, NcoConfig::new(700_000_000, 0), NcoConfig::new(0, 0)),
    TxChannelConfig::new(0.500_122_1, NcoConfig::new(700_000_000, 0), NcoConfig::new(0, 0)),
    TxChannelConfig::new(0.500_122_1, NcoConfig::new(900_000_000, 0), NcoConfig::new(0, 0)),
    TxChannelConfig::new(0.480_097_7, NcoConfig::new(900_000_000, 0), NcoConfig::new(0, 0)),
];

/// Default DDS tone per channel pair
pub const DEFAULT_TONES: [ToneConfig; TX_CHANNEL_PAIRS] = [
    ToneConfig::new(4_018_290, 90.0, -12.0),
    ToneConfig::new(8_005_900, 90.0, -10.0),
    ToneConfig::new(3_000_940, 90.0, -13.0),
    ToneConfig::disabled(),
    ToneConfig::new(10_996_668, 90.0, -17.0),
    ToneConfig::new(6_012_054, 90.0, -15.0),
    ToneConfig::new(11_993_591, 90.0, -14.0),
    ToneConfig::new(12_990_513, 90.0, -13.0),
];

/// Build the board clock pair
#[must_use]
pub const fn default_clocks() -> ClockPair {
    ClockPair::new(DAC_CLOCK_HZ, REF_CLOCK_HZ)
}
