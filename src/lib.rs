//! RF Data Converter Clock & Data-Path Library
//!
//! This library provides the host-testable core of firmware that brings up
//! a combined DAC/ADC RF data converter: the DAC clock PLL divider
//! resolution, PLL startup sequencing, the Rx/Tx channel plan, Tx data-path
//! arbitration and DDS tone settings.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │        Clock bring-up      │     Tx path control             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     FUNCTIONAL CORE                          │
//! │  PLL divider search  │  Overrides  │  Data path  │  DDS      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    DEVICE INTERFACE                          │
//! │        PllControl          │        RegisterBus              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Functional core, imperative shell**: pure logic, devices behind traits
//! - **Exact integer arithmetic** for every clock relationship
//! - **Explicit error handling**: all fallible operations return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Converter Clocking
///
/// PLL divider resolution, overrides and startup.
pub mod clock;

/// Converter Channel Plan
///
/// Rx/Tx NCO, gain and enable settings per channel.
pub mod channels;

/// Tx Data Path
///
/// DDS/DMA/zero source selection per DAC channel.
pub mod datapath;

/// DDS Tone Generation
///
/// Single-tone attribute values per channel pair.
pub mod dds;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

pub use clock::pll::{resolve, PllError};
pub use types::{ClockPair, DividerSet, PllDividers};

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::clock::pll::{resolve, resolve_with, PllError};
    pub use crate::clock::startup::{clock_startup, PllControl, StartupError};
    pub use crate::channels::{validate_plan, ChannelConfigError};
    pub use crate::config::*;
    pub use crate::datapath::{ChannelMode, RegisterBus, TxDataPath};
    pub use crate::types::*;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
