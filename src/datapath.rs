//! Tx Data Path Selection
//!
//! Each DAC channel is fed from one of three sources, selected through its
//! channel-control register:
//!
//! ```text
//!   DDS tone engine ──┐
//!   DMA (memory)  ────┼──► channel ctrl ──► DAC
//!   Zero          ────┘
//! ```
//!
//! DMA is owned either by a streaming buffer or by the processed ("input")
//! attribute, which forces DMA on every channel without a buffer. The two
//! owners exclude each other, and while processed mode is on the DDS `raw`
//! attribute is locked as well. Releasing DMA always returns the channels
//! to the DDS engine.

use core::fmt;

use crate::config::{DAC_CH_CTRL_OFFSET, DAC_CH_REG_BASE, DAC_CH_REG_STEP};

/// Channel data source, encoded as the channel-control register value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ChannelMode {
    /// DDS tone engine
    #[default]
    Dds,
    /// DMA from memory
    Dma,
    /// Constant zero output
    Zero,
}

impl ChannelMode {
    /// Register value for this mode
    #[must_use]
    pub const fn as_reg(self) -> u32 {
        match self {
            Self::Dds => 0x0,
            Self::Dma => 0x2,
            Self::Zero => 0x3,
        }
    }

    /// Decode a channel-control register value
    #[must_use]
    pub const fn from_reg(value: u32) -> Option<Self> {
        match value {
            0x0 => Some(Self::Dds),
            0x2 => Some(Self::Dma),
            0x3 => Some(Self::Zero),
            _ => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ChannelMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Dds => defmt::write!(f, "DDS"),
            Self::Dma => defmt::write!(f, "DMA"),
            Self::Zero => defmt::write!(f, "ZERO"),
        }
    }
}

/// Data path arbitration error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataPathError {
    /// The request conflicts with the current DMA owner
    Busy,
}

impl fmt::Display for DataPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "data path busy"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DataPathError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Busy => defmt::write!(f, "data path busy"),
        }
    }
}

/// 32-bit register access to the converter's Tx core
pub trait RegisterBus {
    /// Bus error
    type Error;

    /// Read a register
    ///
    /// # Errors
    ///
    /// Bus-specific access failures.
    fn read_reg(&mut self, addr: u32) -> Result<u32, Self::Error>;

    /// Write a register
    ///
    /// # Errors
    ///
    /// Bus-specific access failures.
    fn write_reg(&mut self, addr: u32, value: u32) -> Result<(), Self::Error>;
}

/// Channel-control register address for a DAC channel
#[must_use]
pub const fn channel_ctrl_reg(channel: u32) -> u32 {
    DAC_CH_REG_BASE + channel * DAC_CH_REG_STEP + DAC_CH_CTRL_OFFSET
}

/// Tx data path state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxDataPath {
    /// DDS `raw` attribute
    dds_enabled: bool,
    /// Processed/input attribute
    processed: bool,
    /// Streaming buffer open
    buffer_open: bool,
}

impl TxDataPath {
    /// Create the power-on state: DDS enabled, DMA idle
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dds_enabled: true,
            processed: false,
            buffer_open: false,
        }
    }

    /// Mode currently driven onto every channel
    #[must_use]
    pub const fn mode(&self) -> ChannelMode {
        if self.processed || self.buffer_open {
            ChannelMode::Dma
        } else if self.dds_enabled {
            ChannelMode::Dds
        } else {
            ChannelMode::Zero
        }
    }

    /// Processed/input attribute as read back
    #[must_use]
    pub const fn processed(&self) -> bool {
        self.processed
    }

    /// True while a streaming buffer owns DMA
    #[must_use]
    pub const fn buffer_open(&self) -> bool {
        self.buffer_open
    }

    /// DDS `raw` attribute as read back
    #[must_use]
    pub const fn dds_enabled(&self) -> bool {
        self.dds_enabled
    }

    /// Write the DDS `raw` attribute
    ///
    /// # Errors
    ///
    /// [`DataPathError::Busy`] while DMA is owned by processed mode or a buffer.
    pub fn set_raw(&mut self, enable: bool) -> Result<ChannelMode, DataPathError> {
        if self.processed || self.buffer_open {
            return Err(DataPathError::Busy);
        }
        self.dds_enabled = enable;
        Ok(self.transition())
    }

    /// Write the processed/input attribute
    ///
    /// # Errors
    ///
    /// [`DataPathError::Busy`] when enabling while a buffer is open.
    pub fn set_processed(&mut self, enable: bool) -> Result<ChannelMode, DataPathError> {
        if enable {
            if self.buffer_open {
                return Err(DataPathError::Busy);
            }
            self.processed = true;
        } else if self.processed {
            self.processed = false;
            self.dds_enabled = true;
        }
        Ok(self.transition())
    }

    /// Claim DMA for a streaming buffer
    ///
    /// # Errors
    ///
    /// [`DataPathError::Busy`] while processed mode is on or another buffer
    /// is open.
    pub fn open_buffer(&mut self) -> Result<ChannelMode, DataPathError> {
        if self.processed || self.buffer_open {
            return Err(DataPathError::Busy);
        }
        self.buffer_open = true;
        Ok(self.transition())
    }

    /// Release DMA from the streaming buffer and return to DDS
    pub fn close_buffer(&mut self) -> ChannelMode {
        if self.buffer_open {
            self.buffer_open = false;
            self.dds_enabled = true;
        }
        self.transition()
    }

    /// Write the current mode to the first `channels` channel registers
    ///
    /// # Errors
    ///
    /// The first bus error; later channels are left untouched.
    pub fn apply<B: RegisterBus>(&self, bus: &mut B, channels: u32) -> Result<(), B::Error> {
        let value = self.mode().as_reg();
        for channel in 0..channels {
            bus.write_reg(channel_ctrl_reg(channel), value)?;
        }
        Ok(())
    }

    fn transition(&self) -> ChannelMode {
        let mode = self.mode();
        #[cfg(feature = "embedded")]
        defmt::debug!("Tx data path -> {}", mode);
        mode
    }
}

impl Default for TxDataPath {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TxDataPath {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "TxPath({}, raw={}, processed={}, buffer={})",
            self.mode(),
            self.dds_enabled,
            self.processed,
            self.buffer_open
        );
    }
}

/// Read back and decode a channel-control register
///
/// Returns `Ok(None)` for a value that is not a known mode.
///
/// # Errors
///
/// Bus access failure.
pub fn read_channel_mode<B: RegisterBus>(
    bus: &mut B,
    channel: u32,
) -> Result<Option<ChannelMode>, B::Error> {
    bus.read_reg(channel_ctrl_reg(channel))
        .map(ChannelMode::from_reg)
}

/// Data path shared between tasks
#[cfg(any(feature = "embedded", feature = "std"))]
pub mod shared {
    //! Critical-section protected [`TxDataPath`] for use from several tasks.

    use core::cell::RefCell;

    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::blocking_mutex::Mutex;

    use super::{ChannelMode, DataPathError, TxDataPath};

    /// Shared Tx data path
    pub struct SharedDataPath {
        inner: Mutex<CriticalSectionRawMutex, RefCell<TxDataPath>>,
    }

    impl SharedDataPath {
        /// Create a shared data path in its power-on state
        #[must_use]
        pub const fn new() -> Self {
            Self {
                inner: Mutex::new(RefCell::new(TxDataPath::new())),
            }
        }

        /// Snapshot of the current state
        #[must_use]
        pub fn state(&self) -> TxDataPath {
            self.inner.lock(|path| *path.borrow())
        }

        /// See [`TxDataPath::set_raw`]
        ///
        /// # Errors
        ///
        /// [`DataPathError::Busy`] while DMA is owned.
        pub fn set_raw(&self, enable: bool) -> Result<ChannelMode, DataPathError> {
            self.inner.lock(|path| path.borrow_mut().set_raw(enable))
        }

        /// See [`TxDataPath::set_processed`]
        ///
        /// # Errors
        ///
        /// [`DataPathError::Busy`] when enabling while a buffer is open.
        pub fn set_processed(&self, enable: bool) -> Result<ChannelMode, DataPathError> {
            self.inner.lock(|path| path.borrow_mut().set_processed(enable))
        }

        /// See [`TxDataPath::open_buffer`]
        ///
        /// # Errors
        ///
        /// [`DataPathError::Busy`] while DMA is owned.
        pub fn open_buffer(&self) -> Result<ChannelMode, DataPathError> {
            self.inner.lock(|path| path.borrow_mut().open_buffer())
        }

        /// See [`TxDataPath::close_buffer`]
        pub fn close_buffer(&self) -> ChannelMode {
            self.inner.lock(|path| path.borrow_mut().close_buffer())
        }
    }

    impl Default for SharedDataPath {
        fn default() -> Self {
            Self::new()
        }
    }
}
