//! Explicit PLL Divider Overrides
//!
//! Rows pinning the dividers for exact (DAC clock, reference clock) pairs.
//! Matching is exact integer equality on both clocks; a row is never used
//! for a nearby frequency.

use core::fmt;

use heapless::Vec;

use crate::types::{ClockPair, PllDividers};

/// One override row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverrideEntry {
    /// Clock pair this row applies to
    pub clocks: ClockPair,
    /// Dividers used for that pair
    pub dividers: PllDividers,
}

impl OverrideEntry {
    /// Create an override row
    #[must_use]
    pub const fn new(dac_clock_hz: u64, ref_clock_hz: u64, dividers: PllDividers) -> Self {
        Self {
            clocks: ClockPair::new(dac_clock_hz, ref_clock_hz),
            dividers,
        }
    }
}

/// Built-in rows for 333.333... MHz references
pub const DEFAULT_OVERRIDES: &[OverrideEntry] = &[
    // 166.666... MHz × 8 × 9 = 12 GHz
    OverrideEntry::new(12_000_000_000, 333_333_333, PllDividers::new(2, 1, 8, 9)),
    // 111.111... MHz × 8 × 9 = 8 GHz
    OverrideEntry::new(8_000_000_000, 333_333_333, PllDividers::new(3, 1, 8, 9)),
];

/// Find the row matching `clocks` exactly
#[must_use]
pub fn lookup(table: &[OverrideEntry], clocks: ClockPair) -> Option<&OverrideEntry> {
    table.iter().find(|entry| entry.clocks == clocks)
}

/// Error adding a row to an [`OverrideTable`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverrideTableError {
    /// Table is at capacity
    Full,
    /// A row for this clock pair already exists
    DuplicateEntry,
}

impl fmt::Display for OverrideTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "override table full"),
            Self::DuplicateEntry => write!(f, "duplicate override entry"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for OverrideTableError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Full => defmt::write!(f, "override table full"),
            Self::DuplicateEntry => defmt::write!(f, "duplicate override entry"),
        }
    }
}

/// Append-only override table with fixed capacity
///
/// Rows can only be added. Each clock pair appears at most once.
#[derive(Clone, Debug, Default)]
pub struct OverrideTable<const N: usize> {
    entries: Vec<OverrideEntry, N>,
}

impl<const N: usize> OverrideTable<N> {
    /// Create an empty table
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create a table seeded with [`DEFAULT_OVERRIDES`]
    ///
    /// # Errors
    ///
    /// [`OverrideTableError::Full`] if `N` cannot hold the built-in rows.
    pub fn with_defaults() -> Result<Self, OverrideTableError> {
        let mut table = Self::new();
        for entry in DEFAULT_OVERRIDES {
            table.push(*entry)?;
        }
        Ok(table)
    }

    /// Append a row
    ///
    /// # Errors
    ///
    /// [`OverrideTableError::DuplicateEntry`] if the clock pair is already
    /// present, [`OverrideTableError::Full`] if the table is at capacity.
    pub fn push(&mut self, entry: OverrideEntry) -> Result<(), OverrideTableError> {
        if lookup(&self.entries, entry.clocks).is_some() {
            return Err(OverrideTableError::DuplicateEntry);
        }
        self.entries
            .push(entry)
            .map_err(|_| OverrideTableError::Full)
    }

    /// Find the row matching `clocks` exactly
    #[must_use]
    pub fn lookup(&self, clocks: ClockPair) -> Option<&OverrideEntry> {
        lookup(&self.entries, clocks)
    }

    /// Rows in insertion order
    #[must_use]
    pub fn as_slice(&self) -> &[OverrideEntry] {
        &self.entries
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rows_are_distinct() {
        for (i, a) in DEFAULT_OVERRIDES.iter().enumerate() {
            for b in &DEFAULT_OVERRIDES[i + 1..] {
                assert_ne!(a.clocks, b.clocks);
            }
        }
    }

    #[test]
    fn lookup_requires_both_clocks() {
        assert!(lookup(DEFAULT_OVERRIDES, ClockPair::new(12_000_000_000, 333_333_333)).is_some());
        assert!(lookup(DEFAULT_OVERRIDES, ClockPair::new(12_000_000_000, 333_333_334)).is_none());
        assert!(lookup(DEFAULT_OVERRIDES, ClockPair::new(12_000_000_001, 333_333_333)).is_none());
        assert!(lookup(DEFAULT_OVERRIDES, ClockPair::new(10_000_000_000, 333_333_333)).is_none());
    }

    #[test]
    fn table_capacity() {
        let mut table: OverrideTable<1> = OverrideTable::new();
        let row = OverrideEntry::new(6_000_000_000, 100_000_000, PllDividers::new(1, 1, 5, 12));
        assert_eq!(table.push(row), Ok(()));
        let other = OverrideEntry::new(7_000_000_000, 100_000_000, PllDividers::new(1, 1, 7, 10));
        assert_eq!(table.push(other), Err(OverrideTableError::Full));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn defaults_need_room() {
        assert_eq!(
            OverrideTable::<1>::with_defaults().map(|t| t.len()),
            Err(OverrideTableError::Full)
        );
    }
}
