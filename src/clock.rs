//! Converter Clocking
//!
//! Resolves the integer dividers of the converter's DAC clock PLL and
//! brings the PLL up through an external register collaborator:
//! - Divider search with an explicit override table
//! - Append-only override rows for board-specific references
//! - Clock startup sequencing

pub mod pll;
pub mod overrides;
pub mod startup;
