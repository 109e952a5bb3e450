//! Day-sheet export for the front desk.

mod day_sheet;

pub use day_sheet::*;
