//! Spreadsheet export
//!
//! One sheet, one block of rows per ad group, with the group name and
//! keyword cells merged across the block.

mod layout;
mod xlsx;

pub use layout::{Cell, MergeRange, SheetLayout};
pub use xlsx::write_xlsx;
