//! Examination of cleaned tables: duplicates and cross-tabulation

pub mod adorn;
mod dupes;
mod tabyl;

pub use adorn::{round_half_up, AdornState, Tabyl, TOTAL_LABEL};
pub use dupes::{get_dupes, DUPE_COUNT};
pub use tabyl::{tabulate, Tabulation, Tabulator, MAX_DIMS};
