//! Export functionality for record archival.

mod records;

pub use records::*;
