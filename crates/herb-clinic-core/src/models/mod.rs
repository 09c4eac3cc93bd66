//! Domain models for the herb-clinic system.

mod favorite;
mod filters;
mod medicine;
mod patient;
mod visit;

pub use favorite::*;
pub use filters::*;
pub use medicine::*;
pub use patient::*;
pub use visit::*;
