//! Core data models for the ladder stats engine.

mod category;
mod map_info;
mod race;
mod record;
mod stats;
mod tier;

pub use category::*;
pub use map_info::*;
pub use race::*;
pub use record::*;
pub use stats::*;
pub use tier::*;
