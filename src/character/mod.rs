//! Character stats, leveling, and persistence.

pub mod logic;
pub mod save;
pub mod types;

pub use logic::*;
pub use save::*;
pub use types::*;
