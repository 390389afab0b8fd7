//! Turn-based combat: enemies, class abilities, and the battle state machine.

pub mod abilities;
pub mod logic;
pub mod types;

pub use abilities::*;
pub use logic::*;
pub use types::*;
