//! Quest definitions, the prerequisite graph, and quest lifecycle.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
