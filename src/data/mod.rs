//! Static game data: quest and item definition files.

pub mod loader;

pub use loader::*;
