//! Core constants, configuration, and shared combat math.

#![allow(unused_imports)]

pub mod combat_math;
pub mod config;
pub mod constants;

pub use combat_math::*;
pub use config::*;
pub use constants::*;
