//! Command implementations.

pub mod pack;
pub mod start;
pub mod status;
pub mod stop;
