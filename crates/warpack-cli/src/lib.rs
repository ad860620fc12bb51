//! Shared implementation of the `warpack` and `warpack-launcher` binaries.
//!
//! `warpack` merges a server launcher archive and a web application archive
//! into a standalone archive. `warpack-launcher` starts a standalone instance
//! or talks to a running one over its control channel.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod standby;
