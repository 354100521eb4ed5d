//! Subcommand implementations.

pub mod joblog;
pub mod joesd;
