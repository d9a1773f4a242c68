//! AirMap CLI library.
//!
//! This crate provides the command grammar, output formatting, and the
//! interactive shell for the AirMap flight-map CLI.

pub mod commands;
pub mod output;
pub mod shell;

#[cfg(test)]
pub(crate) mod test_helpers;
