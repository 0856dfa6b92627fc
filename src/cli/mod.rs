//! Command-line front end for the token sandbox

pub mod commands;

pub use commands::*;
