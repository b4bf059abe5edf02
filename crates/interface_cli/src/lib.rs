//! Command-line interface to the claim verification engine
//!
//! The binary is a thin shell over two modules: [`settings`] loads
//! thresholds and logging preferences, [`commands`] reads the JSON inputs,
//! runs the engine and renders the result.

pub mod commands;
pub mod settings;
