//! Command-line interface helpers for the `ocat` binary.

pub mod commands;
