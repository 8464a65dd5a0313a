//! CLI command implementations.

pub mod common;
pub mod config;
pub mod cv;
pub mod generate;
pub mod strings;
pub mod track;
