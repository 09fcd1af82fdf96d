//! Runtime configuration and command line arguments

pub mod arg;
pub mod config;
