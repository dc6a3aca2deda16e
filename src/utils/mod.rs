//! Utility functions and helpers.

pub mod fs;
pub mod git;
pub mod http;
pub mod log;
