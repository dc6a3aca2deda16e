// src/lib.rs

//! notepress: publishes tagged Obsidian notes as Hugo page bundles.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
