//! Data types shared across the scan pipeline.

pub mod config;
pub mod outcome;
pub mod result;
