//! Utility modules: build info, file logger, JSON persistence.

pub mod build_info;
pub mod logger;
pub mod persistence;

pub use build_info::*;
