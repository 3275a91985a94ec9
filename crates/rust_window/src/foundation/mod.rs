//! Foundation module - Core utilities
//!
//! This module provides fundamental utilities used throughout the library:
//! - Logging initialization and macros

pub mod logging;
