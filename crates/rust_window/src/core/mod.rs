//! # Core Module
//!
//! Shared construction parameters for windows and their rendering contexts.
//!
//! ## Organization
//!
//! - **Config**: [`WindowConfig`], [`GlConfig`] and the mode enums they carry

pub mod config;

// Re-export commonly used config types
pub use config::{
    Config,
    ConfigError,
    ContextKind,
    CursorMode,
    GlConfig,
    WindowConfig,
    WindowMode,
};
