//! # Rust Window
//!
//! Native windows with an optional OpenGL context, on Win32 and X11, behind
//! one callback-driven API.
//!
//! ## Features
//!
//! - **Two substrates**: Win32 message loop and X11 display server
//! - **OpenGL contexts**: WGL and GLX negotiation, versioned/core profiles
//! - **Fullscreen**: mode transitions that restore placement and resolution
//! - **Callbacks**: deduplicated input and lifecycle events, re-entrant safe
//! - **Config files**: window settings from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rust_window::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let window = rust_window::create_from_config(WindowConfig::new("Hello", 1280, 720));
//!     window.on_resized(Box::new(|w, h| println!("resized to {w}x{h}")));
//!     window.launch()?;
//!
//!     while !window.should_close() {
//!         window.update();
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Shared vocabulary
pub mod core;
pub mod config;
pub mod error;
pub mod events;
pub mod foundation;
pub mod input;

// Rendering contexts and windows
pub mod context;
pub mod window;

mod platform;

pub use error::{ErrorCode, WindowError, WindowResult};
pub use window::{create, create_from_config, Platform, SharedWindow, Window};

/// Common imports for window users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        context::{ContextState, GlVersion},
        core::config::{ContextKind, CursorMode, GlConfig, WindowConfig, WindowMode},
        error::{ErrorCode, WindowError, WindowResult},
        events::WindowEvent,
        input::KeyCode,
        window::{Rect, SharedWindow, Window},
    };
}
