//! # Window Configuration
//!
//! Construction parameters for a window and its optional OpenGL context.
//! Every type here is plain serde data so applications can keep window
//! settings in a TOML or RON file next to the rest of their configuration.
//!
//! ## Example
//!
//! ```toml
//! title = "My Window"
//! width = 1280
//! height = 720
//! context = "OpenGl"
//! window_mode = "Windowed"
//! cursor_mode = "VISIBLE | FREE"
//! resizable = true
//!
//! [gl]
//! depth_bits = 24
//! version = [3, 3]
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::error::{WindowError, WindowResult};

/// Kind of rendering context attached to a window at launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContextKind {
    /// No rendering context; `swap_buffers` is a no-op
    None,
    /// A double-buffered OpenGL context (WGL or GLX)
    #[default]
    OpenGl,
}

/// Presentation mode of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindowMode {
    /// Decorated window at its own placement
    #[default]
    Windowed,
    /// Borderless window covering the monitor hosting it
    Fullscreen,
}

bitflags::bitflags! {
    /// Cursor behavior as a combination of visibility and confinement
    ///
    /// At most one of `VISIBLE`/`HIDDEN` and one of `FREE`/`CAPTURED` may be
    /// set. A missing half leaves that aspect of the cursor unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CursorMode: u8 {
        /// Show the system cursor over the window
        const VISIBLE = 1 << 0;
        /// Hide the system cursor over the window
        const HIDDEN = 1 << 1;
        /// Let the cursor leave the window
        const FREE = 1 << 2;
        /// Confine the cursor to the window's client area
        const CAPTURED = 1 << 3;
    }
}

impl CursorMode {
    /// Whether the combination names both sides of a visibility or confinement pair
    pub const fn is_conflicting(self) -> bool {
        self.contains(Self::VISIBLE.union(Self::HIDDEN))
            || self.contains(Self::FREE.union(Self::CAPTURED))
    }
}

impl Default for CursorMode {
    fn default() -> Self {
        Self::VISIBLE | Self::FREE
    }
}

/// OpenGL pixel format and context attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlConfig {
    /// Color buffer bits excluding alpha
    pub color_bits: u8,
    /// Alpha channel bits
    pub alpha_bits: u8,
    /// Depth buffer bits
    pub depth_bits: u8,
    /// Stencil buffer bits
    pub stencil_bits: u8,
    /// Requested `(major, minor)` version; detected from the driver when unset
    pub version: Option<(u8, u8)>,
    /// Request a core profile (compatibility profile otherwise)
    pub core_profile: bool,
    /// Request a debug context
    pub debug: bool,
    /// Upper bound for multisample count; `None` takes the best available
    pub samples: Option<u8>,
}

impl Default for GlConfig {
    fn default() -> Self {
        Self {
            color_bits: 24,
            alpha_bits: 8,
            depth_bits: 24,
            stencil_bits: 8,
            version: None,
            core_profile: true,
            debug: false,
            samples: None,
        }
    }
}

impl GlConfig {
    /// Request a specific context version
    pub const fn with_version(mut self, major: u8, minor: u8) -> Self {
        self.version = Some((major, minor));
        self
    }

    /// Set depth and stencil buffer sizes
    pub const fn with_depth_stencil(mut self, depth_bits: u8, stencil_bits: u8) -> Self {
        self.depth_bits = depth_bits;
        self.stencil_bits = stencil_bits;
        self
    }

    /// Toggle the debug context flag
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Cap the multisample count
    pub const fn with_max_samples(mut self, samples: u8) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Validate the attribute set
    pub fn validate(&self) -> WindowResult<()> {
        if let Some((major, minor)) = self.version {
            if major == 0 || (major == 1 && minor == 0) {
                return Err(WindowError::BadArgs(format!(
                    "OpenGL version {major}.{minor} cannot be requested"
                )));
            }
        }
        if self.color_bits == 0 {
            return Err(WindowError::BadArgs("color_bits must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Window construction parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title bar text
    pub title: String,
    /// Requested client area width
    pub width: u16,
    /// Requested client area height
    pub height: u16,
    /// Rendering context created at launch
    pub context: ContextKind,
    /// Mode entered at launch
    pub window_mode: WindowMode,
    /// Cursor behavior applied at launch
    pub cursor_mode: CursorMode,
    /// Whether the user may resize the window frame
    pub resizable: bool,
    /// OpenGL attributes, used when `context` is [`ContextKind::OpenGl`]
    pub gl: GlConfig,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "rust_window".to_string(),
            width: 800,
            height: 600,
            context: ContextKind::OpenGl,
            window_mode: WindowMode::Windowed,
            cursor_mode: CursorMode::default(),
            resizable: true,
            gl: GlConfig::default(),
        }
    }
}

impl WindowConfig {
    /// Create a configuration with the given title and client size
    pub fn new(title: impl Into<String>, width: u16, height: u16) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    /// Set the rendering context kind
    pub const fn with_context(mut self, context: ContextKind) -> Self {
        self.context = context;
        self
    }

    /// Set the initial window mode
    pub const fn with_window_mode(mut self, mode: WindowMode) -> Self {
        self.window_mode = mode;
        self
    }

    /// Set the initial cursor mode
    pub const fn with_cursor_mode(mut self, mode: CursorMode) -> Self {
        self.cursor_mode = mode;
        self
    }

    /// Allow or forbid user resizing
    pub const fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Replace the OpenGL attributes
    pub fn with_gl(mut self, gl: GlConfig) -> Self {
        self.gl = gl;
        self
    }

    /// Validate the configuration before any native work happens
    pub fn validate(&self) -> WindowResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WindowError::BadArgs(format!(
                "window size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if self.title.contains('\0') {
            return Err(WindowError::BadArgs("title must not contain NUL characters".into()));
        }
        if self.cursor_mode.is_conflicting() {
            return Err(WindowError::BadArgs(format!(
                "conflicting cursor mode {:?}",
                self.cursor_mode
            )));
        }
        if self.context == ContextKind::OpenGl {
            self.gl.validate()?;
        }
        Ok(())
    }
}

impl Config for WindowConfig {}
