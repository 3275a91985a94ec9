//! Window management subsystem
//!
//! This module provides the platform-neutral window abstraction and the
//! state machine that drives every native substrate the same way.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Application Code            │
//! └─────────────┬───────────────────┘
//!               │ Uses Rc<dyn Window>
//!      ┌────────▼────────┐
//!      │ NativeWindow<B> │ ← state machine (native.rs)
//!      │  translator     │   translate.rs
//!      │  mode / cursor  │   mode.rs
//!      └────────┬────────┘
//!               │ WindowBackend (backend.rs)
//!   ┌───────────▼───────────┐
//!   │ platform::win32       │ ← message-loop substrate
//!   │ platform::x11         │ ← display-server substrate
//!   └───────────────────────┘
//! ```
//!
//! # Event Flow
//!
//! Native callbacks never reach application code directly. The native layer
//! pushes raw events into a queue; [`Window::poll_events`] drains it,
//! translates and deduplicates, and only then invokes the registered
//! handlers on the calling thread. Handlers may call back into the window
//! (toggle fullscreen from a key handler, close from a close request) but
//! must not block.
//!
//! # Module Organization
//!
//! - **`factory`**: [`Platform`] and [`create`], the only way to get a window
//! - **`native`**: the generic window state machine
//! - **`translate`**: raw-event translation and deduplication
//! - **`mode`**: fullscreen transitions and cursor bookkeeping
//! - **`backend`**: internal trait implemented per substrate

pub(crate) mod backend;
pub mod factory;
pub(crate) mod mode;
pub(crate) mod native;
pub(crate) mod translate;

#[cfg(test)]
pub(crate) mod testing;

use std::ffi::c_void;
use std::rc::Rc;

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use crate::core::config::{CursorMode, WindowMode};
use crate::error::WindowResult;
use crate::events::{
    CharTypedFn, ClosedFn, ErrorFn, KeyPressedFn, KeyReleasedFn, MouseButtonFn, MouseMovedFn,
    ResizedFn, ScrolledFn,
};
use crate::input::KeyCode;

pub use backend::Rect;
pub use factory::{create, create_from_config, Platform};

/// Shared handle to a window; single-threaded by construction
pub type SharedWindow = Rc<dyn Window>;

/// A native window with an optional OpenGL context
///
/// Construction (through [`create`]) performs no native work;
/// [`launch`](Window::launch) creates everything. All methods take `&self`
/// so handlers holding a [`SharedWindow`] can drive the window re-entrantly.
///
/// Misuse (operating on a window that was never launched or is already
/// closed, bad arguments, resizing while fullscreen) is reported twice: as
/// an `Err` where the method returns a result, and always through the error
/// handler.
pub trait Window {
    /// Process-unique identifier assigned at construction
    fn id(&self) -> u32;

    /// Create the native window and its context
    ///
    /// A second call fails with `AlreadyLaunched` and does nothing.
    fn launch(&self) -> WindowResult<()>;

    /// Whether `launch` succeeded
    fn is_launched(&self) -> bool;

    /// Drain pending native events and dispatch them to handlers
    fn poll_events(&self);

    /// Present the back buffer; a no-op for windows without a context
    fn swap_buffers(&self) -> WindowResult<()>;

    /// `poll_events` followed by `swap_buffers` while the window is alive
    fn update(&self);

    /// Rebind the window's context to the calling thread
    fn make_current(&self) -> WindowResult<()>;

    /// Resolve an OpenGL entry point; null without an active context
    fn get_proc_address(&self, name: &str) -> *const c_void;

    /// Whether the user asked to close the window
    fn should_close(&self) -> bool;

    /// Destroy the context, then the native window; idempotent
    fn close(&self);

    /// Running client width; 0 while minimized
    fn width(&self) -> u16;

    /// Running client height; 0 while minimized
    fn height(&self) -> u16;

    /// Last reported pointer x
    fn mouse_x(&self) -> u16 {
        self.mouse_coords().0
    }

    /// Last reported pointer y
    fn mouse_y(&self) -> u16 {
        self.mouse_coords().1
    }

    /// Last reported pointer position, client-relative
    fn mouse_coords(&self) -> (u16, u16);

    /// Whether both running dimensions are zero
    fn minimized(&self) -> bool {
        self.width() == 0 && self.height() == 0
    }

    /// Ask the OS whether a key or mouse button is held right now
    fn is_key_pressed(&self, key: KeyCode) -> bool;

    /// Apply cursor visibility and confinement
    fn set_cursor_mode(&self, mode: CursorMode) -> WindowResult<()>;

    /// Last requested cursor mode
    fn cursor_mode(&self) -> CursorMode;

    /// Switch between windowed and fullscreen
    fn set_window_mode(&self, mode: WindowMode) -> WindowResult<()>;

    /// Current mode, or the mode launch will enter
    fn window_mode(&self) -> WindowMode;

    /// Resize the client area; refused while fullscreen
    fn resize(&self, width: u16, height: u16) -> WindowResult<()>;

    /// Replace the title bar text
    fn set_title(&self, title: &str) -> WindowResult<()>;

    /// Current title
    fn title(&self) -> String;

    /// `HWND` on Win32, `Display*` on X11; null before launch and after close
    fn native_handle(&self) -> *mut c_void;

    /// Window handle for interop with graphics crates
    fn raw_window_handle(&self) -> Option<RawWindowHandle>;

    /// Display handle for interop with graphics crates
    fn raw_display_handle(&self) -> Option<RawDisplayHandle>;

    /// Replace the key press handler
    fn on_key_pressed(&self, handler: Box<KeyPressedFn>);

    /// Replace the key release handler
    fn on_key_released(&self, handler: Box<KeyReleasedFn>);

    /// Replace the resize handler
    fn on_resized(&self, handler: Box<ResizedFn>);

    /// Replace the close handler
    fn on_closed(&self, handler: Box<ClosedFn>);

    /// Replace the mouse move handler
    fn on_mouse_moved(&self, handler: Box<MouseMovedFn>);

    /// Replace the mouse press handler
    fn on_mouse_pressed(&self, handler: Box<MouseButtonFn>);

    /// Replace the mouse release handler
    fn on_mouse_released(&self, handler: Box<MouseButtonFn>);

    /// Replace the scroll handler
    fn on_scrolled(&self, handler: Box<ScrolledFn>);

    /// Replace the character handler
    fn on_char_typed(&self, handler: Box<CharTypedFn>);

    /// Replace the error handler
    fn on_error(&self, handler: Box<ErrorFn>);
}
