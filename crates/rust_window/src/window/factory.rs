//! Window construction
//!
//! [`Platform`] holds the only state windows share: the id allocator behind
//! per-window class names and the module handle Win32 registrations need.
//! Ids start at 1, grow monotonically and are never reused, so two windows
//! never register the same class even when one is dropped and another is
//! created in its place.

use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use super::native::NativeWindow;
use super::SharedWindow;
use crate::core::config::{ContextKind, CursorMode, WindowConfig, WindowMode};
use crate::platform;

/// Process-scoped registration state shared by every window
#[derive(Debug)]
pub struct Platform {
    next_id: AtomicU32,
    module: usize,
}

impl Platform {
    /// Fresh registration state; most code wants [`Platform::global`]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU32::new(1),
            module: platform::module_handle(),
        }
    }

    /// The process-wide instance [`create`] uses
    pub fn global() -> &'static Self {
        static PLATFORM: OnceLock<Platform> = OnceLock::new();
        PLATFORM.get_or_init(Self::new)
    }

    /// Reserve the next window id
    pub fn allocate_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Module handle class registrations are made against; 0 off Win32
    pub const fn module_handle(&self) -> usize {
        self.module
    }

    /// Build an unlaunched window for the current substrate
    ///
    /// No native API is touched until [`launch`](super::Window::launch).
    pub fn create_window(&self, config: WindowConfig) -> SharedWindow {
        let id = self.allocate_id();
        log::debug!("Created window {id} \"{}\"", config.title);
        let backend = platform::DefaultBackend::new(id, self.module);
        Rc::new(NativeWindow::new(id, config, backend))
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}

/// Construct an unlaunched window
///
/// # Example
///
/// ```no_run
/// use rust_window::prelude::*;
///
/// let window = rust_window::create(
///     "Demo",
///     800,
///     600,
///     ContextKind::OpenGl,
///     WindowMode::Windowed,
///     CursorMode::VISIBLE | CursorMode::FREE,
///     true,
/// );
/// window.launch()?;
/// while !window.should_close() {
///     window.update();
/// }
/// # Ok::<(), rust_window::WindowError>(())
/// ```
pub fn create(
    title: &str,
    width: u16,
    height: u16,
    context: ContextKind,
    window_mode: WindowMode,
    cursor_mode: CursorMode,
    resizable: bool,
) -> SharedWindow {
    let config = WindowConfig::new(title, width, height)
        .with_context(context)
        .with_window_mode(window_mode)
        .with_cursor_mode(cursor_mode)
        .with_resizable(resizable);
    create_from_config(config)
}

/// Construct an unlaunched window from a full configuration
pub fn create_from_config(config: WindowConfig) -> SharedWindow {
    Platform::global().create_window(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let platform = Platform::new();
        let first = platform.allocate_id();
        let second = platform.allocate_id();
        let third = platform.allocate_id();
        assert_eq!(first, 1);
        assert!(first < second && second < third);
    }

    #[test]
    fn test_created_windows_are_not_launched() {
        let platform = Platform::new();
        let a = platform.create_window(WindowConfig::new("a", 320, 240));
        let b = platform.create_window(WindowConfig::new("b", 320, 240));

        assert_ne!(a.id(), b.id());
        assert!(!a.is_launched());
        assert!(a.native_handle().is_null());
        assert_eq!((a.width(), a.height()), (320, 240));
        assert_eq!(b.title(), "b");
    }

    #[test]
    fn test_create_carries_parameters() {
        let window = create(
            "params",
            640,
            480,
            ContextKind::None,
            WindowMode::Fullscreen,
            CursorMode::HIDDEN | CursorMode::CAPTURED,
            false,
        );
        assert_eq!(window.window_mode(), WindowMode::Fullscreen);
        assert_eq!(window.cursor_mode(), CursorMode::HIDDEN | CursorMode::CAPTURED);
        assert!(!window.should_close());
    }
}
