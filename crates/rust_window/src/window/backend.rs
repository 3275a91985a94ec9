//! Backend-agnostic native window trait
//!
//! This module defines the internal trait every native substrate implements.
//! Backends are thin: they perform native calls and push [`RawEvent`]s into
//! the window's queue, while every decision (deduplication, the fullscreen
//! state machine, cursor bookkeeping, error reporting) lives in
//! [`NativeWindow`](super::native::NativeWindow).
//!
//! # Design Philosophy
//! - **Internal Use Only**: applications only ever see the `Window` trait
//! - **No Policy**: backends never decide *whether* to do something
//! - **Never Panics**: backend methods run between native callbacks
//!
//! # Thread Safety
//! Backends are `!Send`. Both substrates require window calls on the thread
//! that created the window.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::c_void;
use std::rc::Rc;

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use super::translate::RawEvent;
use crate::core::config::{ContextKind, GlConfig};
use crate::error::WindowResult;
use crate::input::KeyCode;

/// A rectangle in screen or client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Construct a rectangle
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Size clamped to the `u16` range windows report
    pub fn size(&self) -> (u16, u16) {
        let clamp = |v: u32| u16::try_from(v).unwrap_or(u16::MAX);
        (clamp(self.width), clamp(self.height))
    }
}

/// Windowed-mode snapshot captured on entering fullscreen
///
/// `style` holds the substrate's decoration bits (Win32 window style, Motif
/// decoration flags on X11) and `show_state` the Win32 show command; both
/// are opaque to the state machine and handed back unchanged on restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    /// Window rectangle in screen coordinates
    pub rect: Rect,
    /// Decoration/style bits
    pub style: u32,
    /// Show state
    pub show_state: u32,
}

/// Queue the native layer fills and the window drains during `poll_events`
///
/// Borrows of the inner queue are never held across a native call, so a
/// window procedure invoked re-entrantly by the OS can always push.
#[derive(Debug, Clone, Default)]
pub struct RawEventQueue {
    inner: Rc<RefCell<VecDeque<RawEvent>>>,
}

impl RawEventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event; dropped with a warning if the queue is mid-drain
    pub fn push(&self, event: RawEvent) {
        match self.inner.try_borrow_mut() {
            Ok(mut queue) => queue.push_back(event),
            Err(_) => log::warn!("Dropped native event {event:?}: queue busy"),
        }
    }

    /// Take every queued event
    pub fn drain(&self) -> Vec<RawEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    /// Whether no events are queued
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Stable address of the shared queue, for native user-data slots
    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn as_ptr(&self) -> *const RefCell<VecDeque<RawEvent>> {
        Rc::as_ptr(&self.inner)
    }
}

/// Everything a backend needs to create its window
#[derive(Debug, Clone)]
pub struct CreateRequest<'a> {
    /// Title bar text
    pub title: &'a str,
    /// Requested client width
    pub width: u16,
    /// Requested client height
    pub height: u16,
    /// Whether the frame is user-resizable
    pub resizable: bool,
    /// Context to create alongside the window
    pub context: ContextKind,
    /// Context attributes
    pub gl: &'a GlConfig,
}

/// Internal trait for native window implementations
pub(crate) trait WindowBackend {
    /// Create the native window and, if requested, its context
    ///
    /// On failure everything created so far is released again.
    fn create(&mut self, request: &CreateRequest<'_>, queue: &RawEventQueue) -> WindowResult<()>;

    /// Make the window visible
    fn show(&mut self);

    /// Release the context, then the native window
    ///
    /// Pushes [`RawEvent::Destroyed`] once the window is gone.
    fn destroy(&mut self);

    /// Whether a native window currently exists
    fn is_alive(&self) -> bool;

    /// Move pending native events into the queue without blocking
    fn pump_events(&mut self, queue: &RawEventQueue);

    /// Whether a context was created
    fn has_context(&self) -> bool;

    /// Present the back buffer
    fn swap_buffers(&mut self) -> WindowResult<()>;

    /// Rebind the context to the calling thread
    fn make_current(&mut self) -> WindowResult<()>;

    /// Resolve a GL entry point through the context
    fn get_proc_address(&self, name: &str) -> *const c_void;

    /// `HWND` on Win32, `Display*` on X11; null when not alive
    fn native_handle(&self) -> *mut c_void;

    /// Window handle for interop crates
    fn raw_window_handle(&self) -> Option<RawWindowHandle>;

    /// Display handle for interop crates
    fn raw_display_handle(&self) -> Option<RawDisplayHandle>;

    /// Replace the title bar text
    fn set_title(&mut self, title: &str) -> WindowResult<()>;

    /// Synchronous key or button state query
    fn is_key_down(&self, key: KeyCode) -> bool;

    /// Resize the client area
    fn resize_client(&mut self, width: u16, height: u16);

    /// Rectangle of the monitor currently hosting the window
    fn monitor_rect(&self) -> Rect;

    /// Capture the current windowed placement and style
    fn save_placement(&self) -> Placement;

    /// Restore style bits, then placement, then refresh the frame
    fn restore_placement(&mut self, placement: &Placement);

    /// Remove decorations in preparation for covering the monitor
    fn strip_decorations(&mut self);

    /// Move and size the window frame
    fn set_geometry(&mut self, rect: Rect);

    /// Switch the display hosting the window to `width`x`height`
    fn set_display_resolution(&mut self, width: u16, height: u16) -> bool;

    /// Return the display to its own resolution
    fn restore_display_resolution(&mut self);

    /// Iconify the window
    fn minimize(&mut self);

    /// Undo `minimize`
    fn restore(&mut self);

    /// Client area mapped to screen coordinates
    fn client_rect_on_screen(&self) -> Rect;

    /// Confine the cursor to `rect`, or release it with `None`
    fn clip_cursor(&mut self, rect: Option<Rect>);

    /// Show or hide the cursor over the window
    fn set_cursor_visible(&mut self, visible: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_size_saturates() {
        assert_eq!(Rect::new(0, 0, 1920, 1080).size(), (1920, 1080));
        assert_eq!(Rect::new(0, 0, 70_000, 10).size(), (u16::MAX, 10));
    }

    #[test]
    fn test_queue_shares_storage_between_clones() {
        let queue = RawEventQueue::new();
        let native_side = queue.clone();
        native_side.push(RawEvent::CloseRequested);
        native_side.push(RawEvent::Resized { width: 10, height: 20 });

        assert!(!queue.is_empty());
        assert_eq!(
            queue.drain(),
            vec![RawEvent::CloseRequested, RawEvent::Resized { width: 10, height: 20 }]
        );
        assert!(native_side.is_empty());
        assert_eq!(queue.as_ptr(), native_side.as_ptr());
    }
}
