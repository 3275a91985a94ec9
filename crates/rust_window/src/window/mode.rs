//! Fullscreen state machine and cursor bookkeeping
//!
//! ```text
//!               launch                     set_window_mode(Fullscreen)
//! Unspecified ─────────▶ Windowed ───────────────────────────────────▶ Fullscreen
//!      │                    ▲                                              │
//!      │                    └─────────── set_window_mode(Windowed) ────────┘
//!      └──────────────────────────── launch ──────────────────────────────▶
//! ```
//!
//! Entering fullscreen captures the windowed placement once; leaving
//! consumes it once. The display resolution is only touched when the
//! requested client size is smaller than the monitor, and every change is
//! reverted on exit, on focus loss and on destruction.

use super::backend::{Placement, WindowBackend};
use crate::core::config::{CursorMode, WindowMode};

/// Mode state machine for one window
#[derive(Debug, Clone)]
pub(crate) struct ModeController {
    current: Option<WindowMode>,
    requested: (u16, u16),
    native: (u16, u16),
    saved: Option<Placement>,
    resolution_changed: bool,
}

impl ModeController {
    /// Start unspecified with the requested client size
    pub const fn new(requested_width: u16, requested_height: u16) -> Self {
        Self {
            current: None,
            requested: (requested_width, requested_height),
            native: (0, 0),
            saved: None,
            resolution_changed: false,
        }
    }

    /// Current mode; `None` before launch
    pub const fn current(&self) -> Option<WindowMode> {
        self.current
    }

    /// Whether the window is fullscreen
    pub fn is_fullscreen(&self) -> bool {
        self.current == Some(WindowMode::Fullscreen)
    }

    /// Whether the display resolution is currently changed
    #[cfg(test)]
    pub const fn resolution_changed(&self) -> bool {
        self.resolution_changed
    }

    /// Record the native size of the monitor hosting the window
    pub fn set_native_size(&mut self, size: (u16, u16)) {
        self.native = size;
    }

    /// Drive a transition to `target`
    ///
    /// Returns `false` without touching the backend when `target` is the
    /// current mode.
    pub fn apply<B: WindowBackend>(
        &mut self,
        target: WindowMode,
        backend: &mut B,
        cursor: &mut CursorController,
    ) -> bool {
        if self.current == Some(target) {
            return false;
        }

        match target {
            WindowMode::Fullscreen => self.enter_fullscreen(backend),
            WindowMode::Windowed => {
                if self.current == Some(WindowMode::Fullscreen) {
                    self.leave_fullscreen(backend);
                }
            }
        }

        log::debug!("Window mode {:?} -> {target:?}", self.current);
        // The launch transition has nothing to re-apply; the window applies the cursor once shown
        if self.current.is_some() {
            cursor.reapply(backend);
        }
        self.current = Some(target);
        true
    }

    fn enter_fullscreen<B: WindowBackend>(&mut self, backend: &mut B) {
        self.saved = Some(backend.save_placement());
        self.change_resolution(backend);
        backend.strip_decorations();
        let monitor = backend.monitor_rect();
        backend.set_geometry(monitor);
    }

    fn leave_fullscreen<B: WindowBackend>(&mut self, backend: &mut B) {
        self.revert_resolution(backend);
        match self.saved.take() {
            Some(placement) => backend.restore_placement(&placement),
            None => log::warn!("Leaving fullscreen without a saved placement"),
        }
    }

    fn change_resolution<B: WindowBackend>(&mut self, backend: &mut B) {
        let (width, height) = self.requested;
        let (native_width, native_height) = self.native;
        if width < native_width || height < native_height {
            self.resolution_changed = backend.set_display_resolution(width, height);
            if !self.resolution_changed {
                log::warn!("Display refused {width}x{height}; staying at {native_width}x{native_height}");
            }
        }
    }

    fn revert_resolution<B: WindowBackend>(&mut self, backend: &mut B) {
        if self.resolution_changed {
            backend.restore_display_resolution();
            self.resolution_changed = false;
        }
    }

    /// Focus left a fullscreen window: give the desktop back
    pub fn focus_lost<B: WindowBackend>(&mut self, backend: &mut B) {
        if !self.is_fullscreen() {
            return;
        }
        self.revert_resolution(backend);
        backend.minimize();
    }

    /// Focus returned to a fullscreen window: take the display again
    pub fn focus_gained<B: WindowBackend>(&mut self, backend: &mut B, cursor: &mut CursorController) {
        if !self.is_fullscreen() {
            return;
        }
        self.change_resolution(backend);
        backend.restore();
        cursor.reapply(backend);
    }

    /// The window is going away: never leave the display changed
    pub fn release<B: WindowBackend>(&mut self, backend: &mut B) {
        self.revert_resolution(backend);
    }
}

/// Applied cursor state for one window
#[derive(Debug, Clone)]
pub(crate) struct CursorController {
    mode: CursorMode,
    hidden: bool,
}

impl CursorController {
    /// Remember `mode` without applying it
    pub const fn new(mode: CursorMode) -> Self {
        Self { mode, hidden: false }
    }

    /// Last requested mode
    pub const fn mode(&self) -> CursorMode {
        self.mode
    }

    /// Record a mode to apply later
    pub fn set_pending(&mut self, mode: CursorMode) {
        self.mode = mode;
    }

    /// Apply `mode` to the native cursor now
    pub fn apply<B: WindowBackend>(&mut self, mode: CursorMode, backend: &mut B) {
        self.mode = mode;

        if mode.contains(CursorMode::CAPTURED) {
            let client = backend.client_rect_on_screen();
            backend.clip_cursor(Some(client));
        } else if mode.contains(CursorMode::FREE) {
            backend.clip_cursor(None);
        }

        if mode.contains(CursorMode::HIDDEN) && !self.hidden {
            backend.set_cursor_visible(false);
            self.hidden = true;
        } else if mode.contains(CursorMode::VISIBLE) && self.hidden {
            backend.set_cursor_visible(true);
            self.hidden = false;
        }
    }

    /// Apply the current mode again, e.g. after the client rect moved
    pub fn reapply<B: WindowBackend>(&mut self, backend: &mut B) {
        self.apply(self.mode, backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::backend::Rect;
    use crate::window::testing::{Call, MockBackend};

    fn backend() -> MockBackend {
        let backend = MockBackend::new();
        backend.state().monitor = Rect::new(0, 0, 1920, 1080);
        backend
    }

    fn launched(width: u16, height: u16, backend: &mut MockBackend) -> (ModeController, CursorController) {
        let mut mode = ModeController::new(width, height);
        mode.set_native_size((1920, 1080));
        let mut cursor = CursorController::new(CursorMode::default());
        assert!(mode.apply(WindowMode::Windowed, backend, &mut cursor));
        backend.clear_calls();
        (mode, cursor)
    }

    #[test]
    fn test_launch_into_windowed_touches_nothing() {
        let mut backend = backend();
        let mut mode = ModeController::new(800, 600);
        let mut cursor = CursorController::new(CursorMode::default());
        assert!(mode.apply(WindowMode::Windowed, &mut backend, &mut cursor));
        assert!(backend.calls().is_empty());
        assert_eq!(mode.current(), Some(WindowMode::Windowed));
    }

    #[test]
    fn test_enter_fullscreen_sequence() {
        let mut backend = backend();
        let (mut mode, mut cursor) = launched(800, 600, &mut backend);

        assert!(mode.apply(WindowMode::Fullscreen, &mut backend, &mut cursor));
        assert_eq!(
            backend.calls(),
            vec![
                Call::SavePlacement,
                Call::SetDisplayResolution(800, 600),
                Call::StripDecorations,
                Call::MonitorRect,
                Call::SetGeometry(Rect::new(0, 0, 1920, 1080)),
                Call::ClipCursor(None),
            ]
        );
        assert!(mode.resolution_changed());
        assert!(mode.is_fullscreen());
    }

    #[test]
    fn test_native_sized_fullscreen_keeps_resolution() {
        let mut backend = backend();
        let (mut mode, mut cursor) = launched(1920, 1080, &mut backend);

        mode.apply(WindowMode::Fullscreen, &mut backend, &mut cursor);
        assert!(!backend.calls().iter().any(|c| matches!(c, Call::SetDisplayResolution(..))));
        assert!(!mode.resolution_changed());

        mode.apply(WindowMode::Windowed, &mut backend, &mut cursor);
        assert!(!backend.calls().contains(&Call::RestoreDisplayResolution));
    }

    #[test]
    fn test_refused_resolution_is_not_reverted() {
        let mut backend = backend();
        backend.state().accept_resolution = false;
        let (mut mode, mut cursor) = launched(640, 480, &mut backend);

        mode.apply(WindowMode::Fullscreen, &mut backend, &mut cursor);
        assert!(!mode.resolution_changed());
        mode.apply(WindowMode::Windowed, &mut backend, &mut cursor);
        assert!(!backend.calls().contains(&Call::RestoreDisplayResolution));
    }

    #[test]
    fn test_requesting_current_mode_is_a_no_op() {
        let mut backend = backend();
        let (mut mode, mut cursor) = launched(800, 600, &mut backend);

        assert!(!mode.apply(WindowMode::Windowed, &mut backend, &mut cursor));
        mode.apply(WindowMode::Fullscreen, &mut backend, &mut cursor);
        backend.clear_calls();
        assert!(!mode.apply(WindowMode::Fullscreen, &mut backend, &mut cursor));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_round_trip_restores_placement() {
        let mut backend = backend();
        let original = backend.state().placement;
        let (mut mode, mut cursor) = launched(800, 600, &mut backend);

        mode.apply(WindowMode::Fullscreen, &mut backend, &mut cursor);
        assert_ne!(backend.state().placement, original);
        backend.clear_calls();
        mode.apply(WindowMode::Windowed, &mut backend, &mut cursor);

        assert_eq!(
            backend.calls(),
            vec![
                Call::RestoreDisplayResolution,
                Call::RestorePlacement(original),
                Call::ClipCursor(None),
            ]
        );
        assert_eq!(backend.state().placement, original);
        assert!(!mode.resolution_changed());
    }

    #[test]
    fn test_focus_cycle_while_fullscreen() {
        let mut backend = backend();
        let (mut mode, mut cursor) = launched(800, 600, &mut backend);
        mode.apply(WindowMode::Fullscreen, &mut backend, &mut cursor);
        backend.clear_calls();

        mode.focus_lost(&mut backend);
        assert_eq!(backend.calls(), vec![Call::RestoreDisplayResolution, Call::Minimize]);
        assert!(!mode.resolution_changed());

        backend.clear_calls();
        mode.focus_gained(&mut backend, &mut cursor);
        assert_eq!(
            backend.calls(),
            vec![Call::SetDisplayResolution(800, 600), Call::Restore, Call::ClipCursor(None)]
        );
        assert!(mode.resolution_changed());
    }

    #[test]
    fn test_focus_ignored_while_windowed() {
        let mut backend = backend();
        let (mut mode, mut cursor) = launched(800, 600, &mut backend);
        mode.focus_lost(&mut backend);
        mode.focus_gained(&mut backend, &mut cursor);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_release_reverts_once() {
        let mut backend = backend();
        let (mut mode, mut cursor) = launched(800, 600, &mut backend);
        mode.apply(WindowMode::Fullscreen, &mut backend, &mut cursor);
        backend.clear_calls();

        mode.release(&mut backend);
        mode.release(&mut backend);
        assert_eq!(backend.calls(), vec![Call::RestoreDisplayResolution]);
    }

    #[test]
    fn test_cursor_capture_clips_to_client() {
        let mut backend = backend();
        backend.state().client = Rect::new(100, 50, 800, 600);
        let mut cursor = CursorController::new(CursorMode::default());

        cursor.apply(CursorMode::VISIBLE | CursorMode::CAPTURED, &mut backend);
        assert_eq!(
            backend.calls(),
            vec![Call::ClientRectOnScreen, Call::ClipCursor(Some(Rect::new(100, 50, 800, 600)))]
        );

        backend.clear_calls();
        cursor.apply(CursorMode::VISIBLE | CursorMode::FREE, &mut backend);
        assert_eq!(backend.calls(), vec![Call::ClipCursor(None)]);
    }

    #[test]
    fn test_cursor_visibility_toggles_are_guarded() {
        let mut backend = backend();
        let mut cursor = CursorController::new(CursorMode::default());

        cursor.apply(CursorMode::HIDDEN, &mut backend);
        cursor.apply(CursorMode::HIDDEN, &mut backend);
        cursor.apply(CursorMode::VISIBLE, &mut backend);
        cursor.apply(CursorMode::VISIBLE, &mut backend);

        assert_eq!(
            backend.calls(),
            vec![Call::SetCursorVisible(false), Call::SetCursorVisible(true)]
        );
    }
}
