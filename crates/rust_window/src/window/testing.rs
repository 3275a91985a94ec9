//! Recording backend for headless tests
//!
//! [`MockBackend`] is a cheap handle onto shared [`MockState`], so a test can
//! keep one handle while the window owns another, then inject native events
//! and inspect the native calls the window made.

use std::cell::{RefCell, RefMut};
use std::ffi::c_void;
use std::rc::Rc;

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use super::backend::{CreateRequest, Placement, RawEventQueue, Rect, WindowBackend};
use super::translate::RawEvent;
use crate::core::config::ContextKind;
use crate::error::{WindowError, WindowResult};
use crate::input::KeyCode;

/// A native call the window made
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Create { title: String, width: u16, height: u16, context: ContextKind },
    Show,
    Destroy,
    SwapBuffers,
    MakeCurrent,
    SetTitle(String),
    ResizeClient(u16, u16),
    MonitorRect,
    SavePlacement,
    RestorePlacement(Placement),
    StripDecorations,
    SetGeometry(Rect),
    SetDisplayResolution(u16, u16),
    RestoreDisplayResolution,
    Minimize,
    Restore,
    ClientRectOnScreen,
    ClipCursor(Option<Rect>),
    SetCursorVisible(bool),
}

/// Observable and scriptable state behind a [`MockBackend`]
#[derive(Debug)]
pub(crate) struct MockState {
    pub calls: Vec<Call>,
    pub monitor: Rect,
    pub client: Rect,
    pub placement: Placement,
    pub accept_resolution: bool,
    pub fail_create: Option<WindowError>,
    pub keys_down: Vec<KeyCode>,
    pub alive: bool,
    pub context: bool,
    pub pending: Vec<RawEvent>,
    queue: Option<RawEventQueue>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            monitor: Rect::new(0, 0, 1920, 1080),
            client: Rect::new(108, 108, 800, 600),
            placement: Placement {
                rect: Rect::new(100, 100, 816, 639),
                style: 0x00CF_0000,
                show_state: 1,
            },
            accept_resolution: true,
            fail_create: None,
            keys_down: Vec::new(),
            alive: false,
            context: false,
            pending: Vec::new(),
            queue: None,
        }
    }
}

/// Recording stand-in for a native substrate
#[derive(Debug, Clone, Default)]
pub(crate) struct MockBackend {
    state: Rc<RefCell<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RefMut<'_, MockState> {
        self.state.borrow_mut()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Queue a native event for the next pump
    pub fn inject(&self, event: RawEvent) {
        self.state.borrow_mut().pending.push(event);
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    /// Native side effects arrive synchronously, like Win32's sent messages
    fn emit(&self, event: RawEvent) {
        let queue = self.state.borrow().queue.clone();
        if let Some(queue) = queue {
            queue.push(event);
        }
    }

    fn emit_client_size(&self, rect: Rect) {
        let (width, height) = rect.size();
        self.emit(RawEvent::Resized { width, height });
    }
}

impl WindowBackend for MockBackend {
    fn create(&mut self, request: &CreateRequest<'_>, queue: &RawEventQueue) -> WindowResult<()> {
        self.record(Call::Create {
            title: request.title.to_string(),
            width: request.width,
            height: request.height,
            context: request.context,
        });
        let mut state = self.state.borrow_mut();
        if let Some(error) = state.fail_create.take() {
            return Err(error);
        }
        state.alive = true;
        state.context = request.context == ContextKind::OpenGl;
        state.queue = Some(queue.clone());
        Ok(())
    }

    fn show(&mut self) {
        self.record(Call::Show);
    }

    fn destroy(&mut self) {
        self.record(Call::Destroy);
        {
            let mut state = self.state.borrow_mut();
            state.alive = false;
            state.context = false;
        }
        self.emit(RawEvent::Destroyed);
        self.state.borrow_mut().queue = None;
    }

    fn is_alive(&self) -> bool {
        self.state.borrow().alive
    }

    fn pump_events(&mut self, queue: &RawEventQueue) {
        let pending: Vec<RawEvent> = self.state.borrow_mut().pending.drain(..).collect();
        for event in pending {
            queue.push(event);
        }
    }

    fn has_context(&self) -> bool {
        self.state.borrow().context
    }

    fn swap_buffers(&mut self) -> WindowResult<()> {
        self.record(Call::SwapBuffers);
        Ok(())
    }

    fn make_current(&mut self) -> WindowResult<()> {
        self.record(Call::MakeCurrent);
        Ok(())
    }

    fn get_proc_address(&self, name: &str) -> *const c_void {
        if self.has_context() && name.starts_with("gl") {
            0x1000 as *const c_void
        } else {
            std::ptr::null()
        }
    }

    fn native_handle(&self) -> *mut c_void {
        if self.is_alive() {
            0xBEEF as *mut c_void
        } else {
            std::ptr::null_mut()
        }
    }

    fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        None
    }

    fn raw_display_handle(&self) -> Option<RawDisplayHandle> {
        None
    }

    fn set_title(&mut self, title: &str) -> WindowResult<()> {
        self.record(Call::SetTitle(title.to_string()));
        Ok(())
    }

    fn is_key_down(&self, key: KeyCode) -> bool {
        self.state.borrow().keys_down.contains(&key)
    }

    fn resize_client(&mut self, width: u16, height: u16) {
        self.record(Call::ResizeClient(width, height));
        self.emit(RawEvent::Resized { width, height });
    }

    fn monitor_rect(&self) -> Rect {
        self.record(Call::MonitorRect);
        self.state.borrow().monitor
    }

    fn save_placement(&self) -> Placement {
        self.record(Call::SavePlacement);
        self.state.borrow().placement
    }

    fn restore_placement(&mut self, placement: &Placement) {
        self.record(Call::RestorePlacement(*placement));
        self.state.borrow_mut().placement = *placement;
        self.emit_client_size(self.state.borrow().client);
    }

    fn strip_decorations(&mut self) {
        self.record(Call::StripDecorations);
        let mut state = self.state.borrow_mut();
        state.placement.style = 0;
        let rect = state.placement.rect;
        drop(state);
        // Losing the frame grows the client area to the old frame size
        self.emit_client_size(rect);
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.record(Call::SetGeometry(rect));
        self.state.borrow_mut().placement.rect = rect;
        self.emit_client_size(rect);
    }

    fn set_display_resolution(&mut self, width: u16, height: u16) -> bool {
        self.record(Call::SetDisplayResolution(width, height));
        self.state.borrow().accept_resolution
    }

    fn restore_display_resolution(&mut self) {
        self.record(Call::RestoreDisplayResolution);
    }

    fn minimize(&mut self) {
        self.record(Call::Minimize);
        self.emit(RawEvent::Resized { width: 0, height: 0 });
    }

    fn restore(&mut self) {
        self.record(Call::Restore);
        let rect = self.state.borrow().placement.rect;
        self.emit_client_size(rect);
    }

    fn client_rect_on_screen(&self) -> Rect {
        self.record(Call::ClientRectOnScreen);
        self.state.borrow().client
    }

    fn clip_cursor(&mut self, rect: Option<Rect>) {
        self.record(Call::ClipCursor(rect));
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.record(Call::SetCursorVisible(visible));
    }
}
