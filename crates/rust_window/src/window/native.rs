//! Generic window state machine
//!
//! [`NativeWindow`] implements [`Window`] once for every substrate. It owns
//! the backend, the raw event queue the backend fills, the translator, the
//! mode and cursor controllers and the handler registry.
//!
//! Borrow discipline: `state` is always borrowed before `backend`, and
//! neither borrow is alive while a handler runs. Everything that needs
//! dispatching is collected first and delivered after the borrows end.

use std::cell::RefCell;
use std::ffi::c_void;

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use super::backend::{CreateRequest, RawEventQueue, WindowBackend};
use super::mode::{CursorController, ModeController};
use super::translate::{EventTranslator, RawEvent};
use super::Window;
use crate::core::config::{ContextKind, CursorMode, WindowConfig, WindowMode};
use crate::error::{WindowError, WindowResult};
use crate::events::{
    Callbacks, CharTypedFn, ClosedFn, ErrorFn, KeyPressedFn, KeyReleasedFn, MouseButtonFn,
    MouseMovedFn, ResizedFn, ScrolledFn, WindowEvent,
};
use crate::input::KeyCode;

/// Native side effects can queue follow-up events while a batch is handled;
/// they are drained in further passes, bounded to keep a misbehaving
/// substrate from spinning forever.
const MAX_DRAIN_PASSES: usize = 8;

#[derive(Debug)]
struct WindowState {
    config: WindowConfig,
    launched: bool,
    closed: bool,
    close_reported: bool,
    should_close: bool,
    translator: EventTranslator,
    mode: ModeController,
    cursor: CursorController,
}

impl WindowState {
    fn alive(&self) -> WindowResult<()> {
        if !self.launched {
            Err(WindowError::NotLaunched)
        } else if self.closed {
            Err(WindowError::Closed)
        } else {
            Ok(())
        }
    }
}

/// [`Window`] implementation over one native backend
pub(crate) struct NativeWindow<B: WindowBackend> {
    id: u32,
    state: RefCell<WindowState>,
    backend: RefCell<B>,
    queue: RawEventQueue,
    callbacks: Callbacks,
}

impl<B: WindowBackend> NativeWindow<B> {
    /// Record the configuration; no native call is made
    pub fn new(id: u32, config: WindowConfig, backend: B) -> Self {
        let state = WindowState {
            translator: EventTranslator::new(config.width, config.height),
            mode: ModeController::new(config.width, config.height),
            cursor: CursorController::new(config.cursor_mode),
            config,
            launched: false,
            closed: false,
            close_reported: false,
            should_close: false,
        };
        Self {
            id,
            state: RefCell::new(state),
            backend: RefCell::new(backend),
            queue: RawEventQueue::new(),
            callbacks: Callbacks::new(),
        }
    }

    /// Log and deliver an error to the error handler, passing it through
    fn report(&self, error: WindowError) -> WindowError {
        log::warn!("Window {}: {error}", self.id);
        self.callbacks.dispatch(&WindowEvent::Error {
            code: error.code(),
            message: error.to_string(),
        });
        error
    }

    fn check<T>(&self, result: WindowResult<T>) -> WindowResult<T> {
        result.map_err(|error| self.report(error))
    }

    fn ensure_alive(&self) -> WindowResult<()> {
        let alive = self.state.borrow().alive();
        self.check(alive)
    }

    fn launch_native(&self) -> WindowResult<()> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.launched {
            return Err(WindowError::AlreadyLaunched);
        }
        state.config.validate()?;

        let mut backend = self.backend.borrow_mut();
        let config = &state.config;
        let request = CreateRequest {
            title: &config.title,
            width: config.width,
            height: config.height,
            resizable: config.resizable,
            context: config.context,
            gl: &config.gl,
        };
        backend.create(&request, &self.queue)?;

        state.mode.set_native_size(backend.monitor_rect().size());
        if state.mode.apply(config.window_mode, &mut *backend, &mut state.cursor)
            && config.window_mode == WindowMode::Fullscreen
        {
            state.translator.arm_resize_hold();
        }
        backend.show();
        state.cursor.reapply(&mut *backend);
        state.launched = true;

        log::info!(
            "Launched window {} \"{}\" ({}x{}, {:?}, {:?})",
            self.id,
            config.title,
            config.width,
            config.height,
            config.window_mode,
            config.context
        );
        Ok(())
    }

    /// Drain the raw queue, translate, and dispatch
    fn process_queue(&self) {
        let mut events = Vec::new();
        for _ in 0..MAX_DRAIN_PASSES {
            let raw_events = self.queue.drain();
            if raw_events.is_empty() {
                break;
            }
            let mut state = self.state.borrow_mut();
            for raw in raw_events {
                self.handle_raw(&mut state, raw, &mut events);
            }
        }
        self.state.borrow_mut().translator.finish_drain(&mut events);
        self.callbacks.dispatch_all(events);
    }

    fn handle_raw(&self, state: &mut WindowState, raw: RawEvent, out: &mut Vec<WindowEvent>) {
        match raw {
            RawEvent::CloseRequested => {
                log::debug!("Window {} received a close request", self.id);
                state.should_close = true;
            }
            RawEvent::FocusLost => {
                state.mode.focus_lost(&mut *self.backend.borrow_mut());
            }
            RawEvent::FocusGained => {
                state
                    .mode
                    .focus_gained(&mut *self.backend.borrow_mut(), &mut state.cursor);
            }
            RawEvent::Moved => {
                if state.closed || state.mode.is_fullscreen() {
                    return;
                }
                let mut backend = self.backend.borrow_mut();
                state.mode.set_native_size(backend.monitor_rect().size());
                if state.cursor.mode().contains(CursorMode::CAPTURED) {
                    state.cursor.reapply(&mut *backend);
                }
            }
            RawEvent::Destroyed => {
                state.mode.release(&mut *self.backend.borrow_mut());
                state.closed = true;
                if !state.close_reported {
                    state.close_reported = true;
                    out.push(WindowEvent::Closed);
                }
            }
            other => state.translator.translate(&other, out),
        }
    }
}

impl<B: WindowBackend> Window for NativeWindow<B> {
    fn id(&self) -> u32 {
        self.id
    }

    fn launch(&self) -> WindowResult<()> {
        let result = self.launch_native();
        self.check(result)
    }

    fn is_launched(&self) -> bool {
        self.state.borrow().launched
    }

    fn poll_events(&self) {
        if self.ensure_alive().is_err() {
            return;
        }
        self.backend.borrow_mut().pump_events(&self.queue);
        self.process_queue();
    }

    fn swap_buffers(&self) -> WindowResult<()> {
        self.ensure_alive()?;
        let context = self.state.borrow().config.context;
        let mut backend = self.backend.borrow_mut();
        let result = match (context, backend.has_context()) {
            (ContextKind::None, _) => Ok(()),
            (ContextKind::OpenGl, true) => backend.swap_buffers(),
            (ContextKind::OpenGl, false) => {
                Err(WindowError::Context("swap_buffers needs an active context".into()))
            }
        };
        drop(backend);
        self.check(result)
    }

    fn update(&self) {
        self.poll_events();
        if self.state.borrow().alive().is_ok() {
            // Failures were already reported through the error handler
            let _ = self.swap_buffers();
        }
    }

    fn make_current(&self) -> WindowResult<()> {
        self.ensure_alive()?;
        let mut backend = self.backend.borrow_mut();
        let result = if backend.has_context() {
            backend.make_current()
        } else {
            Err(WindowError::Context("window has no OpenGL context".into()))
        };
        drop(backend);
        self.check(result)
    }

    fn get_proc_address(&self, name: &str) -> *const c_void {
        if self.state.borrow().alive().is_err() {
            return std::ptr::null();
        }
        self.backend.borrow().get_proc_address(name)
    }

    fn should_close(&self) -> bool {
        self.state.borrow().should_close
    }

    fn close(&self) {
        {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            if !state.launched || state.closed {
                return;
            }
            let mut backend = self.backend.borrow_mut();
            state.mode.release(&mut *backend);
            if state.cursor.mode().contains(CursorMode::CAPTURED) {
                backend.clip_cursor(None);
            }
            backend.destroy();
            state.closed = true;
        }
        log::info!("Closed window {}", self.id);
        self.process_queue();
    }

    fn width(&self) -> u16 {
        self.state.borrow().translator.width()
    }

    fn height(&self) -> u16 {
        self.state.borrow().translator.height()
    }

    fn mouse_coords(&self) -> (u16, u16) {
        self.state.borrow().translator.mouse()
    }

    fn minimized(&self) -> bool {
        self.state.borrow().translator.minimized()
    }

    fn is_key_pressed(&self, key: KeyCode) -> bool {
        if self.state.borrow().alive().is_err() {
            return false;
        }
        self.backend.borrow().is_key_down(key)
    }

    fn set_cursor_mode(&self, mode: CursorMode) -> WindowResult<()> {
        if mode.is_conflicting() {
            return Err(self.report(WindowError::BadArgs(format!("conflicting cursor mode {mode:?}"))));
        }
        let mut state = self.state.borrow_mut();
        if state.alive().is_err() {
            // Applied at launch
            state.cursor.set_pending(mode);
            state.config.cursor_mode = mode;
            return Ok(());
        }
        state.config.cursor_mode = mode;
        state.cursor.apply(mode, &mut *self.backend.borrow_mut());
        Ok(())
    }

    fn cursor_mode(&self) -> CursorMode {
        self.state.borrow().cursor.mode()
    }

    fn set_window_mode(&self, mode: WindowMode) -> WindowResult<()> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if !state.launched {
            state.config.window_mode = mode;
            return Ok(());
        }
        if state.closed {
            drop(guard);
            return Err(self.report(WindowError::Closed));
        }

        if state.mode.apply(mode, &mut *self.backend.borrow_mut(), &mut state.cursor) {
            state.translator.arm_resize_hold();
            state.config.window_mode = mode;
        }
        Ok(())
    }

    fn window_mode(&self) -> WindowMode {
        let state = self.state.borrow();
        state.mode.current().unwrap_or(state.config.window_mode)
    }

    fn resize(&self, width: u16, height: u16) -> WindowResult<()> {
        self.ensure_alive()?;
        let result = {
            let state = self.state.borrow();
            if state.mode.is_fullscreen() {
                Err(WindowError::InvalidState("Cannot resize a fullscreen window".into()))
            } else if width == 0 || height == 0 {
                Err(WindowError::BadArgs(format!("cannot resize to {width}x{height}")))
            } else {
                self.backend.borrow_mut().resize_client(width, height);
                Ok(())
            }
        };
        self.check(result)
    }

    fn set_title(&self, title: &str) -> WindowResult<()> {
        if title.contains('\0') {
            return Err(self.report(WindowError::BadArgs("title must not contain NUL characters".into())));
        }
        let result = {
            let mut state = self.state.borrow_mut();
            state.config.title = title.to_string();
            if state.alive().is_ok() {
                self.backend.borrow_mut().set_title(title)
            } else {
                Ok(())
            }
        };
        self.check(result)
    }

    fn title(&self) -> String {
        self.state.borrow().config.title.clone()
    }

    fn native_handle(&self) -> *mut c_void {
        self.backend.borrow().native_handle()
    }

    fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        self.backend.borrow().raw_window_handle()
    }

    fn raw_display_handle(&self) -> Option<RawDisplayHandle> {
        self.backend.borrow().raw_display_handle()
    }

    fn on_key_pressed(&self, handler: Box<KeyPressedFn>) {
        self.callbacks.set_key_pressed(handler);
    }

    fn on_key_released(&self, handler: Box<KeyReleasedFn>) {
        self.callbacks.set_key_released(handler);
    }

    fn on_resized(&self, handler: Box<ResizedFn>) {
        self.callbacks.set_resized(handler);
    }

    fn on_closed(&self, handler: Box<ClosedFn>) {
        self.callbacks.set_closed(handler);
    }

    fn on_mouse_moved(&self, handler: Box<MouseMovedFn>) {
        self.callbacks.set_mouse_moved(handler);
    }

    fn on_mouse_pressed(&self, handler: Box<MouseButtonFn>) {
        self.callbacks.set_mouse_pressed(handler);
    }

    fn on_mouse_released(&self, handler: Box<MouseButtonFn>) {
        self.callbacks.set_mouse_released(handler);
    }

    fn on_scrolled(&self, handler: Box<ScrolledFn>) {
        self.callbacks.set_scrolled(handler);
    }

    fn on_char_typed(&self, handler: Box<CharTypedFn>) {
        self.callbacks.set_char_typed(handler);
    }

    fn on_error(&self, handler: Box<ErrorFn>) {
        self.callbacks.set_error(handler);
    }
}

impl<B: WindowBackend> Drop for NativeWindow<B> {
    fn drop(&mut self) {
        self.close();
    }
}
