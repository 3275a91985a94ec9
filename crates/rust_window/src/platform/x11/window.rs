//! X11 window backend and event translation

use std::ffi::{c_char, c_int, c_uint, c_ulong, c_void, CString};
use std::rc::Rc;
use std::{mem, ptr};

use raw_window_handle::{RawDisplayHandle, RawWindowHandle, XlibDisplayHandle, XlibWindowHandle};

use super::display::Connection;
use super::gl::GlxContext;
use super::ffi;
use super::randr::{self, SavedCrtc};
use crate::context::GraphicsContext;
use crate::core::config::ContextKind;
use crate::error::{WindowError, WindowResult};
use crate::input::{keysym, KeyCode};
use crate::window::backend::{CreateRequest, Placement, RawEventQueue, Rect, WindowBackend};
use crate::window::translate::{RawEvent, WHEEL_DELTA};

const EVENT_MASK: i64 = ffi::KeyPressMask
    | ffi::KeyReleaseMask
    | ffi::ButtonPressMask
    | ffi::ButtonReleaseMask
    | ffi::PointerMotionMask
    | ffi::StructureNotifyMask
    | ffi::FocusChangeMask
    | ffi::ExposureMask;

/// Scroll or button event for an X11 button number
///
/// Buttons 4/5 are the vertical wheel, 6/7 the horizontal one; wheel
/// buttons only report on press.
fn button_event(button: u32, pressed: bool) -> Option<RawEvent> {
    let wheel = |delta, vertical| pressed.then_some(RawEvent::Scrolled { delta, vertical });
    match button {
        4 => wheel(WHEEL_DELTA, true),
        5 => wheel(-WHEEL_DELTA, true),
        6 => wheel(-WHEEL_DELTA, false),
        7 => wheel(WHEEL_DELTA, false),
        other => keysym::button_to_key_code(other).map(|key| {
            if pressed {
                RawEvent::MousePressed(key)
            } else {
                RawEvent::MouseReleased(key)
            }
        }),
    }
}

/// `_MOTIF_WM_HINTS` property value toggling decorations only
const fn motif_hints(decorated: bool) -> [c_ulong; 5] {
    [ffi::MWM_HINTS_DECORATIONS as c_ulong, 0, decorated as c_ulong, 0, 0]
}

/// Native window on an X display connection
pub(crate) struct X11Backend {
    id: u32,
    connection: Option<Rc<Connection>>,
    window: ffi::Window,
    colormap: ffi::Colormap,
    blank_cursor: ffi::Cursor,
    visual_id: ffi::VisualID,
    context: Option<GlxContext>,
    mapped: bool,
    decorated: bool,
    saved_crtc: Option<SavedCrtc>,
    queue: Option<RawEventQueue>,
}

impl X11Backend {
    /// Remember the id; the display is opened at launch
    pub fn new(id: u32, _module: usize) -> Self {
        Self {
            id,
            connection: None,
            window: 0,
            colormap: 0,
            blank_cursor: 0,
            visual_id: 0,
            context: None,
            mapped: false,
            decorated: true,
            saved_crtc: None,
            queue: None,
        }
    }

    /// Run `f` against the live connection and window, else return `default`
    fn with_window<T>(&self, default: T, f: impl FnOnce(&Connection, ffi::Window) -> T) -> T {
        match self.connection.as_deref() {
            Some(connection) if self.window != 0 => f(connection, self.window),
            _ => default,
        }
    }

    fn create_window(
        &mut self,
        connection: &Rc<Connection>,
        request: &CreateRequest<'_>,
        visual: *mut ffi::Visual,
        depth: c_int,
    ) -> WindowResult<()> {
        let xlib = &connection.xlib;
        let display = connection.display;

        unsafe {
            let mut supported = ffi::False;
            (xlib.XkbSetDetectableAutoRepeat)(display, ffi::True, &mut supported);
            if supported == ffi::False {
                log::debug!("Detectable auto-repeat unsupported; repeats arrive as release/press pairs");
            }
        }

        self.colormap = unsafe { (xlib.XCreateColormap)(display, connection.root, visual, ffi::AllocNone) };
        let mut attributes = ffi::XSetWindowAttributes {
            event_mask: EVENT_MASK,
            colormap: self.colormap,
            border_pixel: 0,
            ..unsafe { mem::zeroed() }
        };
        self.window = unsafe {
            (xlib.XCreateWindow)(
                display,
                connection.root,
                0,
                0,
                c_uint::from(request.width),
                c_uint::from(request.height),
                0,
                depth,
                ffi::InputOutput as c_uint,
                visual,
                ffi::CWColormap | ffi::CWEventMask | ffi::CWBorderPixel,
                &mut attributes,
            )
        };
        if self.window == 0 {
            return Err(WindowError::WindowCreation("XCreateWindow failed".into()));
        }

        unsafe {
            let mut protocols = [connection.atoms.wm_delete_window];
            (xlib.XSetWMProtocols)(display, self.window, protocols.as_mut_ptr(), 1);

            if !request.resizable {
                let hints = (xlib.XAllocSizeHints)();
                if let Some(hints) = hints.as_mut() {
                    hints.flags = ffi::PMinSize | ffi::PMaxSize;
                    hints.min_width = c_int::from(request.width);
                    hints.max_width = c_int::from(request.width);
                    hints.min_height = c_int::from(request.height);
                    hints.max_height = c_int::from(request.height);
                    (xlib.XSetWMNormalHints)(display, self.window, hints);
                    (xlib.XFree)((hints as *mut ffi::XSizeHints).cast());
                }
            }

            let empty = [0 as c_char; 8];
            let pixmap = (xlib.XCreateBitmapFromData)(display, self.window, empty.as_ptr(), 8, 8);
            let mut black: ffi::XColor = mem::zeroed();
            let black: *mut ffi::XColor = &mut black;
            self.blank_cursor = (xlib.XCreatePixmapCursor)(display, pixmap, pixmap, black, black, 0, 0);
            (xlib.XFreePixmap)(display, pixmap);
        }

        store_title(connection, self.window, request.title)?;
        Ok(())
    }

    fn release(&mut self) {
        // The context goes before the window it draws to
        self.context = None;
        let Some(connection) = self.connection.take() else {
            return;
        };
        if let Some(saved) = self.saved_crtc.take() {
            randr::restore_mode(&connection, &saved);
        }
        let xlib = &connection.xlib;
        unsafe {
            if self.window != 0 {
                (xlib.XUngrabPointer)(connection.display, ffi::CurrentTime);
                (xlib.XDestroyWindow)(connection.display, self.window);
            }
            if self.blank_cursor != 0 {
                (xlib.XFreeCursor)(connection.display, self.blank_cursor);
            }
            if self.colormap != 0 {
                (xlib.XFreeColormap)(connection.display, self.colormap);
            }
        }
        connection.flush();
        log::debug!("Released X window {:#x} of window {}", self.window, self.id);
        self.window = 0;
        self.blank_cursor = 0;
        self.colormap = 0;
        self.mapped = false;
    }

    fn window_attributes(&self) -> Option<ffi::XWindowAttributes> {
        self.with_window(None, |connection, window| unsafe {
            let mut attributes: ffi::XWindowAttributes = mem::zeroed();
            ((connection.xlib.XGetWindowAttributes)(connection.display, window, &mut attributes) != 0)
                .then_some(attributes)
        })
    }

    /// Client origin in root coordinates
    fn origin(&self) -> (i32, i32) {
        self.with_window((0, 0), |connection, window| unsafe {
            let (mut x, mut y, mut child) = (0, 0, 0);
            (connection.xlib.XTranslateCoordinates)(
                connection.display,
                window,
                connection.root,
                0,
                0,
                &mut x,
                &mut y,
                &mut child,
            );
            (x, y)
        })
    }

    fn center(&self) -> (i32, i32) {
        let (x, y) = self.origin();
        let (width, height) = self
            .window_attributes()
            .map_or((0, 0), |attributes| (attributes.width, attributes.height));
        (x + width / 2, y + height / 2)
    }

    fn set_decorations(&self, decorated: bool) {
        self.with_window((), |connection, window| unsafe {
            let hints = motif_hints(decorated);
            let atom = connection.atoms.motif_wm_hints;
            (connection.xlib.XChangeProperty)(
                connection.display,
                window,
                atom,
                atom,
                32,
                ffi::PropModeReplace,
                hints.as_ptr().cast(),
                hints.len() as c_int,
            );
        });
    }

    fn set_fullscreen_state(&self, fullscreen: bool) {
        let mapped = self.mapped;
        self.with_window((), |connection, window| unsafe {
            let atoms = &connection.atoms;
            if mapped {
                let mut message: ffi::XClientMessageEvent = mem::zeroed();
                message.type_ = ffi::ClientMessage;
                message.window = window;
                message.message_type = atoms.net_wm_state;
                message.format = 32;
                let action = if fullscreen { ffi::NET_WM_STATE_ADD } else { ffi::NET_WM_STATE_REMOVE };
                message.data.set_long(0, action);
                message.data.set_long(1, atoms.net_wm_state_fullscreen as i64);
                message.data.set_long(3, 1);
                let mut event: ffi::XEvent = message.into();
                (connection.xlib.XSendEvent)(
                    connection.display,
                    connection.root,
                    ffi::False,
                    ffi::SubstructureRedirectMask | ffi::SubstructureNotifyMask,
                    &mut event,
                );
            } else {
                // Window managers read the initial state when the window maps
                let state = [atoms.net_wm_state_fullscreen];
                (connection.xlib.XChangeProperty)(
                    connection.display,
                    window,
                    atoms.net_wm_state,
                    ffi::XA_ATOM,
                    32,
                    ffi::PropModeReplace,
                    state.as_ptr().cast(),
                    c_int::from(fullscreen),
                );
            }
            connection.flush();
        });
    }

    fn translate(&mut self, event: ffi::XEvent, queue: &RawEventQueue) {
        let Some(connection) = self.connection.clone() else {
            return;
        };
        let xlib = &connection.xlib;
        match event.get_type() {
            ffi::KeyPress => {
                let mut key: ffi::XKeyEvent = event.into();
                let (mut lower, mut upper) = (0, 0);
                unsafe {
                    let sym = (xlib.XkbKeycodeToKeysym)(connection.display, key.keycode as u8, 0, 0);
                    (xlib.XConvertCase)(sym, &mut lower, &mut upper);
                }
                queue.push(RawEvent::KeyDown {
                    key: keysym::to_key_code(lower as u32),
                    repeat: None,
                });

                let mut buffer = [0 as c_char; 32];
                let count = unsafe {
                    (xlib.XLookupString)(
                        &mut key,
                        buffer.as_mut_ptr(),
                        buffer.len() as c_int,
                        ptr::null_mut(),
                        ptr::null_mut(),
                    )
                };
                // Latin-1, one byte per character
                for &byte in &buffer[..count.clamp(0, 32) as usize] {
                    queue.push(RawEvent::Char(char::from(byte as u8)));
                }
            }
            ffi::KeyRelease => {
                let key: ffi::XKeyEvent = event.into();
                let (mut lower, mut upper) = (0, 0);
                unsafe {
                    let sym = (xlib.XkbKeycodeToKeysym)(connection.display, key.keycode as u8, 0, 0);
                    (xlib.XConvertCase)(sym, &mut lower, &mut upper);
                }
                queue.push(RawEvent::KeyUp(keysym::to_key_code(lower as u32)));
            }
            kind @ (ffi::ButtonPress | ffi::ButtonRelease) => {
                let button: ffi::XButtonEvent = event.into();
                if let Some(raw) = button_event(button.button, kind == ffi::ButtonPress) {
                    queue.push(raw);
                }
            }
            ffi::MotionNotify => {
                let motion: ffi::XMotionEvent = event.into();
                queue.push(RawEvent::MouseMoved { x: motion.x, y: motion.y });
            }
            ffi::ConfigureNotify => {
                let configure: ffi::XConfigureEvent = event.into();
                let rect = Rect::new(0, 0, configure.width.max(0) as u32, configure.height.max(0) as u32);
                let (width, height) = rect.size();
                queue.push(RawEvent::Resized { width, height });
                queue.push(RawEvent::Moved);
            }
            kind @ (ffi::FocusIn | ffi::FocusOut) => {
                let focus: ffi::XFocusChangeEvent = event.into();
                // Pointer grabs for cursor capture produce these too
                if focus.mode == ffi::NotifyGrab || focus.mode == ffi::NotifyUngrab {
                    return;
                }
                queue.push(if kind == ffi::FocusIn {
                    RawEvent::FocusGained
                } else {
                    RawEvent::FocusLost
                });
            }
            ffi::UnmapNotify => {
                self.mapped = false;
                queue.push(RawEvent::Resized { width: 0, height: 0 });
            }
            ffi::MapNotify => {
                self.mapped = true;
                if let Some(attributes) = self.window_attributes() {
                    let rect = Rect::new(0, 0, attributes.width.max(0) as u32, attributes.height.max(0) as u32);
                    let (width, height) = rect.size();
                    queue.push(RawEvent::Resized { width, height });
                }
            }
            ffi::ClientMessage => {
                let message: ffi::XClientMessageEvent = event.into();
                if message.message_type == connection.atoms.wm_protocols
                    && message.data.get_long(0) as ffi::Atom == connection.atoms.wm_delete_window
                {
                    queue.push(RawEvent::CloseRequested);
                }
            }
            ffi::MappingNotify => {
                let mut mapping: ffi::XMappingEvent = event.into();
                unsafe { (xlib.XRefreshKeyboardMapping)(&mut mapping) };
            }
            _ => {}
        }
    }
}

fn store_title(connection: &Connection, window: ffi::Window, title: &str) -> WindowResult<()> {
    let name = CString::new(title)
        .map_err(|_| WindowError::BadArgs("title must not contain NUL characters".into()))?;
    unsafe {
        (connection.xlib.XStoreName)(connection.display, window, name.as_ptr());
        (connection.xlib.XChangeProperty)(
            connection.display,
            window,
            connection.atoms.net_wm_name,
            connection.atoms.utf8_string,
            8,
            ffi::PropModeReplace,
            name.as_ptr().cast(),
            title.len() as c_int,
        );
    }
    connection.flush();
    Ok(())
}

impl WindowBackend for X11Backend {
    fn create(&mut self, request: &CreateRequest<'_>, queue: &RawEventQueue) -> WindowResult<()> {
        let connection = Rc::new(Connection::open()?);
        self.connection = Some(Rc::clone(&connection));

        let mut context = None;
        let (visual, depth) = if request.context == ContextKind::OpenGl {
            let mut glx = GlxContext::new(Rc::clone(&connection), request.gl.clone());
            if let Err(error) = glx.setup() {
                self.release();
                return Err(error);
            }
            let Some(info) = glx.visual() else {
                self.release();
                return Err(WindowError::Context("setup produced no visual".into()));
            };
            let chosen = (info.visual, info.depth);
            self.visual_id = info.visualid;
            context = Some(glx);
            chosen
        } else {
            unsafe {
                let visual = (connection.xlib.XDefaultVisual)(connection.display, connection.screen);
                self.visual_id = (connection.xlib.XVisualIDFromVisual)(visual);
                (visual, (connection.xlib.XDefaultDepth)(connection.display, connection.screen))
            }
        };

        let created = self.create_window(&connection, request, visual, depth).and_then(|()| {
            match context.as_mut() {
                Some(glx) => {
                    glx.attach(self.window);
                    glx.activate()
                }
                None => Ok(()),
            }
        });
        if let Err(error) = created {
            drop(context);
            self.release();
            return Err(error);
        }

        if let Some(glx) = &context {
            log::info!("Window {} has an OpenGL {:?} context", self.id, glx.version());
        }
        self.context = context;
        self.queue = Some(queue.clone());
        log::debug!("Created X window {:#x} for window {}", self.window, self.id);
        Ok(())
    }

    fn show(&mut self) {
        self.with_window((), |connection, window| unsafe {
            (connection.xlib.XMapRaised)(connection.display, window);
            connection.flush();
        });
    }

    fn destroy(&mut self) {
        let alive = self.is_alive();
        self.release();
        if let Some(queue) = self.queue.take() {
            if alive {
                queue.push(RawEvent::Destroyed);
            }
        }
    }

    fn is_alive(&self) -> bool {
        self.connection.is_some() && self.window != 0
    }

    fn pump_events(&mut self, queue: &RawEventQueue) {
        let Some(connection) = self.connection.clone() else {
            return;
        };
        let xlib = &connection.xlib;
        while unsafe { (xlib.XPending)(connection.display) } > 0 {
            let mut event: ffi::XEvent = unsafe { mem::zeroed() };
            unsafe { (xlib.XNextEvent)(connection.display, &mut event) };
            self.translate(event, queue);
        }
    }

    fn has_context(&self) -> bool {
        self.context.is_some()
    }

    fn swap_buffers(&mut self) -> WindowResult<()> {
        match &self.context {
            Some(context) => context.swap_buffers(),
            None => Err(WindowError::Context("no GLX context".into())),
        }
    }

    fn make_current(&mut self) -> WindowResult<()> {
        match &self.context {
            Some(context) => context.make_current(),
            None => Err(WindowError::Context("no GLX context".into())),
        }
    }

    fn get_proc_address(&self, name: &str) -> *const c_void {
        self.context
            .as_ref()
            .map_or(ptr::null(), |context| context.get_proc_address(name))
    }

    fn native_handle(&self) -> *mut c_void {
        self.with_window(ptr::null_mut(), |connection, _| connection.display.cast())
    }

    fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        self.with_window(None, |_, window| {
            let mut handle = XlibWindowHandle::empty();
            handle.window = window;
            handle.visual_id = self.visual_id;
            Some(RawWindowHandle::Xlib(handle))
        })
    }

    fn raw_display_handle(&self) -> Option<RawDisplayHandle> {
        self.connection.as_deref().map(|connection| {
            let mut handle = XlibDisplayHandle::empty();
            handle.display = connection.display.cast();
            handle.screen = connection.screen;
            RawDisplayHandle::Xlib(handle)
        })
    }

    fn set_title(&mut self, title: &str) -> WindowResult<()> {
        self.with_window(Ok(()), |connection, window| store_title(connection, window, title))
    }

    fn is_key_down(&self, key: KeyCode) -> bool {
        self.with_window(false, |connection, window| unsafe {
            let xlib = &connection.xlib;
            if key.is_mouse_button() {
                let mask = match key {
                    KeyCode::MouseLeft => ffi::Button1Mask,
                    KeyCode::MouseMiddle => ffi::Button2Mask,
                    KeyCode::MouseRight => ffi::Button3Mask,
                    _ => return false,
                };
                let (mut root, mut child) = (0, 0);
                let (mut root_x, mut root_y, mut x, mut y) = (0, 0, 0, 0);
                let mut state = 0;
                (xlib.XQueryPointer)(
                    connection.display,
                    window,
                    &mut root,
                    &mut child,
                    &mut root_x,
                    &mut root_y,
                    &mut x,
                    &mut y,
                    &mut state,
                );
                return state & mask != 0;
            }

            let mut keys = [0 as c_char; 32];
            (xlib.XQueryKeymap)(connection.display, keys.as_mut_ptr());
            keysym::from_key_code(key).into_iter().any(|sym| {
                let code = usize::from((xlib.XKeysymToKeycode)(connection.display, c_ulong::from(sym)));
                code != 0 && keys[code / 8] as u8 & (1 << (code % 8)) != 0
            })
        })
    }

    fn resize_client(&mut self, width: u16, height: u16) {
        self.with_window((), |connection, window| unsafe {
            (connection.xlib.XResizeWindow)(connection.display, window, c_uint::from(width), c_uint::from(height));
            connection.flush();
        });
    }

    fn monitor_rect(&self) -> Rect {
        let (x, y) = self.center();
        self.connection.as_deref().map_or(Rect::default(), |connection| {
            randr::monitor_at(connection, x, y).unwrap_or_else(|| unsafe {
                let width = (connection.xlib.XDisplayWidth)(connection.display, connection.screen);
                let height = (connection.xlib.XDisplayHeight)(connection.display, connection.screen);
                Rect::new(0, 0, width.max(0) as u32, height.max(0) as u32)
            })
        })
    }

    fn save_placement(&self) -> Placement {
        let (x, y) = self.origin();
        let (width, height) = self
            .window_attributes()
            .map_or((0, 0), |attributes| (attributes.width, attributes.height));
        Placement {
            rect: Rect::new(x, y, width.max(0) as u32, height.max(0) as u32),
            style: u32::from(self.decorated),
            show_state: u32::from(self.mapped),
        }
    }

    fn restore_placement(&mut self, placement: &Placement) {
        self.set_fullscreen_state(false);
        self.decorated = placement.style != 0;
        self.set_decorations(self.decorated);
        self.set_geometry(placement.rect);
    }

    fn strip_decorations(&mut self) {
        self.decorated = false;
        self.set_decorations(false);
        self.set_fullscreen_state(true);
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.with_window((), |connection, window| unsafe {
            (connection.xlib.XMoveResizeWindow)(
                connection.display,
                window,
                rect.x,
                rect.y,
                rect.width.max(1),
                rect.height.max(1),
            );
            connection.flush();
        });
    }

    fn set_display_resolution(&mut self, width: u16, height: u16) -> bool {
        let (x, y) = self.center();
        let saved = self
            .connection
            .as_deref()
            .and_then(|connection| randr::switch_mode(connection, x, y, width, height));
        let switched = saved.is_some();
        if switched {
            self.saved_crtc = saved;
        }
        switched
    }

    fn restore_display_resolution(&mut self) {
        if let (Some(connection), Some(saved)) = (self.connection.as_deref(), self.saved_crtc.take()) {
            randr::restore_mode(connection, &saved);
        }
    }

    fn minimize(&mut self) {
        self.with_window((), |connection, window| unsafe {
            (connection.xlib.XIconifyWindow)(connection.display, window, connection.screen);
            connection.flush();
        });
    }

    fn restore(&mut self) {
        self.show();
    }

    fn client_rect_on_screen(&self) -> Rect {
        let (x, y) = self.origin();
        self.window_attributes().map_or(Rect::default(), |attributes| {
            Rect::new(x, y, attributes.width.max(0) as u32, attributes.height.max(0) as u32)
        })
    }

    fn clip_cursor(&mut self, rect: Option<Rect>) {
        self.with_window((), |connection, window| unsafe {
            let xlib = &connection.xlib;
            if rect.is_some() {
                // Confining to the window is confining to its client rect
                let mask = (ffi::ButtonPressMask | ffi::ButtonReleaseMask | ffi::PointerMotionMask) as c_uint;
                let status = (xlib.XGrabPointer)(
                    connection.display,
                    window,
                    ffi::True,
                    mask,
                    ffi::GrabModeAsync,
                    ffi::GrabModeAsync,
                    window,
                    0,
                    ffi::CurrentTime,
                );
                if status != ffi::GrabSuccess {
                    log::warn!("XGrabPointer failed with status {status}");
                }
            } else {
                (xlib.XUngrabPointer)(connection.display, ffi::CurrentTime);
            }
            connection.flush();
        });
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        let blank = self.blank_cursor;
        self.with_window((), |connection, window| unsafe {
            if visible {
                (connection.xlib.XUndefineCursor)(connection.display, window);
            } else {
                (connection.xlib.XDefineCursor)(connection.display, window, blank);
            }
            connection.flush();
        });
    }
}

impl Drop for X11Backend {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_buttons() {
        assert_eq!(button_event(4, true), Some(RawEvent::Scrolled { delta: 120, vertical: true }));
        assert_eq!(button_event(5, true), Some(RawEvent::Scrolled { delta: -120, vertical: true }));
        assert_eq!(button_event(6, true), Some(RawEvent::Scrolled { delta: -120, vertical: false }));
        assert_eq!(button_event(7, true), Some(RawEvent::Scrolled { delta: 120, vertical: false }));
        assert_eq!(button_event(4, false), None);
    }

    #[test]
    fn test_pointer_buttons() {
        assert_eq!(button_event(1, true), Some(RawEvent::MousePressed(KeyCode::MouseLeft)));
        assert_eq!(button_event(3, false), Some(RawEvent::MouseReleased(KeyCode::MouseRight)));
        assert_eq!(button_event(9, true), Some(RawEvent::MousePressed(KeyCode::MouseX2)));
        assert_eq!(button_event(12, true), None);
    }

    #[test]
    fn test_motif_hints_toggle_decorations() {
        assert_eq!(motif_hints(false)[2], 0);
        assert_eq!(motif_hints(true)[2], 1);
        assert_eq!(motif_hints(true)[0], 2);
    }

    #[test]
    fn test_unlaunched_backend_is_inert() {
        let mut backend = X11Backend::new(1, 0);
        assert!(!backend.is_alive());
        assert!(backend.native_handle().is_null());
        assert!(backend.raw_window_handle().is_none());
        assert_eq!(backend.monitor_rect(), Rect::default());
        backend.destroy();
    }
}
