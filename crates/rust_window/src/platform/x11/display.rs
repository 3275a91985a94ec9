//! Display connection and the X error trap

use std::ffi::{c_int, CString};
use std::ptr;
use std::sync::atomic::{AtomicU8, Ordering};

use super::ffi;
use crate::error::{WindowError, WindowResult};

/// Error code of the last X protocol error, 0 when none
static LAST_ERROR: AtomicU8 = AtomicU8::new(0);

unsafe extern "C" fn on_x_error(_display: *mut ffi::Display, event: *mut ffi::XErrorEvent) -> c_int {
    if let Some(event) = event.as_ref() {
        LAST_ERROR.store(event.error_code, Ordering::Relaxed);
        log::debug!(
            "X error {} (request {}.{})",
            event.error_code,
            event.request_code,
            event.minor_code
        );
    }
    0
}

/// Atoms the backend interns once per connection
#[derive(Debug, Clone, Copy)]
pub(super) struct Atoms {
    pub wm_protocols: ffi::Atom,
    pub wm_delete_window: ffi::Atom,
    pub net_wm_name: ffi::Atom,
    pub utf8_string: ffi::Atom,
    pub net_wm_state: ffi::Atom,
    pub net_wm_state_fullscreen: ffi::Atom,
    pub motif_wm_hints: ffi::Atom,
}

/// One open display plus the libraries loaded for it
pub(super) struct Connection {
    pub xlib: ffi::Xlib,
    pub glx: Option<ffi::Glx>,
    pub xrandr: Option<ffi::Xrandr>,
    pub display: *mut ffi::Display,
    pub screen: c_int,
    pub root: ffi::Window,
    pub atoms: Atoms,
}

impl Connection {
    /// Load Xlib and connect to `$DISPLAY`
    pub fn open() -> WindowResult<Self> {
        let xlib = ffi::Xlib::open()
            .map_err(|e| WindowError::Connection(format!("Could not load Xlib: {e}")))?;

        let display = unsafe {
            (xlib.XSetErrorHandler)(Some(on_x_error));
            (xlib.XOpenDisplay)(ptr::null())
        };
        if display.is_null() {
            return Err(WindowError::Connection("Could not connect to the X server".into()));
        }

        let glx = ffi::Glx::open()
            .map_err(|e| log::warn!("GLX unavailable: {e}"))
            .ok();
        let xrandr = ffi::Xrandr::open()
            .map_err(|e| log::warn!("RandR unavailable, resolution changes disabled: {e}"))
            .ok();

        let (screen, root) = unsafe {
            let screen = (xlib.XDefaultScreen)(display);
            (screen, (xlib.XRootWindow)(display, screen))
        };
        let intern = |name: &str| -> ffi::Atom {
            CString::new(name).map_or(0, |name| unsafe {
                (xlib.XInternAtom)(display, name.as_ptr(), ffi::False)
            })
        };
        let atoms = Atoms {
            wm_protocols: intern("WM_PROTOCOLS"),
            wm_delete_window: intern("WM_DELETE_WINDOW"),
            net_wm_name: intern("_NET_WM_NAME"),
            utf8_string: intern("UTF8_STRING"),
            net_wm_state: intern("_NET_WM_STATE"),
            net_wm_state_fullscreen: intern("_NET_WM_STATE_FULLSCREEN"),
            motif_wm_hints: intern("_MOTIF_WM_HINTS"),
        };

        log::debug!("Connected to X display on screen {screen}");
        Ok(Self {
            xlib,
            glx,
            xrandr,
            display,
            screen,
            root,
            atoms,
        })
    }

    /// Run `f` and report any X protocol error it caused
    pub fn trap_errors<T>(&self, what: &str, f: impl FnOnce() -> T) -> WindowResult<T> {
        unsafe { (self.xlib.XSync)(self.display, ffi::False) };
        LAST_ERROR.store(0, Ordering::Relaxed);
        let value = f();
        unsafe { (self.xlib.XSync)(self.display, ffi::False) };
        match LAST_ERROR.swap(0, Ordering::Relaxed) {
            0 => Ok(value),
            code => Err(WindowError::Context(format!("{what} failed with X error {code}"))),
        }
    }

    /// Push queued requests to the server
    pub fn flush(&self) {
        unsafe { (self.xlib.XFlush)(self.display) };
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        unsafe { (self.xlib.XCloseDisplay)(self.display) };
    }
}
