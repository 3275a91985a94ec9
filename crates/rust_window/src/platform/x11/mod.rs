//! X11 substrate
//!
//! Xlib, GLX and RandR are loaded at runtime through `x11-dl`, so the crate
//! links on machines without X development packages. Each window opens its
//! own display connection at launch; the connection is shared with the
//! window's GLX context and closed after both are gone.
//!
//! - **`display`**: connection, atoms and the error trap
//! - **`window`**: [`X11Backend`] and event translation
//! - **`gl`**: GLX framebuffer negotiation and context
//! - **`randr`**: display resolution switching

#![allow(unsafe_code)]

mod display;
mod gl;
mod randr;
mod window;

pub(crate) use window::X11Backend;

// All native items are reached through `ffi::` so constants missing from the
// bindings can live next to the ones that are there.
mod ffi {
    pub(super) use x11_dl::glx::arb::*;
    pub(super) use x11_dl::glx::*;
    pub(super) use x11_dl::xlib::*;
    pub(super) use x11_dl::xrandr::*;

    // From /usr/include/GL/glx.h
    pub(super) const GLX_RGBA_TYPE: i32 = 0x8014;
    pub(super) const GLX_SAMPLE_BUFFERS: i32 = 100_000;
    pub(super) const GLX_SAMPLES: i32 = 100_001;

    pub(super) const GL_VERSION: u32 = 0x1F02;

    // _NET_WM_STATE client message actions
    pub(super) const NET_WM_STATE_REMOVE: i64 = 0;
    pub(super) const NET_WM_STATE_ADD: i64 = 1;

    // _MOTIF_WM_HINTS
    pub(super) const MWM_HINTS_DECORATIONS: u64 = 1 << 1;
}

/// Windows are not registered against a module on X11
pub(crate) const fn module_handle() -> usize {
    0
}
