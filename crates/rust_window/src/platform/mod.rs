//! Native substrates
//!
//! Exactly one substrate is compiled per target and exported as
//! `DefaultBackend`, together with the process module handle the factory
//! records in [`Platform`](crate::Platform).
//!
//! - **`win32`**: message-loop substrate (`HWND`, window procedure, WGL)
//! - **`x11`**: display-server substrate (`Display*`, Xlib events, GLX)

#[cfg(windows)]
mod win32;

#[cfg(windows)]
pub(crate) use win32::{module_handle, Win32Backend as DefaultBackend};

#[cfg(all(unix, not(any(target_os = "macos", target_os = "ios", target_os = "android"))))]
mod x11;

#[cfg(all(unix, not(any(target_os = "macos", target_os = "ios", target_os = "android"))))]
pub(crate) use x11::{module_handle, X11Backend as DefaultBackend};

#[cfg(not(any(
    windows,
    all(unix, not(any(target_os = "macos", target_os = "ios", target_os = "android")))
)))]
compile_error!("rust_window supports Win32 and X11 targets only");
