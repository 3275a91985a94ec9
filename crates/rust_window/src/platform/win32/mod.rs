//! Win32 substrate
//!
//! One window class per window (`rust_window_<id>`), registered at launch and
//! unregistered when the window is destroyed. The window procedure only
//! translates messages into raw events and pushes them into the queue whose
//! address was handed over in `CREATESTRUCTW::lpCreateParams`; everything
//! else happens in [`Win32Backend`] on the pumping thread.

#![allow(unsafe_code)]

mod gl;
mod window;

pub(crate) use window::Win32Backend;

// All native items are reached through `ffi::` so constants missing from the
// bindings can live next to the ones that are there.
mod ffi {
    pub(super) use winapi::shared::minwindef::*;
    pub(super) use winapi::shared::windef::*;
    pub(super) use winapi::shared::windowsx::{GET_X_LPARAM, GET_Y_LPARAM};
    pub(super) use winapi::um::errhandlingapi::GetLastError;
    pub(super) use winapi::um::libloaderapi::{FreeLibrary, GetModuleHandleW, GetProcAddress, LoadLibraryW};
    pub(super) use winapi::um::wingdi::*;
    pub(super) use winapi::um::winuser::*;

    pub(super) const WGL_CONTEXT_MAJOR_VERSION_ARB: i32 = 0x2091;
    pub(super) const WGL_CONTEXT_MINOR_VERSION_ARB: i32 = 0x2092;
    pub(super) const WGL_CONTEXT_FLAGS_ARB: i32 = 0x2094;
    pub(super) const WGL_CONTEXT_PROFILE_MASK_ARB: i32 = 0x9126;

    pub(super) const WGL_CONTEXT_DEBUG_BIT_ARB: i32 = 0x0001;
    pub(super) const WGL_CONTEXT_CORE_PROFILE_BIT_ARB: i32 = 0x0001;
    pub(super) const WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB: i32 = 0x0002;

    pub(super) const ERROR_INVALID_VERSION_ARB: u32 = 0x2095;
    pub(super) const ERROR_INVALID_PROFILE_ARB: u32 = 0x2096;

    pub(super) const GL_VERSION: u32 = 0x1F02;
}

/// UTF-16 with a terminating NUL
fn encode_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn last_error() -> u32 {
    unsafe { ffi::GetLastError() }
}

/// Handle of the executable module, used for class registration
pub(crate) fn module_handle() -> usize {
    unsafe { ffi::GetModuleHandleW(std::ptr::null()) as usize }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wide_terminates() {
        assert_eq!(encode_wide("ab"), vec![u16::from(b'a'), u16::from(b'b'), 0]);
        assert_eq!(encode_wide("\u{1F600}").len(), 3);
    }
}
