//! Win32 window backend and window procedure

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::c_void;
use std::{mem, ptr};

use raw_window_handle::{
    RawDisplayHandle, RawWindowHandle, Win32WindowHandle, WindowsDisplayHandle,
};

use super::gl::WglContext;
use super::{encode_wide, ffi, last_error};
use crate::context::GraphicsContext;
use crate::core::config::ContextKind;
use crate::error::{WindowError, WindowResult};
use crate::input::{virtual_key, KeyCode};
use crate::window::backend::{CreateRequest, Placement, RawEventQueue, Rect, WindowBackend};
use crate::window::translate::{NativeRepeat, RawEvent};

type QueueCell = RefCell<VecDeque<RawEvent>>;

/// Native window on the Win32 message loop
pub(crate) struct Win32Backend {
    id: u32,
    instance: ffi::HINSTANCE,
    class_name: Vec<u16>,
    class_registered: bool,
    hwnd: ffi::HWND,
    context: Option<WglContext>,
    // Keeps the queue the window procedure writes into alive as long as the HWND
    queue: Option<RawEventQueue>,
}

impl Win32Backend {
    /// Record the registration parameters; nothing native happens yet
    pub fn new(id: u32, module: usize) -> Self {
        Self {
            id,
            instance: module as ffi::HINSTANCE,
            class_name: encode_wide(&format!("rust_window_{id}")),
            class_registered: false,
            hwnd: ptr::null_mut(),
            context: None,
            queue: None,
        }
    }

    fn register_class(&mut self) -> WindowResult<()> {
        let class = ffi::WNDCLASSW {
            style: ffi::CS_OWNDC | ffi::CS_HREDRAW | ffi::CS_VREDRAW,
            lpfnWndProc: Some(window_proc),
            hInstance: self.instance,
            hCursor: unsafe { ffi::LoadCursorW(ptr::null_mut(), ffi::IDC_ARROW) },
            lpszClassName: self.class_name.as_ptr(),
            ..unsafe { mem::zeroed() }
        };
        if unsafe { ffi::RegisterClassW(&class) } == 0 {
            return Err(WindowError::WindowCreation(format!(
                "Failed to register window class ({})",
                last_error()
            )));
        }
        self.class_registered = true;
        Ok(())
    }

    fn unregister_class(&mut self) {
        if self.class_registered {
            unsafe { ffi::UnregisterClassW(self.class_name.as_ptr(), self.instance) };
            self.class_registered = false;
        }
    }

    fn create_window(&mut self, request: &CreateRequest<'_>, queue: &RawEventQueue) -> WindowResult<()> {
        let style = if request.resizable {
            ffi::WS_OVERLAPPEDWINDOW
        } else {
            ffi::WS_OVERLAPPEDWINDOW & !(ffi::WS_THICKFRAME | ffi::WS_MAXIMIZEBOX)
        };
        let mut frame = ffi::RECT {
            left: 0,
            top: 0,
            right: i32::from(request.width),
            bottom: i32::from(request.height),
        };
        unsafe { ffi::AdjustWindowRect(&mut frame, style, ffi::FALSE) };

        let title = encode_wide(request.title);
        self.hwnd = unsafe {
            ffi::CreateWindowExW(
                0,
                self.class_name.as_ptr(),
                title.as_ptr(),
                style,
                ffi::CW_USEDEFAULT,
                ffi::CW_USEDEFAULT,
                frame.right - frame.left,
                frame.bottom - frame.top,
                ptr::null_mut(),
                ptr::null_mut(),
                self.instance,
                queue.as_ptr() as *mut c_void,
            )
        };
        if self.hwnd.is_null() {
            return Err(WindowError::WindowCreation(format!(
                "CreateWindowExW failed ({})",
                last_error()
            )));
        }
        self.queue = Some(queue.clone());
        log::debug!(
            "Created HWND {:p} for window {} ({}x{} frame)",
            self.hwnd,
            self.id,
            frame.right - frame.left,
            frame.bottom - frame.top
        );
        Ok(())
    }

    fn release(&mut self) {
        // The context goes before the window it draws to
        self.context = None;
        if !self.hwnd.is_null() {
            unsafe { ffi::DestroyWindow(self.hwnd) };
            self.hwnd = ptr::null_mut();
        }
        self.unregister_class();
        self.queue = None;
    }

    fn style(&self) -> u32 {
        unsafe { ffi::GetWindowLongW(self.hwnd, ffi::GWL_STYLE) as u32 }
    }

    fn set_style(&mut self, style: u32) {
        unsafe {
            ffi::SetWindowLongW(self.hwnd, ffi::GWL_STYLE, style as i32);
            ffi::SetWindowPos(
                self.hwnd,
                ptr::null_mut(),
                0,
                0,
                0,
                0,
                ffi::SWP_FRAMECHANGED
                    | ffi::SWP_NOMOVE
                    | ffi::SWP_NOSIZE
                    | ffi::SWP_NOZORDER
                    | ffi::SWP_NOOWNERZORDER,
            );
        }
    }
}

impl WindowBackend for Win32Backend {
    fn create(&mut self, request: &CreateRequest<'_>, queue: &RawEventQueue) -> WindowResult<()> {
        self.register_class()?;
        if let Err(error) = self.create_window(request, queue) {
            self.unregister_class();
            return Err(error);
        }

        if request.context == ContextKind::OpenGl {
            let mut context = WglContext::new(self.hwnd, request.gl.clone());
            let result = context.setup().and_then(|()| context.activate());
            if let Err(error) = result {
                drop(context);
                self.release();
                // Creation failures are not a close
                queue.drain();
                return Err(error);
            }
            log::info!("Window {} has an OpenGL {:?} context", self.id, context.version());
            self.context = Some(context);
        }
        Ok(())
    }

    fn show(&mut self) {
        unsafe {
            ffi::ShowWindow(self.hwnd, ffi::SW_SHOW);
            ffi::SetForegroundWindow(self.hwnd);
            ffi::SetFocus(self.hwnd);
        }
    }

    fn destroy(&mut self) {
        // WM_DESTROY pushes `Destroyed` while the queue is still attached
        self.release();
    }

    fn is_alive(&self) -> bool {
        !self.hwnd.is_null() && unsafe { ffi::IsWindow(self.hwnd) } != 0
    }

    fn pump_events(&mut self, _queue: &RawEventQueue) {
        if self.hwnd.is_null() {
            return;
        }
        let mut msg: ffi::MSG = unsafe { mem::zeroed() };
        while unsafe { ffi::PeekMessageW(&mut msg, self.hwnd, 0, 0, ffi::PM_REMOVE) } > 0 {
            unsafe {
                ffi::TranslateMessage(&msg);
                ffi::DispatchMessageW(&msg);
            }
        }
    }

    fn has_context(&self) -> bool {
        self.context.is_some()
    }

    fn swap_buffers(&mut self) -> WindowResult<()> {
        match &self.context {
            Some(context) => context.swap_buffers(),
            None => Err(WindowError::Context("no WGL context".into())),
        }
    }

    fn make_current(&mut self) -> WindowResult<()> {
        match &self.context {
            Some(context) => context.make_current(),
            None => Err(WindowError::Context("no WGL context".into())),
        }
    }

    fn get_proc_address(&self, name: &str) -> *const c_void {
        self.context
            .as_ref()
            .map_or(ptr::null(), |context| context.get_proc_address(name))
    }

    fn native_handle(&self) -> *mut c_void {
        self.hwnd.cast()
    }

    fn raw_window_handle(&self) -> Option<RawWindowHandle> {
        if self.hwnd.is_null() {
            return None;
        }
        let mut handle = Win32WindowHandle::empty();
        handle.hwnd = self.hwnd.cast();
        handle.hinstance = self.instance.cast();
        Some(RawWindowHandle::Win32(handle))
    }

    fn raw_display_handle(&self) -> Option<RawDisplayHandle> {
        Some(RawDisplayHandle::Windows(WindowsDisplayHandle::empty()))
    }

    fn set_title(&mut self, title: &str) -> WindowResult<()> {
        if title.contains('\0') {
            return Err(WindowError::BadArgs("title must not contain NUL characters".into()));
        }
        let title = encode_wide(title);
        if unsafe { ffi::SetWindowTextW(self.hwnd, title.as_ptr()) } == ffi::FALSE {
            return Err(WindowError::InvalidState(format!("SetWindowTextW failed ({})", last_error())));
        }
        Ok(())
    }

    fn is_key_down(&self, key: KeyCode) -> bool {
        virtual_key::from_key_code(key)
            .is_some_and(|vk| unsafe { ffi::GetKeyState(i32::from(vk)) } as u16 & 0x8000 != 0)
    }

    fn resize_client(&mut self, width: u16, height: u16) {
        let mut frame = ffi::RECT {
            left: 0,
            top: 0,
            right: i32::from(width),
            bottom: i32::from(height),
        };
        unsafe {
            ffi::AdjustWindowRect(&mut frame, self.style(), ffi::FALSE);
            ffi::SetWindowPos(
                self.hwnd,
                ptr::null_mut(),
                0,
                0,
                frame.right - frame.left,
                frame.bottom - frame.top,
                ffi::SWP_NOMOVE | ffi::SWP_NOZORDER | ffi::SWP_NOOWNERZORDER,
            );
        }
    }

    fn monitor_rect(&self) -> Rect {
        let mut info = ffi::MONITORINFO {
            cbSize: mem::size_of::<ffi::MONITORINFO>() as u32,
            ..unsafe { mem::zeroed() }
        };
        let found = unsafe {
            let monitor = ffi::MonitorFromWindow(self.hwnd, ffi::MONITOR_DEFAULTTONEAREST);
            ffi::GetMonitorInfoW(monitor, &mut info)
        };
        if found == ffi::FALSE {
            log::warn!("GetMonitorInfoW failed ({})", last_error());
            return Rect::default();
        }
        rect_from(&info.rcMonitor)
    }

    fn save_placement(&self) -> Placement {
        let mut placement = ffi::WINDOWPLACEMENT {
            length: mem::size_of::<ffi::WINDOWPLACEMENT>() as u32,
            ..unsafe { mem::zeroed() }
        };
        unsafe { ffi::GetWindowPlacement(self.hwnd, &mut placement) };
        Placement {
            rect: rect_from(&placement.rcNormalPosition),
            style: self.style(),
            show_state: placement.showCmd,
        }
    }

    fn restore_placement(&mut self, saved: &Placement) {
        self.set_style(saved.style);
        let placement = ffi::WINDOWPLACEMENT {
            length: mem::size_of::<ffi::WINDOWPLACEMENT>() as u32,
            showCmd: saved.show_state,
            rcNormalPosition: ffi::RECT {
                left: saved.rect.x,
                top: saved.rect.y,
                right: saved.rect.x + saved.rect.width as i32,
                bottom: saved.rect.y + saved.rect.height as i32,
            },
            ..unsafe { mem::zeroed() }
        };
        unsafe { ffi::SetWindowPlacement(self.hwnd, &placement) };
    }

    fn strip_decorations(&mut self) {
        let style = self.style() & !ffi::WS_OVERLAPPEDWINDOW;
        self.set_style(style | ffi::WS_POPUP);
    }

    fn set_geometry(&mut self, rect: Rect) {
        unsafe {
            ffi::SetWindowPos(
                self.hwnd,
                ffi::HWND_TOP,
                rect.x,
                rect.y,
                rect.width as i32,
                rect.height as i32,
                ffi::SWP_FRAMECHANGED | ffi::SWP_NOOWNERZORDER,
            );
        }
    }

    fn set_display_resolution(&mut self, width: u16, height: u16) -> bool {
        let mut mode: ffi::DEVMODEW = unsafe { mem::zeroed() };
        mode.dmSize = mem::size_of::<ffi::DEVMODEW>() as u16;
        mode.dmPelsWidth = u32::from(width);
        mode.dmPelsHeight = u32::from(height);
        mode.dmBitsPerPel = 32;
        mode.dmFields = ffi::DM_PELSWIDTH | ffi::DM_PELSHEIGHT | ffi::DM_BITSPERPEL;

        let result = unsafe { ffi::ChangeDisplaySettingsW(&mut mode, ffi::CDS_FULLSCREEN) };
        if result == ffi::DISP_CHANGE_SUCCESSFUL {
            log::debug!("Display switched to {width}x{height}");
            true
        } else {
            log::warn!("ChangeDisplaySettingsW({width}x{height}) returned {result}");
            false
        }
    }

    fn restore_display_resolution(&mut self) {
        unsafe { ffi::ChangeDisplaySettingsW(ptr::null_mut(), 0) };
    }

    fn minimize(&mut self) {
        unsafe { ffi::ShowWindow(self.hwnd, ffi::SW_MINIMIZE) };
    }

    fn restore(&mut self) {
        unsafe { ffi::ShowWindow(self.hwnd, ffi::SW_RESTORE) };
    }

    fn client_rect_on_screen(&self) -> Rect {
        let mut client: ffi::RECT = unsafe { mem::zeroed() };
        let mut origin = ffi::POINT { x: 0, y: 0 };
        unsafe {
            ffi::GetClientRect(self.hwnd, &mut client);
            ffi::ClientToScreen(self.hwnd, &mut origin);
        }
        Rect::new(
            origin.x,
            origin.y,
            (client.right - client.left).max(0) as u32,
            (client.bottom - client.top).max(0) as u32,
        )
    }

    fn clip_cursor(&mut self, rect: Option<Rect>) {
        match rect {
            Some(rect) => {
                let clip = ffi::RECT {
                    left: rect.x,
                    top: rect.y,
                    right: rect.x + rect.width as i32,
                    bottom: rect.y + rect.height as i32,
                };
                unsafe { ffi::ClipCursor(&clip) };
            }
            None => unsafe {
                ffi::ClipCursor(ptr::null());
            },
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        unsafe { ffi::ShowCursor(i32::from(visible)) };
    }
}

impl Drop for Win32Backend {
    fn drop(&mut self) {
        self.release();
    }
}

fn rect_from(rect: &ffi::RECT) -> Rect {
    Rect::new(
        rect.left,
        rect.top,
        (rect.right - rect.left).max(0) as u32,
        (rect.bottom - rect.top).max(0) as u32,
    )
}

/// Translate one message; `None` for messages the window does not report
fn translate_message(msg: u32, wparam: ffi::WPARAM, lparam: ffi::LPARAM) -> Option<RawEvent> {
    let event = match msg {
        ffi::WM_SIZE => RawEvent::Resized {
            width: ffi::LOWORD(lparam as u32),
            height: ffi::HIWORD(lparam as u32),
        },
        ffi::WM_MOVE => RawEvent::Moved,
        ffi::WM_MOUSEMOVE => RawEvent::MouseMoved {
            x: ffi::GET_X_LPARAM(lparam),
            y: ffi::GET_Y_LPARAM(lparam),
        },
        ffi::WM_LBUTTONDOWN => RawEvent::MousePressed(KeyCode::MouseLeft),
        ffi::WM_LBUTTONUP => RawEvent::MouseReleased(KeyCode::MouseLeft),
        ffi::WM_RBUTTONDOWN => RawEvent::MousePressed(KeyCode::MouseRight),
        ffi::WM_RBUTTONUP => RawEvent::MouseReleased(KeyCode::MouseRight),
        ffi::WM_MBUTTONDOWN => RawEvent::MousePressed(KeyCode::MouseMiddle),
        ffi::WM_MBUTTONUP => RawEvent::MouseReleased(KeyCode::MouseMiddle),
        ffi::WM_XBUTTONDOWN | ffi::WM_XBUTTONUP => {
            let button = if ffi::GET_XBUTTON_WPARAM(wparam) == ffi::XBUTTON1 {
                KeyCode::MouseX1
            } else {
                KeyCode::MouseX2
            };
            if msg == ffi::WM_XBUTTONDOWN {
                RawEvent::MousePressed(button)
            } else {
                RawEvent::MouseReleased(button)
            }
        }
        ffi::WM_MOUSEWHEEL | ffi::WM_MOUSEHWHEEL => RawEvent::Scrolled {
            delta: i32::from(ffi::GET_WHEEL_DELTA_WPARAM(wparam)),
            vertical: msg == ffi::WM_MOUSEWHEEL,
        },
        ffi::WM_KEYDOWN | ffi::WM_SYSKEYDOWN => RawEvent::KeyDown {
            key: virtual_key::to_key_code(wparam as u16),
            repeat: Some(NativeRepeat {
                repeated: lparam & (1 << 30) != 0,
                count: (lparam & 0xFFFF) as u16,
            }),
        },
        ffi::WM_KEYUP | ffi::WM_SYSKEYUP => RawEvent::KeyUp(virtual_key::to_key_code(wparam as u16)),
        // Lone surrogates are multi-unit input, which is not decoded
        ffi::WM_CHAR => RawEvent::Char(char::from_u32(wparam as u32)?),
        ffi::WM_CLOSE => RawEvent::CloseRequested,
        ffi::WM_DESTROY => RawEvent::Destroyed,
        ffi::WM_KILLFOCUS => RawEvent::FocusLost,
        ffi::WM_SETFOCUS => RawEvent::FocusGained,
        _ => return None,
    };
    Some(event)
}

unsafe extern "system" fn window_proc(
    hwnd: ffi::HWND,
    msg: u32,
    wparam: ffi::WPARAM,
    lparam: ffi::LPARAM,
) -> ffi::LRESULT {
    match msg {
        ffi::WM_NCCREATE => {
            let create = &*(lparam as *const ffi::CREATESTRUCTW);
            ffi::SetWindowLongPtrW(hwnd, ffi::GWLP_USERDATA, create.lpCreateParams as isize);
        }
        ffi::WM_NCDESTROY => {
            ffi::SetWindowLongPtrW(hwnd, ffi::GWLP_USERDATA, 0);
        }
        _ => {
            if let Some(event) = translate_message(msg, wparam, lparam) {
                let queue = ffi::GetWindowLongPtrW(hwnd, ffi::GWLP_USERDATA) as *const QueueCell;
                if let Some(queue) = queue.as_ref() {
                    match queue.try_borrow_mut() {
                        Ok(mut queue) => queue.push_back(event),
                        Err(_) => log::warn!("Dropped native event {event:?}: queue busy"),
                    }
                }
            }
        }
    }

    if msg == ffi::WM_CLOSE {
        // Closing is the application's decision
        return 0;
    }
    ffi::DefWindowProcW(hwnd, msg, wparam, lparam)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lparam(low: u16, high: u16) -> ffi::LPARAM {
        ((u32::from(high) << 16) | u32::from(low)) as ffi::LPARAM
    }

    #[test]
    fn test_size_message() {
        assert_eq!(
            translate_message(ffi::WM_SIZE, 0, lparam(1024, 768)),
            Some(RawEvent::Resized { width: 1024, height: 768 })
        );
    }

    #[test]
    fn test_key_repeat_bits() {
        let first = translate_message(ffi::WM_KEYDOWN, 0x41, 1);
        assert_eq!(
            first,
            Some(RawEvent::KeyDown {
                key: KeyCode::A,
                repeat: Some(NativeRepeat { repeated: false, count: 1 }),
            })
        );
        let held = translate_message(ffi::WM_KEYDOWN, 0x41, (1 << 30) | 3);
        assert_eq!(
            held,
            Some(RawEvent::KeyDown {
                key: KeyCode::A,
                repeat: Some(NativeRepeat { repeated: true, count: 3 }),
            })
        );
    }

    #[test]
    fn test_wheel_axes() {
        let down = ((-120i16 as u16 as usize) << 16) as ffi::WPARAM;
        assert_eq!(
            translate_message(ffi::WM_MOUSEWHEEL, down, 0),
            Some(RawEvent::Scrolled { delta: -120, vertical: true })
        );
        assert_eq!(
            translate_message(ffi::WM_MOUSEHWHEEL, 120 << 16, 0),
            Some(RawEvent::Scrolled { delta: 120, vertical: false })
        );
    }

    #[test]
    fn test_lifecycle_messages() {
        assert_eq!(translate_message(ffi::WM_CLOSE, 0, 0), Some(RawEvent::CloseRequested));
        assert_eq!(translate_message(ffi::WM_DESTROY, 0, 0), Some(RawEvent::Destroyed));
        assert_eq!(translate_message(ffi::WM_KILLFOCUS, 0, 0), Some(RawEvent::FocusLost));
        assert_eq!(translate_message(ffi::WM_PAINT, 0, 0), None);
    }

    #[test]
    fn test_surrogate_chars_are_skipped() {
        assert_eq!(translate_message(ffi::WM_CHAR, 0x61, 0), Some(RawEvent::Char('a')));
        assert_eq!(translate_message(ffi::WM_CHAR, 0xD83D, 0), None);
    }
}
