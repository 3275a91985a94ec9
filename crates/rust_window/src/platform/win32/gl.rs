//! WGL context
//!
//! Activation goes through a bootstrap context: `wglCreateContextAttribsARB`
//! can only be resolved while some context is current, and the bootstrap
//! also answers `GL_VERSION` when no version was configured.

use std::ffi::{c_void, CStr, CString};
use std::{mem, ptr};

use super::{encode_wide, ffi, last_error};
use crate::context::loader::is_valid_address;
use crate::context::{ContextLifecycle, ContextState, GlFunctions, GlVersion, GraphicsContext};
use crate::core::config::GlConfig;
use crate::error::{WindowError, WindowResult};

#[allow(non_camel_case_types)]
type wglCreateContextAttribsARB =
    unsafe extern "system" fn(ffi::HDC, ffi::HGLRC, *const i32) -> ffi::HGLRC;

#[allow(non_camel_case_types)]
type glGetString = unsafe extern "system" fn(u32) -> *const u8;

/// OpenGL context on a window's device context
pub(super) struct WglContext {
    hwnd: ffi::HWND,
    dc: ffi::HDC,
    rc: ffi::HGLRC,
    opengl32: ffi::HMODULE,
    config: GlConfig,
    lifecycle: ContextLifecycle,
    version: Option<GlVersion>,
    functions: GlFunctions,
}

impl WglContext {
    /// Bind to `hwnd`; the window outlives the context
    pub fn new(hwnd: ffi::HWND, config: GlConfig) -> Self {
        Self {
            hwnd,
            dc: ptr::null_mut(),
            rc: ptr::null_mut(),
            opengl32: ptr::null_mut(),
            config,
            lifecycle: ContextLifecycle::new(),
            version: None,
            functions: GlFunctions::default(),
        }
    }

    fn choose_pixel_format(&mut self) -> WindowResult<()> {
        self.dc = unsafe { ffi::GetDC(self.hwnd) };
        if self.dc.is_null() {
            return Err(WindowError::Context(format!("GetDC failed ({})", last_error())));
        }

        let mut descriptor = ffi::PIXELFORMATDESCRIPTOR {
            nSize: mem::size_of::<ffi::PIXELFORMATDESCRIPTOR>() as u16,
            nVersion: 1,
            dwFlags: ffi::PFD_DRAW_TO_WINDOW | ffi::PFD_SUPPORT_OPENGL | ffi::PFD_DOUBLEBUFFER,
            iPixelType: ffi::PFD_TYPE_RGBA,
            cColorBits: self.config.color_bits,
            cAlphaBits: self.config.alpha_bits,
            cDepthBits: self.config.depth_bits,
            cStencilBits: self.config.stencil_bits,
            iLayerType: ffi::PFD_MAIN_PLANE,
            ..unsafe { mem::zeroed() }
        };

        let format = unsafe { ffi::ChoosePixelFormat(self.dc, &descriptor) };
        if format == 0 {
            return Err(WindowError::Context(format!(
                "No pixel format matches {}-bit color, {}-bit depth ({})",
                self.config.color_bits,
                self.config.depth_bits,
                last_error()
            )));
        }

        unsafe {
            ffi::DescribePixelFormat(
                self.dc,
                format,
                mem::size_of::<ffi::PIXELFORMATDESCRIPTOR>() as u32,
                &mut descriptor,
            );
        }
        if unsafe { ffi::SetPixelFormat(self.dc, format, &descriptor) } == ffi::FALSE {
            return Err(WindowError::Context(format!("SetPixelFormat failed ({})", last_error())));
        }

        log::debug!(
            "Pixel format {format}: {} color, {} alpha, {} depth, {} stencil bits",
            descriptor.cColorBits,
            descriptor.cAlphaBits,
            descriptor.cDepthBits,
            descriptor.cStencilBits
        );
        Ok(())
    }

    fn create_context(&mut self) -> WindowResult<()> {
        let library = encode_wide("opengl32.dll");
        self.opengl32 = unsafe { ffi::LoadLibraryW(library.as_ptr()) };
        if self.opengl32.is_null() {
            return Err(WindowError::Context(format!("Could not load opengl32.dll ({})", last_error())));
        }

        let bootstrap = unsafe { ffi::wglCreateContext(self.dc) };
        if bootstrap.is_null() {
            return Err(WindowError::Context(format!("wglCreateContext failed ({})", last_error())));
        }
        self.rc = bootstrap;
        if unsafe { ffi::wglMakeCurrent(self.dc, bootstrap) } == ffi::FALSE {
            return Err(WindowError::Context(format!("wglMakeCurrent failed ({})", last_error())));
        }

        let detected = self.query_version();
        let requested = self.config.version.map(GlVersion::from).or(detected);
        let Some(version) = requested else {
            log::warn!("GL_VERSION unavailable; keeping the legacy context");
            return Ok(());
        };

        let create = self.proc_address("wglCreateContextAttribsARB");
        if create.is_null() {
            if self.config.version.is_some() {
                log::warn!("wglCreateContextAttribsARB unavailable; requested {version} ignored");
            }
            self.version = detected;
            return Ok(());
        }
        let create = unsafe { mem::transmute::<*const c_void, wglCreateContextAttribsARB>(create) };

        let mut attributes = vec![
            ffi::WGL_CONTEXT_MAJOR_VERSION_ARB,
            i32::from(version.major),
            ffi::WGL_CONTEXT_MINOR_VERSION_ARB,
            i32::from(version.minor),
            ffi::WGL_CONTEXT_FLAGS_ARB,
            if self.config.debug { ffi::WGL_CONTEXT_DEBUG_BIT_ARB } else { 0 },
        ];
        if version.has_profiles() {
            attributes.push(ffi::WGL_CONTEXT_PROFILE_MASK_ARB);
            attributes.push(if self.config.core_profile {
                ffi::WGL_CONTEXT_CORE_PROFILE_BIT_ARB
            } else {
                ffi::WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB
            });
        }
        attributes.push(0);

        let context = unsafe { create(self.dc, ptr::null_mut(), attributes.as_ptr()) };
        if context.is_null() {
            let profile = if self.config.core_profile { "core" } else { "compat" };
            return Err(WindowError::Context(match last_error() & 0xFFFF {
                ffi::ERROR_INVALID_VERSION_ARB => format!("Invalid version: ({version} {profile})"),
                ffi::ERROR_INVALID_PROFILE_ARB => format!("Invalid profile: ({version} {profile})"),
                code => format!("wglCreateContextAttribsARB failed ({code})"),
            }));
        }

        // Replace the bootstrap context
        unsafe {
            ffi::wglMakeCurrent(self.dc, context);
            ffi::wglDeleteContext(bootstrap);
        }
        self.rc = context;
        self.version = self.query_version().or(Some(version));
        log::debug!("Created WGL context {version} (driver reports {:?})", self.version);
        Ok(())
    }

    fn query_version(&self) -> Option<GlVersion> {
        let get_string = self.proc_address("glGetString");
        if get_string.is_null() {
            return None;
        }
        let get_string = unsafe { mem::transmute::<*const c_void, glGetString>(get_string) };
        let raw = unsafe { get_string(ffi::GL_VERSION) };
        if raw.is_null() {
            return None;
        }
        let version = unsafe { CStr::from_ptr(raw.cast()) }.to_string_lossy();
        GlVersion::parse(&version)
    }

    /// `wglGetProcAddress`, falling back to opengl32 exports for GL 1.1 names
    fn proc_address(&self, name: &str) -> *const c_void {
        let Ok(name) = CString::new(name) else {
            return ptr::null();
        };
        let address = unsafe { ffi::wglGetProcAddress(name.as_ptr()) } as *const c_void;
        if is_valid_address(address) {
            return address;
        }
        if self.opengl32.is_null() {
            return ptr::null();
        }
        let address = unsafe { ffi::GetProcAddress(self.opengl32, name.as_ptr()) } as *const c_void;
        if is_valid_address(address) {
            address
        } else {
            ptr::null()
        }
    }
}

impl GraphicsContext for WglContext {
    fn setup(&mut self) -> WindowResult<()> {
        self.lifecycle.begin_setup()?;
        match self.choose_pixel_format() {
            Ok(()) => {
                self.lifecycle.configured();
                Ok(())
            }
            Err(error) => Err(self.lifecycle.fail(error)),
        }
    }

    fn activate(&mut self) -> WindowResult<()> {
        self.lifecycle.begin_activate()?;
        if let Err(error) = self.create_context() {
            return Err(self.lifecycle.fail(error));
        }

        let major = self.version.map_or(1, |v| v.major);
        match GlFunctions::load(&GlFunctions::required_for(major), |name| self.proc_address(name)) {
            Ok(functions) => {
                self.functions = functions;
                self.lifecycle.activated();
                Ok(())
            }
            Err(error) => Err(self.lifecycle.fail(error)),
        }
    }

    fn make_current(&self) -> WindowResult<()> {
        self.lifecycle.require_active("make_current")?;
        if unsafe { ffi::wglMakeCurrent(self.dc, self.rc) } == ffi::FALSE {
            return Err(WindowError::Context(format!("wglMakeCurrent failed ({})", last_error())));
        }
        Ok(())
    }

    fn swap_buffers(&self) -> WindowResult<()> {
        self.lifecycle.require_active("swap_buffers")?;
        if unsafe { ffi::SwapBuffers(self.dc) } == ffi::FALSE {
            return Err(WindowError::Context(format!("SwapBuffers failed ({})", last_error())));
        }
        Ok(())
    }

    fn get_proc_address(&self, name: &str) -> *const c_void {
        if self.lifecycle.state() != ContextState::Active {
            return ptr::null();
        }
        self.functions.get(name).unwrap_or_else(|| self.proc_address(name))
    }

    fn state(&self) -> ContextState {
        self.lifecycle.state()
    }

    fn version(&self) -> Option<GlVersion> {
        self.version
    }
}

impl Drop for WglContext {
    fn drop(&mut self) {
        unsafe {
            if !self.rc.is_null() {
                ffi::wglMakeCurrent(ptr::null_mut(), ptr::null_mut());
                ffi::wglDeleteContext(self.rc);
            }
            if !self.dc.is_null() {
                ffi::ReleaseDC(self.hwnd, self.dc);
            }
            if !self.opengl32.is_null() {
                ffi::FreeLibrary(self.opengl32);
            }
        }
    }
}
