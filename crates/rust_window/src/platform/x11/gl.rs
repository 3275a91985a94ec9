//! GLX context
//!
//! Unlike WGL the framebuffer configuration decides the X visual, so setup
//! runs before the window exists and the window is attached afterwards:
//!
//! ```text
//! GlxContext::new ─▶ setup() ─▶ [XCreateWindow with visual()] ─▶ attach() ─▶ activate()
//! ```

use std::ffi::{c_void, CStr, CString};
use std::rc::Rc;
use std::{mem, ptr};

use super::display::Connection;
use super::ffi;
use crate::context::loader::is_valid_address;
use crate::context::{
    rank_fb_configs, ContextLifecycle, ContextState, FbCandidate, GlFunctions, GlVersion,
    GraphicsContext,
};
use crate::core::config::GlConfig;
use crate::error::{WindowError, WindowResult};

#[allow(non_camel_case_types)]
type glXCreateContextAttribsARB = unsafe extern "C" fn(
    *mut ffi::Display,
    ffi::GLXFBConfig,
    ffi::GLXContext,
    i32,
    *const i32,
) -> ffi::GLXContext;

#[allow(non_camel_case_types)]
type glGetString = unsafe extern "C" fn(u32) -> *const u8;

/// OpenGL context for one X window
pub(super) struct GlxContext {
    connection: Rc<Connection>,
    config: GlConfig,
    lifecycle: ContextLifecycle,
    fb_config: ffi::GLXFBConfig,
    visual: *mut ffi::XVisualInfo,
    window: ffi::Window,
    context: ffi::GLXContext,
    version: Option<GlVersion>,
    functions: GlFunctions,
}

impl GlxContext {
    /// Prepare a context on `connection`; nothing is negotiated yet
    pub fn new(connection: Rc<Connection>, config: GlConfig) -> Self {
        Self {
            connection,
            config,
            lifecycle: ContextLifecycle::new(),
            fb_config: ptr::null_mut(),
            visual: ptr::null_mut(),
            window: 0,
            context: ptr::null_mut(),
            version: None,
            functions: GlFunctions::default(),
        }
    }

    /// Visual chosen by `setup`, for window creation
    pub fn visual(&self) -> Option<&ffi::XVisualInfo> {
        unsafe { self.visual.as_ref() }
    }

    /// Bind the native window created with [`visual`](Self::visual)
    pub fn attach(&mut self, window: ffi::Window) {
        self.window = window;
    }

    fn glx(&self) -> WindowResult<&ffi::Glx> {
        glx_of(&self.connection)
    }

    fn attributes(&self) -> Vec<i32> {
        let config = &self.config;
        let channel = i32::from(config.color_bits / 3);
        let mut attributes = vec![
            ffi::GLX_X_RENDERABLE,
            1,
            ffi::GLX_DRAWABLE_TYPE,
            ffi::GLX_WINDOW_BIT,
            ffi::GLX_RENDER_TYPE,
            ffi::GLX_RGBA_BIT,
            ffi::GLX_X_VISUAL_TYPE,
            ffi::GLX_TRUE_COLOR,
            ffi::GLX_RED_SIZE,
            channel,
            ffi::GLX_GREEN_SIZE,
            channel,
            ffi::GLX_BLUE_SIZE,
            channel,
            ffi::GLX_ALPHA_SIZE,
            i32::from(config.alpha_bits),
            ffi::GLX_DEPTH_SIZE,
            i32::from(config.depth_bits),
            ffi::GLX_STENCIL_SIZE,
            i32::from(config.stencil_bits),
            ffi::GLX_DOUBLEBUFFER,
            1,
        ];
        if config.samples.is_some_and(|s| s > 0) {
            attributes.extend_from_slice(&[ffi::GLX_SAMPLE_BUFFERS, 1]);
        }
        attributes.push(0);
        attributes
    }

    fn choose_config(&mut self) -> WindowResult<()> {
        let connection = Rc::clone(&self.connection);
        let glx = glx_of(&connection)?;
        let display = self.connection.display;

        let (mut major, mut minor) = (0, 0);
        if unsafe { (glx.glXQueryVersion)(display, &mut major, &mut minor) } == 0 || (major, minor) < (1, 3) {
            return Err(WindowError::Context(format!(
                "GLX 1.3 is required, the server offers {major}.{minor}"
            )));
        }

        let attributes = self.attributes();
        let mut count = 0;
        let configs = unsafe {
            (glx.glXChooseFBConfig)(display, self.connection.screen, attributes.as_ptr(), &mut count)
        };
        if configs.is_null() || count <= 0 {
            return Err(WindowError::Context("No framebuffer configuration matches the request".into()));
        }
        let configs_slice = unsafe { std::slice::from_raw_parts(configs, count as usize) };

        let candidates: Vec<FbCandidate> = configs_slice
            .iter()
            .enumerate()
            .map(|(index, &config)| {
                let attribute = |name| {
                    let mut value = 0;
                    unsafe { (glx.glXGetFBConfigAttrib)(display, config, name, &mut value) };
                    value
                };
                FbCandidate {
                    index,
                    sample_buffers: attribute(ffi::GLX_SAMPLE_BUFFERS),
                    samples: attribute(ffi::GLX_SAMPLES),
                }
            })
            .collect();

        let chosen = rank_fb_configs(&candidates, self.config.samples).and_then(|(best, worst)| {
            [best, worst].into_iter().find_map(|index| {
                let config = configs_slice[index];
                let visual = unsafe { (glx.glXGetVisualFromFBConfig)(display, config) };
                if visual.is_null() {
                    log::debug!("Framebuffer configuration {index} has no visual");
                    None
                } else {
                    Some((index, config, visual))
                }
            })
        });
        unsafe { (self.connection.xlib.XFree)(configs.cast()) };

        let (index, config, visual) =
            chosen.ok_or_else(|| WindowError::Context("No framebuffer configuration has a visual".into()))?;
        log::debug!(
            "Framebuffer configuration {index} of {count} ({} samples)",
            candidates[index].samples
        );
        self.fb_config = config;
        self.visual = visual;
        Ok(())
    }

    fn proc_address(&self, name: &str) -> *const c_void {
        let (Ok(glx), Ok(name)) = (self.glx(), CString::new(name)) else {
            return ptr::null();
        };
        unsafe { (glx.glXGetProcAddress)(name.as_ptr().cast()) }
            .map_or(ptr::null(), |f| f as *const c_void)
    }

    fn create_context(&mut self) -> WindowResult<()> {
        if self.window == 0 {
            return Err(WindowError::Context("no window attached to the GLX context".into()));
        }
        let connection = Rc::clone(&self.connection);
        let glx = glx_of(&connection)?;
        let display = connection.display;
        let create = unsafe { (glx.glXGetProcAddress)(b"glXCreateContextAttribsARB\0".as_ptr()) };

        let context = match (create, self.config.version.map(GlVersion::from)) {
            (Some(create), Some(version)) => {
                let create = unsafe { mem::transmute::<unsafe extern "C" fn(), glXCreateContextAttribsARB>(create) };
                let mut attributes = vec![
                    ffi::GLX_CONTEXT_MAJOR_VERSION_ARB,
                    i32::from(version.major),
                    ffi::GLX_CONTEXT_MINOR_VERSION_ARB,
                    i32::from(version.minor),
                    ffi::GLX_CONTEXT_FLAGS_ARB,
                    if self.config.debug { ffi::GLX_CONTEXT_DEBUG_BIT_ARB } else { 0 },
                ];
                if version.has_profiles() {
                    attributes.push(ffi::GLX_CONTEXT_PROFILE_MASK_ARB);
                    attributes.push(if self.config.core_profile {
                        ffi::GLX_CONTEXT_CORE_PROFILE_BIT_ARB
                    } else {
                        ffi::GLX_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB
                    });
                }
                attributes.push(0);

                let fb_config = self.fb_config;
                let context = connection.trap_errors("glXCreateContextAttribsARB", || unsafe {
                    create(display, fb_config, ptr::null_mut(), ffi::True, attributes.as_ptr())
                })?;
                log::debug!("Requested GLX context {version}");
                context
            }
            (None, Some(version)) => {
                log::warn!("glXCreateContextAttribsARB unavailable; requested {version} ignored");
                unsafe { (glx.glXCreateNewContext)(display, self.fb_config, ffi::GLX_RGBA_TYPE, ptr::null_mut(), ffi::True) }
            }
            (_, None) => unsafe {
                (glx.glXCreateNewContext)(display, self.fb_config, ffi::GLX_RGBA_TYPE, ptr::null_mut(), ffi::True)
            },
        };
        if context.is_null() {
            return Err(WindowError::Context("Could not create a GLX context for the request".into()));
        }
        self.context = context;

        if unsafe { (glx.glXMakeCurrent)(display, self.window, context) } == 0 {
            return Err(WindowError::Context("glXMakeCurrent failed".into()));
        }
        self.version = self.query_version().or(self.config.version.map(GlVersion::from));
        log::debug!("GLX context is current, version {:?}", self.version);
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
        GlVersion::parse(&unsafe { CStr::from_ptr(raw.cast()) }.to_string_lossy())
    }
}

fn glx_of(connection: &Connection) -> WindowResult<&ffi::Glx> {
    connection
        .glx
        .as_ref()
        .ok_or_else(|| WindowError::Context("GLX is not available".into()))
}

impl GraphicsContext for GlxContext {
    fn setup(&mut self) -> WindowResult<()> {
        self.lifecycle.begin_setup()?;
        match self.choose_config() {
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
        let loaded = GlFunctions::load(&GlFunctions::required_for(major), |name| {
            let address = self.proc_address(name);
            if is_valid_address(address) { address } else { ptr::null() }
        });
        match loaded {
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
        let glx = self.glx()?;
        if unsafe { (glx.glXMakeCurrent)(self.connection.display, self.window, self.context) } == 0 {
            return Err(WindowError::Context("glXMakeCurrent failed".into()));
        }
        Ok(())
    }

    fn swap_buffers(&self) -> WindowResult<()> {
        self.lifecycle.require_active("swap_buffers")?;
        let glx = self.glx()?;
        unsafe { (glx.glXSwapBuffers)(self.connection.display, self.window) };
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

impl Drop for GlxContext {
    fn drop(&mut self) {
        let display = self.connection.display;
        if let (Some(glx), false) = (self.connection.glx.as_ref(), self.context.is_null()) {
            unsafe {
                (glx.glXMakeCurrent)(display, 0, ptr::null_mut());
                (glx.glXDestroyContext)(display, self.context);
            }
        }
        if !self.visual.is_null() {
            unsafe { (self.connection.xlib.XFree)(self.visual.cast()) };
        }
    }
}
