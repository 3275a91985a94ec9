//! OpenGL entry point resolution
//!
//! After a context is made current the platform resolves every name in
//! [`REQUIRED_FUNCTIONS`]; a single missing entry point fails activation.
//! The resolved table is kept so `get_proc_address` on the window can answer
//! the common names without another driver round trip.

use std::collections::HashMap;
use std::ffi::c_void;

use crate::error::{WindowError, WindowResult};

/// Entry points every activated context must provide
pub const REQUIRED_FUNCTIONS: &[&str] = &[
    "glGetString",
    "glGetIntegerv",
    "glGetError",
    "glViewport",
    "glClearColor",
    "glClear",
    "glEnable",
    "glDisable",
    "glBlendFunc",
    "glFlush",
    "glGenBuffers",
    "glBindBuffer",
    "glBufferData",
    "glDeleteBuffers",
    "glCreateShader",
    "glShaderSource",
    "glCompileShader",
    "glGetShaderiv",
    "glDeleteShader",
    "glCreateProgram",
    "glAttachShader",
    "glLinkProgram",
    "glGetProgramiv",
    "glUseProgram",
    "glDeleteProgram",
    "glGetUniformLocation",
    "glVertexAttribPointer",
    "glEnableVertexAttribArray",
    "glDrawArrays",
    "glDrawElements",
];

/// Additional entry points required when the context is 3.0 or newer
pub const REQUIRED_FUNCTIONS_GL3: &[&str] = &[
    "glGenVertexArrays",
    "glBindVertexArray",
    "glDeleteVertexArrays",
    "glGetStringi",
];

/// Whether a driver-returned address is usable
///
/// Some WGL drivers return small sentinel values instead of null for
/// functions they do not export.
pub fn is_valid_address(address: *const c_void) -> bool {
    !matches!(address as isize, -1 | 0 | 1 | 2 | 3)
}

/// Resolved entry points of one context
#[derive(Debug, Default, Clone)]
pub struct GlFunctions {
    table: HashMap<&'static str, usize>,
}

impl GlFunctions {
    /// Resolve every name in `names` through `resolve`
    ///
    /// Fails with [`WindowError::Context`] naming the first entry point the
    /// driver does not provide.
    pub fn load<F>(names: &[&'static str], mut resolve: F) -> WindowResult<Self>
    where
        F: FnMut(&str) -> *const c_void,
    {
        let mut table = HashMap::with_capacity(names.len());
        for &name in names {
            let address = resolve(name);
            if !is_valid_address(address) {
                return Err(WindowError::Context(format!(
                    "Failed to load OpenGL functions: `{name}` is missing"
                )));
            }
            table.insert(name, address as usize);
        }
        log::debug!("Resolved {} OpenGL entry points", table.len());
        Ok(Self { table })
    }

    /// Required names for a context of the given major version
    pub fn required_for(major: u8) -> Vec<&'static str> {
        let mut names = REQUIRED_FUNCTIONS.to_vec();
        if major >= 3 {
            names.extend_from_slice(REQUIRED_FUNCTIONS_GL3);
        }
        names
    }

    /// Previously resolved address of `name`
    pub fn get(&self, name: &str) -> Option<*const c_void> {
        self.table.get(name).map(|&address| address as *const c_void)
    }

    /// Number of resolved entry points
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether nothing has been resolved
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn fake_resolver(missing: &'static str) -> impl FnMut(&str) -> *const c_void {
        let mut next = 0x1000usize;
        move |name| {
            if name == missing {
                ptr::null()
            } else {
                next += 0x10;
                next as *const c_void
            }
        }
    }

    #[test]
    fn test_load_all_present() {
        let names = GlFunctions::required_for(3);
        let functions = GlFunctions::load(&names, fake_resolver("")).expect("load");
        assert_eq!(functions.len(), REQUIRED_FUNCTIONS.len() + REQUIRED_FUNCTIONS_GL3.len());
        assert!(functions.get("glBindVertexArray").is_some());
        assert!(functions.get("glNotAFunction").is_none());
    }

    #[test]
    fn test_missing_function_is_named() {
        let names = GlFunctions::required_for(2);
        let error = GlFunctions::load(&names, fake_resolver("glCreateShader")).unwrap_err();
        assert!(matches!(&error, WindowError::Context(message) if message.contains("glCreateShader")));
    }

    #[test]
    fn test_legacy_versions_skip_vertex_arrays() {
        assert!(!GlFunctions::required_for(2).contains(&"glGenVertexArrays"));
        assert!(GlFunctions::required_for(4).contains(&"glGenVertexArrays"));
    }

    #[test]
    fn test_sentinel_addresses_rejected() {
        assert!(!is_valid_address(ptr::null()));
        assert!(!is_valid_address(1 as *const c_void));
        assert!(!is_valid_address(3 as *const c_void));
        assert!(!is_valid_address(-1isize as *const c_void));
        assert!(is_valid_address(0x7fff_0000 as *const c_void));
    }
}
