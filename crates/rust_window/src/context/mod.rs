//! Graphics context strategy
//!
//! A window owns at most one [`GraphicsContext`]. The platform layer provides
//! the implementations (WGL on Win32, GLX on X11); everything here is the
//! platform-neutral part of the protocol:
//!
//! ```text
//!  Created ──setup()──▶ Configured ──activate()──▶ Active
//!     │                     │                        │
//!     └──────── failure ────┴────────────────────────┴──▶ Failed
//! ```
//!
//! - **`setup`** negotiates the pixel format / framebuffer configuration
//! - **`activate`** creates the native context, makes it current and resolves
//!   the required GL entry points
//! - **`make_current`**, **`swap_buffers`** need an active context
//!
//! A context is never replaced on a live window; it is created during launch
//! and destroyed when the window closes, before the native window itself.

pub mod loader;

use std::ffi::c_void;
use std::fmt;

use crate::error::{WindowError, WindowResult};

pub use loader::{GlFunctions, REQUIRED_FUNCTIONS};

/// Lifecycle position of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Constructed, nothing negotiated yet
    Created,
    /// Pixel format / framebuffer configuration chosen
    Configured,
    /// Native context created, current and loaded
    Active,
    /// A step failed; the context is unusable
    Failed,
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Configured => "configured",
            Self::Active => "active",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Enforces `setup` before `activate` before use
#[derive(Debug, Clone, Copy)]
pub struct ContextLifecycle {
    state: ContextState,
}

impl Default for ContextLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextLifecycle {
    /// Start in [`ContextState::Created`]
    pub const fn new() -> Self {
        Self { state: ContextState::Created }
    }

    /// Current state
    pub const fn state(&self) -> ContextState {
        self.state
    }

    fn expect(&self, wanted: ContextState, operation: &str) -> WindowResult<()> {
        if self.state == wanted {
            Ok(())
        } else {
            Err(WindowError::Context(format!(
                "{operation} requires a {wanted} context, but it is {}",
                self.state
            )))
        }
    }

    /// Check that `setup` may run
    pub fn begin_setup(&self) -> WindowResult<()> {
        self.expect(ContextState::Created, "setup")
    }

    /// Check that `activate` may run
    pub fn begin_activate(&self) -> WindowResult<()> {
        self.expect(ContextState::Configured, "activate")
    }

    /// Check that the context is usable
    pub fn require_active(&self, operation: &str) -> WindowResult<()> {
        self.expect(ContextState::Active, operation)
    }

    /// Record a successful `setup`
    pub fn configured(&mut self) {
        self.state = ContextState::Configured;
    }

    /// Record a successful `activate`
    pub fn activated(&mut self) {
        self.state = ContextState::Active;
    }

    /// Record a failure, passing the error through
    pub fn fail(&mut self, error: WindowError) -> WindowError {
        self.state = ContextState::Failed;
        error
    }
}

/// A rendering context bound to one window
pub trait GraphicsContext {
    /// Negotiate the pixel format or framebuffer configuration
    fn setup(&mut self) -> WindowResult<()>;

    /// Create the native context, make it current and load entry points
    fn activate(&mut self) -> WindowResult<()>;

    /// Bind the context to the calling thread
    fn make_current(&self) -> WindowResult<()>;

    /// Present the back buffer
    fn swap_buffers(&self) -> WindowResult<()>;

    /// Resolve a GL entry point; null when unknown
    fn get_proc_address(&self, name: &str) -> *const c_void;

    /// Lifecycle position
    fn state(&self) -> ContextState;

    /// Version the driver actually granted, once active
    fn version(&self) -> Option<GlVersion>;
}

/// An OpenGL `major.minor` version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlVersion {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
}

impl GlVersion {
    /// Construct a version
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Parse the leading `major.minor` of a `GL_VERSION` string
    ///
    /// Accepts the vendor suffixes drivers append, e.g.
    /// `"4.6.0 NVIDIA 535.54"` or `"3.3 (Core Profile) Mesa 23.0"`, and the
    /// `"OpenGL ES 3.2"` prefix.
    pub fn parse(version: &str) -> Option<Self> {
        let version = version.trim();
        let version = version.strip_prefix("OpenGL ES ").unwrap_or(version);
        let numeric = version.split_whitespace().next()?;
        let mut parts = numeric.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts
            .next()?
            .chars()
            .take_while(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .ok()?;
        Some(Self { major, minor })
    }

    /// Whether profiles (core/compatibility) exist for this version
    pub fn has_profiles(self) -> bool {
        self >= Self::new(3, 2)
    }
}

impl From<(u8, u8)> for GlVersion {
    fn from((major, minor): (u8, u8)) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Multisample attributes of one candidate framebuffer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FbCandidate {
    /// Position in the driver's list
    pub index: usize,
    /// `GLX_SAMPLE_BUFFERS`
    pub sample_buffers: i32,
    /// `GLX_SAMPLES`
    pub samples: i32,
}

/// Pick the best and worst candidates by multisampling
///
/// Candidates above `max_samples` are not eligible as "best". The first
/// candidate wins ties, matching the driver's own preference order. Returns
/// `(best, worst)` indices into the driver's list.
pub fn rank_fb_configs(candidates: &[FbCandidate], max_samples: Option<u8>) -> Option<(usize, usize)> {
    let score = |c: &FbCandidate| if c.sample_buffers > 0 { c.samples } else { 0 };
    let within_cap = |c: &FbCandidate| max_samples.map_or(true, |cap| score(c) <= i32::from(cap));

    let mut best: Option<&FbCandidate> = None;
    let mut worst: Option<&FbCandidate> = None;
    for candidate in candidates {
        if within_cap(candidate) && best.map_or(true, |b| score(candidate) > score(b)) {
            best = Some(candidate);
        }
        if worst.map_or(true, |w| score(candidate) < score(w)) {
            worst = Some(candidate);
        }
    }

    let worst = worst?;
    Some((best.unwrap_or(worst).index, worst.index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gl_version_strings() {
        assert_eq!(GlVersion::parse("4.6.0 NVIDIA 535.54.03"), Some(GlVersion::new(4, 6)));
        assert_eq!(GlVersion::parse("3.3 (Core Profile) Mesa 23.0.4"), Some(GlVersion::new(3, 3)));
        assert_eq!(GlVersion::parse("2.1"), Some(GlVersion::new(2, 1)));
        assert_eq!(GlVersion::parse("4.5.14008 Compatibility Profile"), Some(GlVersion::new(4, 5)));
        assert_eq!(GlVersion::parse("OpenGL ES 3.2 Mesa"), Some(GlVersion::new(3, 2)));
        assert_eq!(GlVersion::parse(""), None);
        assert_eq!(GlVersion::parse("garbage"), None);
    }

    #[test]
    fn test_version_ordering_and_profiles() {
        assert!(GlVersion::new(3, 3) > GlVersion::new(3, 2));
        assert!(GlVersion::new(4, 0) > GlVersion::new(3, 3));
        assert!(GlVersion::new(3, 2).has_profiles());
        assert!(!GlVersion::new(3, 1).has_profiles());
        assert_eq!(GlVersion::from((4, 1)).to_string(), "4.1");
    }

    #[test]
    fn test_lifecycle_order_enforced() {
        let mut lifecycle = ContextLifecycle::new();
        assert!(lifecycle.begin_activate().is_err());
        assert!(lifecycle.require_active("swap_buffers").is_err());

        assert!(lifecycle.begin_setup().is_ok());
        lifecycle.configured();
        assert!(lifecycle.begin_setup().is_err());
        assert!(lifecycle.begin_activate().is_ok());

        lifecycle.activated();
        assert!(lifecycle.require_active("swap_buffers").is_ok());
        assert_eq!(lifecycle.state(), ContextState::Active);
    }

    #[test]
    fn test_lifecycle_failure_is_terminal() {
        let mut lifecycle = ContextLifecycle::new();
        let error = lifecycle.fail(WindowError::Context("no pixel format".into()));
        assert_eq!(error, WindowError::Context("no pixel format".into()));
        assert_eq!(lifecycle.state(), ContextState::Failed);
        assert!(lifecycle.begin_setup().is_err());
        assert!(lifecycle.begin_activate().is_err());
    }

    fn candidate(index: usize, sample_buffers: i32, samples: i32) -> FbCandidate {
        FbCandidate { index, sample_buffers, samples }
    }

    #[test]
    fn test_rank_prefers_most_samples() {
        let candidates = [candidate(0, 0, 0), candidate(1, 1, 4), candidate(2, 1, 8), candidate(3, 1, 2)];
        assert_eq!(rank_fb_configs(&candidates, None), Some((2, 0)));
    }

    #[test]
    fn test_rank_respects_sample_cap() {
        let candidates = [candidate(0, 1, 16), candidate(1, 1, 4), candidate(2, 0, 0)];
        assert_eq!(rank_fb_configs(&candidates, Some(4)), Some((1, 2)));
        assert_eq!(rank_fb_configs(&candidates, Some(0)), Some((2, 2)));
    }

    #[test]
    fn test_rank_ignores_samples_without_buffers() {
        let candidates = [candidate(0, 0, 8), candidate(1, 1, 2)];
        assert_eq!(rank_fb_configs(&candidates, None), Some((1, 0)));
    }

    #[test]
    fn test_rank_ties_keep_driver_order() {
        let candidates = [candidate(0, 1, 4), candidate(1, 1, 4)];
        assert_eq!(rank_fb_configs(&candidates, None), Some((0, 0)));
    }

    #[test]
    fn test_rank_empty() {
        assert_eq!(rank_fb_configs(&[], None), None);
    }
}
