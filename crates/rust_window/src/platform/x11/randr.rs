//! Display resolution switching through RandR
//!
//! The CRTC driving the monitor under the window is switched to a mode of the
//! requested size and switched back to exactly the saved configuration.

use std::slice;

use super::display::Connection;
use super::ffi;
use crate::window::backend::Rect;

/// CRTC configuration captured before a mode switch
#[derive(Debug, Clone)]
pub(super) struct SavedCrtc {
    crtc: ffi::RRCrtc,
    mode: ffi::RRMode,
    x: i32,
    y: i32,
    rotation: ffi::Rotation,
    outputs: Vec<ffi::RROutput>,
}

/// Geometry of one active CRTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct CrtcArea {
    crtc: ffi::RRCrtc,
    rect: Rect,
}

fn contains(rect: &Rect, x: i32, y: i32) -> bool {
    x >= rect.x && y >= rect.y && x < rect.x + rect.width as i32 && y < rect.y + rect.height as i32
}

/// Pick the CRTC showing the point, else the first active one
pub(super) fn crtc_at(areas: &[CrtcArea], x: i32, y: i32) -> Option<CrtcArea> {
    areas
        .iter()
        .find(|area| contains(&area.rect, x, y))
        .or_else(|| areas.first())
        .copied()
}

/// Screen resources, freed on drop
struct Resources<'a> {
    connection: &'a Connection,
    xrandr: &'a ffi::Xrandr,
    raw: *mut ffi::XRRScreenResources,
}

impl<'a> Resources<'a> {
    fn get(connection: &'a Connection) -> Option<Self> {
        let xrandr = connection.xrandr.as_ref()?;
        let raw = unsafe { (xrandr.XRRGetScreenResources)(connection.display, connection.root) };
        if raw.is_null() {
            return None;
        }
        Some(Self { connection, xrandr, raw })
    }

    fn crtcs(&self) -> &[ffi::RRCrtc] {
        let resources = unsafe { &*self.raw };
        if resources.crtcs.is_null() {
            return &[];
        }
        unsafe { slice::from_raw_parts(resources.crtcs, resources.ncrtc as usize) }
    }

    fn modes(&self) -> &[ffi::XRRModeInfo] {
        let resources = unsafe { &*self.raw };
        if resources.modes.is_null() {
            return &[];
        }
        unsafe { slice::from_raw_parts(resources.modes, resources.nmode as usize) }
    }

    fn with_crtc<T>(&self, crtc: ffi::RRCrtc, f: impl FnOnce(&ffi::XRRCrtcInfo) -> T) -> Option<T> {
        let info = unsafe { (self.xrandr.XRRGetCrtcInfo)(self.connection.display, self.raw, crtc) };
        if info.is_null() {
            return None;
        }
        let value = f(unsafe { &*info });
        unsafe { (self.xrandr.XRRFreeCrtcInfo)(info) };
        Some(value)
    }

    fn output_modes(&self, output: ffi::RROutput) -> Vec<ffi::RRMode> {
        let info = unsafe { (self.xrandr.XRRGetOutputInfo)(self.connection.display, self.raw, output) };
        if info.is_null() {
            return Vec::new();
        }
        let modes = unsafe {
            let info = &*info;
            if info.modes.is_null() {
                Vec::new()
            } else {
                slice::from_raw_parts(info.modes, info.nmode as usize).to_vec()
            }
        };
        unsafe { (self.xrandr.XRRFreeOutputInfo)(info) };
        modes
    }

    fn active_areas(&self) -> Vec<CrtcArea> {
        self.crtcs()
            .iter()
            .filter_map(|&crtc| {
                self.with_crtc(crtc, |info| {
                    (info.mode != 0).then(|| CrtcArea {
                        crtc,
                        rect: Rect::new(info.x, info.y, info.width, info.height),
                    })
                })
                .flatten()
            })
            .collect()
    }

    fn set_crtc(
        &self,
        crtc: ffi::RRCrtc,
        mode: ffi::RRMode,
        x: i32,
        y: i32,
        rotation: ffi::Rotation,
        outputs: &mut [ffi::RROutput],
    ) -> bool {
        let status = unsafe {
            (self.xrandr.XRRSetCrtcConfig)(
                self.connection.display,
                self.raw,
                crtc,
                ffi::CurrentTime,
                x,
                y,
                mode,
                rotation,
                outputs.as_mut_ptr(),
                outputs.len() as i32,
            )
        };
        status == 0
    }
}

impl Drop for Resources<'_> {
    fn drop(&mut self) {
        unsafe { (self.xrandr.XRRFreeScreenResources)(self.raw) };
    }
}

/// Rectangle of the monitor showing the point, if RandR can tell
pub(super) fn monitor_at(connection: &Connection, x: i32, y: i32) -> Option<Rect> {
    let resources = Resources::get(connection)?;
    crtc_at(&resources.active_areas(), x, y).map(|area| area.rect)
}

/// Switch the monitor showing the point to `width`x`height`
///
/// Returns the configuration to restore, or `None` when no output offers a
/// mode of that size or the server refused the change.
pub(super) fn switch_mode(connection: &Connection, x: i32, y: i32, width: u16, height: u16) -> Option<SavedCrtc> {
    let resources = Resources::get(connection)?;
    let area = crtc_at(&resources.active_areas(), x, y)?;

    let saved = resources.with_crtc(area.crtc, |info| SavedCrtc {
        crtc: area.crtc,
        mode: info.mode,
        x: info.x,
        y: info.y,
        rotation: info.rotation,
        outputs: if info.outputs.is_null() {
            Vec::new()
        } else {
            unsafe { slice::from_raw_parts(info.outputs, info.noutput as usize).to_vec() }
        },
    })?;
    let supported = saved
        .outputs
        .first()
        .map(|&output| resources.output_modes(output))
        .unwrap_or_default();

    let mode = resources.modes().iter().find(|mode| {
        mode.width == u32::from(width) && mode.height == u32::from(height) && supported.contains(&mode.id)
    })?;
    log::debug!("Switching CRTC {} to mode {} ({width}x{height})", area.crtc, mode.id);

    let mut outputs = saved.outputs.clone();
    if !resources.set_crtc(saved.crtc, mode.id, saved.x, saved.y, saved.rotation, &mut outputs) {
        log::warn!("RandR refused {width}x{height}");
        return None;
    }
    Some(saved)
}

/// Put a CRTC back the way [`switch_mode`] found it
pub(super) fn restore_mode(connection: &Connection, saved: &SavedCrtc) {
    let Some(resources) = Resources::get(connection) else {
        return;
    };
    let mut outputs = saved.outputs.clone();
    if !resources.set_crtc(saved.crtc, saved.mode, saved.x, saved.y, saved.rotation, &mut outputs) {
        log::error!("Could not restore the display mode of CRTC {}", saved.crtc);
    }
}
