//! Native event translation
//!
//! Backends report what the OS said as [`RawEvent`]s; the
//! [`EventTranslator`] turns them into the [`WindowEvent`]s applications see.
//! It owns the state needed to do that faithfully:
//!
//! - the running size, updated only from deduplicated resize events
//! - the last pointer position, clamped into the client area
//! - per-key repeat counters for substrates without native repeat data
//! - the resize hold that swallows the intermediate size a mode transition
//!   produces
//!
//! Lifecycle events (close requests, focus, moves, destruction) are not
//! translated here; the window routes them to the mode controller.

use std::collections::HashMap;

use crate::events::WindowEvent;
use crate::input::KeyCode;

/// One wheel notch in native units (`WHEEL_DELTA`)
pub const WHEEL_DELTA: i32 = 120;

/// Native units per reported rotation step
const ROTATION_UNIT: i32 = WHEEL_DELTA / 10;

/// Largest rotation magnitude reported per event
const MAX_ROTATION: i32 = 10;

/// Repeat information supplied by substrates that track it natively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeRepeat {
    /// The key was already down before this message
    pub repeated: bool,
    /// Repeat count carried by the message
    pub count: u16,
}

/// What a native substrate reported, before any filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    /// Client area size; 0x0 when minimized or unmapped
    Resized {
        /// Client width
        width: u16,
        /// Client height
        height: u16,
    },
    /// Pointer position relative to the client origin, possibly out of range
    MouseMoved {
        /// Client x
        x: i32,
        /// Client y
        y: i32,
    },
    /// Button down
    MousePressed(KeyCode),
    /// Button up
    MouseReleased(KeyCode),
    /// Wheel motion in native units, one notch = [`WHEEL_DELTA`]
    Scrolled {
        /// Signed delta
        delta: i32,
        /// Vertical wheel when true
        vertical: bool,
    },
    /// Key down; `repeat` is `None` when the substrate has no repeat data
    KeyDown {
        /// Normalized key
        key: KeyCode,
        /// Native repeat flag and count
        repeat: Option<NativeRepeat>,
    },
    /// Key up
    KeyUp(KeyCode),
    /// Decoded character
    Char(char),
    /// The user asked to close the window
    CloseRequested,
    /// The native window is gone
    Destroyed,
    /// Keyboard focus left the window
    FocusLost,
    /// Keyboard focus returned
    FocusGained,
    /// The window frame moved
    Moved,
}

/// Resize hold armed by mode transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResizeHold {
    /// Resize events apply directly
    Idle,
    /// The next differing resize is held back
    Armed,
    /// A size is held, waiting for the follow-up
    Holding(u16, u16),
}

/// Turns raw native events into deduplicated window events
#[derive(Debug, Clone)]
pub struct EventTranslator {
    width: u16,
    height: u16,
    mouse_x: u16,
    mouse_y: u16,
    repeat_counts: HashMap<KeyCode, u8>,
    hold: ResizeHold,
}

impl EventTranslator {
    /// Start with the requested client size as the running size
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            mouse_x: 0,
            mouse_y: 0,
            repeat_counts: HashMap::new(),
            hold: ResizeHold::Idle,
        }
    }

    /// Running client width
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Running client height
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Last reported pointer position
    pub const fn mouse(&self) -> (u16, u16) {
        (self.mouse_x, self.mouse_y)
    }

    /// Whether both running dimensions are zero
    pub const fn minimized(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    /// Hold back the next size change, which is transition churn
    pub fn arm_resize_hold(&mut self) {
        self.hold = ResizeHold::Armed;
    }

    /// Translate one raw event, appending anything to dispatch to `out`
    ///
    /// Lifecycle events are ignored; the caller handles them.
    pub fn translate(&mut self, event: &RawEvent, out: &mut Vec<WindowEvent>) {
        match *event {
            RawEvent::Resized { width, height } => self.on_resize(width, height, out),
            RawEvent::MouseMoved { x, y } => self.on_mouse_move(x, y, out),
            RawEvent::MousePressed(button) => out.push(WindowEvent::MousePressed(button)),
            RawEvent::MouseReleased(button) => out.push(WindowEvent::MouseReleased(button)),
            RawEvent::Scrolled { delta, vertical } => out.push(WindowEvent::Scrolled {
                rotation: Self::rotation(delta),
                vertical,
            }),
            RawEvent::KeyDown { key, repeat } => out.push(self.on_key_down(key, repeat)),
            RawEvent::KeyUp(key) => {
                self.repeat_counts.remove(&key);
                out.push(WindowEvent::KeyReleased(key));
            }
            RawEvent::Char(c) => out.push(WindowEvent::CharTyped(c)),
            RawEvent::CloseRequested
            | RawEvent::Destroyed
            | RawEvent::FocusLost
            | RawEvent::FocusGained
            | RawEvent::Moved => {}
        }
    }

    /// Publish a size still held when the drain ends
    ///
    /// A hold lasts one drain; an armed hold that saw no size change is
    /// dropped so later user resizes apply directly.
    pub fn finish_drain(&mut self, out: &mut Vec<WindowEvent>) {
        match std::mem::replace(&mut self.hold, ResizeHold::Idle) {
            ResizeHold::Holding(width, height) => self.apply_size(width, height, out),
            ResizeHold::Armed => log::trace!("Transition produced no resize; hold released"),
            ResizeHold::Idle => {}
        }
    }

    fn on_resize(&mut self, width: u16, height: u16, out: &mut Vec<WindowEvent>) {
        match self.hold {
            ResizeHold::Idle => {
                if (width, height) == (self.width, self.height) {
                    log::trace!("Suppressed duplicate resize to {width}x{height}");
                } else {
                    self.apply_size(width, height, out);
                }
            }
            ResizeHold::Armed => {
                if (width, height) != (self.width, self.height) {
                    log::trace!("Holding transitional resize to {width}x{height}");
                    self.hold = ResizeHold::Holding(width, height);
                }
            }
            ResizeHold::Holding(..) => {
                self.hold = ResizeHold::Idle;
                if (width, height) == (self.width, self.height) {
                    log::trace!("Transition returned to {width}x{height}; nothing to report");
                } else {
                    self.apply_size(width, height, out);
                }
            }
        }
    }

    fn apply_size(&mut self, width: u16, height: u16, out: &mut Vec<WindowEvent>) {
        self.width = width;
        self.height = height;
        // Keep the stored pointer inside the new client area
        self.mouse_x = self.mouse_x.min(width.saturating_sub(1));
        self.mouse_y = self.mouse_y.min(height.saturating_sub(1));
        out.push(WindowEvent::Resized { width, height });
    }

    fn on_mouse_move(&mut self, x: i32, y: i32, out: &mut Vec<WindowEvent>) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let clamp = |v: i32, extent: u16| v.clamp(0, i32::from(extent) - 1) as u16;
        let (x, y) = (clamp(x, self.width), clamp(y, self.height));
        if (x, y) == (self.mouse_x, self.mouse_y) {
            return;
        }
        self.mouse_x = x;
        self.mouse_y = y;
        out.push(WindowEvent::MouseMoved { x, y });
    }

    fn on_key_down(&mut self, key: KeyCode, repeat: Option<NativeRepeat>) -> WindowEvent {
        let (repeated, repeat_count) = match repeat {
            Some(native) => (native.repeated, native.count),
            None => {
                let counter = self.repeat_counts.entry(key).or_insert(0);
                let current = *counter;
                *counter = counter.saturating_add(1);
                (current > 0, u16::from(current))
            }
        };
        WindowEvent::KeyPressed { key, repeated, repeat_count }
    }

    fn rotation(delta: i32) -> i16 {
        (delta / ROTATION_UNIT).clamp(-MAX_ROTATION, MAX_ROTATION) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate_all(translator: &mut EventTranslator, events: &[RawEvent]) -> Vec<WindowEvent> {
        let mut out = Vec::new();
        for event in events {
            translator.translate(event, &mut out);
        }
        translator.finish_drain(&mut out);
        out
    }

    fn resized(width: u16, height: u16) -> RawEvent {
        RawEvent::Resized { width, height }
    }

    #[test]
    fn test_identical_resizes_fire_once() {
        let mut translator = EventTranslator::new(800, 600);
        let out = translate_all(&mut translator, &[resized(1024, 768), resized(1024, 768), resized(1024, 768)]);
        assert_eq!(out, vec![WindowEvent::Resized { width: 1024, height: 768 }]);

        let out = translate_all(&mut translator, &[resized(1024, 768)]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_resize_to_running_size_is_silent() {
        let mut translator = EventTranslator::new(800, 600);
        assert!(translate_all(&mut translator, &[resized(800, 600)]).is_empty());
    }

    #[test]
    fn test_transition_churn_reports_final_size_only() {
        let mut translator = EventTranslator::new(800, 600);
        translator.arm_resize_hold();
        let out = translate_all(&mut translator, &[resized(816, 639), resized(1920, 1080)]);
        assert_eq!(out, vec![WindowEvent::Resized { width: 1920, height: 1080 }]);
        assert_eq!((translator.width(), translator.height()), (1920, 1080));
    }

    #[test]
    fn test_transition_back_to_same_size_is_silent() {
        let mut translator = EventTranslator::new(800, 600);
        translator.arm_resize_hold();
        let out = translate_all(&mut translator, &[resized(784, 561), resized(800, 600)]);
        assert!(out.is_empty());
        assert_eq!((translator.width(), translator.height()), (800, 600));
    }

    #[test]
    fn test_held_size_published_at_end_of_drain() {
        let mut translator = EventTranslator::new(800, 600);
        translator.arm_resize_hold();
        let out = translate_all(&mut translator, &[resized(1920, 1080)]);
        assert_eq!(out, vec![WindowEvent::Resized { width: 1920, height: 1080 }]);
    }

    #[test]
    fn test_unused_hold_expires_after_one_drain() {
        let mut translator = EventTranslator::new(800, 600);
        translator.arm_resize_hold();
        assert!(translate_all(&mut translator, &[resized(800, 600)]).is_empty());

        let out = translate_all(&mut translator, &[resized(1024, 768)]);
        assert_eq!(out, vec![WindowEvent::Resized { width: 1024, height: 768 }]);
        assert_eq!((translator.width(), translator.height()), (1024, 768));
    }

    #[test]
    fn test_shrinking_reclamps_mouse() {
        let mut translator = EventTranslator::new(1920, 1080);
        translate_all(&mut translator, &[RawEvent::MouseMoved { x: 1500, y: 900 }]);
        translate_all(&mut translator, &[resized(800, 600)]);
        assert_eq!(translator.mouse(), (799, 599));

        translate_all(&mut translator, &[RawEvent::MouseMoved { x: 10, y: 20 }, resized(640, 480)]);
        assert_eq!(translator.mouse(), (10, 20));
    }

    #[test]
    fn test_minimize_resets_mouse() {
        let mut translator = EventTranslator::new(800, 600);
        translate_all(&mut translator, &[RawEvent::MouseMoved { x: 300, y: 200 }, resized(0, 0)]);
        assert_eq!(translator.mouse(), (0, 0));
    }

    #[test]
    fn test_minimized_iff_both_zero() {
        let mut translator = EventTranslator::new(800, 600);
        assert!(!translator.minimized());
        translate_all(&mut translator, &[resized(0, 0)]);
        assert!(translator.minimized());
        translate_all(&mut translator, &[resized(0, 600)]);
        assert!(!translator.minimized());
        translate_all(&mut translator, &[resized(800, 600)]);
        assert!(!translator.minimized());
    }

    #[test]
    fn test_mouse_coordinates_stay_in_client_area() {
        let mut translator = EventTranslator::new(800, 600);
        let samples = [(-5, 10), (10, -5), (800, 599), (5000, 5000), (799, 0), (400, 300)];
        for (x, y) in samples {
            let mut out = Vec::new();
            translator.translate(&RawEvent::MouseMoved { x, y }, &mut out);
            let (mx, my) = translator.mouse();
            assert!(mx < 800 && my < 600, "({x}, {y}) -> ({mx}, {my})");
        }
    }

    #[test]
    fn test_mouse_clamps_to_nearest_edge() {
        let mut translator = EventTranslator::new(800, 600);
        let out = translate_all(&mut translator, &[RawEvent::MouseMoved { x: 900, y: -3 }]);
        assert_eq!(out, vec![WindowEvent::MouseMoved { x: 799, y: 0 }]);
    }

    #[test]
    fn test_mouse_moves_deduplicated() {
        let mut translator = EventTranslator::new(800, 600);
        let moved = RawEvent::MouseMoved { x: 10, y: 20 };
        let out = translate_all(&mut translator, &[moved.clone(), moved]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_mouse_moves_dropped_while_minimized() {
        let mut translator = EventTranslator::new(800, 600);
        let out = translate_all(&mut translator, &[resized(0, 0), RawEvent::MouseMoved { x: 10, y: 10 }]);
        assert_eq!(out, vec![WindowEvent::Resized { width: 0, height: 0 }]);
    }

    #[test]
    fn test_synthesized_repeat_counts() {
        let mut translator = EventTranslator::new(800, 600);
        let down = RawEvent::KeyDown { key: KeyCode::W, repeat: None };
        let out = translate_all(&mut translator, &[down.clone(), down.clone(), down.clone()]);
        assert_eq!(
            out,
            vec![
                WindowEvent::KeyPressed { key: KeyCode::W, repeated: false, repeat_count: 0 },
                WindowEvent::KeyPressed { key: KeyCode::W, repeated: true, repeat_count: 1 },
                WindowEvent::KeyPressed { key: KeyCode::W, repeated: true, repeat_count: 2 },
            ]
        );

        let out = translate_all(&mut translator, &[RawEvent::KeyUp(KeyCode::W), down]);
        assert_eq!(
            out,
            vec![
                WindowEvent::KeyReleased(KeyCode::W),
                WindowEvent::KeyPressed { key: KeyCode::W, repeated: false, repeat_count: 0 },
            ]
        );
    }

    #[test]
    fn test_repeat_counter_saturates_and_never_decreases() {
        let mut translator = EventTranslator::new(800, 600);
        let down = RawEvent::KeyDown { key: KeyCode::Space, repeat: None };
        let mut last = 0;
        for _ in 0..600 {
            let mut out = Vec::new();
            translator.translate(&down, &mut out);
            let WindowEvent::KeyPressed { repeat_count, .. } = out[0] else {
                panic!("expected key press");
            };
            assert!(repeat_count >= last);
            last = repeat_count;
        }
        assert_eq!(last, u16::from(u8::MAX));
    }

    #[test]
    fn test_repeat_counters_are_per_key() {
        let mut translator = EventTranslator::new(800, 600);
        let out = translate_all(
            &mut translator,
            &[
                RawEvent::KeyDown { key: KeyCode::A, repeat: None },
                RawEvent::KeyDown { key: KeyCode::B, repeat: None },
            ],
        );
        assert!(out
            .iter()
            .all(|e| matches!(e, WindowEvent::KeyPressed { repeated: false, repeat_count: 0, .. })));
    }

    #[test]
    fn test_native_repeat_passes_through() {
        let mut translator = EventTranslator::new(800, 600);
        let out = translate_all(
            &mut translator,
            &[RawEvent::KeyDown {
                key: KeyCode::Enter,
                repeat: Some(NativeRepeat { repeated: true, count: 3 }),
            }],
        );
        assert_eq!(
            out,
            vec![WindowEvent::KeyPressed { key: KeyCode::Enter, repeated: true, repeat_count: 3 }]
        );
    }

    #[test]
    fn test_scroll_normalized_and_clamped() {
        let mut translator = EventTranslator::new(800, 600);
        let out = translate_all(
            &mut translator,
            &[
                RawEvent::Scrolled { delta: WHEEL_DELTA, vertical: true },
                RawEvent::Scrolled { delta: -WHEEL_DELTA, vertical: false },
                RawEvent::Scrolled { delta: 3 * WHEEL_DELTA, vertical: true },
                RawEvent::Scrolled { delta: 30, vertical: true },
            ],
        );
        assert_eq!(
            out,
            vec![
                WindowEvent::Scrolled { rotation: 10, vertical: true },
                WindowEvent::Scrolled { rotation: -10, vertical: false },
                WindowEvent::Scrolled { rotation: 10, vertical: true },
                WindowEvent::Scrolled { rotation: 2, vertical: true },
            ]
        );
    }

    #[test]
    fn test_lifecycle_events_not_translated() {
        let mut translator = EventTranslator::new(800, 600);
        let out = translate_all(
            &mut translator,
            &[RawEvent::CloseRequested, RawEvent::FocusLost, RawEvent::Moved, RawEvent::Destroyed],
        );
        assert!(out.is_empty());
    }
}
