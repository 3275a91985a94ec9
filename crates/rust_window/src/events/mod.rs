//! Window events and callback registration
//!
//! Key principles:
//! - One optional handler slot per event kind; registering replaces the slot
//! - Handlers run on the thread that pumps the window, inside `poll_events`
//!   (and inside `close` for [`WindowEvent::Closed`])
//! - No registry borrow is held while a handler runs, so handlers may call
//!   back into the window, including re-registering handlers
//! - Handlers must not block

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::ErrorCode;
use crate::input::KeyCode;

/// A translated window event, ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    /// A key went down; `repeat_count` counts auto-repeats while held
    KeyPressed {
        /// Normalized key
        key: KeyCode,
        /// Whether the key was already down
        repeated: bool,
        /// Number of repeats reported for this press
        repeat_count: u16,
    },
    /// A key went up
    KeyReleased(KeyCode),
    /// The client area changed size; 0x0 while minimized
    Resized {
        /// New client width
        width: u16,
        /// New client height
        height: u16,
    },
    /// The native window was destroyed
    Closed,
    /// The pointer moved inside the client area
    MouseMoved {
        /// Client-relative x coordinate
        x: u16,
        /// Client-relative y coordinate
        y: u16,
    },
    /// A mouse button went down
    MousePressed(KeyCode),
    /// A mouse button went up
    MouseReleased(KeyCode),
    /// The wheel turned, in tenths of a notch clamped to [-10, 10]
    Scrolled {
        /// Signed rotation
        rotation: i16,
        /// Vertical wheel when true, horizontal otherwise
        vertical: bool,
    },
    /// A character was typed
    CharTyped(char),
    /// A failure was reported
    Error {
        /// Error category
        code: ErrorCode,
        /// Human readable detail
        message: String,
    },
}

/// Key press handler: key, repeated, repeat count
pub type KeyPressedFn = dyn Fn(KeyCode, bool, u16);
/// Key release handler
pub type KeyReleasedFn = dyn Fn(KeyCode);
/// Resize handler: width, height
pub type ResizedFn = dyn Fn(u16, u16);
/// Close handler
pub type ClosedFn = dyn Fn();
/// Mouse move handler: x, y
pub type MouseMovedFn = dyn Fn(u16, u16);
/// Mouse button handler
pub type MouseButtonFn = dyn Fn(KeyCode);
/// Scroll handler: rotation, vertical
pub type ScrolledFn = dyn Fn(i16, bool);
/// Character handler
pub type CharTypedFn = dyn Fn(char);
/// Error handler: code, message
pub type ErrorFn = dyn Fn(ErrorCode, &str);

type Slot<F> = RefCell<Option<Rc<F>>>;

fn load<F: ?Sized>(slot: &Slot<F>) -> Option<Rc<F>> {
    slot.borrow().clone()
}

fn store<F: ?Sized>(slot: &Slot<F>, handler: Box<F>) {
    *slot.borrow_mut() = Some(Rc::from(handler));
}

/// Single-slot handler registry for one window
#[derive(Default)]
pub struct Callbacks {
    key_pressed: Slot<KeyPressedFn>,
    key_released: Slot<KeyReleasedFn>,
    resized: Slot<ResizedFn>,
    closed: Slot<ClosedFn>,
    mouse_moved: Slot<MouseMovedFn>,
    mouse_pressed: Slot<MouseButtonFn>,
    mouse_released: Slot<MouseButtonFn>,
    scrolled: Slot<ScrolledFn>,
    char_typed: Slot<CharTypedFn>,
    error: Slot<ErrorFn>,
}

impl Callbacks {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the key press handler
    pub fn set_key_pressed(&self, handler: Box<KeyPressedFn>) {
        store(&self.key_pressed, handler);
    }

    /// Replace the key release handler
    pub fn set_key_released(&self, handler: Box<KeyReleasedFn>) {
        store(&self.key_released, handler);
    }

    /// Replace the resize handler
    pub fn set_resized(&self, handler: Box<ResizedFn>) {
        store(&self.resized, handler);
    }

    /// Replace the close handler
    pub fn set_closed(&self, handler: Box<ClosedFn>) {
        store(&self.closed, handler);
    }

    /// Replace the mouse move handler
    pub fn set_mouse_moved(&self, handler: Box<MouseMovedFn>) {
        store(&self.mouse_moved, handler);
    }

    /// Replace the mouse press handler
    pub fn set_mouse_pressed(&self, handler: Box<MouseButtonFn>) {
        store(&self.mouse_pressed, handler);
    }

    /// Replace the mouse release handler
    pub fn set_mouse_released(&self, handler: Box<MouseButtonFn>) {
        store(&self.mouse_released, handler);
    }

    /// Replace the scroll handler
    pub fn set_scrolled(&self, handler: Box<ScrolledFn>) {
        store(&self.scrolled, handler);
    }

    /// Replace the character handler
    pub fn set_char_typed(&self, handler: Box<CharTypedFn>) {
        store(&self.char_typed, handler);
    }

    /// Replace the error handler
    pub fn set_error(&self, handler: Box<ErrorFn>) {
        store(&self.error, handler);
    }

    /// Deliver one event to its handler, if one is registered
    ///
    /// The handler is cloned out of its slot before it runs, so it may
    /// replace itself or any other slot.
    pub fn dispatch(&self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyPressed { key, repeated, repeat_count } => {
                if let Some(handler) = load(&self.key_pressed) {
                    handler(*key, *repeated, *repeat_count);
                }
            }
            WindowEvent::KeyReleased(key) => {
                if let Some(handler) = load(&self.key_released) {
                    handler(*key);
                }
            }
            WindowEvent::Resized { width, height } => {
                if let Some(handler) = load(&self.resized) {
                    handler(*width, *height);
                }
            }
            WindowEvent::Closed => {
                if let Some(handler) = load(&self.closed) {
                    handler();
                }
            }
            WindowEvent::MouseMoved { x, y } => {
                if let Some(handler) = load(&self.mouse_moved) {
                    handler(*x, *y);
                }
            }
            WindowEvent::MousePressed(button) => {
                if let Some(handler) = load(&self.mouse_pressed) {
                    handler(*button);
                }
            }
            WindowEvent::MouseReleased(button) => {
                if let Some(handler) = load(&self.mouse_released) {
                    handler(*button);
                }
            }
            WindowEvent::Scrolled { rotation, vertical } => {
                if let Some(handler) = load(&self.scrolled) {
                    handler(*rotation, *vertical);
                }
            }
            WindowEvent::CharTyped(c) => {
                if let Some(handler) = load(&self.char_typed) {
                    handler(*c);
                }
            }
            WindowEvent::Error { code, message } => {
                if let Some(handler) = load(&self.error) {
                    handler(*code, message);
                }
            }
        }
    }

    /// Deliver a batch of events in order
    pub fn dispatch_all(&self, events: impl IntoIterator<Item = WindowEvent>) {
        for event in events {
            self.dispatch(&event);
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = |registered: bool| if registered { "set" } else { "unset" };
        f.debug_struct("Callbacks")
            .field("key_pressed", &set(self.key_pressed.borrow().is_some()))
            .field("key_released", &set(self.key_released.borrow().is_some()))
            .field("resized", &set(self.resized.borrow().is_some()))
            .field("closed", &set(self.closed.borrow().is_some()))
            .field("mouse_moved", &set(self.mouse_moved.borrow().is_some()))
            .field("mouse_pressed", &set(self.mouse_pressed.borrow().is_some()))
            .field("mouse_released", &set(self.mouse_released.borrow().is_some()))
            .field("scrolled", &set(self.scrolled.borrow().is_some()))
            .field("char_typed", &set(self.char_typed.borrow().is_some()))
            .field("error", &set(self.error.borrow().is_some()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_unset_slots_are_skipped() {
        let callbacks = Callbacks::new();
        callbacks.dispatch(&WindowEvent::Closed);
        callbacks.dispatch(&WindowEvent::Resized { width: 1, height: 1 });
    }

    #[test]
    fn test_registering_replaces_handler() {
        let callbacks = Callbacks::new();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let counter = first.clone();
        callbacks.set_closed(Box::new(move || counter.set(counter.get() + 1)));
        callbacks.dispatch(&WindowEvent::Closed);

        let counter = second.clone();
        callbacks.set_closed(Box::new(move || counter.set(counter.get() + 1)));
        callbacks.dispatch(&WindowEvent::Closed);

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_payloads_reach_handlers() {
        let callbacks = Callbacks::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        callbacks.set_key_pressed(Box::new(move |key, repeated, count| {
            log.borrow_mut().push(format!("press {key} {repeated} {count}"));
        }));
        let log = seen.clone();
        callbacks.set_scrolled(Box::new(move |rotation, vertical| {
            log.borrow_mut().push(format!("scroll {rotation} {vertical}"));
        }));
        let log = seen.clone();
        callbacks.set_error(Box::new(move |code, message| {
            log.borrow_mut().push(format!("error {code}: {message}"));
        }));

        callbacks.dispatch_all([
            WindowEvent::KeyPressed { key: KeyCode::A, repeated: true, repeat_count: 3 },
            WindowEvent::Scrolled { rotation: -10, vertical: false },
            WindowEvent::Error { code: ErrorCode::BadArgs, message: "nope".into() },
        ]);

        assert_eq!(
            *seen.borrow(),
            vec![
                "press A true 3".to_string(),
                "scroll -10 false".to_string(),
                "error bad arguments: nope".to_string(),
            ]
        );
    }

    #[test]
    fn test_handler_may_replace_itself() {
        let callbacks = Rc::new(Callbacks::new());
        let hits = Rc::new(Cell::new(0));

        let registry = callbacks.clone();
        let counter = hits.clone();
        callbacks.set_char_typed(Box::new(move |_| {
            counter.set(counter.get() + 1);
            registry.set_char_typed(Box::new(|_| {}));
        }));

        callbacks.dispatch(&WindowEvent::CharTyped('x'));
        callbacks.dispatch(&WindowEvent::CharTyped('y'));
        assert_eq!(hits.get(), 1);
    }
}
