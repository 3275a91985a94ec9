//! Window demo
//!
//! Opens one window and logs everything it reports.
//!
//! - **F9 / Escape**: toggle fullscreen
//! - **F10**: toggle cursor capture
//!
//! Settings come from `window.toml` in the working directory when present.

use std::path::Path;
use std::rc::{Rc, Weak};

use rust_window::prelude::*;

const CONFIG_PATH: &str = "window.toml";

fn toggle_fullscreen(window: &dyn Window) {
    let target = match window.window_mode() {
        WindowMode::Windowed => WindowMode::Fullscreen,
        WindowMode::Fullscreen => WindowMode::Windowed,
    };
    log::info!("Switching to {target:?}");
    if let Err(e) = window.set_window_mode(target) {
        log::warn!("Mode switch failed: {e}");
    }
}

fn toggle_capture(window: &dyn Window) {
    let target = if window.cursor_mode().contains(CursorMode::CAPTURED) {
        CursorMode::VISIBLE | CursorMode::FREE
    } else {
        CursorMode::HIDDEN | CursorMode::CAPTURED
    };
    if let Err(e) = window.set_cursor_mode(target) {
        log::warn!("Cursor mode change failed: {e}");
    }
}

fn register_callbacks(window: &SharedWindow) {
    let weak: Weak<dyn Window> = Rc::downgrade(window);
    window.on_key_pressed(Box::new(move |key, repeat, count| {
        log::debug!("Key pressed: {key} (repeat: {repeat}, count: {count})");
        if repeat {
            return;
        }
        let Some(window) = weak.upgrade() else {
            return;
        };
        match key {
            KeyCode::F9 | KeyCode::Escape => toggle_fullscreen(window.as_ref()),
            KeyCode::F10 => toggle_capture(window.as_ref()),
            _ => {}
        }
    }));
    window.on_key_released(Box::new(|key| log::debug!("Key released: {key}")));
    window.on_resized(Box::new(|width, height| log::info!("Resized to {width}x{height}")));
    window.on_closed(Box::new(|| log::info!("Window closed")));
    window.on_mouse_moved(Box::new(|x, y| log::trace!("Mouse at ({x}, {y})")));
    window.on_mouse_pressed(Box::new(|button| log::debug!("Pressed {button}")));
    window.on_mouse_released(Box::new(|button| log::debug!("Released {button}")));
    window.on_scrolled(Box::new(|rotation, vertical| {
        let axis = if vertical { "vertical" } else { "horizontal" };
        log::debug!("Scrolled {rotation} ({axis})");
    }));
    window.on_char_typed(Box::new(|c| log::debug!("Typed {c:?}")));
    window.on_error(Box::new(|code, message| log::error!("{code:?}: {message}")));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    rust_window::foundation::logging::init_with_level("info");

    let config = WindowConfig::load_or_default(Path::new(CONFIG_PATH))?;
    log::info!(
        "Starting window demo: {}x{} {:?}",
        config.width,
        config.height,
        config.window_mode
    );

    let window = rust_window::create_from_config(config);
    register_callbacks(&window);
    window.launch()?;

    while !window.should_close() {
        window.update();
    }

    window.close();
    log::info!("Window demo finished");
    Ok(())
}
