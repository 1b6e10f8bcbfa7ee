use chevron::{Cue, Key};
use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use std::time::Duration;

pub fn map_key(key: gdk::Key) -> Option<Key> {
    if key == gdk::Key::Return || key == gdk::Key::KP_Enter {
        Some(Key::Enter)
    } else if key == gdk::Key::BackSpace {
        Some(Key::Backspace)
    } else if key == gdk::Key::Delete || key == gdk::Key::KP_Delete {
        Some(Key::Delete)
    } else if key == gdk::Key::Escape {
        Some(Key::Escape)
    } else {
        key.to_unicode()
            .and_then(|c| c.to_digit(10))
            .filter(|d| (1..=9).contains(d))
            .map(|d| Key::Digit(d as u8))
    }
}

/// Monotonic frame time of `clock`.
pub fn frame_time(clock: &gdk::FrameClock) -> Duration {
    Duration::from_micros(clock.frame_time().max(0) as u64)
}

/// Cues have no audio backend here; only rejections get the display bell.
pub fn present_cue(widget: &impl IsA<gtk::Widget>, cue: Cue, mute: bool) {
    let name: &'static str = cue.into();
    log::debug!("cue {}", name);
    if cue == Cue::Error && !mute {
        widget.error_bell();
    }
}
