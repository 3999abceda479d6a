//! Title screen: the server address box.
//!
//! One editable text box pre-filled with the default server, a hint line,
//! and Enter to play. Editing only works while the pointer hovers the box,
//! which also blinks the caret.

use crate::hud::Rect;

/// Longest address the box accepts.
pub const MAX_ADDRESS_CHARS: usize = 17;

/// Ticks per caret blink half-period.
const CARET_BLINK_TICKS: u32 = 20;

/// State of the title screen.
#[derive(Debug, Clone)]
pub struct TitleScreen {
    /// Server address as typed so far.
    pub address: String,

    /// Pointer is over the text box this tick.
    pub hovered: bool,

    /// Ticks spent hovering, drives the caret blink.
    ticks_hovered: u32,
}

impl TitleScreen {
    pub fn new(default_address: &str) -> Self {
        let mut address: String = default_address
            .chars()
            .filter(|c| is_address_char(*c))
            .collect();
        address.truncate(MAX_ADDRESS_CHARS);
        Self {
            address,
            hovered: false,
            ticks_hovered: 0,
        }
    }

    /// The text box rectangle for the given window size.
    pub fn text_box(window_width: f32, _window_height: f32) -> Rect {
        Rect::new(window_width / 2.0 - 100.0, 180.0, 250.0, 50.0)
    }

    /// Per-tick update with the current pointer position.
    pub fn tick(&mut self, pointer: (f32, f32), window_width: f32, window_height: f32) {
        self.hovered = Self::text_box(window_width, window_height).contains(pointer);
        if self.hovered {
            self.ticks_hovered = self.ticks_hovered.wrapping_add(1);
        } else {
            self.ticks_hovered = 0;
        }
    }

    /// Append typed characters; ignores anything unprintable and input
    /// while not hovered.
    pub fn input_text(&mut self, text: &str) {
        if !self.hovered {
            return;
        }
        for c in text.chars() {
            if is_address_char(c) && self.address.len() < MAX_ADDRESS_CHARS {
                self.address.push(c);
            }
        }
    }

    /// Delete the last character (hover required, like typing).
    pub fn backspace(&mut self) {
        if self.hovered {
            self.address.pop();
        }
    }

    /// Caret shown this tick?
    pub fn caret_visible(&self) -> bool {
        self.hovered && (self.ticks_hovered / CARET_BLINK_TICKS) % 2 == 0
    }
}

/// Printable ASCII, the only thing a host:port needs.
fn is_address_char(c: char) -> bool {
    (' '..='}').contains(&c)
}
