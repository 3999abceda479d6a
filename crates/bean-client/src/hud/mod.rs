//! Screen-space overlay: rectangles and text.
//!
//! Layout happens here as plain data (`UiFrame`); the renderer turns it
//! into a quad batch plus glyphon text areas. Coordinates are logical
//! pixels with the origin at the top-left, Y down.

mod text;

pub use text::TextOverlay;

use crate::title::TitleScreen;

/// Screen-space rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, point: (f32, f32)) -> bool {
        point.0 >= self.x
            && point.0 <= self.x + self.w
            && point.1 >= self.y
            && point.1 <= self.y + self.h
    }
}

/// The UI palette.
pub mod palette {
    pub type Rgba = [u8; 4];

    pub const RAY_WHITE: Rgba = [245, 245, 245, 255];
    pub const LIGHT_GRAY: Rgba = [200, 200, 200, 255];
    pub const GRAY: Rgba = [130, 130, 130, 255];
    pub const DARK_GRAY: Rgba = [80, 80, 80, 255];
    pub const RED: Rgba = [230, 41, 55, 255];
    pub const MAROON: Rgba = [190, 33, 55, 255];
    pub const BLUE: Rgba = [0, 121, 241, 255];
    pub const BLACK: Rgba = [0, 0, 0, 255];
}

use palette::Rgba;

/// A rectangle to draw: filled, or a one-pixel outline.
#[derive(Debug, Clone, Copy)]
pub struct UiRect {
    pub rect: Rect,
    pub color: Rgba,
    pub filled: bool,
}

/// A text run to draw.
#[derive(Debug, Clone)]
pub struct UiText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgba,
}

/// Everything the overlay draws this frame.
#[derive(Debug, Clone, Default)]
pub struct UiFrame {
    pub rects: Vec<UiRect>,
    pub texts: Vec<UiText>,
}

impl UiFrame {
    pub fn fill(&mut self, rect: Rect, color: Rgba) {
        self.rects.push(UiRect {
            rect,
            color,
            filled: true,
        });
    }

    pub fn outline(&mut self, rect: Rect, color: Rgba) {
        self.rects.push(UiRect {
            rect,
            color,
            filled: false,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, color: Rgba) {
        self.texts.push(UiText {
            text: text.into(),
            x,
            y,
            size,
            color,
        });
    }
}

/// Title screen layout.
pub fn title_frame(title: &TitleScreen, window_width: f32, window_height: f32) -> UiFrame {
    let mut frame = UiFrame::default();
    let text_box = TitleScreen::text_box(window_width, window_height);

    frame.text("Server IP:", 240.0, 140.0, 20.0, palette::GRAY);

    frame.fill(text_box, palette::LIGHT_GRAY);
    let border = if title.hovered {
        palette::RED
    } else {
        palette::DARK_GRAY
    };
    frame.outline(text_box, border);

    let mut shown = title.address.clone();
    if title.caret_visible() {
        shown.push('_');
    }
    frame.text(shown, text_box.x + 5.0, text_box.y + 8.0, 35.0, palette::MAROON);

    frame.text(
        "Press ENTER to Continue",
        315.0,
        250.0,
        20.0,
        palette::DARK_GRAY,
    );

    frame
}

/// Gameplay controls panel; the help text follows the active input device.
pub fn gameplay_frame(gamepad_active: bool) -> UiFrame {
    let mut frame = UiFrame::default();

    let panel = Rect::new(5.0, 5.0, 330.0, 85.0);
    frame.fill(panel, palette::RED);
    frame.outline(panel, palette::BLUE);

    frame.text("Player controls:", 15.0, 15.0, 10.0, palette::BLACK);

    let lines: [&str; 4] = if gamepad_active {
        [
            "- Move: Left Analog Stick",
            "- Look around: Right Analog Stick",
            "- Camera mode: Left Trigger, Right Trigger",
            "- Generate a new color: Right Thumb",
        ]
    } else {
        [
            "- Move keys: W, A, S, D, Space, Left-Ctrl",
            "- Look around: arrow keys or mouse",
            "- Camera mode keys: 1, 2",
            "- Generate a new color: 4",
        ]
    };

    for (i, line) in lines.iter().enumerate() {
        frame.text(*line, 15.0, 30.0 + i as f32 * 15.0, 10.0, palette::BLACK);
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(r.contains((10.0, 10.0)));
        assert!(r.contains((110.0, 60.0)));
        assert!(!r.contains((111.0, 30.0)));
        assert!(!r.contains((50.0, 5.0)));
    }

    #[test]
    fn title_frame_has_box_and_labels() {
        let title = TitleScreen::new("10.0.0.1");
        let frame = title_frame(&title, 800.0, 450.0);

        assert_eq!(frame.rects.len(), 2);
        assert!(frame.rects[0].filled);
        assert!(!frame.rects[1].filled);
        assert_eq!(frame.texts.len(), 3);
        assert!(frame.texts[1].text.contains("10.0.0.1"));
    }

    #[test]
    fn hover_turns_the_border_red() {
        let mut title = TitleScreen::new("x");
        title.tick((400.0, 200.0), 800.0, 450.0);
        let frame = title_frame(&title, 800.0, 450.0);
        assert_eq!(frame.rects[1].color, palette::RED);
    }

    #[test]
    fn help_text_switches_with_gamepad() {
        let keyboard = gameplay_frame(false);
        let gamepad = gameplay_frame(true);

        assert!(keyboard.texts[1].text.contains("W, A, S, D"));
        assert!(gamepad.texts[1].text.contains("Analog Stick"));
        assert_eq!(keyboard.texts.len(), 5);
        assert_eq!(gamepad.texts.len(), 5);
    }
}
