//! Display port: windows, previews and text overlays.

use std::time::Duration;

use image::Rgb;

use crate::domain::Image;

/// A key event read from a preview window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// RETURN (key code 13).
    Return,
    /// ESCAPE (key code 27).
    Escape,
    /// Any other key.
    Other(i32),
}

impl Key {
    /// Maps a raw key code. Negative codes mean "no key".
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            13 => Some(Self::Return),
            27 => Some(Self::Escape),
            c if c < 0 => None,
            c => Some(Self::Other(c)),
        }
    }
}

/// Text drawn onto an image copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOverlay<'a> {
    /// Text to draw.
    pub text: &'a str,
    /// Bottom-left corner of the text, in pixels.
    pub origin: (i32, i32),
    /// Stroke colour.
    pub color: Rgb<u8>,
    /// Stroke thickness, in pixels.
    pub thickness: u32,
}

/// A live preview window. Dropping it closes the window.
pub trait PreviewWindow {
    /// Replaces the window contents with `frame`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be rendered.
    fn present(&mut self, frame: &Image) -> anyhow::Result<()>;

    /// Waits up to `timeout` for a key press.
    fn poll_key(&mut self, timeout: Duration) -> Option<Key>;
}

/// Port for on-screen rendering.
pub trait Display {
    /// Shows `image` in a window titled `label` and blocks until the user
    /// dismisses it.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be shown.
    fn show(&self, image: &Image, label: &str) -> anyhow::Result<()>;

    /// Opens a preview window for a live feed.
    ///
    /// # Errors
    ///
    /// Returns an error if no window can be created.
    fn open_preview(&self, label: &str) -> anyhow::Result<Box<dyn PreviewWindow + '_>>;

    /// Returns a copy of `image` with `overlay` drawn on it.
    fn overlay_text(&self, image: &Image, overlay: &TextOverlay<'_>) -> Image;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code(13), Some(Key::Return));
        assert_eq!(Key::from_code(27), Some(Key::Escape));
        assert_eq!(Key::from_code(32), Some(Key::Other(32)));
        assert_eq!(Key::from_code(-1), None);
    }
}
