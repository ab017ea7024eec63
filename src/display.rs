//! Display surface: the single-slot frame mailbox and the video window.
//!
//! The annotation loop runs on a background thread but window toolkits
//! want all drawing and event polling on one thread. Annotated frames
//! are therefore handed off through [`FrameMailbox`] and presented by
//! [`VideoWindow`] on the main thread, which also polls the quit key.

use std::fmt;
use std::sync::{Arc, Mutex};

use image::RgbImage;
use minifb::{Key, Window, WindowOptions};

/// Title of the single display window.
pub const WINDOW_TITLE: &str = "Sign Language Detection";

/// A frame with its overlay already drawn, ready to present.
#[derive(Debug, Clone)]
pub struct AnnotatedFrame {
    /// The annotated pixels.
    pub image: RgbImage,
    /// The overlay text that was drawn, e.g. `"A 91.00%"`.
    pub text: String,
}

/// Thread-safe single-slot hand-off between the annotation loop and the
/// display thread.
///
/// `publish` replaces any frame the display has not picked up yet; the
/// window always shows the newest annotated frame.
#[derive(Clone, Default)]
pub struct FrameMailbox {
    slot: Arc<Mutex<Option<AnnotatedFrame>>>,
}

impl FrameMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a frame in the slot, replacing any unconsumed one.
    pub fn publish(&self, frame: AnnotatedFrame) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(frame);
        }
    }

    /// Take the latest frame out of the slot, if any.
    pub fn take(&self) -> Option<AnnotatedFrame> {
        self.slot.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// The live video window.
pub struct VideoWindow {
    window: Window,
    buffer: Vec<u32>,
    buffer_width: usize,
    buffer_height: usize,
}

impl VideoWindow {
    /// Open the window at the given initial size.
    pub fn open(title: &str, width: usize, height: usize) -> Result<Self, DisplayError> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| DisplayError::WindowCreation(e.to_string()))?;
        window.set_target_fps(60);

        Ok(Self {
            window,
            buffer: vec![0; width * height],
            buffer_width: width,
            buffer_height: height,
        })
    }

    /// Present an annotated frame, stretching it to the window.
    pub fn present(&mut self, frame: &AnnotatedFrame) -> Result<(), DisplayError> {
        let (width, height) = frame.image.dimensions();
        self.buffer_width = width as usize;
        self.buffer_height = height as usize;

        self.buffer.clear();
        self.buffer.reserve(self.buffer_width * self.buffer_height);
        for pixel in frame.image.pixels() {
            let [r, g, b] = pixel.0;
            self.buffer
                .push(((r as u32) << 16) | ((g as u32) << 8) | b as u32);
        }

        self.window
            .update_with_buffer(&self.buffer, self.buffer_width, self.buffer_height)
            .map_err(|e| DisplayError::Update(e.to_string()))
    }

    /// Pump window events without presenting a new frame.
    pub fn refresh(&mut self) {
        self.window.update();
    }

    /// Whether the user asked to quit: `q` pressed or window closed.
    pub fn quit_requested(&self) -> bool {
        !self.window.is_open() || self.window.is_key_down(Key::Q)
    }
}

/// Errors from the display surface.
#[derive(Debug)]
pub enum DisplayError {
    /// The window could not be created.
    WindowCreation(String),
    /// Presenting a frame failed.
    Update(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::WindowCreation(msg) => write!(f, "Failed to create window: {}", msg),
            DisplayError::Update(msg) => write!(f, "Failed to update window: {}", msg),
        }
    }
}

impl std::error::Error for DisplayError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated(text: &str) -> AnnotatedFrame {
        AnnotatedFrame {
            image: RgbImage::new(2, 2),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_mailbox_starts_empty() {
        let mailbox = FrameMailbox::new();
        assert!(mailbox.take().is_none());
    }

    #[test]
    fn test_mailbox_publish_take() {
        let mailbox = FrameMailbox::new();
        mailbox.publish(annotated("A 91.00%"));
        let frame = mailbox.take().unwrap();
        assert_eq!(frame.text, "A 91.00%");
        // The slot is single-shot until the next publish.
        assert!(mailbox.take().is_none());
    }

    #[test]
    fn test_mailbox_keeps_newest_frame() {
        let mailbox = FrameMailbox::new();
        mailbox.publish(annotated("A 91.00%"));
        mailbox.publish(annotated("B 12.00%"));
        assert_eq!(mailbox.take().unwrap().text, "B 12.00%");
    }

    #[test]
    fn test_mailbox_clone_shares_slot() {
        let mailbox = FrameMailbox::new();
        let other = mailbox.clone();
        mailbox.publish(annotated("C 50.00%"));
        assert_eq!(other.take().unwrap().text, "C 50.00%");
    }

    #[test]
    fn test_window_title_constant() {
        assert_eq!(WINDOW_TITLE, "Sign Language Detection");
    }
}
