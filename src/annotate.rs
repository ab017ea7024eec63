//! Overlay rendering: prediction text and the ROI guide rectangle.

use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::camera::Frame;
use crate::classifier::Prediction;
use crate::display::AnnotatedFrame;

/// Overlay color for the label text and the ROI outline.
const OVERLAY_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// ROI rectangle stroke width in pixels.
const ROI_STROKE: u32 = 2;

/// Font height for the prediction label.
const LABEL_SCALE: f32 = 32.0;

/// The region-of-interest rectangle drawn on every frame.
///
/// Fixed for the process lifetime. It guides hand placement only; the
/// classifier always sees the whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for Roi {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            width: 200,
            height: 200,
        }
    }
}

/// Renders a frame plus its prediction into an [`AnnotatedFrame`].
pub trait Annotate: Send {
    fn annotate(&self, frame: &Frame, prediction: &Prediction) -> AnnotatedFrame;
}

/// imageproc-backed annotator drawing the label text and ROI outline.
pub struct OverlayAnnotator {
    font: FontVec,
    roi: Roi,
}

impl OverlayAnnotator {
    /// Load the overlay font from a TTF/OTF file.
    ///
    /// A missing or invalid font is fatal at startup, like a missing
    /// model.
    pub fn new(font_path: &Path, roi: Roi) -> Result<Self, AnnotateError> {
        let bytes = std::fs::read(font_path).map_err(|e| AnnotateError::FontLoad {
            path: font_path.to_path_buf(),
            message: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| AnnotateError::FontLoad {
            path: font_path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self { font, roi })
    }

    pub fn roi(&self) -> Roi {
        self.roi
    }
}

impl Annotate for OverlayAnnotator {
    fn annotate(&self, frame: &Frame, prediction: &Prediction) -> AnnotatedFrame {
        let mut image = frame_to_image(frame);
        let text = prediction.display_text();

        draw_text_mut(
            &mut image,
            OVERLAY_COLOR,
            self.roi.x,
            self.roi.y - 10,
            PxScale::from(LABEL_SCALE),
            &self.font,
            &text,
        );

        for i in 0..ROI_STROKE {
            let rect = Rect::at(self.roi.x - i as i32, self.roi.y - i as i32)
                .of_size(self.roi.width + 2 * i, self.roi.height + 2 * i);
            draw_hollow_rect_mut(&mut image, rect, OVERLAY_COLOR);
        }

        AnnotatedFrame { image, text }
    }
}

/// Convert a raw RGB frame into an image buffer.
///
/// Falls back to a black canvas of the same dimensions if the byte
/// count does not match the stated resolution.
pub fn frame_to_image(frame: &Frame) -> RgbImage {
    RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
        .unwrap_or_else(|| RgbImage::new(frame.width, frame.height))
}

/// Errors from setting up the annotator.
#[derive(Debug)]
pub enum AnnotateError {
    /// The overlay font could not be read or parsed.
    FontLoad { path: PathBuf, message: String },
}

impl fmt::Display for AnnotateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotateError::FontLoad { path, message } => {
                write!(
                    f,
                    "Failed to load overlay font '{}': {}",
                    path.display(),
                    message
                )
            }
        }
    }
}

impl std::error::Error for AnnotateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roi_default_placement() {
        let roi = Roi::default();
        assert_eq!((roi.x, roi.y, roi.width, roi.height), (100, 100, 200, 200));
    }

    #[test]
    fn test_frame_to_image_roundtrip() {
        let frame = Frame::new(vec![1, 2, 3, 4, 5, 6], 2, 1);
        let image = frame_to_image(&frame);
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(0, 0), &Rgb([1, 2, 3]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([4, 5, 6]));
    }

    #[test]
    fn test_frame_to_image_bad_length_falls_back_to_black() {
        let frame = Frame::new(vec![1, 2, 3], 2, 2);
        let image = frame_to_image(&frame);
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_font_load_missing_file() {
        let result = OverlayAnnotator::new(Path::new("/nonexistent/font.ttf"), Roi::default());
        match result {
            Err(AnnotateError::FontLoad { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/font.ttf"));
            }
            _ => panic!("Expected FontLoad error"),
        }
    }
}
