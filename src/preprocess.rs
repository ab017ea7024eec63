//! Frame preprocessing for the gesture classifier.
//!
//! The classifier expects a batch-of-one, single-channel 48x48 tensor
//! with values in `[0.0, 1.0]`. The whole frame is used: the on-screen
//! ROI rectangle is guidance for the user, not a crop region.

use crate::camera::Frame;

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 48;

/// A preprocessed frame, laid out row-major as a `[1, 48, 48, 1]`
/// tensor of normalized luminance values.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    data: Vec<f32>,
}

impl InputTensor {
    /// Logical tensor shape: batch, height, width, channels.
    pub fn shape(&self) -> [usize; 4] {
        [1, INPUT_SIZE as usize, INPUT_SIZE as usize, 1]
    }

    /// The normalized pixel values, row-major.
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// Preprocess a raw frame into the classifier's input tensor.
///
/// 1. Convert to grayscale (ITU-R BT.601 luminance).
/// 2. Bilinear-resize to 48x48.
/// 3. Normalize each pixel into `[0.0, 1.0]` by dividing by 255.
///
/// Deterministic: identical frame bytes yield identical tensors.
pub fn preprocess(frame: &Frame) -> InputTensor {
    let gray = to_grayscale(frame);
    let resized = resize_bilinear(&gray, frame.width, frame.height, INPUT_SIZE, INPUT_SIZE);

    let data = resized.iter().map(|&p| p as f32 / 255.0).collect();

    InputTensor { data }
}

/// Convert an RGB frame to grayscale using the ITU-R BT.601 luminance
/// formula, Y = 0.299*R + 0.587*G + 0.114*B.
///
/// Integer math keeps the hot path free of floating point; the
/// coefficients are scaled by 1000.
pub fn to_grayscale(frame: &Frame) -> Vec<u8> {
    let pixel_count = frame.pixel_count();
    let mut gray = Vec::with_capacity(pixel_count);

    for rgb in frame.data.chunks_exact(3) {
        let r = rgb[0] as u32;
        let g = rgb[1] as u32;
        let b = rgb[2] as u32;
        let luminance = (299 * r + 587 * g + 114 * b) / 1000;
        gray.push(luminance as u8);
    }

    gray
}

/// Bilinear-resize a grayscale image.
///
/// Sample positions are center-aligned: destination pixel `(dx, dy)`
/// samples source position `((dx + 0.5) * sw/dw - 0.5, ...)`, clamped
/// to the image bounds. Degenerate inputs produce an empty vector.
pub fn resize_bilinear(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    dst_width: u32,
    dst_height: u32,
) -> Vec<u8> {
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 || src.is_empty() {
        return Vec::new();
    }

    let scale_x = src_width as f32 / dst_width as f32;
    let scale_y = src_height as f32 / dst_height as f32;

    let mut dst = Vec::with_capacity((dst_width * dst_height) as usize);

    for dy in 0..dst_height {
        let sy = ((dy as f32 + 0.5) * scale_y - 0.5).max(0.0);
        let y0 = (sy as u32).min(src_height - 1);
        let y1 = (y0 + 1).min(src_height - 1);
        let fy = sy - y0 as f32;

        for dx in 0..dst_width {
            let sx = ((dx as f32 + 0.5) * scale_x - 0.5).max(0.0);
            let x0 = (sx as u32).min(src_width - 1);
            let x1 = (x0 + 1).min(src_width - 1);
            let fx = sx - x0 as f32;

            let p00 = sample(src, src_width, x0, y0);
            let p10 = sample(src, src_width, x1, y0);
            let p01 = sample(src, src_width, x0, y1);
            let p11 = sample(src, src_width, x1, y1);

            let top = p00 + (p10 - p00) * fx;
            let bottom = p01 + (p11 - p01) * fx;
            let value = top + (bottom - top) * fy;

            dst.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    dst
}

fn sample(src: &[u8], width: u32, x: u32, y: u32) -> f32 {
    src.get((y * width + x) as usize).copied().unwrap_or(0) as f32
}
