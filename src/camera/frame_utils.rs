//! Frame conversion helpers for the capture thread.

use nokhwa::pixel_format::RgbFormat;

use super::types::Frame;

/// Convert a nokhwa buffer to an RGB [`Frame`].
///
/// nokhwa's `decode_image` handles MJPEG, YUYV, NV12 and the other
/// native formats. Returns `None` if decoding fails (corrupt data or an
/// unsupported format); the capture loop skips such frames.
pub fn convert_to_rgb(buffer: &nokhwa::Buffer) -> Option<Frame> {
    let decoded = buffer.decode_image::<RgbFormat>().ok()?;
    let resolution = buffer.resolution();

    Some(Frame::new(
        decoded.into_raw(),
        resolution.width(),
        resolution.height(),
    ))
}

/// Mirror a frame horizontally in place (selfie view).
pub fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width as usize;
    let height = frame.height as usize;

    for y in 0..height {
        let row_start = y * width * 3;
        let row = &mut frame.data[row_start..row_start + width * 3];

        for x in 0..width / 2 {
            let left = x * 3;
            let right = (width - 1 - x) * 3;
            for i in 0..3 {
                row.swap(left + i, right + i);
            }
        }
    }
}
