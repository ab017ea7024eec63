//! Camera capture module for webcam access and frame delivery.
//!
//! - Device enumeration via [`list_devices`]
//! - Live capture via [`CameraCapture`]
//! - The [`FrameSource`] seam the annotation loop reads from

mod capture;
mod capture_loop;
mod device;
mod frame_utils;
mod types;

pub use capture::CameraCapture;
pub use device::list_devices;
pub use types::{CameraError, CameraInfo, CameraSettings, Frame, Resolution};

/// A source of frames for the annotation loop.
///
/// `read_frame` blocks until the next frame is available and returns
/// `Ok(None)` at end-of-stream (device disconnected or capture
/// stopped). It must stay safe to call after end-of-stream; every later
/// call keeps returning `Ok(None)`.
pub trait FrameSource: Send {
    fn read_frame(&mut self) -> Result<Option<Frame>, CameraError>;
}
