//! Core types for camera capture.

use std::fmt;

/// A single captured image: a height x width grid of 8-bit RGB pixels.
///
/// Frames are owned by whichever component is currently processing them;
/// a frame is never shared across threads, only cloned out of the
/// capture slot.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data, 3 bytes per pixel (R, G, B), row-major.
    pub data: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl Frame {
    /// Build a frame from raw RGB bytes.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Number of pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }
}

/// Capture resolution hint. The device may pick something close instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Default capture resolution (640x480), matching what the gesture
    /// model was sampled with.
    pub const VGA: Resolution = Resolution {
        width: 640,
        height: 480,
    };
}

impl Default for Resolution {
    fn default() -> Self {
        Self::VGA
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Settings for opening a camera device.
#[derive(Debug, Clone)]
pub struct CameraSettings {
    /// Platform device index.
    pub device_index: u32,
    /// Requested capture resolution (best-effort).
    pub resolution: Resolution,
    /// Requested frame rate (best-effort).
    pub fps: u32,
    /// Mirror frames horizontally (selfie view).
    pub mirror: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            resolution: Resolution::default(),
            fps: 30,
            mirror: false,
        }
    }
}

/// Information about an available camera device.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    pub index: u32,
    pub name: String,
    pub description: String,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.name, self.description)
    }
}

/// Errors that make the camera device unavailable.
#[derive(Debug)]
pub enum CameraError {
    /// No cameras found on the system.
    NoDevices,
    /// Failed to enumerate camera devices.
    QueryFailed(String),
    /// No camera at the requested index.
    DeviceNotFound(u32),
    /// The device exists but could not be opened.
    OpenFailed(String),
    /// Camera permission denied by the OS.
    PermissionDenied,
    /// The video stream could not be started.
    StreamFailed(String),
    /// The capture thread is already running.
    AlreadyRunning,
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoDevices => write!(f, "No cameras found"),
            CameraError::QueryFailed(msg) => write!(f, "Failed to query cameras: {}", msg),
            CameraError::DeviceNotFound(index) => {
                write!(
                    f,
                    "Camera device {} not found. Run 'sign-stream list-cameras' to see available devices",
                    index
                )
            }
            CameraError::OpenFailed(msg) => write!(f, "Failed to open camera: {}", msg),
            CameraError::PermissionDenied => {
                write!(
                    f,
                    "Camera permission denied. Grant camera access to this terminal in your system privacy settings"
                )
            }
            CameraError::StreamFailed(msg) => write!(f, "Failed to start camera stream: {}", msg),
            CameraError::AlreadyRunning => write!(f, "Capture thread is already running"),
        }
    }
}

impl std::error::Error for CameraError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_default_is_vga() {
        let res = Resolution::default();
        assert_eq!(res.width, 640);
        assert_eq!(res.height, 480);
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(format!("{}", Resolution::VGA), "640x480");
    }

    #[test]
    fn test_camera_settings_default() {
        let settings = CameraSettings::default();
        assert_eq!(settings.device_index, 0);
        assert_eq!(settings.resolution, Resolution::VGA);
        assert_eq!(settings.fps, 30);
        assert!(!settings.mirror);
    }

    #[test]
    fn test_frame_pixel_count() {
        let frame = Frame::new(vec![0; 6], 2, 1);
        assert_eq!(frame.pixel_count(), 2);
    }

    #[test]
    fn test_camera_info_display() {
        let info = CameraInfo {
            index: 1,
            name: "USB Camera".to_string(),
            description: "External".to_string(),
        };
        assert_eq!(format!("{}", info), "[1] USB Camera (External)");
    }

    #[test]
    fn test_camera_error_display() {
        assert_eq!(format!("{}", CameraError::NoDevices), "No cameras found");
        assert!(format!("{}", CameraError::DeviceNotFound(3)).contains("3"));
        assert!(format!("{}", CameraError::PermissionDenied).contains("permission denied"));
        assert_eq!(
            format!("{}", CameraError::StreamFailed("busy".to_string())),
            "Failed to start camera stream: busy"
        );
    }
}
