//! Background capture thread.
//!
//! nokhwa's `Camera` is not `Send`, so the device is opened inside the
//! thread that drives it. Decoded frames land in a shared single slot
//! tagged with a sequence number; [`super::capture::CameraCapture`]
//! blocks on that sequence number to hand out each new frame exactly
//! once.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::frame_utils::{convert_to_rgb, mirror_horizontal};
use super::types::{CameraError, CameraSettings, Frame, Resolution};

/// The shared latest-frame slot written by the capture thread.
#[derive(Default)]
pub struct FrameSlot {
    /// Most recently decoded frame, if any.
    pub frame: Option<Frame>,
    /// Monotonic counter, bumped once per stored frame.
    pub seq: u64,
}

/// Run the capture loop until the stop flag is set.
///
/// Reports the actual device resolution (or the open error) through
/// `info_tx` exactly once, then streams frames into `slot`.
pub fn run_capture_loop(
    settings: CameraSettings,
    slot: Arc<Mutex<FrameSlot>>,
    stop: Arc<AtomicBool>,
    info_tx: Sender<Result<Resolution, CameraError>>,
) {
    let index = CameraIndex::Index(settings.device_index);

    let mut camera = match open_camera_with_fallback(&index, &settings) {
        Ok(cam) => cam,
        Err(e) => {
            let _ = info_tx.send(Err(e));
            return;
        }
    };

    if let Err(e) = camera.open_stream() {
        let _ = info_tx.send(Err(CameraError::StreamFailed(e.to_string())));
        return;
    }

    let res = camera.resolution();
    let _ = info_tx.send(Ok(Resolution {
        width: res.width(),
        height: res.height(),
    }));

    while !stop.load(Ordering::Relaxed) {
        match camera.frame() {
            Ok(raw_frame) => {
                // Decode failures are transient; skip and try the next frame.
                if let Some(mut frame) = convert_to_rgb(&raw_frame) {
                    if settings.mirror {
                        mirror_horizontal(&mut frame);
                    }

                    if let Ok(mut slot) = slot.lock() {
                        slot.frame = Some(frame);
                        slot.seq += 1;
                    }
                }
            }
            Err(e) => {
                // A read failure means the device disconnected or the
                // stream died. Ending the thread is the end-of-stream
                // signal readers observe.
                log::warn!("camera read failed, ending capture: {}", e);
                break;
            }
        }

        // Let the stop flag be observed between reads.
        thread::sleep(Duration::from_millis(1));
    }

    let _ = camera.stop_stream();
}

/// Open a camera trying several format strategies in order.
fn open_camera_with_fallback(
    index: &CameraIndex,
    settings: &CameraSettings,
) -> Result<Camera, CameraError> {
    // Preference order: NV12 (native on macOS), MJPEG (widely
    // supported), then whatever the camera offers at its highest
    // resolution.
    let format_attempts: Vec<RequestedFormat> = vec![
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height),
            NokhwaFrameFormat::NV12,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height),
            NokhwaFrameFormat::MJPEG,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;

    for requested in format_attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    let e = match last_error {
        Some(e) => e,
        None => return Err(CameraError::OpenFailed("no capture formats to try".to_string())),
    };
    let msg = e.to_string().to_lowercase();
    if msg.contains("permission")
        || msg.contains("denied")
        || msg.contains("authorization")
        || msg.contains("access")
    {
        Err(CameraError::PermissionDenied)
    } else {
        Err(CameraError::OpenFailed(e.to_string()))
    }
}
