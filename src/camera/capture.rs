//! Camera capture handle implementing [`FrameSource`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::capture_loop::{run_capture_loop, FrameSlot};
use super::device::list_devices;
use super::types::{CameraError, CameraSettings, Frame, Resolution};
use super::FrameSource;

/// How often a blocked `read_frame` re-checks the capture slot.
const READ_POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Live camera frame source.
///
/// `open()` validates the device; `start()` spawns the background
/// capture thread that owns the actual nokhwa camera. `read_frame`
/// blocks until the capture thread stores a frame it has not yet handed
/// out, and returns `Ok(None)` once the thread exits (device
/// disconnected or stopped).
///
/// Dropping the handle stops and joins the capture thread, releasing
/// the device. Release is idempotent.
pub struct CameraCapture {
    slot: Arc<Mutex<FrameSlot>>,
    capture_thread: Option<JoinHandle<()>>,
    stop_signal: Arc<AtomicBool>,
    settings: CameraSettings,
    actual_resolution: Option<Resolution>,
    /// Sequence number of the last frame handed out by `read_frame`.
    last_seq: u64,
}

impl std::fmt::Debug for CameraCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraCapture")
            .field("settings", &self.settings)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl CameraCapture {
    /// Open a camera with the given settings.
    ///
    /// Validates that the device index exists; the device itself is
    /// opened by the capture thread in `start()`.
    ///
    /// # Errors
    /// * `CameraError::DeviceNotFound` - no device at the index
    /// * `CameraError::NoDevices` - no cameras on the system
    pub fn open(settings: CameraSettings) -> Result<Self, CameraError> {
        let devices = list_devices()?;
        if devices.is_empty() {
            return Err(CameraError::NoDevices);
        }
        if !devices.iter().any(|d| d.index == settings.device_index) {
            return Err(CameraError::DeviceNotFound(settings.device_index));
        }

        Ok(Self {
            slot: Arc::new(Mutex::new(FrameSlot::default())),
            capture_thread: None,
            stop_signal: Arc::new(AtomicBool::new(false)),
            settings,
            actual_resolution: None,
            last_seq: 0,
        })
    }

    /// Start the background capture thread.
    ///
    /// Blocks until the thread reports that the stream is up (with the
    /// actual resolution the device chose) or failed to open.
    pub fn start(&mut self) -> Result<(), CameraError> {
        if self.is_running() {
            return Err(CameraError::AlreadyRunning);
        }

        self.stop_signal.store(false, Ordering::SeqCst);

        let slot = Arc::clone(&self.slot);
        let stop = Arc::clone(&self.stop_signal);
        let settings = self.settings.clone();
        let (info_tx, info_rx) = mpsc::channel();

        let handle = thread::spawn(move || run_capture_loop(settings, slot, stop, info_tx));
        self.capture_thread = Some(handle);

        match info_rx.recv() {
            Ok(Ok(res)) => {
                self.actual_resolution = Some(res);
                Ok(())
            }
            Ok(Err(e)) => {
                self.release();
                Err(e)
            }
            Err(_) => {
                self.release();
                Err(CameraError::StreamFailed(
                    "Capture thread terminated unexpectedly".to_string(),
                ))
            }
        }
    }

    /// The resolution the device actually chose, once started.
    pub fn actual_resolution(&self) -> Option<Resolution> {
        self.actual_resolution
    }

    /// Whether the capture thread is currently running.
    pub fn is_running(&self) -> bool {
        self.capture_thread
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Stop the capture thread and release the device. Idempotent.
    pub fn release(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        if let Some(handle) = self.capture_thread.take() {
            let _ = handle.join();
        }
    }
}

impl FrameSource for CameraCapture {
    fn read_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        loop {
            {
                let slot = self
                    .slot
                    .lock()
                    .map_err(|_| CameraError::StreamFailed("capture slot poisoned".to_string()))?;
                if slot.seq > self.last_seq {
                    self.last_seq = slot.seq;
                    return Ok(slot.frame.clone());
                }
            }

            // No fresh frame. If the capture thread is gone, the stream
            // has ended; otherwise wait for the next frame.
            match &self.capture_thread {
                Some(handle) if !handle.is_finished() => {
                    thread::sleep(READ_POLL_INTERVAL);
                }
                _ => return Ok(None),
            }
        }
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        self.release();
    }
}
