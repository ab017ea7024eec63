//! The annotation loop: read, preprocess, predict, announce, annotate,
//! publish.
//!
//! The loop exclusively owns its frame source, classifier, speech
//! engine and annotator; the only thing it shares is the frame mailbox
//! it publishes into. Cancellation is cooperative: the stop flag is
//! checked between cycles only, so a requested stop always lets the
//! in-flight cycle finish before the frame source is released.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::annotate::Annotate;
use crate::camera::{Frame, FrameSource};
use crate::classifier::{Classifier, Prediction};
use crate::display::FrameMailbox;
use crate::preprocess::preprocess;

/// Loop lifecycle states.
///
/// `Running` cycles until either the foreground requests a stop
/// (`StoppingRequested`, honored at the next cycle boundary) or the
/// frame source reports end-of-stream, which ends the loop on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Running,
    StoppingRequested,
}

/// Why the loop terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The frame source ran out of frames (device disconnected or
    /// stopped). Needs no quit keystroke.
    EndOfStream,
    /// The stop flag was set, typically by the quit key.
    StopRequested,
}

/// The background annotation loop over injected collaborators.
pub struct AnnotationLoop<S, C, A, N> {
    source: S,
    classifier: C,
    annotator: A,
    speech: N,
    mailbox: FrameMailbox,
    stop: Arc<AtomicBool>,
}

impl<S, C, A, N> AnnotationLoop<S, C, A, N>
where
    S: FrameSource + 'static,
    C: Classifier + 'static,
    A: Annotate + 'static,
    N: crate::speech::SpeechNotifier + 'static,
{
    pub fn new(
        source: S,
        classifier: C,
        annotator: A,
        speech: N,
        mailbox: FrameMailbox,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            classifier,
            annotator,
            speech,
            mailbox,
            stop,
        }
    }

    /// Run until end-of-stream or a requested stop.
    ///
    /// Consumes the loop; the frame source is dropped (and the device
    /// released) here, on the loop's own thread, before the caller's
    /// `join` returns.
    pub fn run(mut self) -> ExitReason {
        let mut state = LoopState::Running;

        let reason = loop {
            if self.stop.load(Ordering::SeqCst) {
                state = LoopState::StoppingRequested;
            }
            if state == LoopState::StoppingRequested {
                break ExitReason::StopRequested;
            }

            match self.source.read_frame() {
                Ok(Some(frame)) => self.run_cycle(&frame),
                Ok(None) => break ExitReason::EndOfStream,
                Err(e) => {
                    log::error!("Frame read failed: {}", e);
                    break ExitReason::EndOfStream;
                }
            }
        };

        log::info!("Annotation loop stopped: {:?}", reason);
        reason
    }

    /// One frame cycle: preprocess, predict, announce, annotate,
    /// publish.
    ///
    /// A failed prediction skips the rest of the cycle so the loop
    /// stays alive; a failed utterance is logged but the frame is still
    /// annotated and published.
    fn run_cycle(&mut self, frame: &Frame) {
        let tensor = preprocess(frame);

        let scores = match self.classifier.predict(&tensor) {
            Ok(scores) => scores,
            Err(e) => {
                log::warn!("Skipping frame, prediction failed: {}", e);
                return;
            }
        };

        let prediction = match Prediction::from_scores(&scores) {
            Ok(prediction) => prediction,
            Err(e) => {
                log::warn!("Skipping frame, bad model output: {}", e);
                return;
            }
        };

        if let Err(e) = self.speech.announce(prediction.label) {
            log::warn!("Announcement failed: {}", e);
        }

        let annotated = self.annotator.annotate(frame, &prediction);
        self.mailbox.publish(annotated);
    }

    /// Spawn the loop on its own thread.
    pub fn spawn(self) -> std::io::Result<LoopHandle> {
        let stop = Arc::clone(&self.stop);
        let handle = thread::Builder::new()
            .name("annotation-loop".to_string())
            .spawn(move || self.run())?;

        Ok(LoopHandle { stop, handle })
    }
}

/// Handle to a spawned annotation loop.
pub struct LoopHandle {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<ExitReason>,
}

impl LoopHandle {
    /// Ask the loop to stop after its current cycle.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Whether the loop thread has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the loop to finish.
    pub fn join(self) -> ExitReason {
        self.handle.join().unwrap_or(ExitReason::EndOfStream)
    }
}
