//! End-to-end tests for the annotation pipeline.
//!
//! These drive the full loop over mock collaborators and verify:
//! - Every captured frame ends up annotated and published
//! - Prediction, announcement and display text stay consistent
//! - End-of-stream and the quit request both shut the loop down cleanly

use sign_stream::annotate::Annotate;
use sign_stream::annotation_loop::{AnnotationLoop, ExitReason};
use sign_stream::camera::{CameraError, Frame, FrameSource};
use sign_stream::classifier::{Classifier, ClassifierError, Prediction};
use sign_stream::display::{AnnotatedFrame, FrameMailbox};
use sign_stream::labels::LABEL_COUNT;
use sign_stream::preprocess::InputTensor;
use sign_stream::speech::{SpeechError, SpeechNotifier};

use image::RgbImage;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Frame source that yields a fixed number of solid frames, then
/// end-of-stream.
struct CountingSource {
    remaining: u32,
}

impl FrameSource for CountingSource {
    fn read_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(Frame::new(vec![127; 64 * 64 * 3], 64, 64)))
    }
}

/// Classifier that always scores one label highest.
struct PeakClassifier {
    index: usize,
    confidence: f32,
}

impl Classifier for PeakClassifier {
    fn predict(&self, _input: &InputTensor) -> Result<Vec<f32>, ClassifierError> {
        let mut scores = vec![0.0; LABEL_COUNT];
        scores[self.index] = self.confidence;
        Ok(scores)
    }
}

/// Annotator that records every overlay text it renders.
#[derive(Clone)]
struct RecordingAnnotator {
    texts: Arc<Mutex<Vec<String>>>,
}

impl Annotate for RecordingAnnotator {
    fn annotate(&self, frame: &Frame, prediction: &Prediction) -> AnnotatedFrame {
        let text = prediction.display_text();
        self.texts.lock().unwrap().push(text.clone());
        AnnotatedFrame {
            image: RgbImage::new(frame.width, frame.height),
            text,
        }
    }
}

#[derive(Clone)]
struct RecordingSpeech {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl SpeechNotifier for RecordingSpeech {
    fn announce(&mut self, text: &str) -> Result<(), SpeechError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ==================== Full Pipeline ====================

#[test]
fn test_every_frame_is_annotated_and_announced() {
    let texts = Arc::new(Mutex::new(Vec::new()));
    let spoken = Arc::new(Mutex::new(Vec::new()));
    let mailbox = FrameMailbox::new();

    let reason = AnnotationLoop::new(
        CountingSource { remaining: 3 },
        PeakClassifier {
            index: 0,
            confidence: 0.91,
        },
        RecordingAnnotator {
            texts: Arc::clone(&texts),
        },
        RecordingSpeech {
            spoken: Arc::clone(&spoken),
        },
        mailbox.clone(),
        Arc::new(AtomicBool::new(false)),
    )
    .run();

    // The stream ran dry on its own, no quit keystroke needed.
    assert_eq!(reason, ExitReason::EndOfStream);

    // Three frames in, three annotations out, each with the same label
    // and confidence rendering.
    let texts = texts.lock().unwrap();
    assert_eq!(texts.as_slice(), &["A 91.00%", "A 91.00%", "A 91.00%"]);

    // Announcements speak the bare label, not the percentage.
    let spoken = spoken.lock().unwrap();
    assert_eq!(spoken.as_slice(), &["A", "A", "A"]);

    // The mailbox holds the newest frame after the loop ends.
    assert_eq!(mailbox.take().unwrap().text, "A 91.00%");
    assert!(mailbox.take().is_none());
}

#[test]
fn test_all_equal_scores_announce_first_label() {
    struct FlatClassifier;
    impl Classifier for FlatClassifier {
        fn predict(&self, _input: &InputTensor) -> Result<Vec<f32>, ClassifierError> {
            Ok(vec![0.5; LABEL_COUNT])
        }
    }

    let spoken = Arc::new(Mutex::new(Vec::new()));
    let mailbox = FrameMailbox::new();

    AnnotationLoop::new(
        CountingSource { remaining: 1 },
        FlatClassifier,
        RecordingAnnotator {
            texts: Arc::new(Mutex::new(Vec::new())),
        },
        RecordingSpeech {
            spoken: Arc::clone(&spoken),
        },
        mailbox.clone(),
        Arc::new(AtomicBool::new(false)),
    )
    .run();

    assert_eq!(spoken.lock().unwrap().as_slice(), &["A"]);
    assert_eq!(mailbox.take().unwrap().text, "A 50.00%");
}

#[test]
fn test_mailbox_keeps_only_newest_annotation() {
    struct SequenceClassifier {
        next: Mutex<usize>,
    }
    impl Classifier for SequenceClassifier {
        fn predict(&self, _input: &InputTensor) -> Result<Vec<f32>, ClassifierError> {
            let mut next = self.next.lock().unwrap();
            let mut scores = vec![0.0; LABEL_COUNT];
            scores[*next] = 1.0;
            *next += 1;
            Ok(scores)
        }
    }

    let mailbox = FrameMailbox::new();

    AnnotationLoop::new(
        CountingSource { remaining: 3 },
        SequenceClassifier {
            next: Mutex::new(0),
        },
        RecordingAnnotator {
            texts: Arc::new(Mutex::new(Vec::new())),
        },
        RecordingSpeech {
            spoken: Arc::new(Mutex::new(Vec::new())),
        },
        mailbox.clone(),
        Arc::new(AtomicBool::new(false)),
    )
    .run();

    // A, B, C were published in turn; only the last survives.
    assert_eq!(mailbox.take().unwrap().text, "C 100.00%");
}

// ==================== Shutdown ====================

#[test]
fn test_spawned_loop_stops_on_request() {
    /// Endless frame source; only the stop flag can end this loop.
    struct EndlessSource;
    impl FrameSource for EndlessSource {
        fn read_frame(&mut self) -> Result<Option<Frame>, CameraError> {
            thread::sleep(Duration::from_millis(1));
            Ok(Some(Frame::new(vec![0; 48 * 48 * 3], 48, 48)))
        }
    }

    let handle = AnnotationLoop::new(
        EndlessSource,
        PeakClassifier {
            index: 1,
            confidence: 0.6,
        },
        RecordingAnnotator {
            texts: Arc::new(Mutex::new(Vec::new())),
        },
        RecordingSpeech {
            spoken: Arc::new(Mutex::new(Vec::new())),
        },
        FrameMailbox::new(),
        Arc::new(AtomicBool::new(false)),
    )
    .spawn()
    .unwrap();

    thread::sleep(Duration::from_millis(20));
    assert!(!handle.is_finished());

    handle.request_stop();
    assert_eq!(handle.join(), ExitReason::StopRequested);
}

#[test]
fn test_spawned_loop_finishes_at_end_of_stream_without_stop() {
    let handle = AnnotationLoop::new(
        CountingSource { remaining: 2 },
        PeakClassifier {
            index: 0,
            confidence: 0.91,
        },
        RecordingAnnotator {
            texts: Arc::new(Mutex::new(Vec::new())),
        },
        RecordingSpeech {
            spoken: Arc::new(Mutex::new(Vec::new())),
        },
        FrameMailbox::new(),
        Arc::new(AtomicBool::new(false)),
    )
    .spawn()
    .unwrap();

    // No request_stop; the loop ends when the source runs dry.
    assert_eq!(handle.join(), ExitReason::EndOfStream);
}
