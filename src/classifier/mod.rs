//! Gesture classification: the [`Classifier`] seam and the
//! [`Prediction`] reduction of a score vector.

mod onnx;

pub use onnx::OnnxClassifier;

use std::fmt;
use std::path::PathBuf;

use crate::labels::{label, LABEL_COUNT};
use crate::preprocess::InputTensor;

/// Maps a preprocessed frame to one score per gesture label.
///
/// The returned vector must have exactly [`LABEL_COUNT`] entries,
/// aligned with [`crate::labels::LABELS`]. Scores are relative
/// confidences; they need not sum to 1.
pub trait Classifier: Send {
    fn predict(&self, input: &InputTensor) -> Result<Vec<f32>, ClassifierError>;
}

/// The result of classifying one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Index into the label set.
    pub index: usize,
    /// Predicted label.
    pub label: &'static str,
    /// Raw score of the predicted label, nominally in `[0.0, 1.0]`.
    pub confidence: f32,
}

impl Prediction {
    /// Reduce a score vector to its argmax prediction.
    ///
    /// Ties break toward the lowest index: a later score must be
    /// strictly greater to win. Errors if the vector is not exactly
    /// [`LABEL_COUNT`] long.
    pub fn from_scores(scores: &[f32]) -> Result<Prediction, ClassifierError> {
        if scores.len() != LABEL_COUNT {
            return Err(ClassifierError::OutputShape {
                expected: LABEL_COUNT,
                actual: scores.len(),
            });
        }

        let mut best_index = 0;
        let mut best_score = scores[0];
        for (i, &score) in scores.iter().enumerate().skip(1) {
            if score > best_score {
                best_index = i;
                best_score = score;
            }
        }

        // Total for any 27-element output by construction.
        let label = label(best_index).ok_or(ClassifierError::OutputShape {
            expected: LABEL_COUNT,
            actual: scores.len(),
        })?;

        Ok(Prediction {
            index: best_index,
            label,
            confidence: best_score,
        })
    }

    /// Overlay / announcement text: the label and the confidence as a
    /// percentage with two decimal places, e.g. `"A 91.00%"`.
    pub fn display_text(&self) -> String {
        format!("{} {:.2}%", self.label, self.confidence * 100.0)
    }
}

/// Errors from loading or running the classifier.
#[derive(Debug)]
pub enum ClassifierError {
    /// The model artifact could not be loaded. Fatal at startup.
    ModelLoad { path: PathBuf, message: String },
    /// The model produced a vector of the wrong length.
    OutputShape { expected: usize, actual: usize },
    /// The backend failed on a single frame. Recoverable; the cycle is
    /// skipped.
    Prediction(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierError::ModelLoad { path, message } => {
                write!(
                    f,
                    "Failed to load model '{}': {}",
                    path.display(),
                    message
                )
            }
            ClassifierError::OutputShape { expected, actual } => {
                write!(
                    f,
                    "Model output has {} classes, expected {}",
                    actual, expected
                )
            }
            ClassifierError::Prediction(msg) => write!(f, "Prediction failed: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores_with_max(index: usize, value: f32) -> Vec<f32> {
        let mut scores = vec![0.01; LABEL_COUNT];
        scores[index] = value;
        scores
    }

    #[test]
    fn test_argmax_picks_strict_maximum() {
        let prediction = Prediction::from_scores(&scores_with_max(0, 0.91)).unwrap();
        assert_eq!(prediction.index, 0);
        assert_eq!(prediction.label, "A");
        assert!((prediction.confidence - 0.91).abs() < f32::EPSILON);
    }

    #[test]
    fn test_argmax_last_index() {
        let prediction = Prediction::from_scores(&scores_with_max(26, 0.75)).unwrap();
        assert_eq!(prediction.label, "blank");
    }

    #[test]
    fn test_all_equal_scores_pick_first_label() {
        let scores = vec![0.5; LABEL_COUNT];
        let prediction = Prediction::from_scores(&scores).unwrap();
        assert_eq!(prediction.index, 0);
        assert_eq!(prediction.label, "A");
    }

    #[test]
    fn test_tie_breaks_toward_lowest_index() {
        let mut scores = vec![0.0; LABEL_COUNT];
        scores[3] = 0.8;
        scores[10] = 0.8;
        let prediction = Prediction::from_scores(&scores).unwrap();
        assert_eq!(prediction.label, "D");
    }

    #[test]
    fn test_wrong_output_length_rejected() {
        let result = Prediction::from_scores(&[0.1, 0.2]);
        match result {
            Err(ClassifierError::OutputShape { expected, actual }) => {
                assert_eq!(expected, 27);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected OutputShape error, got {:?}", other),
        }
    }

    #[test]
    fn test_display_text_format() {
        let prediction = Prediction::from_scores(&scores_with_max(0, 0.91)).unwrap();
        assert_eq!(prediction.display_text(), "A 91.00%");

        let prediction = Prediction::from_scores(&scores_with_max(1, 0.123456)).unwrap();
        assert_eq!(prediction.display_text(), "B 12.35%");
    }

    #[test]
    fn test_error_display() {
        let err = ClassifierError::OutputShape {
            expected: 27,
            actual: 10,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("10"));
        assert!(msg.contains("27"));
    }
}
