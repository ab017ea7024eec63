//! tract-onnx backed classifier.

use std::path::{Path, PathBuf};

use tract_onnx::prelude::*;

use crate::labels::LABEL_COUNT;
use crate::preprocess::InputTensor;

use super::{Classifier, ClassifierError};

type RunnableModel = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

/// Classifier running a pretrained ONNX model with tract.
///
/// The model is loaded and optimized once at startup; `predict` is
/// pure inference.
pub struct OnnxClassifier {
    model: RunnableModel,
    path: PathBuf,
}

impl OnnxClassifier {
    /// Load an ONNX model from disk.
    ///
    /// The model must accept a `[1, 48, 48, 1]` f32 input. Any load or
    /// optimization failure is fatal at startup.
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let input_fact = InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 48, 48, 1));

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| m.with_input_fact(0, input_fact))
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| ClassifierError::ModelLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self {
            model,
            path: path.to_path_buf(),
        })
    }

    /// Path the model was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, input: &InputTensor) -> Result<Vec<f32>, ClassifierError> {
        let shape = input.shape();
        let expected_len: usize = shape.iter().product();
        if input.data().len() != expected_len {
            return Err(ClassifierError::Prediction(format!(
                "input tensor has {} values, expected {}",
                input.data().len(),
                expected_len
            )));
        }

        let mut tensor = Tensor::zero::<f32>(&shape)
            .map_err(|e| ClassifierError::Prediction(e.to_string()))?;
        tensor
            .as_slice_mut::<f32>()
            .map_err(|e| ClassifierError::Prediction(e.to_string()))?
            .copy_from_slice(input.data());

        let outputs = self
            .model
            .run(tvec!(tensor.into_tvalue()))
            .map_err(|e| ClassifierError::Prediction(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| ClassifierError::Prediction("model produced no output".to_string()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::Prediction(e.to_string()))?;

        let scores: Vec<f32> = view.iter().copied().collect();
        if scores.len() != LABEL_COUNT {
            return Err(ClassifierError::OutputShape {
                expected: LABEL_COUNT,
                actual: scores.len(),
            });
        }

        Ok(scores)
    }
}
