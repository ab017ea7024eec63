//! sign-stream: live sign-language gesture annotation for webcam
//! streams.
//!
//! Captures webcam frames on a background thread, classifies the hand
//! gesture with a pretrained ONNX model, speaks the predicted letter
//! aloud, and hands the annotated frame to the main thread for display.
//!
//! # Architecture
//!
//! - [`camera`] - device enumeration and the live frame source
//! - [`preprocess`] - frame to model input tensor conversion
//! - [`classifier`] - ONNX inference and prediction selection
//! - [`labels`] - the gesture label set
//! - [`annotate`] - overlay drawing (label text and the gesture box)
//! - [`speech`] - spoken announcements of predictions
//! - [`annotation_loop`] - the background read/predict/publish loop
//! - [`display`] - the frame mailbox and the video window
//! - [`cli`] / [`config`] - flags and the config file

pub mod annotate;
pub mod annotation_loop;
pub mod camera;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod display;
pub mod labels;
pub mod preprocess;
pub mod speech;
