//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Live sign-language gesture annotation for webcam streams
#[derive(Parser, Debug)]
#[command(name = "sign-stream")]
#[command(version, about = "Live sign-language gesture annotation for webcam streams")]
#[command(long_about = "Captures webcam frames, classifies the hand gesture with a \
    pretrained ONNX model, speaks the predicted letter aloud, and shows the \
    annotated feed in a window. Press 'q' in the window to quit.")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Camera device index (from list-cameras)
    #[arg(long)]
    pub camera: Option<u32>,

    /// Path to the pretrained ONNX gesture model
    #[arg(long, short)]
    pub model: Option<PathBuf>,

    /// Path to the TTF/OTF font for the overlay text
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Mirror the camera horizontally (selfie view)
    #[arg(long)]
    pub mirror: bool,

    /// Disable spoken announcements
    #[arg(long)]
    pub no_speech: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available cameras
    ListCameras,
}
