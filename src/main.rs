//! sign-stream binary: wire the camera, classifier, annotator and
//! speech engine into the annotation loop and drive the window.

use std::error::Error;
use std::process::exit;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use sign_stream::annotate::{OverlayAnnotator, Roi};
use sign_stream::annotation_loop::AnnotationLoop;
use sign_stream::camera::{list_devices, CameraCapture, CameraSettings, Resolution};
use sign_stream::classifier::OnnxClassifier;
use sign_stream::cli::{Args, Command};
use sign_stream::config::Config;
use sign_stream::display::{FrameMailbox, VideoWindow, WINDOW_TITLE};
use sign_stream::speech::{NullSpeech, SpeechEngine, SpeechNotifier};

fn main() {
    env_logger::init();

    let args = Args::parse();

    let result = match args.command {
        Some(Command::ListCameras) => list_cameras(),
        None => run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn list_cameras() -> Result<(), Box<dyn Error>> {
    let devices = list_devices()?;
    if devices.is_empty() {
        println!("No cameras found");
        return Ok(());
    }
    for device in devices {
        println!("{}", device);
    }
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = Config::load(args.config.as_deref())?;
    let settings = config.resolve(&args);

    // Camera first: an unavailable device should fail before the model
    // is loaded.
    let mut camera = CameraCapture::open(CameraSettings {
        device_index: settings.device_index,
        mirror: settings.mirror,
        ..CameraSettings::default()
    })?;
    camera.start()?;
    let resolution = camera.actual_resolution().unwrap_or(Resolution::VGA);
    log::info!("Camera streaming at {}", resolution);

    let classifier = OnnxClassifier::load(&settings.model_path)?;
    log::info!("Loaded model from {}", settings.model_path.display());

    let annotator = OverlayAnnotator::new(&settings.font_path, Roi::default())?;

    let speech: Box<dyn SpeechNotifier> = if settings.speech_enabled {
        let engine = SpeechEngine::new()?;
        log::info!("Speech engine: {}", engine.program().display());
        Box::new(engine)
    } else {
        Box::new(NullSpeech)
    };

    let stop = Arc::new(AtomicBool::new(false));
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || {
            interrupted.store(true, Ordering::SeqCst);
        })?;
    }

    let mailbox = FrameMailbox::new();
    let handle = AnnotationLoop::new(
        camera,
        classifier,
        annotator,
        speech,
        mailbox.clone(),
        Arc::clone(&stop),
    )
    .spawn()?;

    let mut window = VideoWindow::open(
        WINDOW_TITLE,
        resolution.width as usize,
        resolution.height as usize,
    )?;

    // Foreground loop: present the newest annotated frame and watch for
    // the quit key. The camera is released by the loop thread before
    // join returns.
    loop {
        match mailbox.take() {
            Some(frame) => {
                if let Err(e) = window.present(&frame) {
                    log::warn!("Failed to present frame: {}", e);
                }
            }
            None => window.refresh(),
        }

        if window.quit_requested() || interrupted.load(Ordering::SeqCst) {
            handle.request_stop();
        }
        if handle.is_finished() {
            break;
        }
    }

    let reason = handle.join();
    log::info!("Shut down ({:?})", reason);
    Ok(())
}
