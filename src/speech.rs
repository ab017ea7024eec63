//! Speech output for predicted labels.
//!
//! Announcements go through the platform speech command as a child
//! process, and `announce` waits for the utterance to finish. That
//! blocking call is the loop's backpressure: the frame rate is bounded
//! by speech duration, not by camera or inference speed.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Announces prediction text out loud.
pub trait SpeechNotifier: Send {
    /// Speak `text`, blocking until the utterance completes.
    fn announce(&mut self, text: &str) -> Result<(), SpeechError>;
}

/// Platform speech commands tried in order.
#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("say", &[])];

#[cfg(not(target_os = "macos"))]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("espeak", &[]),
    ("espeak-ng", &[]),
    // spd-say returns immediately unless asked to wait.
    ("spd-say", &["--wait"]),
];

/// Speech notifier backed by the system speech command.
pub struct SpeechEngine {
    program: PathBuf,
    args: Vec<&'static str>,
}

impl SpeechEngine {
    /// Detect the platform speech command.
    ///
    /// Fails with `EngineNotFound` when none of the known commands is
    /// on `PATH`; detection happens once at startup so a missing engine
    /// is caught before the loop starts.
    pub fn new() -> Result<Self, SpeechError> {
        for (name, args) in CANDIDATES {
            if let Some(program) = find_in_path(name) {
                return Ok(Self {
                    program,
                    args: args.to_vec(),
                });
            }
        }
        Err(SpeechError::EngineNotFound)
    }

    /// The command announcements are spawned with.
    pub fn program(&self) -> &PathBuf {
        &self.program
    }
}

impl SpeechNotifier for SpeechEngine {
    fn announce(&mut self, text: &str) -> Result<(), SpeechError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SpeechError::EngineNotFound
                } else {
                    SpeechError::SpawnFailed(e)
                }
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::EngineFailed {
                exit_code: status.code(),
            })
        }
    }
}

impl SpeechNotifier for Box<dyn SpeechNotifier> {
    fn announce(&mut self, text: &str) -> Result<(), SpeechError> {
        (**self).announce(text)
    }
}

/// Notifier that announces nothing, for `--no-speech`.
#[derive(Debug, Default)]
pub struct NullSpeech;

impl SpeechNotifier for NullSpeech {
    fn announce(&mut self, _text: &str) -> Result<(), SpeechError> {
        Ok(())
    }
}

/// Find an executable by name on `PATH`.
fn find_in_path(name: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Errors from the speech engine.
#[derive(Debug)]
pub enum SpeechError {
    /// No speech command available on this system.
    EngineNotFound,
    /// The speech command could not be spawned.
    SpawnFailed(std::io::Error),
    /// The speech command exited with a failure status.
    EngineFailed { exit_code: Option<i32> },
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechError::EngineNotFound => {
                write!(
                    f,
                    "No speech command found. Install espeak (Linux) or use the built-in 'say' (macOS), or run with --no-speech"
                )
            }
            SpeechError::SpawnFailed(e) => write!(f, "Failed to spawn speech command: {}", e),
            SpeechError::EngineFailed { exit_code } => {
                write!(f, "Speech command exited with code {:?}", exit_code)
            }
        }
    }
}

impl std::error::Error for SpeechError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpeechError::SpawnFailed(e) => Some(e),
            _ => None,
        }
    }
}
