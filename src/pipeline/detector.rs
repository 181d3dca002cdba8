use std::{
    io::{BufRead, BufReader, Write},
    path::Path,
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
};

use super::source::{SourceError, decode_detection};
use crate::{
    config::DetectorConfig,
    types::{Frame, LandmarkFrame},
};

/// Pose-detector sidecar process.
///
/// Each request is a header of three little-endian `u32`s (width, height,
/// channels) followed by packed RGB bytes on the child's stdin. The child
/// answers with one JSON line per frame on stdout, after first printing
/// `READY` once its model has loaded.
pub struct DetectorProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    min_score: f32,
    response: String,
}

/// Fails early when the detector script named on the command line is missing,
/// instead of surfacing it later as a dead child process.
fn check_script(config: &DetectorConfig) -> Result<(), SourceError> {
    let script = config
        .args
        .iter()
        .map(Path::new)
        .find(|arg| arg.extension().is_some_and(|ext| ext == "py"));

    match script {
        Some(path) if !path.exists() => Err(SourceError::Detector(format!(
            "pose detector script not found at {}; run from the repository root or set \
             detector.args in config.json (the script needs: python3 -m pip install mediapipe numpy)",
            path.display()
        ))),
        _ => Ok(()),
    }
}

impl DetectorProcess {
    pub fn spawn(config: &DetectorConfig) -> Result<Self, SourceError> {
        check_script(config)?;
        log::info!("starting pose detector: {} {}", config.program, config.args.join(" "));

        let mut child = Command::new(&config.program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SourceError::Detector("detector stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SourceError::Detector("detector stdout unavailable".into()))?;

        let mut detector = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            min_score: config.min_score,
            response: String::new(),
        };
        detector.await_ready()?;
        log::info!("pose detector ready");
        Ok(detector)
    }

    fn await_ready(&mut self) -> Result<(), SourceError> {
        self.read_response()?;
        if self.response.trim() != "READY" {
            return Err(SourceError::Detector(format!(
                "expected READY from detector, got {:?}",
                self.response.trim()
            )));
        }
        Ok(())
    }

    fn read_response(&mut self) -> Result<(), SourceError> {
        self.response.clear();
        if self.stdout.read_line(&mut self.response)? == 0 {
            return Err(SourceError::Detector("detector exited".into()));
        }
        Ok(())
    }

    /// Blocks until the detector answers; there is no timeout.
    pub fn detect(&mut self, frame: &Frame) -> Result<LandmarkFrame, SourceError> {
        self.stdin.write_all(&frame.width.to_le_bytes())?;
        self.stdin.write_all(&frame.height.to_le_bytes())?;
        self.stdin.write_all(&3u32.to_le_bytes())?;
        self.stdin.write_all(&frame.rgb)?;
        self.stdin.flush()?;

        self.read_response()?;
        let mut landmarks = decode_detection(self.response.trim(), self.min_score)?;
        landmarks.timestamp = frame.timestamp;
        Ok(landmarks)
    }
}

impl Drop for DetectorProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
