use std::io::BufRead;

use serde::Deserialize;
use thiserror::Error;

use crate::types::{HandFrame, Handedness, LandmarkFrame, LandmarkPoint, landmarks};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed detector output: {0}")]
    Decode(#[from] serde_json::Error),
    #[cfg(feature = "camera-nokhwa")]
    #[error("pose detector failure: {0}")]
    Detector(String),
    #[cfg(feature = "camera-nokhwa")]
    #[error("camera failure: {0}")]
    Camera(String),
}

/// Anything that yields one set of detected hands per video frame.
/// `Ok(None)` is a clean end of stream.
pub trait LandmarkSource {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, SourceError>;
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

fn default_handedness() -> String {
    "Unknown".to_string()
}

fn default_score() -> f32 {
    1.0
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default = "default_handedness")]
    handedness: String,
    #[serde(default = "default_score")]
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parses one line of detector output. Detector-reported errors and
/// malformed hands degrade to fewer hands rather than failing the frame.
pub fn decode_detection(line: &str, min_score: f32) -> Result<LandmarkFrame, SourceError> {
    let result: DetectionResult = serde_json::from_str(line)?;

    if let Some(error) = result.error {
        log::warn!("pose detector error: {error}");
        return Ok(LandmarkFrame::new(Vec::new()));
    }

    let hands = result
        .hands
        .into_iter()
        .filter(|hand| hand.score >= min_score)
        .filter_map(|hand| {
            if hand.landmarks.len() != landmarks::COUNT {
                log::warn!(
                    "expected {} landmarks, got {}",
                    landmarks::COUNT,
                    hand.landmarks.len()
                );
                return None;
            }
            let mut points = [LandmarkPoint::default(); landmarks::COUNT];
            for (point, json) in points.iter_mut().zip(&hand.landmarks) {
                *point = LandmarkPoint {
                    x: json.x,
                    y: json.y,
                    z: json.z,
                };
            }
            Some(HandFrame {
                handedness: Handedness::parse(&hand.handedness),
                landmarks: points,
            })
        })
        .collect();

    Ok(LandmarkFrame::new(hands))
}

/// Replays recorded detector output, one JSON object per line.
pub struct ReplaySource<R> {
    reader: R,
    min_score: f32,
    line: String,
    line_no: usize,
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R, min_score: f32) -> Self {
        Self {
            reader,
            min_score,
            line: String::new(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> LandmarkSource for ReplaySource<R> {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, SourceError> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.line.trim();
            if line.is_empty() {
                continue;
            }
            match decode_detection(line, self.min_score) {
                Ok(frame) => return Ok(Some(frame)),
                Err(err) => log::warn!("skipping replay line {}: {err}", self.line_no),
            }
        }
    }
}
