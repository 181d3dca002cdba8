use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MediaCommand;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Camera selector: a device index or a backend-specific device string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CameraSource {
    Index(u32),
    Name(String),
}

impl Default for CameraSource {
    fn default() -> Self {
        CameraSource::Index(0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera_source: CameraSource,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Flip frames horizontally so the preview behaves like a mirror.
    pub mirror: bool,
    /// Require a recent two-hand scrub before taps and gestures are honored.
    pub activity_gate: bool,
    pub tuning: Tuning,
    pub bindings: Bindings,
    /// Input backends, tried in order until one delivers.
    pub backends: Vec<BackendConfig>,
    pub detector: DetectorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_source: CameraSource::default(),
            frame_width: 640,
            frame_height: 480,
            mirror: true,
            activity_gate: true,
            tuning: Tuning::default(),
            bindings: Bindings::default(),
            backends: vec![BackendConfig::default()],
            detector: DetectorConfig::default(),
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Never fails: any read or parse problem yields the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("{err}; using default config ({})", path.display());
                Self::default()
            }
        }
    }
}

/// Numeric knobs for the classification and stabilization pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub ema_alpha: f32,
    pub vote_window: usize,
    pub vote_min_ok: usize,
    /// Thumb–index pinch threshold as a fraction of palm width.
    pub ok_factor: f32,
    /// Minimum index–middle tip distance for a V-sign.
    pub v_spread: f32,
    pub touch_factor: f32,
    pub tap_hysteresis: f32,
    pub tap_cooldown: u32,
    pub scrub_deadzone: f32,
    pub scrub_cooldown: u32,
    pub scrub_grace: u32,
    pub gesture_cooldown: u32,
    pub active_frames: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ema_alpha: 0.55,
            vote_window: 5,
            vote_min_ok: 3,
            ok_factor: 0.35,
            v_spread: 0.1,
            touch_factor: 0.22,
            tap_hysteresis: 1.25,
            tap_cooldown: 6,
            scrub_deadzone: 0.015,
            scrub_cooldown: 6,
            scrub_grace: 45,
            gesture_cooldown: 15,
            active_frames: 30,
        }
    }
}

/// A key chord: one name is a single key press, more is a combination.
pub type Chord = Vec<String>;

/// Ordered alternatives per command; the first chord that is delivered wins.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Bindings {
    pub play_pause: Vec<Chord>,
    pub mute: Vec<Chord>,
    pub next_track: Vec<Chord>,
    pub previous_track: Vec<Chord>,
    pub volume_up: Vec<Chord>,
    pub volume_down: Vec<Chord>,
    pub seek_forward: Vec<Chord>,
    pub seek_backward: Vec<Chord>,
}

fn chords(alternatives: &[&[&str]]) -> Vec<Chord> {
    alternatives
        .iter()
        .map(|chord| chord.iter().map(|key| key.to_string()).collect())
        .collect()
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            play_pause: chords(&[&["XF86AudioPlay"]]),
            mute: chords(&[&["XF86AudioMute"]]),
            next_track: chords(&[&["shift", "n"], &["XF86AudioNext"]]),
            previous_track: chords(&[&["shift", "p"], &["XF86AudioPrev"]]),
            volume_up: chords(&[&["XF86AudioRaiseVolume"]]),
            volume_down: chords(&[&["XF86AudioLowerVolume"]]),
            // YouTube's j/l skip by ten seconds; use Left/Right for other players.
            seek_forward: chords(&[&["l"]]),
            seek_backward: chords(&[&["j"]]),
        }
    }
}

impl Bindings {
    pub fn for_command(&self, command: MediaCommand) -> &[Chord] {
        match command {
            MediaCommand::PlayPause => &self.play_pause,
            MediaCommand::Mute => &self.mute,
            MediaCommand::NextTrack => &self.next_track,
            MediaCommand::PreviousTrack => &self.previous_track,
            MediaCommand::VolumeUp => &self.volume_up,
            MediaCommand::VolumeDown => &self.volume_down,
            MediaCommand::SeekForward => &self.seek_forward,
            MediaCommand::SeekBackward => &self.seek_backward,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BackendConfig {
    DryRun,
    Process {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Process {
            program: "xdotool".to_string(),
            args: vec!["key".to_string()],
        }
    }
}

/// Command line of the pose-detector sidecar.
#[cfg_attr(not(feature = "camera-nokhwa"), allow(dead_code))]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub program: String,
    pub args: Vec<String>,
    pub min_score: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["hand_detect.py".to_string()],
            min_score: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default(Path::new("/nonexistent/gesture-media.json"));
        assert_eq!(config.camera_source, CameraSource::Index(0));
        assert_eq!(config.frame_width, 640);
        assert_eq!(config.frame_height, 480);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Config::from_json("{ camera_source: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = Config::from_json(
            r#"{ "camera_source": "/dev/video2", "frame_width": 1280, "tuning": { "scrub_grace": 20 } }"#,
        )
        .unwrap();
        assert_eq!(config.camera_source, CameraSource::Name("/dev/video2".into()));
        assert_eq!(config.frame_width, 1280);
        assert_eq!(config.frame_height, 480);
        assert_eq!(config.tuning.scrub_grace, 20);
        assert_eq!(config.tuning.vote_window, 5);
        assert!(config.activity_gate);
    }

    #[test]
    fn backend_kind_is_tagged() {
        let config = Config::from_json(
            r#"{ "backends": [
                { "kind": "process", "program": "ydotool", "args": ["key"] },
                { "kind": "dry-run" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(
            config.backends,
            vec![
                BackendConfig::Process {
                    program: "ydotool".into(),
                    args: vec!["key".into()],
                },
                BackendConfig::DryRun,
            ]
        );
    }

    #[test]
    fn next_track_prefers_combo_then_media_key() {
        let bindings = Bindings::default();
        let next = bindings.for_command(MediaCommand::NextTrack);
        assert_eq!(next.len(), 2);
        assert_eq!(next[0], vec!["shift".to_string(), "n".to_string()]);
        assert_eq!(next[1].len(), 1);
    }
}
