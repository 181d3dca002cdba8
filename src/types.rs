use std::time::Instant;

/// Hand landmark indices in the 21-point hand model.
#[allow(dead_code)]
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_TIP: usize = 20;

    pub const COUNT: usize = 21;
}

/// A camera frame in packed RGB, as handed to the pose detector.
#[cfg_attr(not(feature = "camera-nokhwa"), allow(dead_code))]
#[derive(Clone, Debug)]
pub struct Frame {
    pub rgb: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: Instant,
}

/// One landmark in normalized image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar distance; depth is ignored.
    pub fn distance(&self, other: &LandmarkPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

pub type Landmarks = [LandmarkPoint; landmarks::COUNT];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
    Unknown,
}

impl Handedness {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "left" => Handedness::Left,
            "right" => Handedness::Right,
            _ => Handedness::Unknown,
        }
    }
}

/// A single detected hand in one video frame.
#[derive(Clone, Debug)]
pub struct HandFrame {
    pub handedness: Handedness,
    pub landmarks: Landmarks,
}

/// Everything the pose detector reported for one video frame.
#[derive(Clone, Debug)]
pub struct LandmarkFrame {
    pub hands: Vec<HandFrame>,
    /// Capture time; drives the frame-rate readout.
    pub timestamp: Instant,
}

impl LandmarkFrame {
    pub fn new(hands: Vec<HandFrame>) -> Self {
        Self {
            hands,
            timestamp: Instant::now(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Fist,
    Victory,
    Ok,
    IndexFinger,
    PinkyFinger,
    ThumbUp,
    ThumbDown,
    Unknown,
}

impl GestureKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            GestureKind::Fist => "FIST",
            GestureKind::Victory => "V-SIGN",
            GestureKind::Ok => "OK-SIGN",
            GestureKind::IndexFinger => "INDEX-FINGER",
            GestureKind::PinkyFinger => "PINKY-FINGER",
            GestureKind::ThumbUp => "THUMB-UP",
            GestureKind::ThumbDown => "THUMB-DOWN",
            GestureKind::Unknown => "UNKNOWN",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            GestureKind::Fist => "✊ ",
            GestureKind::Victory => "✌️ ",
            GestureKind::Ok => "👌 ",
            GestureKind::IndexFinger => "☝️ ",
            GestureKind::PinkyFinger => "🤙 ",
            GestureKind::ThumbUp => "👍 ",
            GestureKind::ThumbDown => "👎 ",
            GestureKind::Unknown => "⋯ ",
        }
    }
}

/// Outbound media commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaCommand {
    PlayPause,
    Mute,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
    SeekForward,
    SeekBackward,
}

impl MediaCommand {
    /// Short text shown in the status line after a successful send.
    pub fn status_text(&self) -> &'static str {
        match self {
            MediaCommand::PlayPause => "play/pause",
            MediaCommand::Mute => "mute",
            MediaCommand::NextTrack => "next",
            MediaCommand::PreviousTrack => "prev",
            MediaCommand::VolumeUp => "vol up",
            MediaCommand::VolumeDown => "vol down",
            MediaCommand::SeekForward => "seek fwd",
            MediaCommand::SeekBackward => "seek back",
        }
    }
}

/// Fixed two-slot storage for per-hand state.
#[derive(Clone, Debug, Default)]
pub struct PerHand<T> {
    pub left: T,
    pub right: T,
}

impl<T> PerHand<T> {
    /// `None` for hands without a usable handedness label.
    pub fn get_mut(&mut self, handedness: Handedness) -> Option<&mut T> {
        match handedness {
            Handedness::Left => Some(&mut self.left),
            Handedness::Right => Some(&mut self.right),
            Handedness::Unknown => None,
        }
    }
}
