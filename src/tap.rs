use crate::{
    config::Tuning,
    gesture::{MIN_PALM_WIDTH, palm_width},
    types::{Landmarks, MediaCommand, landmarks as lm},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapThresholds {
    pub touch: f32,
    pub release: f32,
}

/// Per-hand tap state: middle-to-thumb raises the volume, ring-to-thumb lowers it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TapState {
    pub mid_touch: bool,
    pub ring_touch: bool,
    pub cooldown: u32,
}

#[derive(Clone, Debug)]
pub struct TapDetector {
    touch_factor: f32,
    hysteresis: f32,
    cooldown_frames: u32,
}

impl Default for TapDetector {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl TapDetector {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            touch_factor: tuning.touch_factor,
            // Release below touch would let a resting finger chatter.
            hysteresis: tuning.tap_hysteresis.max(1.0),
            cooldown_frames: tuning.tap_cooldown,
        }
    }

    pub fn thresholds(&self, palm_width: f32) -> TapThresholds {
        let touch = self.touch_factor * palm_width.max(MIN_PALM_WIDTH);
        TapThresholds {
            touch,
            release: touch * self.hysteresis,
        }
    }

    /// Advances one hand by one frame and returns the volume command to send, if any.
    pub fn update(&self, state: &mut TapState, points: &Landmarks, enabled: bool) -> Option<MediaCommand> {
        state.cooldown = state.cooldown.saturating_sub(1);

        let thresholds = self.thresholds(palm_width(points));
        let thumb = &points[lm::THUMB_TIP];
        let mid_gap = thumb.distance(&points[lm::MIDDLE_TIP]);
        let ring_gap = thumb.distance(&points[lm::RING_TIP]);

        let mut fired = None;
        if step_channel(&mut state.mid_touch, mid_gap, thresholds, enabled && state.cooldown == 0) {
            state.cooldown = self.cooldown_frames;
            fired = Some(MediaCommand::VolumeUp);
        }
        if step_channel(&mut state.ring_touch, ring_gap, thresholds, enabled && state.cooldown == 0) {
            state.cooldown = self.cooldown_frames;
            fired = Some(MediaCommand::VolumeDown);
        }
        fired
    }
}

/// One hysteresis channel. Returns true on the untouched → touched edge.
///
/// Release happens whenever the gap clears the release threshold, even while
/// firing is blocked, so a channel cannot stay latched across a disabled spell.
pub fn step_channel(touched: &mut bool, gap: f32, thresholds: TapThresholds, can_fire: bool) -> bool {
    if *touched {
        if gap > thresholds.release {
            *touched = false;
        }
        false
    } else if can_fire && gap < thresholds.touch {
        *touched = true;
        true
    } else {
        false
    }
}
