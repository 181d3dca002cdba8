use crate::{
    config::Tuning,
    types::{GestureKind, MediaCommand},
};

/// Thumb up/down are recognized but left unbound.
pub fn gesture_command(kind: GestureKind) -> Option<MediaCommand> {
    match kind {
        GestureKind::Fist => Some(MediaCommand::PlayPause),
        GestureKind::Victory => Some(MediaCommand::Mute),
        GestureKind::IndexFinger => Some(MediaCommand::NextTrack),
        GestureKind::PinkyFinger => Some(MediaCommand::PreviousTrack),
        GestureKind::Ok | GestureKind::ThumbUp | GestureKind::ThumbDown | GestureKind::Unknown => {
            None
        }
    }
}

/// Global interaction state: gesture debounce, post-scrub grace and the activity gate.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    gate_enabled: bool,
    gesture_cooldown_frames: u32,
    grace_frames: u32,
    active_frames: u32,

    last_gesture: Option<GestureKind>,
    gesture_cooldown: u32,
    grace: u32,
    active_cooldown: u32,
}

impl Dispatcher {
    pub fn new(tuning: &Tuning, gate_enabled: bool) -> Self {
        Self {
            gate_enabled,
            gesture_cooldown_frames: tuning.gesture_cooldown,
            grace_frames: tuning.scrub_grace,
            active_frames: tuning.active_frames,
            last_gesture: None,
            gesture_cooldown: 0,
            grace: 0,
            active_cooldown: 0,
        }
    }

    pub fn gate_open(&self) -> bool {
        !self.gate_enabled || self.active_cooldown > 0
    }

    pub fn grace(&self) -> u32 {
        self.grace
    }

    #[cfg(test)]
    pub fn active_cooldown(&self) -> u32 {
        self.active_cooldown
    }

    #[cfg(test)]
    pub fn last_gesture(&self) -> Option<GestureKind> {
        self.last_gesture
    }

    /// Taps and discrete gestures share this gate.
    pub fn actions_enabled(&self, in_scrub: bool) -> bool {
        self.gate_open() && !in_scrub && self.grace == 0
    }

    /// Called on every frame spent in scrub mode.
    pub fn enter_scrub(&mut self) {
        self.grace = self.grace_frames;
        if self.gate_enabled {
            self.active_cooldown = self.active_frames;
        }
    }

    pub fn dispatch(&mut self, gesture: GestureKind, in_scrub: bool) -> Option<MediaCommand> {
        if !self.actions_enabled(in_scrub) {
            return None;
        }
        let command = gesture_command(gesture)?;
        if self.last_gesture == Some(gesture) || self.gesture_cooldown > 0 {
            return None;
        }
        self.gesture_cooldown = self.gesture_cooldown_frames;
        self.last_gesture = Some(gesture);
        Some(command)
    }

    /// End-of-frame countdown. The gate window only starts draining once
    /// scrubbing and its grace period are over, so it stays open for the
    /// full window of frames in which actions are actually allowed.
    pub fn tick(&mut self, in_scrub: bool) {
        let gate_draining = !in_scrub && self.grace == 0;
        self.gesture_cooldown = self.gesture_cooldown.saturating_sub(1);
        self.grace = self.grace.saturating_sub(1);
        if gate_draining {
            self.active_cooldown = self.active_cooldown.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ungated() -> Dispatcher {
        Dispatcher::new(&Tuning::default(), false)
    }

    #[test]
    fn held_gesture_fires_once() {
        let mut d = ungated();
        let fired: Vec<_> = (0..40)
            .filter_map(|_| {
                let cmd = d.dispatch(GestureKind::Fist, false);
                d.tick(false);
                cmd
            })
            .collect();
        assert_eq!(fired, vec![MediaCommand::PlayPause]);
    }

    #[test]
    fn change_waits_for_cooldown() {
        let mut d = ungated();
        assert_eq!(d.dispatch(GestureKind::Fist, false), Some(MediaCommand::PlayPause));
        d.tick(false);

        let mut frames = 1;
        loop {
            if let Some(cmd) = d.dispatch(GestureKind::Victory, false) {
                assert_eq!(cmd, MediaCommand::Mute);
                break;
            }
            d.tick(false);
            frames += 1;
        }
        assert_eq!(frames, 15);
        assert_eq!(d.last_gesture(), Some(GestureKind::Victory));
    }

    #[test]
    fn unbound_gestures_do_not_reset_debounce() {
        let mut d = ungated();
        assert!(d.dispatch(GestureKind::IndexFinger, false).is_some());
        for _ in 0..20 {
            d.tick(false);
        }
        assert_eq!(d.dispatch(GestureKind::ThumbUp, false), None);
        assert_eq!(d.dispatch(GestureKind::Unknown, false), None);
        assert_eq!(d.dispatch(GestureKind::IndexFinger, false), None);
        assert_eq!(
            d.dispatch(GestureKind::PinkyFinger, false),
            Some(MediaCommand::PreviousTrack)
        );
    }

    #[test]
    fn scrub_and_grace_block_dispatch() {
        let mut d = ungated();
        d.enter_scrub();
        assert_eq!(d.dispatch(GestureKind::Fist, true), None);
        d.tick(true);

        // Grace counts down from the last scrub frame.
        for _ in 0..44 {
            assert_eq!(d.dispatch(GestureKind::Fist, false), None);
            d.tick(false);
        }
        assert_eq!(d.grace(), 0);
        assert_eq!(d.dispatch(GestureKind::Fist, false), Some(MediaCommand::PlayPause));
    }

    #[test]
    fn closed_gate_blocks_until_scrub_opens_it() {
        let mut d = Dispatcher::new(&Tuning::default(), true);
        assert!(!d.gate_open());
        assert_eq!(d.dispatch(GestureKind::Fist, false), None);

        d.enter_scrub();
        assert_eq!(d.active_cooldown(), 30);
        d.tick(true);
        while d.grace() > 0 {
            d.tick(false);
        }
        assert!(d.gate_open());
        assert_eq!(d.dispatch(GestureKind::Fist, false), Some(MediaCommand::PlayPause));

        while d.gate_open() {
            d.tick(false);
        }
        assert_eq!(d.dispatch(GestureKind::Victory, false), None);
    }

    #[test]
    fn gate_window_starts_when_grace_ends() {
        let tuning = Tuning::default();
        let mut d = Dispatcher::new(&tuning, true);
        d.enter_scrub();
        d.tick(true);

        while d.grace() > 0 {
            d.tick(false);
            assert_eq!(d.active_cooldown(), tuning.active_frames);
        }

        let mut open_frames = 0;
        while d.actions_enabled(false) {
            open_frames += 1;
            d.tick(false);
        }
        assert_eq!(open_frames, tuning.active_frames);
        assert!(!d.gate_open());
    }
}
