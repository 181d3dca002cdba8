use crate::{
    config::Tuning,
    types::{LandmarkPoint, MediaCommand},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrubDirection {
    Forward,
    Rewind,
}

impl ScrubDirection {
    pub fn label(&self) -> &'static str {
        match self {
            ScrubDirection::Forward => ">> FORWARD",
            ScrubDirection::Rewind => "<< REWIND",
        }
    }

    fn command(&self) -> MediaCommand {
        match self {
            ScrubDirection::Forward => MediaCommand::SeekForward,
            ScrubDirection::Rewind => MediaCommand::SeekBackward,
        }
    }
}

/// Lives only while both hands hold the voted OK pose.
#[derive(Clone, Debug, PartialEq)]
struct ScrubSession {
    last_distance: f32,
    direction: Option<ScrubDirection>,
}

/// Turns the changing gap between two OK-posed hands into seek commands.
#[derive(Clone, Debug)]
pub struct ScrubController {
    deadzone: f32,
    cooldown_frames: u32,
    cooldown: u32,
    session: Option<ScrubSession>,
}

impl Default for ScrubController {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl ScrubController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            deadzone: tuning.scrub_deadzone,
            cooldown_frames: tuning.scrub_cooldown,
            cooldown: 0,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn direction(&self) -> Option<ScrubDirection> {
        self.session.as_ref().and_then(|s| s.direction)
    }

    #[cfg(test)]
    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// `palms` is `Some((left, right))` when both hands voted OK this frame.
    /// Passing `None` ends the session at once.
    pub fn update(&mut self, palms: Option<(LandmarkPoint, LandmarkPoint)>) -> Option<MediaCommand> {
        let Some((left, right)) = palms else {
            self.session = None;
            return None;
        };
        self.track((right.x - left.x).abs())
    }

    fn track(&mut self, distance: f32) -> Option<MediaCommand> {
        let Some(session) = self.session.as_mut() else {
            self.session = Some(ScrubSession {
                last_distance: distance,
                direction: None,
            });
            return None;
        };

        let delta = distance - session.last_distance;
        session.last_distance = distance;
        if delta.abs() <= self.deadzone {
            return None;
        }

        let direction = if delta > 0.0 {
            ScrubDirection::Forward
        } else {
            ScrubDirection::Rewind
        };
        session.direction = Some(direction);

        if self.cooldown == 0 {
            self.cooldown = self.cooldown_frames;
            Some(direction.command())
        } else {
            None
        }
    }

    /// End-of-frame countdown.
    pub fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }
}
