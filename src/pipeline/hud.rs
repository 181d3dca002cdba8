use std::{
    collections::VecDeque,
    fmt,
    time::Instant,
};

use crate::{session::FrameReport, types::GestureKind};

const FPS_WINDOW: usize = 30;

/// Rolling frames-per-second average over the last 30 frames.
#[derive(Debug)]
pub struct FpsMeter {
    samples: VecDeque<f32>,
    last: Option<Instant>,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(FPS_WINDOW),
            last: None,
        }
    }

    pub fn tick(&mut self, now: Instant) -> f32 {
        if let Some(last) = self.last {
            let secs = now.duration_since(last).as_secs_f32().max(1e-6);
            if self.samples.len() == FPS_WINDOW {
                self.samples.pop_front();
            }
            self.samples.push_back(1.0 / secs);
        }
        self.last = Some(now);
        self.fps()
    }

    pub fn fps(&self) -> f32 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.samples.iter().sum::<f32>() / self.samples.len() as f32
        }
    }
}

/// Text status surface for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusLine {
    pub gesture: String,
    pub scrub: Option<&'static str>,
    pub scrubbing: bool,
    pub fps: f32,
    pub gate_open: bool,
    pub grace: u32,
    pub last_command: String,
}

impl StatusLine {
    pub fn new(report: &FrameReport, fps: f32, last_command: &str) -> Self {
        let gesture = match report.gesture {
            Some(_) if report.scrubbing => {
                let ok = GestureKind::Ok;
                format!("{}{} (SCRUB)", ok.emoji(), ok.display_name())
            }
            Some(kind) => format!("{}{}", kind.emoji(), kind.display_name()),
            None => "NONE".to_string(),
        };
        Self {
            gesture,
            scrub: report.scrub_direction.map(|d| d.label()),
            scrubbing: report.scrubbing,
            fps,
            gate_open: report.gate_open,
            grace: report.grace,
            last_command: last_command.to_string(),
        }
    }

    /// Whether anything other than the frame rate moved.
    pub fn differs_from(&self, other: &StatusLine) -> bool {
        self.gesture != other.gesture
            || self.scrub != other.scrub
            || self.scrubbing != other.scrubbing
            || self.gate_open != other.gate_open
            || self.last_command != other.last_command
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gesture: {}", self.gesture)?;
        if self.scrubbing {
            write!(f, " | SCRUB MODE")?;
        }
        if let Some(direction) = self.scrub {
            write!(f, " {direction}")?;
        }
        write!(
            f,
            " | FPS: {:.1} | Gate:{}  Grace:{}",
            self.fps,
            if self.gate_open { "ACTIVE" } else { "IDLE" },
            self.grace
        )?;
        if !self.last_command.is_empty() {
            write!(f, " | {}", self.last_command)?;
        }
        Ok(())
    }
}
