use crate::types::{Handedness, LandmarkPoint, Landmarks, PerHand};

/// Exponential moving average over all 21 landmarks of one hand.
#[derive(Clone, Debug)]
pub struct EmaLandmarks {
    alpha: f32,
    prev: Option<Landmarks>,
}

impl EmaLandmarks {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            prev: None,
        }
    }

    pub fn apply(&mut self, raw: &Landmarks) -> Landmarks {
        let a = self.alpha;
        let smoothed = match &self.prev {
            None => *raw,
            Some(prev) => {
                let mut out = *raw;
                for (q, (p, r)) in out.iter_mut().zip(prev.iter().zip(raw.iter())) {
                    *q = LandmarkPoint {
                        x: a * p.x + (1.0 - a) * r.x,
                        y: a * p.y + (1.0 - a) * r.y,
                        z: a * p.z + (1.0 - a) * r.z,
                    };
                }
                out
            }
        };
        self.prev = Some(smoothed);
        smoothed
    }
}

/// One smoother per handedness. State survives hand loss, so a hand that
/// reappears resumes from its last smoothed position.
#[derive(Clone, Debug)]
pub struct HandSmoother {
    alpha: f32,
    hands: PerHand<Option<EmaLandmarks>>,
}

impl HandSmoother {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            hands: PerHand::default(),
        }
    }

    /// Hands without a handedness label have no slot and pass through raw.
    pub fn apply(&mut self, handedness: Handedness, raw: &Landmarks) -> Landmarks {
        let alpha = self.alpha;
        match self.hands.get_mut(handedness) {
            Some(slot) => slot.get_or_insert_with(|| EmaLandmarks::new(alpha)).apply(raw),
            None => *raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::landmarks::COUNT;

    fn uniform(x: f32, y: f32) -> Landmarks {
        [LandmarkPoint::new(x, y); COUNT]
    }

    #[test]
    fn first_observation_passes_through() {
        let mut ema = EmaLandmarks::new(0.55);
        let raw = uniform(0.3, 0.7);
        assert_eq!(ema.apply(&raw), raw);
    }

    #[test]
    fn blends_previous_and_raw() {
        let mut ema = EmaLandmarks::new(0.55);
        ema.apply(&uniform(0.0, 1.0));
        let out = ema.apply(&uniform(1.0, 0.0));
        assert!((out[0].x - 0.45).abs() < 1e-6);
        assert!((out[20].y - 0.55).abs() < 1e-6);

        // The blend feeds forward from the smoothed value, not the raw one.
        let out = ema.apply(&uniform(1.0, 0.0));
        assert!((out[0].x - (0.55 * 0.45 + 0.45)).abs() < 1e-6);
    }

    #[test]
    fn hands_are_smoothed_independently() {
        let mut smoother = HandSmoother::new(0.5);
        smoother.apply(Handedness::Left, &uniform(0.0, 0.0));
        let right = smoother.apply(Handedness::Right, &uniform(1.0, 1.0));
        assert_eq!(right[0].x, 1.0);

        let left = smoother.apply(Handedness::Left, &uniform(1.0, 1.0));
        assert!((left[0].x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn unknown_hand_is_not_cached() {
        let mut smoother = HandSmoother::new(0.5);
        smoother.apply(Handedness::Unknown, &uniform(0.0, 0.0));
        let out = smoother.apply(Handedness::Unknown, &uniform(1.0, 1.0));
        assert_eq!(out[0].x, 1.0);
    }
}
