use crate::{
    config::Tuning,
    types::{GestureKind, LandmarkPoint, Landmarks, landmarks as lm},
};

/// Palm widths at or below this are treated as a collapsed hand.
pub const MIN_PALM_WIDTH: f32 = 1e-6;

const PALM_CENTER_POINTS: [usize; 5] = [lm::WRIST, lm::INDEX_MCP, lm::MIDDLE_MCP, lm::RING_MCP, lm::PINKY_MCP];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FingerState {
    Extended,
    Folded,
}

impl FingerState {
    fn from_extended(extended: bool) -> Self {
        if extended {
            FingerState::Extended
        } else {
            FingerState::Folded
        }
    }

    pub fn is_extended(&self) -> bool {
        matches!(self, FingerState::Extended)
    }
}

/// Thumb, index, middle, ring, pinky.
pub type FingerStates = [FingerState; 5];

pub fn finger_states(points: &Landmarks) -> FingerStates {
    // Image y grows downward, so a raised tip has the smaller y.
    let up = |tip: usize, pip: usize| FingerState::from_extended(points[tip].y < points[pip].y);
    [
        // The thumb folds across the palm, so compare horizontally.
        FingerState::from_extended(points[lm::THUMB_TIP].x > points[lm::THUMB_IP].x),
        up(lm::INDEX_TIP, lm::INDEX_PIP),
        up(lm::MIDDLE_TIP, lm::MIDDLE_PIP),
        up(lm::RING_TIP, lm::RING_PIP),
        up(lm::PINKY_TIP, lm::PINKY_PIP),
    ]
}

pub fn palm_width(points: &Landmarks) -> f32 {
    points[lm::INDEX_MCP].distance(&points[lm::PINKY_MCP])
}

pub fn palm_center(points: &Landmarks) -> LandmarkPoint {
    let n = PALM_CENTER_POINTS.len() as f32;
    let (x, y) = PALM_CENTER_POINTS
        .iter()
        .fold((0.0, 0.0), |(x, y), &i| (x + points[i].x, y + points[i].y));
    LandmarkPoint::new(x / n, y / n)
}

/// Pinch test normalized by palm width; false for a degenerate palm.
pub fn is_pinch(a: &LandmarkPoint, b: &LandmarkPoint, palm_width: f32, factor: f32) -> bool {
    if palm_width <= MIN_PALM_WIDTH {
        return false;
    }
    a.distance(b) < factor * palm_width
}

#[derive(Clone, Debug)]
pub struct GestureClassifier {
    ok_factor: f32,
    v_spread: f32,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl GestureClassifier {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            ok_factor: tuning.ok_factor,
            v_spread: tuning.v_spread,
        }
    }

    /// Strict OK: thumb tip against index tip only.
    pub fn is_strict_ok(&self, points: &Landmarks) -> bool {
        is_pinch(
            &points[lm::THUMB_TIP],
            &points[lm::INDEX_TIP],
            palm_width(points),
            self.ok_factor,
        )
    }

    pub fn classify(&self, points: &Landmarks) -> GestureKind {
        let states = finger_states(points);
        let [thumb, index, middle, ring, pinky] = states.map(|s| s.is_extended());

        // Order matters: finger combinations overlap, first match wins.
        if !thumb && !index && !middle && !ring && !pinky {
            GestureKind::Fist
        } else if index
            && middle
            && !ring
            && !pinky
            && points[lm::INDEX_TIP].distance(&points[lm::MIDDLE_TIP]) > self.v_spread
        {
            GestureKind::Victory
        } else if self.is_strict_ok(points) {
            GestureKind::Ok
        } else if index && !middle && !ring && !pinky && !thumb {
            GestureKind::IndexFinger
        } else if pinky && !index && !middle && !ring && !thumb {
            GestureKind::PinkyFinger
        } else if thumb && !index && !middle && !ring && !pinky {
            if points[lm::THUMB_TIP].y < points[lm::WRIST].y {
                GestureKind::ThumbUp
            } else {
                GestureKind::ThumbDown
            }
        } else {
            GestureKind::Unknown
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::landmarks::COUNT;

    /// Builds a right-hand pose in image coordinates around `(cx, cy)`.
    ///
    /// Extended fingers put the tip above the pip joint; folded ones below it.
    /// The thumb tip sits to the right of its joint when extended.
    pub(crate) fn pose(cx: f32, cy: f32, extended: [bool; 5]) -> Landmarks {
        let mut p = [LandmarkPoint::new(cx, cy); COUNT];
        p[lm::WRIST] = LandmarkPoint::new(cx, cy + 0.15);
        p[lm::INDEX_MCP] = LandmarkPoint::new(cx - 0.06, cy);
        p[lm::MIDDLE_MCP] = LandmarkPoint::new(cx - 0.02, cy);
        p[lm::RING_MCP] = LandmarkPoint::new(cx + 0.02, cy);
        p[lm::PINKY_MCP] = LandmarkPoint::new(cx + 0.06, cy);

        p[lm::THUMB_IP] = LandmarkPoint::new(cx - 0.10, cy + 0.05);
        p[lm::THUMB_TIP] = if extended[0] {
            LandmarkPoint::new(cx - 0.08, cy + 0.02)
        } else {
            LandmarkPoint::new(cx - 0.14, cy + 0.08)
        };

        let fingers = [
            (lm::INDEX_PIP, lm::INDEX_TIP, cx - 0.06),
            (lm::MIDDLE_PIP, lm::MIDDLE_TIP, cx - 0.02),
            (lm::RING_PIP, lm::RING_TIP, cx + 0.02),
            (lm::PINKY_PIP, lm::PINKY_TIP, cx + 0.06),
        ];
        for (finger, (pip, tip, x)) in fingers.into_iter().enumerate() {
            p[pip] = LandmarkPoint::new(x, cy - 0.05);
            p[tip] = if extended[finger + 1] {
                LandmarkPoint::new(x, cy - 0.12)
            } else {
                LandmarkPoint::new(x, cy - 0.01)
            };
        }
        p
    }

    /// Index extended with the thumb tip pressed against the index tip.
    pub(crate) fn ok_pose(cx: f32, cy: f32) -> Landmarks {
        let mut p = pose(cx, cy, [false, true, false, false, false]);
        let index_tip = p[lm::INDEX_TIP];
        p[lm::THUMB_IP] = LandmarkPoint::new(index_tip.x + 0.03, index_tip.y + 0.04);
        p[lm::THUMB_TIP] = LandmarkPoint::new(index_tip.x + 0.005, index_tip.y + 0.005);
        p
    }

    #[test]
    fn all_fingers_folded_is_fist() {
        let points = pose(0.5, 0.5, [false; 5]);
        assert_eq!(GestureClassifier::default().classify(&points), GestureKind::Fist);
    }

    #[test]
    fn spread_index_and_middle_is_victory() {
        let mut points = pose(0.5, 0.5, [false, true, true, false, false]);
        points[lm::INDEX_TIP].x -= 0.06;
        points[lm::MIDDLE_TIP].x += 0.06;
        assert_eq!(GestureClassifier::default().classify(&points), GestureKind::Victory);
    }

    #[test]
    fn closed_index_and_middle_is_not_victory() {
        let points = pose(0.5, 0.5, [false, true, true, false, false]);
        assert_eq!(GestureClassifier::default().classify(&points), GestureKind::Unknown);
    }

    #[test]
    fn pinch_overrides_lone_index() {
        let classifier = GestureClassifier::default();
        let points = ok_pose(0.5, 0.5);
        // The thumb reads as folded and only the index is up, yet the pinch wins.
        assert!(!finger_states(&points)[0].is_extended());
        assert_eq!(classifier.classify(&points), GestureKind::Ok);
    }

    #[test]
    fn single_fingers() {
        let classifier = GestureClassifier::default();
        let index = pose(0.5, 0.5, [false, true, false, false, false]);
        assert_eq!(classifier.classify(&index), GestureKind::IndexFinger);
        let pinky = pose(0.5, 0.5, [false, false, false, false, true]);
        assert_eq!(classifier.classify(&pinky), GestureKind::PinkyFinger);
    }

    #[test]
    fn thumb_direction_follows_wrist() {
        let classifier = GestureClassifier::default();
        let mut points = pose(0.5, 0.5, [true, false, false, false, false]);
        assert_eq!(classifier.classify(&points), GestureKind::ThumbUp);

        points[lm::THUMB_TIP].y = points[lm::WRIST].y + 0.05;
        assert_eq!(classifier.classify(&points), GestureKind::ThumbDown);
    }

    #[test]
    fn degenerate_palm_never_pinches() {
        let a = LandmarkPoint::new(0.5, 0.5);
        assert!(!is_pinch(&a, &a, 0.0, 0.35));
        assert!(!is_pinch(&a, &a, MIN_PALM_WIDTH, 0.35));
    }

    #[test]
    fn pinch_is_monotonic_in_distance() {
        let palm = 0.12;
        let anchor = LandmarkPoint::new(0.5, 0.5);
        let mut seen_pinch = false;
        for step in (0..=100).rev() {
            let other = LandmarkPoint::new(0.5 + step as f32 * 0.001, 0.5);
            let pinch = is_pinch(&anchor, &other, palm, 0.35);
            assert!(!(seen_pinch && !pinch), "pinch flipped back at step {step}");
            seen_pinch |= pinch;
        }
        assert!(seen_pinch);
    }

    #[test]
    fn palm_center_averages_wrist_and_bases() {
        let points = pose(0.5, 0.5, [false; 5]);
        let center = palm_center(&points);
        assert!((center.x - 0.5).abs() < 1e-6);
        assert!((center.y - 0.53).abs() < 1e-6);
    }
}
