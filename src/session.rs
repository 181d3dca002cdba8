use crate::{
    config::{Bindings, Config},
    dispatch::Dispatcher,
    gesture::{GestureClassifier, palm_center},
    pipeline::sink::{CommandSink, deliver},
    scrub::{ScrubController, ScrubDirection},
    smoothing::HandSmoother,
    tap::{TapDetector, TapState},
    types::{GestureKind, Handedness, LandmarkFrame, LandmarkPoint, MediaCommand, PerHand},
    vote::Vote,
};

#[derive(Clone, Debug, PartialEq)]
pub struct HandReport {
    pub handedness: Handedness,
    pub gesture: GestureKind,
    pub palm_center: LandmarkPoint,
    pub ok_voted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatched {
    pub command: MediaCommand,
    pub delivered: bool,
}

impl Dispatched {
    pub fn status_text(&self) -> String {
        if self.delivered {
            format!("sent: {}", self.command.status_text())
        } else {
            "sent: FAILED".to_string()
        }
    }
}

/// Per-frame outcome. Counters are read after the end-of-frame countdown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub hands: Vec<HandReport>,
    /// Label of the last hand in detector order.
    pub gesture: Option<GestureKind>,
    pub scrubbing: bool,
    pub scrub_direction: Option<ScrubDirection>,
    pub gate_open: bool,
    pub grace: u32,
    pub dispatched: Vec<Dispatched>,
}

/// All interaction state, owned by the frame loop.
pub struct Session {
    classifier: GestureClassifier,
    smoother: HandSmoother,
    votes: PerHand<Vote>,
    taps: PerHand<TapState>,
    tap_detector: TapDetector,
    scrub: ScrubController,
    dispatcher: Dispatcher,
    bindings: Bindings,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let tuning = &config.tuning;
        let vote = Vote::new(tuning.vote_window, tuning.vote_min_ok);
        Self {
            classifier: GestureClassifier::new(tuning),
            smoother: HandSmoother::new(tuning.ema_alpha),
            votes: PerHand {
                left: vote.clone(),
                right: vote,
            },
            taps: PerHand::default(),
            tap_detector: TapDetector::new(tuning),
            scrub: ScrubController::new(tuning),
            dispatcher: Dispatcher::new(tuning, config.activity_gate),
            bindings: config.bindings.clone(),
        }
    }

    pub fn process(&mut self, frame: &LandmarkFrame, sink: &mut dyn CommandSink) -> FrameReport {
        // Gate state as of the previous frame; scrub entry below only affects later frames.
        let taps_enabled = self.dispatcher.actions_enabled(self.scrub.is_active());

        let mut report = FrameReport::default();
        let mut commands = Vec::new();
        let mut ok_palms: PerHand<Option<LandmarkPoint>> = PerHand::default();

        for hand in &frame.hands {
            let points = self.smoother.apply(hand.handedness, &hand.landmarks);
            let gesture = self.classifier.classify(&points);
            let center = palm_center(&points);

            let mut ok_voted = false;
            if let Some(vote) = self.votes.get_mut(hand.handedness) {
                vote.mark(self.classifier.is_strict_ok(&points));
                if vote.ok() {
                    ok_voted = true;
                    if let Some(slot) = ok_palms.get_mut(hand.handedness) {
                        *slot = Some(center);
                    }
                }
            }

            // A closed fist brings every fingertip near the thumb.
            if gesture != GestureKind::Fist {
                if let Some(tap) = self.taps.get_mut(hand.handedness) {
                    commands.extend(self.tap_detector.update(tap, &points, taps_enabled));
                }
            }

            report.gesture = Some(gesture);
            report.hands.push(HandReport {
                handedness: hand.handedness,
                gesture,
                palm_center: center,
                ok_voted,
            });
        }

        let both_ok = match (ok_palms.left, ok_palms.right) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => None,
        };
        if both_ok.is_some() {
            self.dispatcher.enter_scrub();
        }
        commands.extend(self.scrub.update(both_ok));

        let in_scrub = self.scrub.is_active();
        if let Some(gesture) = report.gesture {
            commands.extend(self.dispatcher.dispatch(gesture, in_scrub));
        }

        for command in commands {
            let delivered = deliver(sink, self.bindings.for_command(command));
            if delivered {
                log::info!("{command:?} sent");
            } else {
                log::warn!("{command:?} could not be delivered");
            }
            report.dispatched.push(Dispatched { command, delivered });
        }

        self.dispatcher.tick(in_scrub);
        self.scrub.tick();

        report.scrubbing = in_scrub;
        report.scrub_direction = self.scrub.direction();
        report.gate_open = self.dispatcher.gate_open();
        report.grace = self.dispatcher.grace();
        report
    }
}
