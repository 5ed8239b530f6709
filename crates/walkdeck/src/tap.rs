use std::time::{Duration, Instant};

/// One step of the tap animation: how long it holds and what the indicator
/// looks like while it does.
#[derive(Debug, Clone, Copy)]
pub struct TapStep {
    pub hold: Duration,
    pub visible: bool,
    pub pulsing: bool,
}

/// The forward-navigation tap animation, in order: the indicator appears and
/// travels to the tap point, presses, releases, then hides. 900 ms total
/// before the slide actually changes.
pub const TAP_STEPS: [TapStep; 3] = [
    TapStep {
        hold: Duration::from_millis(400),
        visible: true,
        pulsing: false,
    },
    TapStep {
        hold: Duration::from_millis(300),
        visible: true,
        pulsing: true,
    },
    TapStep {
        hold: Duration::from_millis(200),
        visible: true,
        pulsing: false,
    },
];

/// Indicator state at a moment in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapView {
    pub visible: bool,
    pub pulsing: bool,
    pub finished: bool,
}

/// A single run of the tap animation at a fixed viewport-relative position
/// (percent). Runs to completion once started; the navigation guard prevents
/// a second run from starting concurrently.
#[derive(Debug, Clone)]
pub struct TapSequence {
    /// Tap-reveal position in percent of the viewport.
    pub x: f32,
    pub y: f32,
    started: Instant,
}

impl TapSequence {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            started: Instant::now(),
        }
    }

    pub fn view(&self) -> TapView {
        Self::view_at(self.started.elapsed())
    }

    pub fn finished(&self) -> bool {
        self.view().finished
    }

    /// Walk the step list: the view of whichever step `elapsed` falls in,
    /// hidden and finished once past the end.
    pub fn view_at(elapsed: Duration) -> TapView {
        let mut end = Duration::ZERO;
        for step in TAP_STEPS {
            end += step.hold;
            if elapsed < end {
                return TapView {
                    visible: step.visible,
                    pulsing: step.pulsing,
                    finished: false,
                };
            }
        }
        TapView {
            visible: false,
            pulsing: false,
            finished: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> TapView {
        TapSequence::view_at(Duration::from_millis(ms))
    }

    #[test]
    fn test_total_latency_is_900ms() {
        let total: Duration = TAP_STEPS.iter().map(|s| s.hold).sum();
        assert_eq!(total, Duration::from_millis(900));
    }

    #[test]
    fn test_phase_boundaries() {
        // Approach: visible, no pulse
        assert_eq!(
            at(0),
            TapView {
                visible: true,
                pulsing: false,
                finished: false
            }
        );
        assert!(!at(399).pulsing);
        // Press: pulse on at 400ms
        assert!(at(400).pulsing);
        assert!(at(699).pulsing);
        // Release: pulse off at 700ms, still visible
        let release = at(700);
        assert!(release.visible && !release.pulsing && !release.finished);
        // Hidden and finished at 900ms
        let done = at(900);
        assert!(!done.visible && done.finished);
    }

    #[test]
    fn test_live_sequence_starts_visible() {
        let seq = TapSequence::new(50.0, 80.0);
        let view = seq.view();
        assert!(view.visible);
        assert!(!view.finished);
        assert!(!seq.finished());
    }
}
