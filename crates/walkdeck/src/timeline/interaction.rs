/// Pointer travel (in points) past which a press on the strip stops being a
/// potential click and becomes a confirmed drag.
pub const DRAG_THRESHOLD: f32 = 5.0;

/// Dead zone before the edge indicators light up.
pub const SCROLL_EDGE_EPSILON: f32 = 10.0;

/// One press-to-release interaction on the strip.
///
/// A gesture starts `Pending` (might still be a click on a segment) and is
/// promoted to `Dragging` once the pointer travels past the threshold; a
/// release from `Dragging` never navigates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Gesture {
    #[default]
    Idle,
    Pending { origin_x: f32, origin_scroll: f32 },
    Dragging { origin_x: f32, origin_scroll: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEnd {
    /// Released without dragging; a segment under the pointer may navigate.
    Click,
    /// Released after dragging; any click is suppressed by policy.
    Drag,
}

/// Scroll and gesture state for the timeline strip.
#[derive(Debug, Default)]
pub struct StripState {
    pub offset: f32,
    /// Smooth-scroll destination while centering the active segment.
    smooth_target: Option<f32>,
    gesture: Gesture,
    pub can_scroll_left: bool,
    pub can_scroll_right: bool,
}

impl StripState {
    pub fn begin_gesture(&mut self, x: f32) {
        self.gesture = Gesture::Pending {
            origin_x: x,
            origin_scroll: self.offset,
        };
        // A grab interrupts any centering animation in flight
        self.smooth_target = None;
    }

    /// Pan with the pointer: `offset = origin_scroll + (origin_x − x)`.
    pub fn drag_to(&mut self, x: f32, max_scroll: f32) {
        let (origin_x, origin_scroll) = match self.gesture {
            Gesture::Idle => return,
            Gesture::Pending { origin_x, origin_scroll }
            | Gesture::Dragging { origin_x, origin_scroll } => (origin_x, origin_scroll),
        };

        if (origin_x - x).abs() > DRAG_THRESHOLD {
            self.gesture = Gesture::Dragging { origin_x, origin_scroll };
        }

        self.offset = (origin_scroll + (origin_x - x)).clamp(0.0, max_scroll.max(0.0));
        self.update_indicators(max_scroll);
    }

    pub fn end_gesture(&mut self) -> Option<GestureEnd> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => None,
            Gesture::Pending { .. } => Some(GestureEnd::Click),
            Gesture::Dragging { .. } => Some(GestureEnd::Drag),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Ask for a smooth scroll to `target` (usually a centering offset).
    pub fn scroll_towards(&mut self, target: f32, max_scroll: f32) {
        self.smooth_target = Some(target.clamp(0.0, max_scroll.max(0.0)));
    }

    pub fn jump_to_start(&mut self) {
        self.offset = 0.0;
        self.smooth_target = None;
    }

    /// Advance the centering animation one frame. Returns true while still
    /// moving (callers keep repainting).
    pub fn animate(&mut self, max_scroll: f32) -> bool {
        let Some(target) = self.smooth_target else {
            return false;
        };
        let diff = target - self.offset;
        let moving = if diff.abs() < 0.5 {
            self.offset = target;
            self.smooth_target = None;
            false
        } else {
            self.offset += diff * 0.15;
            true
        };
        self.update_indicators(max_scroll);
        moving
    }

    /// Recompute the edge indicators from the scroll position.
    pub fn update_indicators(&mut self, max_scroll: f32) {
        self.can_scroll_left = self.offset > SCROLL_EDGE_EPSILON;
        self.can_scroll_right = self.offset < max_scroll - SCROLL_EDGE_EPSILON;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release_is_a_click() {
        let mut strip = StripState::default();
        strip.begin_gesture(100.0);
        assert_eq!(strip.end_gesture(), Some(GestureEnd::Click));
    }

    #[test]
    fn test_small_jitter_stays_a_click() {
        let mut strip = StripState::default();
        strip.begin_gesture(100.0);
        strip.drag_to(103.0, 500.0);
        assert!(!strip.is_dragging());
        assert_eq!(strip.end_gesture(), Some(GestureEnd::Click));
    }

    #[test]
    fn test_drag_pans_and_suppresses_click() {
        let mut strip = StripState::default();
        strip.begin_gesture(200.0);
        // Pointer moves 50 units left: content scrolls 50 units right
        strip.drag_to(150.0, 500.0);
        assert!(strip.is_dragging());
        assert_eq!(strip.offset, 50.0);
        assert_eq!(strip.end_gesture(), Some(GestureEnd::Drag));
        // The gesture is over; a fresh press starts clean
        assert!(!strip.gesture_active());
    }

    #[test]
    fn test_drag_clamps_to_scroll_range() {
        let mut strip = StripState::default();
        strip.begin_gesture(100.0);
        strip.drag_to(400.0, 500.0);
        assert_eq!(strip.offset, 0.0);
        strip.drag_to(-1000.0, 500.0);
        assert_eq!(strip.offset, 500.0);
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut strip = StripState::default();
        assert_eq!(strip.end_gesture(), None);
    }

    #[test]
    fn test_indicators_use_dead_zone() {
        let mut strip = StripState::default();
        strip.update_indicators(300.0);
        assert!(!strip.can_scroll_left);
        assert!(strip.can_scroll_right);

        strip.offset = 150.0;
        strip.update_indicators(300.0);
        assert!(strip.can_scroll_left);
        assert!(strip.can_scroll_right);

        strip.offset = 295.0;
        strip.update_indicators(300.0);
        assert!(strip.can_scroll_left);
        assert!(!strip.can_scroll_right);
    }

    #[test]
    fn test_no_overflow_means_no_indicators() {
        let mut strip = StripState::default();
        strip.update_indicators(0.0);
        assert!(!strip.can_scroll_left);
        assert!(!strip.can_scroll_right);
    }

    #[test]
    fn test_animate_converges_on_target() {
        let mut strip = StripState::default();
        strip.scroll_towards(100.0, 200.0);
        let mut frames = 0;
        while strip.animate(200.0) {
            frames += 1;
            assert!(frames < 1000, "centering animation never settled");
        }
        assert_eq!(strip.offset, 100.0);
    }

    #[test]
    fn test_grab_cancels_centering() {
        let mut strip = StripState::default();
        strip.scroll_towards(100.0, 200.0);
        strip.begin_gesture(50.0);
        assert!(!strip.animate(200.0));
        assert_eq!(strip.offset, 0.0);
    }
}
