use super::TimelineModel;

/// Visual marks for the whole strip, derived from the current slide alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Marks {
    /// One flag per segment position; revealed segments have been passed or
    /// are current.
    pub revealed: Vec<bool>,
    /// Position of the single active segment, if any slide at or before the
    /// current one is eligible.
    pub active: Option<usize>,
}

/// Walk back from `current` to the nearest slide that owns a segment.
///
/// Returns the resolved slide index; callers check the mapping to see whether
/// even that index is eligible (it is not when every slide at or before
/// `current` is excluded).
pub fn resolve_target(current: usize, mapping: &[Option<usize>]) -> usize {
    let mut target = current;
    while target > 0 && mapping.get(target).copied().flatten().is_none() {
        target -= 1;
    }
    target
}

/// Compute the revealed/active marks for `current`.
///
/// Pure in (current, model): calling it twice yields identical marks.
pub fn marks(current: usize, model: &TimelineModel) -> Marks {
    let target = resolve_target(current, &model.mapping);
    let active = model.mapping.get(target).copied().flatten();

    let revealed = model
        .segments
        .iter()
        .map(|seg| seg.slide < target || (seg.slide == target && active.is_some()))
        .collect();

    Marks { revealed, active }
}

/// Scroll offset that centers the active segment in a container of the given
/// width, clamped to the scrollable range.
pub fn centering_offset(model: &TimelineModel, position: usize, container_width: f32) -> f32 {
    let max_scroll = (model.total_width() - container_width).max(0.0);
    (model.segment_center(position) - container_width / 2.0).clamp(0.0, max_scroll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::timeline::builder::build;

    fn model(yaml: &str) -> TimelineModel {
        let deck = Deck::parse(yaml).unwrap();
        build(&deck.slides, |_| 50.0)
    }

    fn five_slides_third_excluded() -> TimelineModel {
        model(
            "slides:\n  \
             - title: A\n  \
             - title: B\n  \
             - title: C\n    timeline: { include: false }\n  \
             - title: D\n  \
             - title: E\n",
        )
    }

    #[test]
    fn test_current_slide_is_active_and_revealed() {
        let m = five_slides_third_excluded();
        let marks = marks(1, &m);
        assert_eq!(marks.active, Some(1));
        assert_eq!(marks.revealed, vec![true, true, false, false]);
    }

    #[test]
    fn test_excluded_slide_falls_back_to_predecessor() {
        let m = five_slides_third_excluded();
        // Slide 2 is excluded: slide 1's segment goes active, slide 0's is
        // revealed only.
        let marks = marks(2, &m);
        assert_eq!(marks.active, Some(1));
        assert_eq!(marks.revealed, vec![true, true, false, false]);
    }

    #[test]
    fn test_idempotent() {
        let m = five_slides_third_excluded();
        assert_eq!(marks(3, &m), marks(3, &m));
    }

    #[test]
    fn test_no_eligible_predecessor_means_no_active() {
        let m = model(
            "slides:\n  \
             - timeline: { include: false }\n  \
             - timeline: { include: false }\n  \
             - title: C\n",
        );
        let marks = marks(1, &m);
        assert_eq!(marks.active, None);
        assert_eq!(marks.revealed, vec![false]);
    }

    #[test]
    fn test_last_slide_reveals_everything() {
        let m = five_slides_third_excluded();
        let marks = marks(4, &m);
        assert_eq!(marks.active, Some(3));
        assert!(marks.revealed.iter().all(|&r| r));
    }

    #[test]
    fn test_centering_offset_clamps() {
        let m = model(
            "slides:\n  \
             - timeline: { width: 100 }\n  \
             - timeline: { width: 100 }\n  \
             - timeline: { width: 100 }\n",
        );
        // First segment centers before the range start
        assert_eq!(centering_offset(&m, 0, 200.0), 0.0);
        // Last segment centers past the range end; total 300, container 200
        assert_eq!(centering_offset(&m, 2, 200.0), 100.0);
        // Middle segment centers exactly
        assert_eq!(centering_offset(&m, 1, 100.0), 100.0);
    }
}
