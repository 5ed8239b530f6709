use crate::deck::Slide;
use crate::deck::duration::duration_weight;

use super::{Segment, TimelineModel};

/// Horizontal padding on each side of a segment's measured content.
pub const SEGMENT_PADDING: f32 = 20.0;

/// Content-width floor per unit of duration weight, so long stages read wider
/// than their (possibly short) labels.
pub const BASE_SEGMENT_WIDTH: f32 = 40.0;

/// Derive the timeline from the slide list.
///
/// `measure` reports the rendered width of one line of text at the timeline
/// font; the view layer passes an egui galley measurement, tests pass a stub.
/// Excluded slides map to `None` and emit no segment. Rebuilding fully
/// replaces any prior model.
pub fn build(slides: &[Slide], measure: impl Fn(&str) -> f32) -> TimelineModel {
    let mut segments: Vec<Segment> = Vec::new();
    let mut mapping: Vec<Option<usize>> = Vec::with_capacity(slides.len());

    for (index, slide) in slides.iter().enumerate() {
        if !slide.timeline.include {
            mapping.push(None);
            continue;
        }

        let label = slide.timeline_label(index);
        let duration = slide.timeline.duration.clone().unwrap_or_default();
        let weight = duration_weight(&duration);

        let width = match slide.timeline.width {
            Some(w) => w,
            None => {
                let label_width = label
                    .lines()
                    .map(|line| measure(line))
                    .fold(0.0_f32, f32::max);
                let content = label_width
                    .max(measure(&duration))
                    .max(BASE_SEGMENT_WIDTH * weight);
                content + SEGMENT_PADDING * 2.0
            }
        };

        // The boundary dot belongs to the trailing edge of the earlier segment
        if let Some(last) = segments.last_mut() {
            last.trailing_dot = true;
        }

        mapping.push(Some(segments.len()));
        segments.push(Segment {
            slide: index,
            stage: slide.stage().to_string(),
            label,
            duration,
            weight,
            width,
            trailing_dot: false,
        });
    }

    TimelineModel { segments, mapping }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;

    fn fixed_measure(_: &str) -> f32 {
        50.0
    }

    fn deck(yaml: &str) -> Deck {
        Deck::parse(yaml).unwrap()
    }

    #[test]
    fn test_one_segment_per_eligible_slide() {
        let deck = deck(
            "slides:\n  \
             - title: A\n  \
             - title: B\n    timeline: { include: false }\n  \
             - title: C\n  \
             - title: D\n    timeline: { include: false }\n  \
             - title: E\n",
        );
        let model = build(&deck.slides, fixed_measure);

        assert_eq!(model.segments.len(), 3);
        let owners: Vec<usize> = model.segments.iter().map(|s| s.slide).collect();
        assert_eq!(owners, vec![0, 2, 4]);
        assert!(owners.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(model.mapping, vec![Some(0), None, Some(1), None, Some(2)]);
    }

    #[test]
    fn test_label_fallbacks() {
        let deck = deck(
            "slides:\n  \
             - timeline: { label: Intro }\n  \
             - title: Checkout\n  \
             - image: c.png\n",
        );
        let model = build(&deck.slides, fixed_measure);
        assert_eq!(model.segments[0].label, "Intro");
        assert_eq!(model.segments[1].label, "Checkout");
        assert_eq!(model.segments[2].label, "Slide 3");
    }

    #[test]
    fn test_explicit_width_is_verbatim() {
        let deck = deck("slides:\n  - timeline: { width: 150 }\n");
        let model = build(&deck.slides, fixed_measure);
        assert_eq!(model.segments[0].width, 150.0);
    }

    #[test]
    fn test_measured_width_adds_padding() {
        let deck = deck("slides:\n  - title: Browse\n");
        let model = build(&deck.slides, |_| 70.0);
        assert_eq!(model.segments[0].width, 70.0 + SEGMENT_PADDING * 2.0);
    }

    #[test]
    fn test_widest_label_line_wins() {
        let deck = deck("slides:\n  - timeline: { label: \"Browse\\n& discover\" }\n");
        // Measure by character count so the longer line dominates
        let model = build(&deck.slides, |s| s.len() as f32);
        let expected = "& discover".len() as f32 + SEGMENT_PADDING * 2.0;
        assert_eq!(model.segments[0].width, expected);
    }

    #[test]
    fn test_duration_weight_floors_content() {
        let deck = deck("slides:\n  - title: Go\n    timeline: { duration: 5 min }\n");
        let model = build(&deck.slides, |_| 10.0);
        assert_eq!(model.segments[0].weight, 2.0);
        assert_eq!(
            model.segments[0].width,
            BASE_SEGMENT_WIDTH * 2.0 + SEGMENT_PADDING * 2.0
        );
    }

    #[test]
    fn test_dots_trail_every_segment_but_last() {
        let deck = deck(
            "slides:\n  \
             - title: A\n  \
             - title: B\n    timeline: { include: false }\n  \
             - title: C\n  \
             - title: D\n",
        );
        let model = build(&deck.slides, fixed_measure);
        let dots: Vec<bool> = model.segments.iter().map(|s| s.trailing_dot).collect();
        assert_eq!(dots, vec![true, true, false]);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let deck = deck("slides:\n  - title: A\n  - title: B\n");
        let first = build(&deck.slides, fixed_measure);
        let second = build(&deck.slides, fixed_measure);
        assert_eq!(first.segments.len(), second.segments.len());
        assert_eq!(first.mapping, second.mapping);
        assert_eq!(first.total_width(), second.total_width());
    }

    #[test]
    fn test_all_excluded_yields_empty_model() {
        let deck = deck(
            "slides:\n  \
             - timeline: { include: false }\n  \
             - timeline: { include: false }\n",
        );
        let model = build(&deck.slides, fixed_measure);
        assert!(model.is_empty());
        assert_eq!(model.mapping, vec![None, None]);
    }

    #[test]
    fn test_segment_positions_accumulate() {
        let deck = deck(
            "slides:\n  \
             - timeline: { width: 100 }\n  \
             - timeline: { width: 60 }\n  \
             - timeline: { width: 80 }\n",
        );
        let model = build(&deck.slides, fixed_measure);
        assert_eq!(model.segment_left(0), 0.0);
        assert_eq!(model.segment_left(2), 160.0);
        assert_eq!(model.segment_center(1), 130.0);
        assert_eq!(model.total_width(), 240.0);
    }
}
