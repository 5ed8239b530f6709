use crate::deck::{Deck, Slide};
use crate::media::{MediaPlayer, PlaybackToggle};
use crate::tap::TapSequence;
use crate::timeline::TimelineModel;
use crate::timeline::sync::{self, Marks};

/// An in-flight navigation. While one exists the machine is `Transitioning`
/// and every further request is dropped, never queued.
struct Transition {
    to: usize,
    /// Forward navigation runs the tap animation to completion first;
    /// previous/jump commit immediately.
    tap: Option<TapSequence>,
}

/// The slide navigation state machine and owner of all session state: the
/// current slide index, the transition guard, the media controller and the
/// timeline model with its marks. The index is the single source of truth;
/// view markers derive from it, never the reverse.
pub struct Player {
    deck: Deck,
    current: usize,
    transition: Option<Transition>,
    media: MediaPlayer,
    timeline: TimelineModel,
    marks: Marks,
}

impl Player {
    pub fn new(deck: Deck, media: MediaPlayer, timeline: TimelineModel, start: usize) -> Self {
        let current = start.min(deck.slide_count().saturating_sub(1));
        let marks = sync::marks(current, &timeline);
        Self {
            deck,
            current,
            transition: None,
            media,
            timeline,
            marks,
        }
    }

    /// Start media for the initial slide. Called once after construction.
    pub fn begin(&mut self) {
        self.media.play(self.current, &self.deck.slides[self.current]);
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slide(&self) -> &Slide {
        &self.deck.slides[self.current]
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn slide_count(&self) -> usize {
        self.deck.slide_count()
    }

    pub fn timeline(&self) -> &TimelineModel {
        &self.timeline
    }

    pub fn marks(&self) -> &Marks {
        &self.marks
    }

    pub fn media(&self) -> &MediaPlayer {
        &self.media
    }

    pub fn transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// The tap animation currently running, if any (for rendering).
    pub fn tap(&self) -> Option<&TapSequence> {
        self.transition.as_ref().and_then(|t| t.tap.as_ref())
    }

    pub fn on_first_slide(&self) -> bool {
        self.current == 0
    }

    pub fn next_index(&self) -> usize {
        (self.current + 1) % self.deck.slide_count()
    }

    pub fn prev_index(&self) -> usize {
        (self.current + self.deck.slide_count() - 1) % self.deck.slide_count()
    }

    /// Forward navigation: run the tap animation on the current slide, then
    /// advance (wrapping). Dropped while a transition is in flight.
    pub fn advance_next(&mut self) {
        if self.transition.is_some() {
            return;
        }
        let tap = self.slide().tap;
        self.transition = Some(Transition {
            to: self.next_index(),
            tap: Some(TapSequence::new(tap.x, tap.y)),
        });
    }

    /// Backward navigation commits immediately, without the tap animation.
    pub fn advance_previous(&mut self) -> Option<usize> {
        if self.transition.is_some() {
            return None;
        }
        Some(self.commit(self.prev_index()))
    }

    /// Direct navigation from a segment click or the keyboard: immediate,
    /// same guard, same stop-old/start-new ordering.
    pub fn jump_to(&mut self, index: usize) -> Option<usize> {
        if self.transition.is_some() || index >= self.deck.slide_count() {
            return None;
        }
        Some(self.commit(index))
    }

    /// Drive pending work: finish a ripe transition, and let a finished clip
    /// auto-advance if its slide is still the current one. Returns the newly
    /// current index when a navigation committed.
    pub fn tick(&mut self) -> Option<usize> {
        if let Some(t) = &self.transition {
            let ripe = t.tap.as_ref().is_none_or(|tap| tap.finished());
            if ripe {
                let to = self.transition.take().map(|t| t.to).unwrap_or(self.current);
                return Some(self.commit(to));
            }
            return None;
        }

        if let Some(owner) = self.media.poll_finished() {
            if owner == self.current {
                self.advance_next();
            }
        }
        None
    }

    /// Visibility collaborator: the widget scrolled out of view (window
    /// unfocused or minimized). Stops media, leaves `current` alone.
    pub fn stop_media(&mut self) {
        self.media.stop();
    }

    /// Viewport click on a slide with a clip: toggle playback instead of
    /// navigating.
    pub fn toggle_playback(&mut self) -> Option<PlaybackToggle> {
        self.media.toggle()
    }

    /// Swap in a freshly loaded deck and rebuilt timeline (hot reload),
    /// keeping the current index where possible.
    pub fn reload(&mut self, deck: Deck, timeline: TimelineModel) {
        self.media.stop();
        self.transition = None;
        self.deck = deck;
        self.timeline = timeline;
        self.current = self.current.min(self.deck.slide_count().saturating_sub(1));
        self.marks = sync::marks(self.current, &self.timeline);
        self.media.play(self.current, &self.deck.slides[self.current]);
    }

    /// Ordering is load-bearing: stop the old slide's media, then move the
    /// pointer, then re-derive the marks and start the new slide's media.
    fn commit(&mut self, to: usize) -> usize {
        self.media.stop();
        self.current = to;
        self.marks = sync::marks(self.current, &self.timeline);
        self.media.play(self.current, &self.deck.slides[self.current]);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::builder;
    use std::path::PathBuf;
    use std::time::Duration;

    fn make_player(yaml: &str) -> Player {
        let deck = Deck::parse(yaml).unwrap();
        let media = MediaPlayer::new(PathBuf::from("."), true);
        let timeline = builder::build(&deck.slides, |_| 50.0);
        Player::new(deck, media, timeline, 0)
    }

    const THREE_SLIDES: &str = "slides:\n  - title: A\n  - title: B\n  - title: C\n";

    #[test]
    fn test_previous_wraps_to_last() {
        let mut player = make_player(THREE_SLIDES);
        assert_eq!(player.advance_previous(), Some(2));
        assert_eq!(player.current(), 2);
        assert!(!player.on_first_slide());
    }

    #[test]
    fn test_jump_navigates_and_resyncs() {
        let mut player = make_player(THREE_SLIDES);
        assert_eq!(player.jump_to(2), Some(2));
        assert_eq!(player.marks().active, Some(2));
        assert!(player.jump_to(9).is_none());
    }

    #[test]
    fn test_next_is_guarded_and_wraps() {
        let mut player = make_player(THREE_SLIDES);
        player.jump_to(2);

        player.advance_next();
        assert!(player.transitioning());
        // Re-entrant requests of any kind are dropped, not queued
        player.advance_next();
        assert!(player.advance_previous().is_none());
        assert!(player.jump_to(1).is_none());
        assert_eq!(player.current(), 2);

        // Not ripe before the 900ms tap sequence completes
        assert_eq!(player.tick(), None);
        std::thread::sleep(Duration::from_millis(950));

        // Exactly one slide change, wrapping to the first slide
        assert_eq!(player.tick(), Some(0));
        assert_eq!(player.current(), 0);
        assert!(!player.transitioning());
        assert_eq!(player.tick(), None);
    }

    #[test]
    fn test_clip_end_auto_advances_current_slide_only() {
        let mut player = make_player(
            "slides:\n  \
             - title: A\n    video: { duration: 0 }\n  \
             - title: B\n",
        );
        player.begin();

        // The zero-length clip finishes immediately and requests an advance,
        // which runs the tap sequence before committing
        assert_eq!(player.tick(), None);
        assert!(player.transitioning());
        assert_eq!(player.current(), 0);

        std::thread::sleep(Duration::from_millis(950));
        assert_eq!(player.tick(), Some(1));
        assert_eq!(player.current(), 1);
        // Slide B has no clip: the old session is gone, nothing fires again
        assert!(player.media().session().is_none());
        assert_eq!(player.tick(), None);
    }

    #[test]
    fn test_entering_next_slide_swaps_the_session() {
        let mut player = make_player(
            "slides:\n  \
             - title: A\n    video: { duration: 30 }\n  \
             - title: B\n    video: { duration: 30 }\n",
        );
        player.begin();
        assert_eq!(player.media().session().unwrap().slide, 0);

        player.jump_to(1);
        // At most one session exists; it belongs to the new slide
        let session = player.media().session().unwrap();
        assert_eq!(session.slide, 1);
        assert!(!session.is_paused());
    }

    #[test]
    fn test_visibility_stop_keeps_current() {
        let mut player = make_player(
            "slides:\n  - title: A\n    video: { duration: 30 }\n  - title: B\n",
        );
        player.begin();
        player.stop_media();
        assert!(player.media().session().is_none());
        assert_eq!(player.current(), 0);
    }

    #[test]
    fn test_toggle_without_clip_is_noop() {
        let mut player = make_player(THREE_SLIDES);
        player.begin();
        assert!(player.toggle_playback().is_none());
    }

    #[test]
    fn test_reload_clamps_current() {
        let mut player = make_player(THREE_SLIDES);
        player.jump_to(2);

        let smaller = Deck::parse("slides:\n  - title: Only\n").unwrap();
        let timeline = builder::build(&smaller.slides, |_| 50.0);
        player.reload(smaller, timeline);
        assert_eq!(player.current(), 0);
        assert_eq!(player.marks().active, Some(0));
    }
}
