pub mod duration;

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A walkthrough deck: an ordered sequence of slides plus presentation-wide
/// metadata, loaded once from a YAML manifest. Slides are never created or
/// destroyed after load; all navigation state lives in the player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,

    #[serde(default)]
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Still image shown in the viewport (also the fallback poster for clips).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Clip>,

    /// Separate narration track, ignored when `use_video_audio` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,

    #[serde(default)]
    pub use_video_audio: bool,

    #[serde(default)]
    pub tap: TapPoint,

    #[serde(default)]
    pub timeline: TimelineMeta,
}

/// A screen-recording clip. Frame decoding is out of scope: the clip is a
/// poster image plus a playback clock, with the clip's own audio track as a
/// separate soundtrack file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,

    /// Playback length in seconds.
    pub duration: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soundtrack: Option<String>,
}

/// Where the tap indicator lands, in percent of the viewport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TapPoint {
    pub x: f32,
    pub y: f32,
}

impl Default for TapPoint {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    /// Explicit segment width in points; measured from content when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,

    /// Slides can opt out of the timeline; navigation still reaches them.
    #[serde(default = "default_include")]
    pub include: bool,
}

fn default_include() -> bool {
    true
}

impl Default for TimelineMeta {
    fn default() -> Self {
        Self {
            label: None,
            duration: None,
            stage: None,
            width: None,
            include: true,
        }
    }
}

impl Slide {
    /// Label shown on the slide's timeline segment: explicit label, else the
    /// slide title, else a synthesized `Slide N` (1-based).
    pub fn timeline_label(&self, index: usize) -> String {
        self.timeline
            .label
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| format!("Slide {}", index + 1))
    }

    pub fn stage(&self) -> &str {
        self.timeline.stage.as_deref().unwrap_or("default")
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }
}

impl Deck {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        let deck = Self::parse(&contents)?;
        if deck.slides.is_empty() {
            anyhow::bail!("No slides found in {}", path.display());
        }
        Ok(deck)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let deck: Deck = serde_yaml::from_str(contents)?;
        Ok(deck)
    }

    /// Directory all relative asset paths resolve against.
    pub fn base_path(deck_file: &Path) -> PathBuf {
        deck_file
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_tour_parses() {
        let contents = include_str!("../../../../sample-decks/product-tour.yaml");
        let deck = Deck::parse(contents).unwrap();
        assert_eq!(deck.theme.as_deref(), Some("dark"));
        assert!(
            deck.slides.len() >= 5,
            "Expected at least 5 slides, got {}",
            deck.slides.len()
        );
        // The checkout slide opts out of the timeline
        assert!(deck.slides.iter().any(|s| !s.timeline.include));
        // At least one slide carries a clip with its own audio
        assert!(
            deck.slides
                .iter()
                .any(|s| s.has_video() && s.use_video_audio)
        );
    }

    #[test]
    fn test_minimal_slide_defaults() {
        let deck = Deck::parse("slides:\n  - image: a.png\n").unwrap();
        let slide = &deck.slides[0];
        assert!(slide.timeline.include);
        assert_eq!(slide.stage(), "default");
        assert_eq!(slide.tap.x, 50.0);
        assert_eq!(slide.tap.y, 50.0);
        assert!(!slide.use_video_audio);
    }

    #[test]
    fn test_label_fallback_chain() {
        let deck = Deck::parse(
            "slides:\n  \
             - timeline: { label: Intro }\n  \
             - title: Checkout\n  \
             - image: c.png\n",
        )
        .unwrap();
        assert_eq!(deck.slides[0].timeline_label(0), "Intro");
        assert_eq!(deck.slides[1].timeline_label(1), "Checkout");
        assert_eq!(deck.slides[2].timeline_label(2), "Slide 3");
    }

    #[test]
    fn test_exclusion_flag() {
        let deck = Deck::parse("slides:\n  - timeline: { include: false }\n").unwrap();
        assert!(!deck.slides[0].timeline.include);
    }

    #[test]
    fn test_empty_deck_rejected_on_load() {
        let dir = std::env::temp_dir().join("walkdeck-empty-deck-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.yaml");
        std::fs::write(&path, "slides: []\n").unwrap();
        assert!(Deck::load(&path).is_err());
    }
}
