use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::deck::Deck;
use crate::timeline::builder;

/// Approximate width of one character at the timeline label size, for
/// checking widths without a UI context.
const CHAR_WIDTH: f32 = 7.0;

/// Validate a deck manifest and summarize what the player would build.
pub fn run(file: &Path) -> Result<()> {
    let deck = Deck::load(file)?;
    let base = Deck::base_path(file);

    let model = builder::build(&deck.slides, |text| text.chars().count() as f32 * CHAR_WIDTH);

    println!(
        "{} {}",
        "Deck:".bold(),
        deck.title.as_deref().unwrap_or("(untitled)")
    );
    println!(
        "  {} slides, {} on the timeline",
        deck.slide_count(),
        model.segments.len()
    );

    let mut stages: Vec<&str> = Vec::new();
    for segment in &model.segments {
        if !stages.contains(&segment.stage.as_str()) {
            stages.push(&segment.stage);
        }
    }
    println!("  stages: {}", stages.join(", "));

    let mut missing = 0;
    for (index, slide) in deck.slides.iter().enumerate() {
        let mut assets: Vec<&str> = Vec::new();
        assets.extend(slide.image.as_deref());
        assets.extend(slide.audio.as_deref());
        if let Some(clip) = &slide.video {
            assets.extend(clip.poster.as_deref());
            assets.extend(clip.soundtrack.as_deref());
        }
        for asset in assets {
            let resolved = if Path::new(asset).is_absolute() {
                Path::new(asset).to_path_buf()
            } else {
                base.join(asset)
            };
            if !resolved.exists() {
                println!(
                    "  {} slide {}: missing {}",
                    "warning:".yellow().bold(),
                    index + 1,
                    asset
                );
                missing += 1;
            }
        }
    }

    if missing == 0 {
        println!("{}", "OK".green().bold());
    } else {
        println!("{} ({missing} missing assets)", "OK with warnings".yellow());
    }
    Ok(())
}
