use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::color::Rgb;
use crate::config::Config;
use crate::deck::{self, Deck};
use crate::sampler::{ColorCache, ColorSampler};
use crate::theme::Theme;

#[derive(Debug, Serialize)]
struct PaletteEntry {
    index: usize,
    file: String,
    shape: &'static str,
    color: Option<String>,
    accent: String,
    brightness: f32,
    light: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(path: &Path, json: bool) -> Result<()> {
    let deck = deck::load(path)?;
    let accent = Config::load_or_default().resolved().theme_color;
    let theme = Theme::night().with_default_accent(accent);
    let entries = sample_deck(&deck, &theme);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let sampled = entries.iter().filter(|e| e.color.is_some()).count();
    println!(
        "{} {} ({} of {} slides sampled)",
        "Palette for".bold(),
        path.display(),
        sampled,
        entries.len()
    );
    println!();
    for entry in &entries {
        let shade = if entry.light { "light" } else { "dark" };
        let swatch = match entry.color {
            Some(ref hex) => hex.normal(),
            None => format!("{} (fallback)", entry.accent).yellow(),
        };
        println!(
            "  {:>3}  {:<28} {:<9} {}  brightness {:>5.1} {}",
            entry.index + 1,
            entry.file,
            entry.shape,
            swatch,
            entry.brightness,
            shade.dimmed()
        );
        if let Some(ref e) = entry.error {
            println!("       {}", e.red());
        }
    }
    Ok(())
}

fn sample_deck(deck: &Deck, theme: &Theme) -> Vec<PaletteEntry> {
    let mut cache = ColorCache::new(deck.slides.len());
    let mut errors: Vec<Option<String>> = vec![None; deck.slides.len()];

    let finished = ColorSampler::schedule(&deck.slides, Instant::now(), Duration::ZERO).finish();
    for (index, outcome) in finished {
        if let (Err(e), Some(slot)) = (&outcome, errors.get_mut(index)) {
            *slot = Some(e.to_string());
        }
        cache.record(index, outcome);
    }
    debug_assert_eq!(cache.settled_count(), cache.len());

    deck.slides
        .iter()
        .map(|slide| {
            let sampled = cache.get(slide.index);
            let palette = theme.palette_for(sampled);
            let accent: Rgb = palette.accent;
            PaletteEntry {
                index: slide.index,
                file: slide.file_name(),
                shape: slide.shape().name(),
                color: sampled.map(|c| c.to_hex()),
                accent: accent.to_hex(),
                brightness: palette.brightness,
                light: accent.is_light(),
                error: if cache.is_absent(slide.index) {
                    errors[slide.index].take()
                } else {
                    None
                },
            }
        })
        .collect()
}
