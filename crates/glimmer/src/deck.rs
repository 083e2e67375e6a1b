use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::MIN_INTERVAL_MS;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Frame outline a slide's photo is clipped to. Assigned round-robin by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideShape {
    Circle,
    Hexagon,
    Heart,
    Diamond,
    Pentagon,
    Star,
}

impl SlideShape {
    pub const ALL: [SlideShape; 6] = [
        SlideShape::Circle,
        SlideShape::Hexagon,
        SlideShape::Heart,
        SlideShape::Diamond,
        SlideShape::Pentagon,
        SlideShape::Star,
    ];

    pub fn for_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Hexagon => "hexagon",
            Self::Heart => "heart",
            Self::Diamond => "diamond",
            Self::Pentagon => "pentagon",
            Self::Star => "star",
        }
    }
}

/// One photo in the deck. `index` is fixed at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub index: usize,
    pub image: PathBuf,
    pub caption: Option<String>,
}

impl Slide {
    pub fn shape(&self) -> SlideShape {
        SlideShape::for_index(self.index)
    }

    pub fn file_name(&self) -> String {
        self.image
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Deck {
    pub title: Option<String>,
    /// Auto-advance period requested by the deck file itself.
    pub interval_ms: Option<u64>,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Deserialize)]
struct DeckFile {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    interval_ms: Option<u64>,
    #[serde(default)]
    slides: Vec<DeckFileSlide>,
}

#[derive(Debug, Deserialize)]
struct DeckFileSlide {
    image: PathBuf,
    #[serde(default)]
    caption: Option<String>,
}

/// Load a deck from a directory of photos or a YAML deck file.
pub fn load(path: &Path) -> Result<Deck> {
    let deck = if path.is_dir() {
        load_dir(path)?
    } else {
        load_file(path)?
    };

    if deck.slides.is_empty() {
        anyhow::bail!("No slides found in {}", path.display());
    }
    debug!(slides = deck.slides.len(), path = %path.display(), "deck loaded");
    Ok(deck)
}

fn load_dir(dir: &Path) -> Result<Deck> {
    let mut paths = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let title = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string());

    Ok(Deck {
        title,
        interval_ms: None,
        slides: index_slides(paths.into_iter().map(|p| (p, None))),
    })
}

fn load_file(file: &Path) -> Result<Deck> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let parsed: DeckFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Invalid deck file {}", file.display()))?;
    if let Some(ms) = parsed.interval_ms.filter(|ms| *ms < MIN_INTERVAL_MS) {
        anyhow::bail!(
            "Invalid interval_ms {ms} in {}. Must be at least {MIN_INTERVAL_MS}.",
            file.display()
        );
    }

    let base = file.parent().unwrap_or(Path::new("."));
    let entries = parsed.slides.into_iter().map(|s| {
        let image = if s.image.is_absolute() {
            s.image
        } else {
            base.join(s.image)
        };
        let caption = s.caption.filter(|c| !c.trim().is_empty());
        (image, caption)
    });

    Ok(Deck {
        title: parsed.title,
        interval_ms: parsed.interval_ms,
        slides: index_slides(entries),
    })
}

fn index_slides(entries: impl Iterator<Item = (PathBuf, Option<String>)>) -> Vec<Slide> {
    entries
        .enumerate()
        .map(|(index, (image, caption))| Slide {
            index,
            image,
            caption,
        })
        .collect()
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_cycle() {
        assert_eq!(SlideShape::for_index(0), SlideShape::Circle);
        assert_eq!(SlideShape::for_index(5), SlideShape::Star);
        assert_eq!(SlideShape::for_index(6), SlideShape::Circle);
        assert_eq!(SlideShape::for_index(8).name(), "heart");
    }

    #[test]
    fn test_directory_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.JPG", "a.png", "notes.txt", "c.webp"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let deck = load(dir.path()).unwrap();
        let names: Vec<String> = deck.slides.iter().map(|s| s.file_name()).collect();
        assert_eq!(names, vec!["a.png", "b.JPG", "c.webp"]);
        assert_eq!(deck.slides[2].index, 2);
        assert!(deck.slides.iter().all(|s| s.caption.is_none()));
    }

    #[test]
    fn test_empty_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), b"hi").unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("No slides found"));
    }

    #[test]
    fn test_deck_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("birthday.yaml");
        std::fs::write(
            &file,
            "title: Happy Birthday\n\
             interval_ms: 4000\n\
             slides:\n\
             \x20 - image: photos/one.jpg\n\
             \x20   caption: At the beach\n\
             \x20 - image: /abs/two.png\n\
             \x20 - image: three.png\n\
             \x20   caption: \"  \"\n",
        )
        .unwrap();

        let deck = load(&file).unwrap();
        assert_eq!(deck.title.as_deref(), Some("Happy Birthday"));
        assert_eq!(deck.interval_ms, Some(4000));
        assert_eq!(deck.slides.len(), 3);
        assert_eq!(deck.slides[0].image, dir.path().join("photos/one.jpg"));
        assert_eq!(deck.slides[0].caption.as_deref(), Some("At the beach"));
        assert_eq!(deck.slides[1].image, PathBuf::from("/abs/two.png"));
        assert_eq!(deck.slides[2].caption, None);
    }

    #[test]
    fn test_deck_file_rejects_tiny_interval() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("fast.yaml");
        std::fs::write(&file, "interval_ms: 0\nslides:\n  - image: a.png\n").unwrap();
        let err = load(&file).unwrap_err();
        assert!(err.to_string().contains("Must be at least"));
    }

    #[test]
    fn test_deck_file_without_slides_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty.yaml");
        std::fs::write(&file, "title: Nothing here\n").unwrap();
        assert!(load(&file).is_err());
    }

    #[test]
    fn test_missing_deck_file_is_error() {
        let err = load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
