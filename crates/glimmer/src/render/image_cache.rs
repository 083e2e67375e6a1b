use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eframe::egui;
use tracing::warn;

/// Largest texture edge uploaded to the GPU; bigger photos are downscaled first.
const MAX_TEXTURE_EDGE: u32 = 2048;

/// Lazily decoded slide photos, keyed by path. Failures are remembered so a
/// broken file is only reported once.
pub struct ImageCache {
    textures: RefCell<HashMap<PathBuf, Option<egui::TextureHandle>>>,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCache {
    pub fn new() -> Self {
        Self {
            textures: RefCell::new(HashMap::new()),
        }
    }

    pub fn get_or_load(&self, ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.textures.borrow().get(path) {
            return cached.clone();
        }

        let texture = match decode(path) {
            Ok(image) => Some(ctx.load_texture(
                path.to_string_lossy(),
                image,
                egui::TextureOptions::LINEAR,
            )),
            Err(e) => {
                warn!(path = %path.display(), "could not load slide photo: {e}");
                None
            }
        };
        self.textures
            .borrow_mut()
            .insert(path.to_path_buf(), texture.clone());
        texture
    }
}

fn decode(path: &Path) -> anyhow::Result<egui::ColorImage> {
    let mut image = image::open(path)?;
    if image.width() > MAX_TEXTURE_EDGE || image.height() > MAX_TEXTURE_EDGE {
        image = image.thumbnail(MAX_TEXTURE_EDGE, MAX_TEXTURE_EDGE);
    }
    let rgba = image.into_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        rgba.as_flat_samples().as_slice(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_decode_downscales_large_photos() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::from_pixel(4096, 1024, Rgb([1, 2, 3]))
            .save(&path)
            .unwrap();
        let image = decode(&path).unwrap();
        assert_eq!(image.size, [2048, 512]);
    }

    #[test]
    fn test_failed_load_is_remembered() {
        let ctx = egui::Context::default();
        let cache = ImageCache::new();
        let missing = Path::new("/definitely/not/here.png");
        assert!(cache.get_or_load(&ctx, missing).is_none());
        assert!(cache.textures.borrow().contains_key(missing));
        assert!(cache.get_or_load(&ctx, missing).is_none());
    }
}
