use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use eframe::egui;

/// Lazy texture cache for slide stills and clip posters.
///
/// Paths resolve against the deck file's directory. A file that fails to
/// load is cached as absent so the warning fires once, and the slide simply
/// renders without an image.
pub struct ImageCache {
    base_path: PathBuf,
    cache: RefCell<HashMap<String, Option<egui::TextureHandle>>>,
}

impl ImageCache {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn get(&self, ctx: &egui::Context, path: &str) -> Option<egui::TextureHandle> {
        if let Some(entry) = self.cache.borrow().get(path) {
            return entry.clone();
        }
        let loaded = self.load(ctx, path);
        self.cache
            .borrow_mut()
            .insert(path.to_string(), loaded.clone());
        loaded
    }

    /// Drop every cached texture (deck reload).
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    fn load(&self, ctx: &egui::Context, path: &str) -> Option<egui::TextureHandle> {
        let full = if std::path::Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.base_path.join(path)
        };

        let image = match image::open(&full) {
            Ok(img) => img.into_rgba8(),
            Err(e) => {
                tracing::warn!("Failed to load image {}: {e}", full.display());
                return None;
            }
        };

        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        Some(ctx.load_texture(path.to_string(), color_image, egui::TextureOptions::LINEAR))
    }
}
