//! Receipt image viewer state
//!
//! Pure local state over an expense's already-fetched image paths: which
//! image is shown, zoom level, fullscreen.

use crate::session::AppContext;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageViewer {
    images: Vec<String>,
    index: usize,
    zoom: f64,
    fullscreen: bool,
    loading: bool,
}

impl Default for ImageViewer {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            index: 0,
            zoom: 1.0,
            fullscreen: false,
            loading: false,
        }
    }
}

impl ImageViewer {
    /// Viewer positioned on the first image
    pub fn new(images: Vec<String>) -> Self {
        let loading = !images.is_empty();
        Self {
            images,
            loading,
            ..Self::default()
        }
    }

    /// Reset to the initial state and drop the images
    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mark the current image as displayed
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    pub fn next(&mut self) {
        if self.images.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.images.len();
        self.loading = true;
    }

    pub fn previous(&mut self) {
        if self.images.is_empty() {
            return;
        }
        self.index = (self.index + self.images.len() - 1) % self.images.len();
        self.loading = true;
    }

    /// Jump straight to an image; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.images.len() {
            return false;
        }
        self.index = index;
        self.loading = true;
        true
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Toggling either way resets zoom
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        self.zoom = 1.0;
    }

    pub fn current_path(&self) -> Option<&str> {
        self.images.get(self.index).map(String::as_str)
    }

    /// Public URL of the current image
    pub fn current_url(&self, ctx: &AppContext) -> Option<String> {
        self.current_path()
            .map(|path| ctx.backend().public_url(ctx.bills_bucket(), path))
    }

    /// "2/5"
    pub fn position_label(&self) -> String {
        if self.images.is_empty() {
            return "0/0".to_string();
        }
        format!("{}/{}", self.index + 1, self.images.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use std::sync::Arc;

    fn viewer(n: usize) -> ImageViewer {
        ImageViewer::new((0..n).map(|i| format!("u/{}.png", i)).collect())
    }

    #[test]
    fn test_next_wraps() {
        let mut v = viewer(3);
        v.select(2);
        v.next();
        assert_eq!(v.index(), 0);
        assert_eq!(v.position_label(), "1/3");
    }

    #[test]
    fn test_previous_wraps() {
        let mut v = viewer(3);
        v.previous();
        assert_eq!(v.index(), 2);
    }

    #[test]
    fn test_navigation_sets_loading() {
        let mut v = viewer(2);
        assert!(v.is_loading());
        v.finish_loading();
        assert!(!v.is_loading());
        v.next();
        assert!(v.is_loading());
    }

    #[test]
    fn test_select_out_of_range() {
        let mut v = viewer(2);
        assert!(!v.select(5));
        assert_eq!(v.index(), 0);
        assert!(v.select(1));
        assert_eq!(v.current_path(), Some("u/1.png"));
    }

    #[test]
    fn test_zoom_bounds() {
        let mut v = viewer(1);
        for _ in 0..12 {
            v.zoom_in();
        }
        assert_eq!(v.zoom(), MAX_ZOOM);

        for _ in 0..12 {
            v.zoom_out();
        }
        assert_eq!(v.zoom(), MIN_ZOOM);
        assert_eq!(v.zoom_percent(), 50);
    }

    #[test]
    fn test_fullscreen_resets_zoom() {
        let mut v = viewer(1);
        v.zoom_in();
        v.toggle_fullscreen();
        assert!(v.is_fullscreen());
        assert_eq!(v.zoom(), 1.0);

        v.zoom_out();
        v.toggle_fullscreen();
        assert!(!v.is_fullscreen());
        assert_eq!(v.zoom(), 1.0);
    }

    #[test]
    fn test_close_resets() {
        let mut v = viewer(3);
        v.next();
        v.zoom_in();
        v.toggle_fullscreen();
        v.close();

        assert_eq!(v, ImageViewer::default());
        assert_eq!(v.index(), 0);
        assert_eq!(v.zoom(), 1.0);
        assert!(!v.is_fullscreen());
    }

    #[test]
    fn test_empty_viewer() {
        let mut v = ImageViewer::new(Vec::new());
        v.next();
        v.previous();
        assert_eq!(v.position_label(), "0/0");
        assert!(v.current_path().is_none());
    }

    #[test]
    fn test_current_url() {
        let ctx = AppContext::new(Arc::new(MemoryBackend::new()));
        let v = viewer(1);
        assert_eq!(
            v.current_url(&ctx).unwrap(),
            "http://localhost:54321/storage/v1/object/public/bills/u/0.png"
        );
    }
}
