//! Screen-space description handed to the engine by the rendering layer.
//!
//! The renderer owns the camera; the engine only reads the viewport size to
//! derive the aspect correction and uses the screen→simulation transform when
//! particles are placed by dragging.

use particle_life_data::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Drawable width in pixels.
    pub width: f64,
    /// Drawable height in pixels.
    pub height: f64,
    /// Simulation-space point shown at the center of the screen.
    pub camera: Vec2,
    /// Screen pixels per simulation unit, relative to fitting `[0, 1]`.
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(900.0, 700.0)
    }
}

impl Viewport {
    /// Unzoomed viewport showing exactly `[0, 1]²`.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            camera: Vec2::new(0.5, 0.5),
            zoom: 1.0,
        }
    }

    /// Zero-sized (e.g. minimized) windows make the tick a no-op.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Whether [`screen_to_sim`](Self::screen_to_sim) yields finite points.
    pub fn maps_screen(&self) -> bool {
        !self.is_degenerate() && self.zoom.is_finite() && self.zoom > 0.0
    }

    /// `width / height`; only meaningful when not degenerate.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    pub fn screen_to_sim(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            self.camera.x + (screen.x / self.width - 0.5) / self.zoom,
            self.camera.y + (screen.y / self.height - 0.5) / self.zoom,
        )
    }

    pub fn sim_to_screen(&self, sim: Vec2) -> Vec2 {
        Vec2::new(
            ((sim.x - self.camera.x) * self.zoom + 0.5) * self.width,
            ((sim.y - self.camera.y) * self.zoom + 0.5) * self.height,
        )
    }

    /// Multiplies the zoom by `factor`, keeping the simulation point under
    /// `screen` fixed.
    pub fn zoom_about(&mut self, screen: Vec2, factor: f64) {
        let anchor = self.screen_to_sim(screen);
        self.zoom *= factor;
        let moved = self.screen_to_sim(screen);
        self.camera.x += anchor.x - moved.x;
        self.camera.y += anchor.y - moved.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transform_is_pixel_fraction() {
        let vp = Viewport::new(800.0, 400.0);
        let p = vp.screen_to_sim(Vec2::new(200.0, 300.0));
        assert!((p.x - 0.25).abs() < 1e-12);
        assert!((p.y - 0.75).abs() < 1e-12);
        assert_eq!(vp.aspect(), 2.0);
    }

    #[test]
    fn test_round_trip_with_camera_and_zoom() {
        let vp = Viewport {
            width: 640.0,
            height: 480.0,
            camera: Vec2::new(0.2, 0.9),
            zoom: 3.0,
        };
        let sim = Vec2::new(0.31, 0.77);
        let back = vp.screen_to_sim(vp.sim_to_screen(sim));
        assert!(sim.distance(back) < 1e-12);
    }

    #[test]
    fn test_zoom_about_keeps_anchor_fixed() {
        let mut vp = Viewport::new(1000.0, 500.0);
        let cursor = Vec2::new(120.0, 430.0);
        let before = vp.screen_to_sim(cursor);
        vp.zoom_about(cursor, 2.5);
        let after = vp.screen_to_sim(cursor);
        assert!(before.distance(after) < 1e-12);
        assert_eq!(vp.zoom, 2.5);
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(Viewport::new(0.0, 700.0).is_degenerate());
        assert!(Viewport::new(900.0, 0.0).is_degenerate());
        assert!(Viewport::new(f64::NAN, 10.0).is_degenerate());
        assert!(!Viewport::default().is_degenerate());
    }

    #[test]
    fn test_maps_screen_needs_size_and_zoom() {
        assert!(Viewport::default().maps_screen());
        assert!(!Viewport::new(0.0, 0.0).maps_screen());
        for zoom in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            let vp = Viewport {
                zoom,
                ..Viewport::default()
            };
            assert!(!vp.maps_screen(), "zoom {zoom} accepted");
        }
    }
}
