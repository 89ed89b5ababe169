//! Shape sampling for drag-to-place batches.

use particle_life_data::{PlacementShape, Vec2};
use rand::Rng;
use std::f64::consts::TAU;

/// Region spanned by a drag from `start` to `end`, in simulation space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeRegion {
    pub start: Vec2,
    pub end: Vec2,
    pub center: Vec2,
    pub width: f64,
    pub height: f64,
    /// Half the diagonal of the bounding box.
    pub radius: f64,
}

impl ShapeRegion {
    pub fn from_endpoints(start: Vec2, end: Vec2) -> Self {
        let width = (end.x - start.x).abs();
        let height = (end.y - start.y).abs();
        Self {
            start,
            end,
            center: start.midpoint(end),
            width,
            height,
            radius: width.hypot(height) / 2.0,
        }
    }

    /// Draws one point of `shape` inside this region.
    ///
    /// `ring_inner_ratio` is the ring's inner radius as a fraction of
    /// `radius`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        shape: PlacementShape,
        ring_inner_ratio: f64,
        rng: &mut R,
    ) -> Vec2 {
        match shape {
            PlacementShape::Circle => {
                let angle = rng.gen::<f64>() * TAU;
                // sqrt keeps the density uniform per unit area
                let r = rng.gen::<f64>().sqrt() * self.radius;
                self.polar(angle, r)
            }
            PlacementShape::Square => {
                let min_x = self.start.x.min(self.end.x);
                let min_y = self.start.y.min(self.end.y);
                Vec2::new(
                    min_x + rng.gen::<f64>() * self.width,
                    min_y + rng.gen::<f64>() * self.height,
                )
            }
            PlacementShape::Line => {
                let t = rng.gen::<f64>();
                Vec2::new(
                    self.start.x + t * (self.end.x - self.start.x),
                    self.start.y + t * (self.end.y - self.start.y),
                )
            }
            PlacementShape::Ring => {
                let angle = rng.gen::<f64>() * TAU;
                let r = self.radius
                    * (ring_inner_ratio + rng.gen::<f64>() * (1.0 - ring_inner_ratio));
                self.polar(angle, r)
            }
        }
    }

    #[inline]
    fn polar(&self, angle: f64, r: f64) -> Vec2 {
        Vec2::new(
            self.center.x + r * angle.cos(),
            self.center.y + r * angle.sin(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_region_from_endpoints() {
        let region = ShapeRegion::from_endpoints(Vec2::new(0.6, 0.2), Vec2::new(0.3, 0.6));
        assert!(region.center.distance(Vec2::new(0.45, 0.4)) < 1e-12);
        assert!((region.width - 0.3).abs() < 1e-12);
        assert!((region.height - 0.4).abs() < 1e-12);
        assert!((region.radius - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_circle_stays_inside_radius() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let region = ShapeRegion::from_endpoints(Vec2::new(0.4, 0.4), Vec2::new(0.6, 0.6));
        for _ in 0..500 {
            let p = region.sample(PlacementShape::Circle, 0.7, &mut rng);
            assert!(p.distance(region.center) <= region.radius + 1e-12);
        }
    }

    #[test]
    fn test_circle_is_area_uniform() {
        // Half the disk area lies beyond radius / sqrt(2).
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let region = ShapeRegion::from_endpoints(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let n = 20_000;
        let outer = (0..n)
            .map(|_| region.sample(PlacementShape::Circle, 0.7, &mut rng))
            .filter(|p| p.distance(region.center) > region.radius / 2f64.sqrt())
            .count();
        let fraction = outer as f64 / n as f64;
        assert!((fraction - 0.5).abs() < 0.02, "outer fraction {fraction}");
    }

    #[test]
    fn test_square_handles_reversed_drag() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let region = ShapeRegion::from_endpoints(Vec2::new(0.8, 0.9), Vec2::new(0.2, 0.5));
        for _ in 0..200 {
            let p = region.sample(PlacementShape::Square, 0.7, &mut rng);
            assert!(p.x >= 0.2 - 1e-12 && p.x <= 0.8 + 1e-12);
            assert!(p.y >= 0.5 - 1e-12 && p.y <= 0.9 + 1e-12);
        }
    }

    #[test]
    fn test_line_points_are_collinear() {
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let (a, b) = (Vec2::new(0.1, 0.2), Vec2::new(0.5, 0.6));
        let region = ShapeRegion::from_endpoints(a, b);
        for _ in 0..100 {
            let p = region.sample(PlacementShape::Line, 0.7, &mut rng);
            // on y = x + 0.1 between the endpoints
            assert!((p.y - p.x - 0.1).abs() < 1e-12);
            assert!(p.x >= 0.1 - 1e-12 && p.x <= 0.5 + 1e-12);
        }
    }

    #[test]
    fn test_ring_respects_inner_radius() {
        let mut rng = ChaCha8Rng::seed_from_u64(15);
        let region = ShapeRegion::from_endpoints(Vec2::new(0.3, 0.3), Vec2::new(0.7, 0.7));
        for _ in 0..500 {
            let d = region
                .sample(PlacementShape::Ring, 0.7, &mut rng)
                .distance(region.center);
            assert!(d >= 0.7 * region.radius - 1e-12);
            assert!(d <= region.radius + 1e-12);
        }
    }
}
