/// Parallel projection from rotated model space to screen space
use nalgebra::Point3;

use crate::geometry::Mesh;

/// Target drawing surface dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// A projected point: screen coordinates plus the rotated z, retained for
/// depth ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Orthographic projector. Screen x grows right, screen y grows down, so
/// the model-space y axis is flipped. Never fails: points outside the
/// viewport simply land off-screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub zoom: f32,
}

impl Projector {
    pub fn new(zoom: f32) -> Self {
        Self { zoom }
    }

    /// Zoom chosen from the mesh bounding box so the model spans
    /// `fill_ratio` of the smaller viewport dimension. Falls back to the
    /// default zoom for empty or flat meshes.
    pub fn fit(mesh: &Mesh, viewport: Viewport, fill_ratio: f32) -> Self {
        if let Some((min, max)) = mesh.bounds() {
            let width = max.x - min.x;
            let height = max.y - min.y;
            if width > 0.0 && height > 0.0 {
                let zoom_x = viewport.width as f32 * fill_ratio / width;
                let zoom_y = viewport.height as f32 * fill_ratio / height;
                return Self::new(zoom_x.min(zoom_y));
            }
        }
        Self::default()
    }

    /// Map a rotated, viewer-centered point to screen space. Deterministic
    /// and side-effect free.
    pub fn project(&self, p: &Point3<f32>, viewport: Viewport) -> ProjectedPoint {
        let (cx, cy) = viewport.center();
        ProjectedPoint {
            x: cx + p.x * self.zoom,
            y: cy - p.y * self.zoom,
            depth: p.z,
        }
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self { zoom: 100.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;

    #[test]
    fn test_origin_projects_to_viewport_center() {
        let viewport = Viewport::new(800, 600);
        let p = Projector::default().project(&Point3::origin(), viewport);
        assert_eq!((p.x, p.y), (400.0, 300.0));
    }

    #[test]
    fn test_zoom_scales_offsets_proportionally() {
        let viewport = Viewport::new(800, 600);
        let point = Point3::new(1.0, 2.0, 0.0);
        let near = Projector::new(50.0).project(&point, viewport);
        let far = Projector::new(100.0).project(&point, viewport);
        let (cx, cy) = viewport.center();
        assert_eq!(far.x - cx, 2.0 * (near.x - cx));
        assert_eq!(far.y - cy, 2.0 * (near.y - cy));
    }

    #[test]
    fn test_y_axis_flips_and_depth_is_retained() {
        let viewport = Viewport::new(100, 100);
        let p = Projector::new(10.0).project(&Point3::new(0.0, 1.0, -4.0), viewport);
        assert_eq!(p.y, 40.0); // +y goes up on screen
        assert_eq!(p.depth, -4.0);
    }

    #[test]
    fn test_fit_fills_half_the_viewport() {
        // Tetrahedron bounds span 2.0 in x and y
        let mesh = Mesh::tetrahedron();
        let projector = Projector::fit(&mesh, Viewport::new(800, 600), 0.5);
        assert_eq!(projector.zoom, 150.0);
    }

    #[test]
    fn test_off_screen_points_are_not_an_error() {
        let viewport = Viewport::new(10, 10);
        let p = Projector::new(100.0).project(&Point3::new(50.0, 0.0, 0.0), viewport);
        assert!(p.x > viewport.width as f32);
    }
}
