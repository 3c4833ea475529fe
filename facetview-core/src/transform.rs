/// Orientation state: cumulative rotation driven by pointer drags
use nalgebra::{Point3, Rotation3, Vector3};

/// Cumulative rotation about the screen-space X and Y axes.
///
/// The state is the pair of accumulated angles, not a composed matrix, so
/// repeated incremental updates cannot drift away from orthogonality; the
/// rotation is rebuilt from the angles on demand. The composition order is
/// fixed: the X-axis (pitch) rotation is applied first, then the Y-axis
/// (yaw) rotation. With that order, any sampling of a drag path into
/// discrete move events accumulates to the same orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pitch: f32,
    yaw: f32,
}

impl Orientation {
    /// No rotation.
    pub fn identity() -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    /// Accumulated rotation about the screen-space X axis, in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Accumulated rotation about the screen-space Y axis, in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Rotate by a drag delta: `dy` pixels add to pitch, `dx` pixels add to
    /// yaw, both scaled by `sensitivity` (radians per pixel). Pure; a
    /// zero-delta drag returns an identical orientation.
    #[must_use]
    pub fn apply_drag(self, dx: f32, dy: f32, sensitivity: f32) -> Self {
        Self {
            pitch: self.pitch + dy * sensitivity,
            yaw: self.yaw + dx * sensitivity,
        }
    }

    /// The rotation as a matrix: pitch about X first, then yaw about Y.
    pub fn rotation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch)
    }

    /// Apply the rotation to a point. Pure.
    pub fn transform_point(&self, p: &Point3<f32>) -> Point3<f32> {
        self.rotation() * p
    }

    /// Apply the rotation to a direction and renormalize. The zero vector
    /// (a degenerate face normal) stays zero.
    pub fn transform_normal(&self, v: &Vector3<f32>) -> Vector3<f32> {
        let rotated = self.rotation() * v;
        let norm = rotated.norm();
        if norm > f32::EPSILON {
            rotated / norm
        } else {
            Vector3::zeros()
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}
