/// Per-face diffuse shading
use nalgebra::Vector3;

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Lambertian intensity: `max(0, normal . light)`, clamped to `[0, 1]`.
///
/// Both vectors are expected unit-length; a face turned away from the
/// light yields 0, which doubles as the back-face indicator. The zero
/// fallback normal of a degenerate face dots to 0 as well.
pub fn intensity(normal: &Vector3<f32>, light: &Vector3<f32>) -> f32 {
    normal.dot(light).clamp(0.0, 1.0)
}

/// Scale a base color by an intensity, clamping each channel.
pub fn shade(intensity: f32, base: Rgb) -> Rgb {
    let scale = |channel: u8| (channel as f32 * intensity).round().clamp(0.0, 255.0) as u8;
    Rgb {
        r: scale(base.r),
        g: scale(base.g),
        b: scale(base.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aligned_normal_gives_full_intensity() {
        let light = Vector3::new(0.0, 0.0, 1.0);
        assert_relative_eq!(intensity(&Vector3::new(0.0, 0.0, 1.0), &light), 1.0);
    }

    #[test]
    fn test_opposed_normal_gives_zero_intensity() {
        let light = Vector3::new(0.0, 0.0, 1.0);
        assert_eq!(intensity(&Vector3::new(0.0, 0.0, -1.0), &light), 0.0);
    }

    #[test]
    fn test_perpendicular_normal_gives_zero_intensity() {
        let light = Vector3::new(0.0, 0.0, 1.0);
        assert_eq!(intensity(&Vector3::new(1.0, 0.0, 0.0), &light), 0.0);
    }

    #[test]
    fn test_degenerate_zero_normal_gives_zero_intensity() {
        let light = Vector3::new(0.0, 0.0, 1.0);
        assert_eq!(intensity(&Vector3::zeros(), &light), 0.0);
    }

    #[test]
    fn test_shade_scales_and_clamps_channels() {
        let base = Rgb::new(0, 0, 255);
        assert_eq!(shade(1.0, base), base);
        assert_eq!(shade(0.0, base), Rgb::new(0, 0, 0));
        assert_eq!(shade(0.5, base), Rgb::new(0, 0, 128));
        // Intensities above 1 cannot overflow a channel
        assert_eq!(shade(2.0, Rgb::new(200, 200, 200)), Rgb::new(255, 255, 255));
    }
}
