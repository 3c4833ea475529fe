/// Character rasterizer: turns core drawing primitives into a colored
/// char grid for terminal output
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use facetview_core::{FilledPolygon, LineSegment, Marker, Primitive, Rgb};
use std::io::Write;

/// Fill characters from dim to bright
const FILL_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];
const LINE_CHAR: char = '#';
const MARKER_CHAR: char = 'o';

/// Rasterizer over a width x height cell grid. Primitives arrive from the
/// core already in draw order (the painter's sort happens there), so cells
/// are simply overwritten in sequence; no depth buffer is kept.
pub struct CharRaster {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Rgb>,
    /// Stroke color for wireframe edges and vertex markers.
    pub stroke: Rgb,
}

impl CharRaster {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![' '; size],
            color_buffer: vec![Rgb::new(0, 0, 0); size],
            stroke: Rgb::new(0, 0, 255),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.char_buffer = vec![' '; width * height];
        self.color_buffer = vec![Rgb::new(0, 0, 0); width * height];
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Rgb::new(0, 0, 0));
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<(char, Rgb)> {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            Some((self.char_buffer[idx], self.color_buffer[idx]))
        } else {
            None
        }
    }

    pub fn draw_primitives(&mut self, primitives: &[Primitive]) {
        for primitive in primitives {
            match primitive {
                Primitive::Line(segment) => self.draw_line(segment),
                Primitive::Polygon(polygon) => self.fill_polygon(polygon),
                Primitive::Marker(marker) => self.draw_marker(marker),
            }
        }
    }

    fn plot(&mut self, x: i32, y: i32, character: char, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.char_buffer[idx] = character;
        self.color_buffer[idx] = color;
    }

    /// Bresenham line between the segment's endpoints.
    fn draw_line(&mut self, segment: &LineSegment) {
        self.stroke_line(segment.from, segment.to, LINE_CHAR, self.stroke);
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), character: char, color: Rgb) {
        let (mut x0, mut y0) = (from.0.round() as i32, from.1.round() as i32);
        let (x1, y1) = (to.0.round() as i32, to.1.round() as i32);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, character, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x0 += sx;
            }
            if doubled <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Scanline fill over the triangle's bounding box, then an outline
    /// stroke over its edges.
    fn fill_polygon(&mut self, polygon: &FilledPolygon) {
        let [v0, v1, v2] = polygon.points;
        let character = fill_char(polygon.fill, polygon.outline);

        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let center = (x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, center) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.plot(x, y, character, polygon.fill);
                    }
                }
            }
        }

        for i in 0..3 {
            self.stroke_line(
                polygon.points[i],
                polygon.points[(i + 1) % 3],
                LINE_CHAR,
                polygon.outline,
            );
        }
    }

    fn draw_marker(&mut self, marker: &Marker) {
        self.plot(
            marker.at.0.round() as i32,
            marker.at.1.round() as i32,
            MARKER_CHAR,
            self.stroke,
        );
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];
                let color = self.color_buffer[idx];
                writer.queue(SetForegroundColor(Color::Rgb {
                    r: color.r,
                    g: color.g,
                    b: color.b,
                }))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Pick a ramp character from how bright the fill is relative to the base
/// color it was scaled from. The fill is the base times the shading
/// intensity, so the largest channel ratio recovers that intensity and the
/// glyph tracks it even for dark base colors.
fn fill_char(fill: Rgb, base: Rgb) -> char {
    let ratio = |f: u8, b: u8| {
        if b == 0 {
            0.0
        } else {
            f as f32 / b as f32
        }
    };
    let level = ratio(fill.r, base.r)
        .max(ratio(fill.g, base.g))
        .max(ratio(fill.b, base.b));
    let index = (level * (FILL_RAMP.len() - 1) as f32) as usize;
    FILL_RAMP[index.min(FILL_RAMP.len() - 1)]
}

/// Barycentric coordinates of a point in a triangle, or `None` for a
/// degenerate (zero-area) screen triangle.
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_sets_endpoint_cells() {
        let mut raster = CharRaster::new(20, 10);
        raster.draw_primitives(&[Primitive::Line(LineSegment {
            from: (1.0, 1.0),
            to: (8.0, 1.0),
        })]);
        assert_eq!(raster.cell(1, 1).unwrap().0, LINE_CHAR);
        assert_eq!(raster.cell(8, 1).unwrap().0, LINE_CHAR);
        assert_eq!(raster.cell(10, 1).unwrap().0, ' ');
    }

    #[test]
    fn test_polygon_fills_interior() {
        let mut raster = CharRaster::new(20, 20);
        let fill = Rgb::new(0, 0, 255);
        raster.draw_primitives(&[Primitive::Polygon(FilledPolygon {
            points: [(2.0, 2.0), (16.0, 2.0), (9.0, 16.0)],
            fill,
            outline: fill,
        })]);
        let (c, color) = raster.cell(9, 6).unwrap();
        assert_ne!(c, ' ');
        assert_eq!(color, fill);
    }

    #[test]
    fn test_marker_and_out_of_bounds_plot() {
        let mut raster = CharRaster::new(5, 5);
        raster.draw_primitives(&[
            // Off-screen primitives are clipped, not errors
            Primitive::Line(LineSegment {
                from: (-3.0, -3.0),
                to: (8.0, 8.0),
            }),
            Primitive::Marker(Marker { at: (-10.0, 40.0) }),
            Primitive::Marker(Marker { at: (2.0, 2.0) }),
        ]);
        assert_eq!(raster.cell(2, 2).unwrap().0, MARKER_CHAR);
    }

    #[test]
    fn test_fill_char_tracks_shading_intensity() {
        let base = Rgb::new(0, 0, 255);
        // Full, zero and mid intensity land on distinct ramp glyphs even
        // though the base color is dark blue
        assert_eq!(fill_char(base, base), '@');
        assert_eq!(fill_char(Rgb::new(0, 0, 0), base), '.');
        let mid = fill_char(Rgb::new(0, 0, 128), base);
        assert_ne!(mid, '.');
        assert_ne!(mid, '@');
    }

    #[test]
    fn test_degenerate_screen_triangle_has_no_barycentric() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)).is_none());
    }
}
