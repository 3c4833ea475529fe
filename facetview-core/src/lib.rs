/// FacetView Core Library - mesh viewing engine
///
/// This library provides the display-independent core of the viewer:
/// the mesh model and its text-format loader, drag-driven orientation
/// tracking, orthographic projection, diffuse shading and the wireframe
/// and shaded rendering passes that emit drawing primitives for a host
/// display surface.

pub mod geometry;
pub mod parse;
pub mod projection;
pub mod render;
pub mod shading;
pub mod transform;

// Re-export commonly used types
pub use geometry::{Face, LookupError, Mesh, Vertex};
pub use parse::{parse_mesh, ParseError};
pub use projection::{ProjectedPoint, Projector, Viewport};
pub use render::{
    render_shaded, render_wireframe, FilledPolygon, LineSegment, Marker, Primitive, RenderMode,
    Viewer, ViewerConfig,
};
pub use shading::{intensity, shade, Rgb};
pub use transform::Orientation;
