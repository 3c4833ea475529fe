/// Renderer: primitive emission and the drag interaction state machine
use nalgebra::Vector3;
use tracing::{debug, trace};

use crate::geometry::{Face, LookupError, Mesh};
use crate::parse::{self, ParseError};
use crate::projection::{ProjectedPoint, Projector, Viewport};
use crate::shading::{self, Rgb};
use crate::transform::Orientation;

/// Rendering mode. One renderer serves both: the paths share the
/// projector and the mesh and differ only in whether the shader runs and
/// which primitive kind is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Wireframe,
    Shaded,
}

/// A screen-space edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub from: (f32, f32),
    pub to: (f32, f32),
}

/// A filled, shaded triangle with an outline stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilledPolygon {
    pub points: [(f32, f32); 3],
    pub fill: Rgb,
    pub outline: Rgb,
}

/// A vertex marker dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub at: (f32, f32),
}

/// Drawing primitive handed to the host's display surface, in draw order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Line(LineSegment),
    Polygon(FilledPolygon),
    Marker(Marker),
}

/// Recognized configuration options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    /// Rotation speed in radians per dragged pixel.
    pub sensitivity: f32,
    /// Unit light/view direction in view space.
    pub light_direction: Vector3<f32>,
    /// Base color scaled by the shading intensity.
    pub base_color: Rgb,
    /// Zoom multiplier applied on top of the auto-fit scale.
    pub zoom: f32,
    /// Fraction of the viewport the auto-fitted mesh should span.
    pub fill_ratio: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.01,
            light_direction: Vector3::new(0.0, 0.0, 1.0),
            base_color: Rgb::new(0, 0, 255),
            zoom: 1.0,
            fill_ratio: 0.5,
        }
    }
}

fn project_face(
    mesh: &Mesh,
    face: &Face,
    orientation: &Orientation,
    projector: &Projector,
    viewport: Viewport,
) -> Result<[ProjectedPoint; 3], LookupError> {
    let mut projected = [ProjectedPoint {
        x: 0.0,
        y: 0.0,
        depth: 0.0,
    }; 3];
    for (slot, &id) in projected.iter_mut().zip(&face.vertex_ids) {
        let vertex = mesh.vertex_at(id)?;
        let rotated = orientation.transform_point(&vertex.position);
        *slot = projector.project(&rotated, viewport);
    }
    Ok(projected)
}

fn push_vertex_markers(
    mesh: &Mesh,
    orientation: &Orientation,
    projector: &Projector,
    viewport: Viewport,
    out: &mut Vec<Primitive>,
) {
    for vertex in mesh.vertices() {
        let rotated = orientation.transform_point(&vertex.position);
        let p = projector.project(&rotated, viewport);
        out.push(Primitive::Marker(Marker { at: (p.x, p.y) }));
    }
}

/// Emit every face's three edges, in file order, followed by one marker
/// per vertex. No shading and no culling; an edge shared by two faces is
/// emitted twice rather than deduplicated.
pub fn render_wireframe(
    mesh: &Mesh,
    orientation: &Orientation,
    projector: &Projector,
    viewport: Viewport,
) -> Result<Vec<Primitive>, LookupError> {
    let mut out = Vec::with_capacity(mesh.face_count() * 3 + mesh.vertex_count());
    for face in mesh.faces() {
        let p = project_face(mesh, face, orientation, projector, viewport)?;
        for i in 0..3 {
            let a = p[i];
            let b = p[(i + 1) % 3];
            out.push(Primitive::Line(LineSegment {
                from: (a.x, a.y),
                to: (b.x, b.y),
            }));
        }
    }
    push_vertex_markers(mesh, orientation, projector, viewport, &mut out);
    trace!(primitives = out.len(), "wireframe pass");
    Ok(out)
}

/// Emit shaded, filled triangles layered by the painter's algorithm:
/// faces are sorted by the mean rotated z of their vertices, ascending,
/// so the farthest face draws first. A best-effort heuristic, not exact
/// occlusion. Degenerate faces (no computable normal) are skipped.
pub fn render_shaded(
    mesh: &Mesh,
    orientation: &Orientation,
    projector: &Projector,
    viewport: Viewport,
    light_direction: &Vector3<f32>,
    base_color: Rgb,
) -> Result<Vec<Primitive>, LookupError> {
    struct DepthKeyed {
        depth: f32,
        polygon: FilledPolygon,
    }

    let mut keyed = Vec::with_capacity(mesh.face_count());
    for face in mesh.faces() {
        if face.is_degenerate() {
            continue;
        }
        let normal = orientation.transform_normal(&face.normal);
        let level = shading::intensity(&normal, light_direction);
        let fill = shading::shade(level, base_color);

        let p = project_face(mesh, face, orientation, projector, viewport)?;
        let depth = (p[0].depth + p[1].depth + p[2].depth) / 3.0;
        keyed.push(DepthKeyed {
            depth,
            polygon: FilledPolygon {
                points: [(p[0].x, p[0].y), (p[1].x, p[1].y), (p[2].x, p[2].y)],
                fill,
                outline: base_color,
            },
        });
    }
    keyed.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    let mut out: Vec<Primitive> = keyed
        .into_iter()
        .map(|k| Primitive::Polygon(k.polygon))
        .collect();
    push_vertex_markers(mesh, orientation, projector, viewport, &mut out);
    trace!(primitives = out.len(), "shaded pass");
    Ok(out)
}

/// Active drag gesture. Present only between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy)]
struct DragState {
    last: (f32, f32),
}

/// The viewer state object the host shell drives.
///
/// Owns the mesh (replaced wholesale on load), the orientation (persists
/// across reloads, reset only on an explicit host request) and the
/// transient drag gesture. Single-threaded; the host serializes calls.
#[derive(Debug)]
pub struct Viewer {
    mesh: Option<Mesh>,
    orientation: Orientation,
    config: ViewerConfig,
    drag: Option<DragState>,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            mesh: None,
            orientation: Orientation::identity(),
            config,
            drag: None,
        }
    }

    /// Parse and install a mesh. Replacement is atomic: on any parse
    /// failure the previously loaded mesh stays in place untouched.
    pub fn load_mesh_from_text(&mut self, text: &str) -> Result<(), ParseError> {
        let mesh = parse::parse_mesh(text)?;
        debug!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "mesh installed"
        );
        self.mesh = Some(mesh);
        Ok(())
    }

    /// Install an already-built mesh (e.g. the built-in sample).
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.mesh = Some(mesh);
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Explicit host-invoked reset; never triggered by the core itself.
    pub fn reset_orientation(&mut self) {
        self.orientation = Orientation::identity();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer-down: Idle -> Dragging.
    pub fn on_drag_start(&mut self, pos: (f32, f32)) {
        self.drag = Some(DragState { last: pos });
    }

    /// Pointer-move. While Dragging, rotates by the delta since the last
    /// event and returns `true` to request a synchronous redraw; moves
    /// while Idle are ignored.
    pub fn on_drag_move(&mut self, pos: (f32, f32)) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let dx = pos.0 - drag.last.0;
        let dy = pos.1 - drag.last.1;
        drag.last = pos;
        self.orientation = self.orientation.apply_drag(dx, dy, self.config.sensitivity);
        true
    }

    /// Pointer-up: Dragging -> Idle.
    pub fn on_drag_end(&mut self) {
        self.drag = None;
    }

    /// Produce the current frame's primitives for the host's redraw path.
    /// Empty when no mesh is loaded.
    pub fn render_frame(
        &self,
        mode: RenderMode,
        viewport: Viewport,
    ) -> Result<Vec<Primitive>, LookupError> {
        let Some(mesh) = &self.mesh else {
            return Ok(Vec::new());
        };
        let mut projector = Projector::fit(mesh, viewport, self.config.fill_ratio);
        projector.zoom *= self.config.zoom;
        match mode {
            RenderMode::Wireframe => render_wireframe(mesh, &self.orientation, &projector, viewport),
            RenderMode::Shaded => render_shaded(
                mesh,
                &self.orientation,
                &projector,
                viewport,
                &self.config.light_direction,
                self.config.base_color,
            ),
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}
