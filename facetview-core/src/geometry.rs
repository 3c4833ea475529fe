/// Mesh model: vertices, triangular faces, and derived per-face data
use nalgebra::{Point3, Vector3};
use thiserror::Error;

/// Cross products with a squared norm below this are treated as degenerate.
const MIN_NORMAL_NORM_SQUARED: f32 = 1e-12;

/// A vertex id referenced outside the declared range.
///
/// The loader validates every face reference, so hitting this after a
/// successful load is an invariant breach, not a user-recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("vertex id {id} out of range (mesh has {count} vertices)")]
pub struct LookupError {
    pub id: usize,
    pub count: usize,
}

/// A mesh vertex: dense integer id plus position, immutable after load
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub id: usize,
    pub position: Point3<f32>,
}

impl Vertex {
    pub fn new(id: usize, x: f32, y: f32, z: f32) -> Self {
        Self {
            id,
            position: Point3::new(x, y, z),
        }
    }
}

/// A triangular face referencing three distinct vertex ids.
///
/// The geometric normal and the centroid are computed once at load time:
/// the normal feeds shading, the centroid the painter's depth ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub vertex_ids: [usize; 3],
    pub normal: Vector3<f32>,
    pub centroid: Point3<f32>,
}

impl Face {
    /// Build a face from its vertex ids and their positions.
    ///
    /// The normal follows the right-hand rule on (p1-p0) x (p2-p0). For
    /// collinear vertices the cross product vanishes and the normal falls
    /// back to the zero vector; shaded rendering skips such faces.
    pub fn new(vertex_ids: [usize; 3], p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        let cross = (p1 - p0).cross(&(p2 - p0));
        let normal = if cross.norm_squared() < MIN_NORMAL_NORM_SQUARED {
            Vector3::zeros()
        } else {
            cross.normalize()
        };
        let centroid = Point3::from((p0.coords + p1.coords + p2.coords) / 3.0);
        Self {
            vertex_ids,
            normal,
            centroid,
        }
    }

    /// True when the normal could not be computed (zero-area face).
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vector3::zeros()
    }
}

/// An immutable-after-load triangle mesh.
///
/// Vertices are stored in id order (ids are the dense range `[0, n)`, so id
/// order equals file order); faces keep file order, which seeds the
/// renderer's emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Assemble a mesh from validated parts. Face ids must already be
    /// in range; the loader and the built-in sample guarantee this.
    pub(crate) fn assemble(vertices: Vec<Vertex>, face_ids: &[[usize; 3]]) -> Self {
        let faces = face_ids
            .iter()
            .map(|ids| {
                Face::new(
                    *ids,
                    vertices[ids[0]].position,
                    vertices[ids[1]].position,
                    vertices[ids[2]].position,
                )
            })
            .collect();
        Self { vertices, faces }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Look up a vertex by id. Out-of-range ids are an error, never a
    /// silently returned default.
    pub fn vertex_at(&self, id: usize) -> Result<&Vertex, LookupError> {
        self.vertices.get(id).ok_or(LookupError {
            id,
            count: self.vertices.len(),
        })
    }

    /// Vertices in id order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Faces in file order.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Axis-aligned bounding box over all vertex positions, or `None` for
    /// an empty mesh. Drives the auto-fit zoom.
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;
        for vertex in &self.vertices[1..] {
            let p = vertex.position;
            min = Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        Some((min, max))
    }

    /// Built-in sample mesh: a tetrahedron with its apex on the +Y axis.
    pub fn tetrahedron() -> Self {
        let vertices = vec![
            Vertex::new(0, -1.0, -1.0, 1.0),
            Vertex::new(1, 1.0, -1.0, 1.0),
            Vertex::new(2, 0.0, 1.0, 0.0),
            Vertex::new(3, 0.0, -1.0, -1.0),
        ];
        let face_ids = [[0, 3, 1], [0, 1, 2], [1, 3, 2], [3, 0, 2]];
        Self::assemble(vertices, &face_ids)
    }
}
