/// Geometry primitives: homogeneous vertices, faces and face lists
use nalgebra::{RowVector4, Vector3};

/// Homogeneous point or direction `(x, y, z, w)`, multiplied on the left of a matrix
pub type Vertex = RowVector4<f64>;

/// Build a homogeneous vertex with `w = 1`
pub fn vertex(x: f64, y: f64, z: f64) -> Vertex {
    RowVector4::new(x, y, z, 1.0)
}

/// The `xyz` part of a homogeneous vertex
pub fn xyz(v: &Vertex) -> Vector3<f64> {
    Vector3::new(v[0], v[1], v[2])
}

/// A triangle face: three vertices in winding order plus its outward normal
///
/// The normal carries `w = 1` so it can be pushed through the same 4x4
/// matrices as the vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub vertices: [Vertex; 3],
    pub normal: Vertex,
}

impl Face {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex, normal: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
            normal,
        }
    }

    /// Edges in drawing order: v0->v1, v1->v2, v2->v0
    pub fn edges(&self) -> [(Vertex, Vertex); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }
}

/// Ordered face list
///
/// Storing whole faces keeps `vertex_count() == 3 * len()` and
/// `normal_count() == len()` true by construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    faces: Vec<Face>,
}

impl Geometry {
    pub fn new() -> Self {
        Self { faces: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            faces: Vec::with_capacity(capacity),
        }
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.faces.len() * 3
    }

    pub fn normal_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.faces.iter().flat_map(|f| f.vertices.iter())
    }

    pub fn normals(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.faces.iter().map(|f| &f.normal)
    }

    /// Copy of this geometry with every vertex passed through `f`; normals untouched
    pub fn map_vertices<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Vertex) -> Vertex,
    {
        let faces = self
            .faces
            .iter()
            .map(|face| Face {
                vertices: [
                    f(&face.vertices[0]),
                    f(&face.vertices[1]),
                    f(&face.vertices[2]),
                ],
                normal: face.normal,
            })
            .collect();
        Self { faces }
    }

    /// Copy of this geometry with every normal passed through `f`; vertices untouched
    pub fn map_normals<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Vertex) -> Vertex,
    {
        let faces = self
            .faces
            .iter()
            .map(|face| Face {
                vertices: face.vertices,
                normal: f(&face.normal),
            })
            .collect();
        Self { faces }
    }

    /// Axis-aligned bounding box `(min, max)` of all vertices, `None` when empty
    pub fn bounds(&self) -> Option<(Vector3<f64>, Vector3<f64>)> {
        let mut vertices = self.vertices();
        let first = xyz(vertices.next()?);
        Some(vertices.fold((first, first), |(min, max), v| {
            let p = xyz(v);
            (min.inf(&p), max.sup(&p))
        }))
    }

    /// Unit cube spanning `[0, size]` on every axis, written the way an ASCII STL
    /// exporter would: 12 triangles, outward normals already remapped with
    /// [`crate::stl::remap_normal`]
    pub fn cube(size: f64) -> Self {
        let s = size;
        let p = |x: f64, y: f64, z: f64| vertex(x * s, y * s, z * s);
        let sides: [([f64; 3], [[(f64, f64, f64); 3]; 2]); 6] = [
            // Bottom
            (
                [0.0, 0.0, -1.0],
                [
                    [(0.0, 0.0, 0.0), (0.0, 1.0, 0.0), (1.0, 1.0, 0.0)],
                    [(0.0, 0.0, 0.0), (1.0, 1.0, 0.0), (1.0, 0.0, 0.0)],
                ],
            ),
            // Top
            (
                [0.0, 0.0, 1.0],
                [
                    [(0.0, 0.0, 1.0), (1.0, 0.0, 1.0), (1.0, 1.0, 1.0)],
                    [(0.0, 0.0, 1.0), (1.0, 1.0, 1.0), (0.0, 1.0, 1.0)],
                ],
            ),
            // Front
            (
                [0.0, -1.0, 0.0],
                [
                    [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 0.0, 1.0)],
                    [(0.0, 0.0, 0.0), (1.0, 0.0, 1.0), (0.0, 0.0, 1.0)],
                ],
            ),
            // Back
            (
                [0.0, 1.0, 0.0],
                [
                    [(0.0, 1.0, 0.0), (0.0, 1.0, 1.0), (1.0, 1.0, 1.0)],
                    [(0.0, 1.0, 0.0), (1.0, 1.0, 1.0), (1.0, 1.0, 0.0)],
                ],
            ),
            // Left
            (
                [-1.0, 0.0, 0.0],
                [
                    [(0.0, 0.0, 0.0), (0.0, 0.0, 1.0), (0.0, 1.0, 1.0)],
                    [(0.0, 0.0, 0.0), (0.0, 1.0, 1.0), (0.0, 1.0, 0.0)],
                ],
            ),
            // Right
            (
                [1.0, 0.0, 0.0],
                [
                    [(1.0, 0.0, 0.0), (1.0, 1.0, 0.0), (1.0, 1.0, 1.0)],
                    [(1.0, 0.0, 0.0), (1.0, 1.0, 1.0), (1.0, 0.0, 1.0)],
                ],
            ),
        ];

        let mut geometry = Self::with_capacity(12);
        for ([nx, ny, nz], triangles) in sides {
            let normal = crate::stl::remap_normal(nx, ny, nz);
            for [a, b, c] in triangles {
                geometry.add_face(Face::new(
                    p(a.0, a.1, a.2),
                    p(b.0, b.1, b.2),
                    p(c.0, c.1, c.2),
                    normal,
                ));
            }
        }
        geometry
    }
}

impl FromIterator<Face> for Geometry {
    fn from_iter<I: IntoIterator<Item = Face>>(iter: I) -> Self {
        Self {
            faces: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let cube = Geometry::cube(1.0);
        assert_eq!(cube.len(), 12);
        assert_eq!(cube.vertex_count(), 36);
        assert_eq!(cube.normal_count(), 12);
        assert_eq!(cube.vertices().count(), 36);
    }

    #[test]
    fn test_bounds() {
        let cube = Geometry::cube(2.0);
        let (min, max) = cube.bounds().unwrap();
        assert_eq!(min, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Vector3::new(2.0, 2.0, 2.0));
        assert!(Geometry::new().bounds().is_none());
    }

    #[test]
    fn test_edges_follow_winding() {
        let face = Face::new(
            vertex(0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0),
            vertex(0.0, 1.0, 0.0),
            vertex(0.0, 0.0, 1.0),
        );
        let edges = face.edges();
        assert_eq!(edges[0], (face.vertices[0], face.vertices[1]));
        assert_eq!(edges[1], (face.vertices[1], face.vertices[2]));
        assert_eq!(edges[2], (face.vertices[2], face.vertices[0]));
    }
}
