//! Indexed triangle mesh.

use std::collections::HashMap;
use std::ops::{Add, Sub};

/// 3D point or vector (meters)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vertex {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate (up)
    pub z: f64,
}

impl Vertex {
    /// Create a new vertex
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product
    #[inline]
    pub fn dot(&self, other: &Vertex) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    #[inline]
    pub fn cross(&self, other: &Vertex) -> Vertex {
        Vertex::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean length
    #[inline]
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector, or zero for a degenerate input
    #[inline]
    pub fn normalize_or_zero(&self) -> Vertex {
        let len = self.length();
        if len > f64::EPSILON {
            Vertex::new(self.x / len, self.y / len, self.z / len)
        } else {
            Vertex::default()
        }
    }
}

impl Add for Vertex {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Vertex::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vertex {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Vertex::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// Triangle as three vertex indices, counter-clockwise seen from outside
pub type Face = [usize; 3];

/// Sorted copy of a face's indices (winding-independent identity)
#[inline]
pub(crate) fn face_key(face: &Face) -> Face {
    let mut key = *face;
    key.sort_unstable();
    key
}

/// Directed edges of a face, following its winding
#[inline]
pub(crate) fn face_edges(face: &Face) -> [(usize, usize); 3] {
    [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])]
}

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) faces: Vec<Face>,
}

impl Mesh {
    /// Empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty mesh with preallocated storage
    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    /// Build a mesh from raw parts.
    ///
    /// Returns `None` if any face references a vertex out of range.
    pub fn from_parts(vertices: Vec<Vertex>, faces: Vec<Face>) -> Option<Self> {
        let n = vertices.len();
        if faces.iter().flatten().any(|&i| i >= n) {
            return None;
        }
        Some(Self { vertices, faces })
    }

    /// Append a vertex, returning its index
    pub fn push_vertex(&mut self, vertex: Vertex) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    /// Vertices in index order
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Faces in emission order
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when there is nothing to export
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// The three corner positions of a face
    #[inline]
    pub fn triangle(&self, face: &Face) -> [Vertex; 3] {
        [
            self.vertices[face[0]],
            self.vertices[face[1]],
            self.vertices[face[2]],
        ]
    }

    /// Unit normal of a face from its winding (zero if degenerate)
    pub fn face_normal(&self, face: &Face) -> Vertex {
        let [a, b, c] = self.triangle(face);
        (b - a).cross(&(c - a)).normalize_or_zero()
    }

    /// Signed enclosed volume (divergence theorem).
    ///
    /// Positive when faces wind counter-clockwise seen from outside.
    pub fn signed_volume(&self) -> f64 {
        self.signed_volume_of(self.faces.iter())
    }

    pub(crate) fn signed_volume_of<'a>(&self, faces: impl Iterator<Item = &'a Face>) -> f64 {
        faces
            .map(|face| {
                let [a, b, c] = self.triangle(face);
                a.dot(&b.cross(&c))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Every undirected edge is shared by exactly two faces.
    pub fn is_watertight(&self) -> bool {
        if self.faces.is_empty() {
            return false;
        }
        let mut uses: HashMap<(usize, usize), u32> = HashMap::new();
        for face in &self.faces {
            for (a, b) in face_edges(face) {
                *uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        uses.values().all(|&n| n == 2)
    }

    /// No directed edge appears twice, so neighbouring faces agree on orientation.
    pub fn is_winding_consistent(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.faces.len() * 3);
        self.faces
            .iter()
            .flat_map(face_edges)
            .all(|edge| seen.insert(edge))
    }

    /// Closed, consistently wound, and enclosing a positive volume.
    pub fn is_volume(&self) -> bool {
        self.is_watertight() && self.is_winding_consistent() && self.signed_volume() > 0.0
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vertex, Vertex)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (
                Vertex::new(lo.x.min(v.x), lo.y.min(v.y), lo.z.min(v.z)),
                Vertex::new(hi.x.max(v.x), hi.y.max(v.y), hi.z.max(v.z)),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit tetrahedron, outward winding
    fn tetra() -> Mesh {
        Mesh::from_parts(
            vec![
                Vertex::new(0.0, 0.0, 0.0),
                Vertex::new(1.0, 0.0, 0.0),
                Vertex::new(0.0, 1.0, 0.0),
                Vertex::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_tetra_volume() {
        let mesh = tetra();
        assert_relative_eq!(mesh.signed_volume(), 1.0 / 6.0, epsilon = 1e-12);
        assert!(mesh.is_watertight());
        assert!(mesh.is_winding_consistent());
        assert!(mesh.is_volume());
    }

    #[test]
    fn test_flipped_face_breaks_consistency() {
        let mut mesh = tetra();
        mesh.faces[3] = [1, 3, 2];
        assert!(mesh.is_watertight());
        assert!(!mesh.is_winding_consistent());
        assert!(!mesh.is_volume());
    }

    #[test]
    fn test_open_mesh_not_watertight() {
        let mut mesh = tetra();
        mesh.faces.pop();
        assert!(!mesh.is_watertight());
        assert!(!Mesh::new().is_watertight());
    }

    #[test]
    fn test_from_parts_rejects_bad_index() {
        assert!(Mesh::from_parts(vec![Vertex::default()], vec![[0, 0, 1]]).is_none());
    }

    #[test]
    fn test_face_normal_and_bounds() {
        let mesh = tetra();
        let n = mesh.face_normal(&[0, 2, 1]);
        assert_relative_eq!(n.z, -1.0, epsilon = 1e-12);

        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vertex::new(0.0, 0.0, 0.0));
        assert_eq!(hi, Vertex::new(1.0, 1.0, 1.0));
        assert!(Mesh::new().bounds().is_none());
    }
}
