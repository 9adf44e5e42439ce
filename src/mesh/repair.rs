//! Winding repair and duplicate-face removal.

use super::types::{Face, Mesh, face_edges, face_key};
use std::collections::{HashMap, HashSet, VecDeque};

impl Mesh {
    /// Make winding consistent and outward-facing.
    ///
    /// Faces are grouped into components connected through shared edges.
    /// Within a component, a breadth-first walk flips every neighbour that
    /// traverses a shared edge in the same direction as the face it was
    /// reached from. A component whose resulting signed volume is negative
    /// is then inverted as a whole.
    ///
    /// Returns the number of faces whose winding changed.
    pub fn fix_normals(&mut self) -> usize {
        let mut edge_faces: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        for (i, face) in self.faces.iter().enumerate() {
            for (a, b) in face_edges(face) {
                edge_faces.entry((a.min(b), a.max(b))).or_default().push(i);
            }
        }

        let mut flipped = vec![false; self.faces.len()];
        let mut visited = vec![false; self.faces.len()];
        let mut queue = VecDeque::new();

        for seed in 0..self.faces.len() {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;
            queue.push_back(seed);
            let mut component = Vec::new();

            while let Some(current) = queue.pop_front() {
                component.push(current);
                for (a, b) in face_edges(&self.faces[current]) {
                    let Some(neighbours) = edge_faces.get(&(a.min(b), a.max(b))) else {
                        continue;
                    };
                    for &next in neighbours {
                        if visited[next] {
                            continue;
                        }
                        visited[next] = true;
                        if face_edges(&self.faces[next]).contains(&(a, b)) {
                            flip(&mut self.faces[next]);
                            flipped[next] = !flipped[next];
                        }
                        queue.push_back(next);
                    }
                }
            }

            let volume = self.signed_volume_of(component.iter().map(|&i| &self.faces[i]));
            if volume < 0.0 {
                for &i in &component {
                    flip(&mut self.faces[i]);
                    flipped[i] = !flipped[i];
                }
            }
        }

        flipped.iter().filter(|&&f| f).count()
    }

    /// Drop faces that reference the same three vertex indices as an earlier face.
    ///
    /// Comparison is on sorted index triples, not on positions: two faces
    /// built from distinct but coincident vertices both survive. The first
    /// occurrence is kept and emission order is preserved.
    ///
    /// Returns the number of faces removed.
    pub fn remove_duplicate_faces(&mut self) -> usize {
        let before = self.faces.len();
        let mut seen: HashSet<Face> = HashSet::with_capacity(before);
        self.faces.retain(|face| seen.insert(face_key(face)));
        before - self.faces.len()
    }
}

#[inline]
fn flip(face: &mut Face) {
    face.swap(1, 2);
}
