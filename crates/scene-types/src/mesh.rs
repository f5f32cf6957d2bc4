use serde::{Deserialize, Serialize};

/// A position in body-local or world space.
pub type Point3 = [f32; 3];

/// One triangle as it comes out of the host tessellation, before welding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawTriangle {
    pub vertices: [Point3; 3],
}

impl RawTriangle {
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }
}

/// Welded triangle mesh: unique positions plus index triples.
///
/// Every index is `< vertices.len()`. No two vertices lie within the weld
/// epsilon of each other (L1 metric).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexedMesh {
    /// Unique vertex positions in insertion order.
    pub vertices: Vec<Point3>,
    /// Triangle index triples into `vertices`.
    pub triangles: Vec<[u32; 3]>,
}

impl IndexedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// A mesh without triangles is never emitted into a scene.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// True when every triangle index references an existing vertex.
    pub fn indices_in_range(&self) -> bool {
        let n = self.vertices.len() as u32;
        self.triangles.iter().all(|t| t.iter().all(|&i| i < n))
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for a mesh without vertices.
    pub fn bounding_box(&self) -> Option<(Point3, Point3)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        Some((min, max))
    }

    /// Re-expand the index buffer back into standalone triangles.
    pub fn expand(&self) -> Vec<RawTriangle> {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                RawTriangle::new(
                    self.vertices[a as usize],
                    self.vertices[b as usize],
                    self.vertices[c as usize],
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> IndexedMesh {
        IndexedMesh {
            vertices: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, -2.0],
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    #[test]
    fn bounding_box_spans_all_vertices() {
        let (min, max) = quad().bounding_box().unwrap();
        assert_eq!(min, [0.0, 0.0, -2.0]);
        assert_eq!(max, [1.0, 1.0, 0.0]);
        assert!(IndexedMesh::new().bounding_box().is_none());
    }

    #[test]
    fn expand_reproduces_triangles() {
        let tris = quad().expand();
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[1].vertices[2], [0.0, 1.0, -2.0]);
    }

    #[test]
    fn out_of_range_index_detected() {
        let mut mesh = quad();
        assert!(mesh.indices_in_range());
        mesh.triangles.push([0, 1, 4]);
        assert!(!mesh.indices_in_range());
    }
}
