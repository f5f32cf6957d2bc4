//! Per-body vertex welding.
//!
//! Positions within L1 distance `epsilon` of an earlier position reuse that
//! position's index. Lookups go through a spatial hash with cells `epsilon`
//! wide, so a match can only live in the 3x3x3 neighbourhood of the query
//! cell.

use std::collections::HashMap;

use scene_types::{IndexedMesh, Point3, RawTriangle};

type Cell = (i64, i64, i64);

/// Incremental welder. Feed triangles with [`Welder::push`], then
/// [`Welder::finish`] to get the indexed mesh.
#[derive(Debug, Clone)]
pub struct Welder {
    epsilon: f32,
    cell_size: f64,
    exact: bool,
    mesh: IndexedMesh,
    grid: HashMap<Cell, Vec<u32>>,
    dropped: usize,
}

impl Welder {
    /// A non-positive or non-finite `epsilon` only merges identical positions.
    pub fn new(epsilon: f32) -> Self {
        let exact = !(epsilon.is_finite() && epsilon > 0.0);
        Self {
            epsilon,
            cell_size: if exact { 1.0 } else { epsilon as f64 },
            exact,
            mesh: IndexedMesh::new(),
            grid: HashMap::new(),
            dropped: 0,
        }
    }

    /// Index of the first position within tolerance, inserting `p` if none.
    pub fn insert_vertex(&mut self, p: Point3) -> u32 {
        let cell = self.cell_of(p);
        if let Some(existing) = self.find_near(p, cell) {
            return existing;
        }
        let index = self.mesh.vertices.len() as u32;
        self.mesh.vertices.push(p);
        self.grid.entry(cell).or_default().push(index);
        index
    }

    /// Weld one triangle. Returns `false` when all three corners collapse
    /// onto a single vertex and the triangle is dropped.
    pub fn push(&mut self, triangle: &RawTriangle) -> bool {
        let [a, b, c] = triangle.vertices;
        let len_before = self.mesh.vertices.len();
        let ia = self.insert_vertex(a);
        let ib = self.insert_vertex(b);
        let ic = self.insert_vertex(c);
        if ia == ib && ib == ic {
            // A collapsed triangle must not leave an unreferenced vertex behind.
            if ia as usize >= len_before {
                self.remove_last_vertex(a);
            }
            self.dropped += 1;
            return false;
        }
        self.mesh.triangles.push([ia, ib, ic]);
        true
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Triangles dropped because they collapsed to a point.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn finish(self) -> IndexedMesh {
        self.mesh
    }

    fn remove_last_vertex(&mut self, p: Point3) {
        let cell = self.cell_of(p);
        if let Some(bucket) = self.grid.get_mut(&cell) {
            bucket.pop();
            if bucket.is_empty() {
                self.grid.remove(&cell);
            }
        }
        self.mesh.vertices.pop();
    }

    fn cell_of(&self, p: Point3) -> Cell {
        (
            (p[0] as f64 / self.cell_size).floor() as i64,
            (p[1] as f64 / self.cell_size).floor() as i64,
            (p[2] as f64 / self.cell_size).floor() as i64,
        )
    }

    fn find_near(&self, p: Point3, cell: Cell) -> Option<u32> {
        let mut best: Option<u32> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = (
                        cell.0.saturating_add(dx),
                        cell.1.saturating_add(dy),
                        cell.2.saturating_add(dz),
                    );
                    let Some(candidates) = self.grid.get(&key) else {
                        continue;
                    };
                    for &idx in candidates {
                        if best.is_some_and(|b| b <= idx) {
                            continue;
                        }
                        if self.matches(self.mesh.vertices[idx as usize], p) {
                            best = Some(idx);
                        }
                    }
                }
            }
        }
        best
    }

    fn matches(&self, a: Point3, b: Point3) -> bool {
        if self.exact {
            a == b
        } else {
            l1_distance(a, b) < self.epsilon
        }
    }
}

/// L1 (sum of absolute per-axis differences) distance.
pub fn l1_distance(a: Point3, b: Point3) -> f32 {
    (a[0] - b[0]).abs() + (a[1] - b[1]).abs() + (a[2] - b[2]).abs()
}

/// Weld a whole triangle stream into one indexed mesh.
pub fn weld(triangles: &[RawTriangle], epsilon: f32) -> IndexedMesh {
    let mut welder = Welder::new(epsilon);
    for tri in triangles {
        welder.push(tri);
    }
    welder.finish()
}
