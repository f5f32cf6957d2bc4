use serde::{Deserialize, Serialize};

use crate::appearance::Appearance;
use crate::matrix::Mat4;
use crate::mesh::IndexedMesh;

/// A contiguous run of triangles that share one resolved appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceGroup {
    pub appearance: Appearance,
    pub first_triangle: usize,
    pub triangle_count: usize,
}

impl FaceGroup {
    pub fn end_triangle(&self) -> usize {
        self.first_triangle + self.triangle_count
    }
}

/// One exported body: welded mesh, appearance, world placement and name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub mesh: IndexedMesh,
    /// Body-level effective appearance (face overrides not applied).
    pub appearance: Appearance,
    /// Partition of `mesh.triangles` by face-level appearance, in order.
    pub face_groups: Vec<FaceGroup>,
    pub world_transform: Mat4,
}

impl SceneNode {
    /// Node whose whole mesh uses a single appearance.
    pub fn uniform(
        name: impl Into<String>,
        mesh: IndexedMesh,
        appearance: Appearance,
        world_transform: Mat4,
    ) -> Self {
        let face_groups = vec![FaceGroup {
            appearance: appearance.clone(),
            first_triangle: 0,
            triangle_count: mesh.triangle_count(),
        }];
        Self {
            name: name.into(),
            mesh,
            appearance,
            face_groups,
            world_transform,
        }
    }

    /// Groups are non-empty, ordered, and cover every triangle exactly once.
    pub fn groups_cover_mesh(&self) -> bool {
        let mut next = 0;
        for group in &self.face_groups {
            if group.first_triangle != next || group.triangle_count == 0 {
                return false;
            }
            next = group.end_triangle();
        }
        next == self.mesh.triangle_count()
    }
}

/// The flattened, exportable scene in tree-walk order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SceneNode> {
        self.nodes.iter()
    }

    pub fn triangle_count(&self) -> usize {
        self.nodes.iter().map(|n| n.mesh.triangle_count()).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.nodes.iter().map(|n| n.mesh.vertex_count()).sum()
    }
}
