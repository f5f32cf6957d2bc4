//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail instead of
//! panicking, so one pass over a scene collects every failure.

use std::collections::HashSet;

use scene_types::{Scene, SceneNode};

use crate::helpers::min_pairwise_distance;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }
}

// ── Mesh Oracles ────────────────────────────────────────────────────────────

/// Every triangle index refers to an existing vertex.
pub fn check_indices_in_range(node: &SceneNode) -> OracleVerdict {
    let name = "indices_in_range";
    let n = node.mesh.vertex_count();
    let bad = node
        .mesh
        .triangles
        .iter()
        .flatten()
        .filter(|&&i| i as usize >= n)
        .count();
    if bad == 0 {
        OracleVerdict::pass(name, format!("'{}': all indices < {n}", node.name))
    } else {
        OracleVerdict::fail_val(
            name,
            format!("'{}': {bad} indices out of range (vertex count {n})", node.name),
            bad as f64,
        )
    }
}

/// Every pair of distinct vertices is at least `eps` apart (L1).
pub fn check_vertices_welded(node: &SceneNode, eps: f32) -> OracleVerdict {
    let name = "vertices_welded";
    match min_pairwise_distance(&node.mesh.vertices) {
        None => OracleVerdict::pass(name, format!("'{}': fewer than two vertices", node.name)),
        Some(d) if d >= eps => OracleVerdict::pass_val(
            name,
            format!("'{}': closest pair {d} >= {eps}", node.name),
            d as f64,
        ),
        Some(d) => OracleVerdict::fail_val(
            name,
            format!("'{}': closest pair {d} within weld tolerance {eps}", node.name),
            d as f64,
        ),
    }
}

/// No triangle collapses onto a single vertex. Two-corner slivers are allowed.
pub fn check_no_collapsed_triangles(node: &SceneNode) -> OracleVerdict {
    let name = "no_collapsed_triangles";
    let collapsed = node
        .mesh
        .triangles
        .iter()
        .filter(|[a, b, c]| a == b && b == c)
        .count();
    if collapsed == 0 {
        OracleVerdict::pass(name, format!("'{}': no collapsed triangles", node.name))
    } else {
        OracleVerdict::fail_val(
            name,
            format!("'{}': {collapsed} triangles collapse to one vertex", node.name),
            collapsed as f64,
        )
    }
}

/// Every vertex is used by at least one triangle.
pub fn check_no_orphan_vertices(node: &SceneNode) -> OracleVerdict {
    let name = "no_orphan_vertices";
    let used: HashSet<u32> = node.mesh.triangles.iter().flatten().copied().collect();
    let orphans = node.mesh.vertex_count().saturating_sub(used.len());
    if orphans == 0 {
        OracleVerdict::pass(name, format!("'{}': every vertex referenced", node.name))
    } else {
        OracleVerdict::fail_val(
            name,
            format!("'{}': {orphans} unreferenced vertices", node.name),
            orphans as f64,
        )
    }
}

// ── Node Oracles ────────────────────────────────────────────────────────────

/// Face groups are ordered, non-empty and cover the mesh exactly once.
pub fn check_groups_cover_mesh(node: &SceneNode) -> OracleVerdict {
    let name = "groups_cover_mesh";
    if node.groups_cover_mesh() {
        OracleVerdict::pass_val(
            name,
            format!("'{}': {} groups", node.name, node.face_groups.len()),
            node.face_groups.len() as f64,
        )
    } else {
        let spans: Vec<String> = node
            .face_groups
            .iter()
            .map(|g| format!("{}..{}", g.first_triangle, g.end_triangle()))
            .collect();
        OracleVerdict::fail(
            name,
            format!(
                "'{}': groups [{}] do not partition {} triangles",
                node.name,
                spans.join(", "),
                node.mesh.triangle_count()
            ),
        )
    }
}

/// Adjacent face groups never share an appearance.
pub fn check_groups_merged(node: &SceneNode) -> OracleVerdict {
    let name = "groups_merged";
    let repeats = node
        .face_groups
        .windows(2)
        .filter(|w| w[0].appearance == w[1].appearance)
        .count();
    if repeats == 0 {
        OracleVerdict::pass(name, format!("'{}': adjacent groups differ", node.name))
    } else {
        OracleVerdict::fail_val(
            name,
            format!("'{}': {repeats} adjacent groups share an appearance", node.name),
            repeats as f64,
        )
    }
}

/// Color channels are within `[0, 1]` for the node and every group.
pub fn check_colors_in_range(node: &SceneNode) -> OracleVerdict {
    let name = "colors_in_range";
    let in_range = |c: &[f32; 4]| c.iter().all(|v| (0.0..=1.0).contains(v));
    let bad = std::iter::once(&node.appearance)
        .chain(node.face_groups.iter().map(|g| &g.appearance))
        .filter(|a| !in_range(&a.base_color))
        .count();
    if bad == 0 {
        OracleVerdict::pass(name, format!("'{}': colors in range", node.name))
    } else {
        OracleVerdict::fail_val(
            name,
            format!("'{}': {bad} appearances out of [0, 1]", node.name),
            bad as f64,
        )
    }
}

/// World transform is finite and its last row is `0 0 0 1`.
pub fn check_transform_affine(node: &SceneNode) -> OracleVerdict {
    let name = "transform_affine";
    let m = &node.world_transform.m;
    if m.iter().any(|v| !v.is_finite()) {
        return OracleVerdict::fail(name, format!("'{}': non-finite transform entry", node.name));
    }
    let last_row = [m[3], m[7], m[11], m[15]];
    if last_row == [0.0, 0.0, 0.0, 1.0] {
        OracleVerdict::pass(name, format!("'{}': affine", node.name))
    } else {
        OracleVerdict::fail(
            name,
            format!("'{}': last row {last_row:?} is not 0 0 0 1", node.name),
        )
    }
}

// ── Scene Oracles ───────────────────────────────────────────────────────────

/// The scene holds at least one node and no node is empty.
pub fn check_scene_not_empty(scene: &Scene) -> OracleVerdict {
    let name = "scene_not_empty";
    if scene.is_empty() {
        return OracleVerdict::fail(name, "scene has no nodes".to_string());
    }
    let empty: Vec<&str> = scene
        .iter()
        .filter(|n| n.mesh.is_empty())
        .map(|n| n.name.as_str())
        .collect();
    if empty.is_empty() {
        OracleVerdict::pass_val(
            name,
            format!("{} nodes, {} triangles", scene.len(), scene.triangle_count()),
            scene.triangle_count() as f64,
        )
    } else {
        OracleVerdict::fail(name, format!("empty nodes: {}", empty.join(", ")))
    }
}

/// Node names are unique within the scene.
pub fn check_unique_names(scene: &Scene) -> OracleVerdict {
    let name = "unique_names";
    let mut seen = HashSet::new();
    let dupes: Vec<&str> = scene
        .iter()
        .map(|n| n.name.as_str())
        .filter(|n| !seen.insert(*n))
        .collect();
    if dupes.is_empty() {
        OracleVerdict::pass(name, format!("{} distinct names", scene.len()))
    } else {
        OracleVerdict::fail(name, format!("duplicate names: {}", dupes.join(", ")))
    }
}

/// Run every oracle over `scene` with weld tolerance `eps`.
pub fn run_all_scene_checks(scene: &Scene, eps: f32) -> Vec<OracleVerdict> {
    let mut verdicts = vec![check_scene_not_empty(scene), check_unique_names(scene)];
    for node in scene.iter() {
        verdicts.push(check_indices_in_range(node));
        verdicts.push(check_vertices_welded(node, eps));
        verdicts.push(check_no_collapsed_triangles(node));
        verdicts.push(check_no_orphan_vertices(node));
        verdicts.push(check_groups_cover_mesh(node));
        verdicts.push(check_groups_merged(node));
        verdicts.push(check_colors_in_range(node));
        verdicts.push(check_transform_affine(node));
    }
    verdicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_builder::weld;
    use scene_types::{Appearance, IndexedMesh, Mat4, RawTriangle};

    fn node(vertices: Vec<[f32; 3]>, triangles: Vec<[u32; 3]>) -> SceneNode {
        SceneNode::uniform(
            "n",
            IndexedMesh {
                vertices,
                triangles,
            },
            Appearance::fallback(),
            Mat4::identity(),
        )
    }

    #[test]
    fn clean_triangle_passes_everything() {
        let mut scene = Scene::new();
        scene.push(node(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
        ));
        let verdicts = run_all_scene_checks(&scene, 1e-5);
        assert!(verdicts.iter().all(|v| v.passed), "{verdicts:#?}");
    }

    #[test]
    fn unwelded_pair_fails() {
        let n = node(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            vec![[0, 1, 2], [3, 2, 0]],
        );
        let v = check_vertices_welded(&n, 1e-5);
        assert!(!v.passed);
        assert_eq!(v.value, Some(0.0));
    }

    #[test]
    fn orphan_and_collapsed_detected() {
        let n = node(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 0, 0], [1, 1, 0]],
        );
        assert!(!check_no_collapsed_triangles(&n).passed);
        assert!(!check_no_orphan_vertices(&n).passed);
    }

    #[test]
    fn welded_sliver_passes_every_check() {
        let tris = [
            RawTriangle::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            RawTriangle::new([0.0, 0.0, 0.0], [0.0005, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        let mesh = weld(&tris, 1e-3);
        assert_eq!(mesh.triangles, vec![[0, 1, 2], [0, 0, 3]]);

        let scene = Scene {
            nodes: vec![SceneNode::uniform(
                "sliver",
                mesh,
                Appearance::fallback(),
                Mat4::identity(),
            )],
        };
        let failures: Vec<_> = run_all_scene_checks(&scene, 1e-3)
            .into_iter()
            .filter(|v| !v.passed)
            .collect();
        assert!(failures.is_empty(), "{failures:#?}");
    }

    #[test]
    fn pair_exactly_eps_apart_counts_as_welded() {
        let n = node(
            vec![[0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
        );
        let v = check_vertices_welded(&n, 0.5);
        assert!(v.passed, "{}", v.detail);
        assert_eq!(v.value, Some(0.5));
        assert!(!check_vertices_welded(&n, 0.75).passed);
    }

    #[test]
    fn duplicate_names_reported() {
        let tri = node(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
        );
        let scene = Scene {
            nodes: vec![tri.clone(), tri],
        };
        let v = check_unique_names(&scene);
        assert!(!v.passed);
        assert!(v.detail.contains('n'));
    }
}
