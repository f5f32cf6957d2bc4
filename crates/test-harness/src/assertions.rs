//! Assertion helpers with diagnostic messages.
//!
//! Each returns `Err(HarnessError::AssertionFailed)` carrying the context
//! string, so scenario tests can chain them with `?`.

use scene_types::{Scene, SceneNode};

use crate::helpers::HarnessError;
use crate::oracle::{run_all_scene_checks, OracleVerdict};

fn fail(detail: String) -> Result<(), HarnessError> {
    Err(HarnessError::AssertionFailed { detail })
}

/// Find a node by its full path name.
pub fn node<'a>(scene: &'a Scene, name: &str) -> Result<&'a SceneNode, HarnessError> {
    scene
        .iter()
        .find(|n| n.name == name)
        .ok_or_else(|| HarnessError::NodeNotFound {
            name: name.to_string(),
        })
}

/// Assert the scene's node names, in order.
pub fn assert_node_names(scene: &Scene, expected: &[&str], ctx: &str) -> Result<(), HarnessError> {
    let actual: Vec<&str> = scene.iter().map(|n| n.name.as_str()).collect();
    if actual != expected {
        return fail(format!("[{ctx}] expected nodes {expected:?}, got {actual:?}"));
    }
    Ok(())
}

/// Assert exact vertex and triangle counts of a node's welded mesh.
pub fn assert_mesh_counts(
    node: &SceneNode,
    vertices: usize,
    triangles: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let (v, t) = (node.mesh.vertex_count(), node.mesh.triangle_count());
    if v != vertices || t != triangles {
        return fail(format!(
            "[{ctx}] '{}': expected {vertices} vertices / {triangles} triangles, got {v} / {t}",
            node.name
        ));
    }
    Ok(())
}

/// Assert the translation column of a node's world transform.
pub fn assert_translation(
    node: &SceneNode,
    expected: [f32; 3],
    tolerance: f32,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = node.world_transform.translation();
    let off = actual
        .iter()
        .zip(expected.iter())
        .any(|(a, e)| (a - e).abs() > tolerance);
    if off {
        return fail(format!(
            "[{ctx}] '{}': expected translation {expected:?}, got {actual:?}",
            node.name
        ));
    }
    Ok(())
}

/// Assert the RGBA of every face group, in order.
pub fn assert_group_colors(
    node: &SceneNode,
    expected: &[[f32; 4]],
    tolerance: f32,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual: Vec<[f32; 4]> = node
        .face_groups
        .iter()
        .map(|g| g.appearance.base_color)
        .collect();
    let matches = actual.len() == expected.len()
        && actual.iter().zip(expected).all(|(a, e)| {
            a.iter().zip(e.iter()).all(|(x, y)| (x - y).abs() <= tolerance)
        });
    if !matches {
        return fail(format!(
            "[{ctx}] '{}': expected group colors {expected:?}, got {actual:?}",
            node.name
        ));
    }
    Ok(())
}

/// Assert the body-level color of a node.
pub fn assert_body_color(
    node: &SceneNode,
    expected: [f32; 4],
    tolerance: f32,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = node.appearance.base_color;
    if actual.iter().zip(expected.iter()).any(|(a, e)| (a - e).abs() > tolerance) {
        return fail(format!(
            "[{ctx}] '{}': expected body color {expected:?}, got {actual:?}",
            node.name
        ));
    }
    Ok(())
}

/// Run every scene oracle and fail on the first verdict that did not pass.
pub fn assert_scene_valid(scene: &Scene, eps: f32, ctx: &str) -> Result<(), HarnessError> {
    let failures: Vec<OracleVerdict> = run_all_scene_checks(scene, eps)
        .into_iter()
        .filter(|v| !v.passed)
        .collect();
    match failures.first() {
        None => Ok(()),
        Some(v) => Err(HarnessError::OracleFailure {
            oracle: v.oracle_name.clone(),
            detail: format!("[{ctx}] {} ({} failing checks)", v.detail, failures.len()),
        }),
    }
}
