use std::fmt::{self, Write};

use scene_types::Scene;

/// Convert a scene to Wavefront OBJ text.
///
/// One `o` group per node, vertices in world space, 1-based face indices
/// offset across nodes. Materials are not written.
pub fn to_obj(scene: &Scene) -> String {
    let mut out = String::new();
    // Formatting into a String never fails.
    let _ = write_obj(&mut out, scene);
    out
}

/// Stream the OBJ text for `scene` into any formatter sink.
pub fn write_obj<W: Write>(out: &mut W, scene: &Scene) -> fmt::Result {
    writeln!(out, "# {}", crate::gltf::GENERATOR)?;
    writeln!(
        out,
        "# {} objects, {} vertices, {} triangles",
        scene.len(),
        scene.vertex_count(),
        scene.triangle_count()
    )?;

    let mut base = 1usize;
    for node in scene.iter() {
        writeln!(out, "o {}", node.name)?;
        for &v in &node.mesh.vertices {
            let [x, y, z] = node.world_transform.transform_point(v);
            writeln!(out, "v {x} {y} {z}")?;
        }
        for tri in &node.mesh.triangles {
            let [a, b, c] = tri.map(|i| i as usize + base);
            writeln!(out, "f {a} {b} {c}")?;
        }
        base += node.mesh.vertex_count();
    }
    Ok(())
}
