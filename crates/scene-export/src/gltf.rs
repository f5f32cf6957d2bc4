//! glTF 2.0 document model and scene -> document builder.
//!
//! Only the subset the exporter writes is modelled. Every node gets its own
//! mesh, position accessor and pair of buffer views (positions, indices);
//! each face group becomes one primitive with its own index accessor into
//! the node's index view. All views live in a single buffer.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use scene_types::{Appearance, FaceGroup, Scene, SceneNode};
use serde::Serialize;

use crate::errors::FormatError;

pub const GLTF_VERSION: &str = "2.0";
pub const GENERATOR: &str = concat!("scene-export ", env!("CARGO_PKG_VERSION"));

pub const COMPONENT_FLOAT: u32 = 5126;
pub const COMPONENT_UNSIGNED_INT: u32 = 5125;
pub const TARGET_ARRAY_BUFFER: u32 = 34962;
pub const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;
pub const MODE_TRIANGLES: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GltfRoot {
    pub asset: Asset,
    pub scene: u32,
    pub scenes: Vec<GltfScene>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub buffers: Vec<Buffer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    pub version: String,
    pub generator: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GltfScene {
    pub nodes: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub name: String,
    pub mesh: u32,
    /// Column-major; omitted for the identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[f32; 16]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mesh {
    pub name: String,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Primitive {
    pub attributes: BTreeMap<String, u32>,
    pub indices: u32,
    pub material: u32,
    pub mode: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub pbr_metallic_roughness: PbrMetallicRoughness,
    pub double_sided: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    pub base_color_factor: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    pub buffer_view: u32,
    pub byte_offset: u32,
    pub component_type: u32,
    pub count: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<[f32; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: u32,
    pub byte_offset: u32,
    pub byte_length: u32,
    pub target: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    pub byte_length: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// A built document and the bytes of its single buffer.
#[derive(Debug, Clone)]
pub struct GltfDocument {
    pub root: GltfRoot,
    pub bin: Vec<u8>,
}

/// Build the document for `scene`. The buffer has no URI yet.
pub fn build_document(scene: &Scene) -> Result<GltfDocument, FormatError> {
    let mut builder = Builder::default();
    for node in scene.iter() {
        builder.add_node(node)?;
    }
    builder.finish()
}

/// `.gltf` bytes: pretty JSON with the buffer embedded as a data URI.
pub fn to_gltf(scene: &Scene) -> Result<Vec<u8>, FormatError> {
    let GltfDocument { mut root, bin } = build_document(scene)?;
    if let Some(buffer) = root.buffers.first_mut() {
        buffer.uri = Some(format!(
            "data:application/octet-stream;base64,{}",
            STANDARD.encode(&bin)
        ));
    }
    Ok(serde_json::to_vec_pretty(&root)?)
}

#[derive(Default)]
struct Builder {
    nodes: Vec<Node>,
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    appearances: Vec<Appearance>,
    accessors: Vec<Accessor>,
    buffer_views: Vec<BufferView>,
    bin: Vec<u8>,
}

impl Builder {
    fn add_node(&mut self, node: &SceneNode) -> Result<(), FormatError> {
        let mesh = &node.mesh;

        let positions_view = self.push_view(TARGET_ARRAY_BUFFER, |bin| {
            for v in &mesh.vertices {
                for c in v {
                    bin.extend_from_slice(&c.to_le_bytes());
                }
            }
        })?;
        let (min, max) = mesh
            .bounding_box()
            .map_or((None, None), |(lo, hi)| (Some(lo), Some(hi)));
        let position_accessor = self.accessors.len() as u32;
        self.accessors.push(Accessor {
            buffer_view: positions_view,
            byte_offset: 0,
            component_type: COMPONENT_FLOAT,
            count: to_u32(mesh.vertex_count())?,
            kind: "VEC3".into(),
            min,
            max,
        });

        let indices_view = self.push_view(TARGET_ELEMENT_ARRAY_BUFFER, |bin| {
            for tri in &mesh.triangles {
                for i in tri {
                    bin.extend_from_slice(&i.to_le_bytes());
                }
            }
        })?;

        // A mesh needs at least one primitive; ungrouped nodes get one over
        // the whole mesh in the body appearance.
        let whole_mesh;
        let groups = if node.face_groups.is_empty() {
            whole_mesh = [FaceGroup {
                appearance: node.appearance.clone(),
                first_triangle: 0,
                triangle_count: mesh.triangle_count(),
            }];
            &whole_mesh[..]
        } else {
            &node.face_groups[..]
        };

        let mut primitives = Vec::with_capacity(groups.len());
        for group in groups {
            let indices = self.accessors.len() as u32;
            self.accessors.push(Accessor {
                buffer_view: indices_view,
                byte_offset: to_u32(group.first_triangle * 12)?,
                component_type: COMPONENT_UNSIGNED_INT,
                count: to_u32(group.triangle_count * 3)?,
                kind: "SCALAR".into(),
                min: None,
                max: None,
            });
            let material = self.material_index(&group.appearance);
            primitives.push(Primitive {
                attributes: BTreeMap::from([("POSITION".to_string(), position_accessor)]),
                indices,
                material,
                mode: MODE_TRIANGLES,
            });
        }

        let mesh_index = self.meshes.len() as u32;
        self.meshes.push(Mesh {
            name: node.name.clone(),
            primitives,
        });
        let transform = node.world_transform;
        self.nodes.push(Node {
            name: node.name.clone(),
            mesh: mesh_index,
            matrix: (!transform.is_identity()).then_some(transform.m),
        });
        Ok(())
    }

    /// Append a buffer view whose bytes are written by `fill`.
    fn push_view(
        &mut self,
        target: u32,
        fill: impl FnOnce(&mut Vec<u8>),
    ) -> Result<u32, FormatError> {
        let start = self.bin.len();
        fill(&mut self.bin);
        let view = self.buffer_views.len() as u32;
        self.buffer_views.push(BufferView {
            buffer: 0,
            byte_offset: to_u32(start)?,
            byte_length: to_u32(self.bin.len() - start)?,
            target,
        });
        Ok(view)
    }

    fn material_index(&mut self, appearance: &Appearance) -> u32 {
        if let Some(i) = self.appearances.iter().position(|a| a == appearance) {
            return i as u32;
        }
        self.appearances.push(appearance.clone());
        self.materials.push(Material {
            name: appearance.name.clone(),
            pbr_metallic_roughness: PbrMetallicRoughness {
                base_color_factor: appearance.base_color,
            },
            double_sided: appearance.double_sided,
            alpha_mode: (!appearance.is_opaque()).then(|| "BLEND".to_string()),
        });
        (self.materials.len() - 1) as u32
    }

    fn finish(self) -> Result<GltfDocument, FormatError> {
        let buffers = if self.bin.is_empty() {
            Vec::new()
        } else {
            vec![Buffer {
                byte_length: to_u32(self.bin.len())?,
                uri: None,
            }]
        };
        let root = GltfRoot {
            asset: Asset {
                version: GLTF_VERSION.into(),
                generator: GENERATOR.into(),
            },
            scene: 0,
            scenes: vec![GltfScene {
                nodes: (0..self.nodes.len() as u32).collect(),
            }],
            nodes: self.nodes,
            meshes: self.meshes,
            materials: self.materials,
            accessors: self.accessors,
            buffer_views: self.buffer_views,
            buffers,
        };
        Ok(GltfDocument {
            root,
            bin: self.bin,
        })
    }
}

fn to_u32(n: usize) -> Result<u32, FormatError> {
    u32::try_from(n).map_err(|_| FormatError::Serialize {
        reason: format!("size {n} exceeds the 32-bit glTF limit"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_types::{FaceGroup, IndexedMesh, Mat4};

    fn quad_node(name: &str, transform: Mat4) -> SceneNode {
        let mesh = IndexedMesh {
            vertices: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
        };
        SceneNode::uniform(name, mesh, Appearance::fallback(), transform)
    }

    #[test]
    fn buffer_layout_per_node() {
        let mut scene = Scene::new();
        scene.push(quad_node("a", Mat4::identity()));
        scene.push(quad_node("b", Mat4::from_translation(1.0, 2.0, 3.0)));
        let doc = build_document(&scene).unwrap();

        // Two nodes x (48 bytes positions + 24 bytes indices).
        assert_eq!(doc.bin.len(), 144);
        assert_eq!(doc.root.buffer_views.len(), 4);
        assert_eq!(doc.root.buffer_views[2].byte_offset, 72);
        assert_eq!(doc.root.buffer_views[1].target, TARGET_ELEMENT_ARRAY_BUFFER);
        assert_eq!(doc.root.accessors[0].min, Some([0.0, 0.0, 0.0]));
        assert_eq!(doc.root.accessors[0].max, Some([1.0, 1.0, 0.0]));
        assert_eq!(doc.root.buffers[0].byte_length, 144);
        assert!(doc.root.buffers[0].uri.is_none());
    }

    #[test]
    fn identity_matrix_is_omitted() {
        let mut scene = Scene::new();
        scene.push(quad_node("a", Mat4::identity()));
        scene.push(quad_node("b", Mat4::from_translation(1.0, 2.0, 3.0)));
        let doc = build_document(&scene).unwrap();
        assert!(doc.root.nodes[0].matrix.is_none());
        let m = doc.root.nodes[1].matrix.unwrap();
        assert_eq!(&m[12..15], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn materials_are_deduplicated_and_blend_when_translucent() {
        let glass = Appearance::from_rgba([0.5, 0.5, 1.0, 0.4]).with_name("glass");
        let mut node = quad_node("a", Mat4::identity());
        node.face_groups = vec![
            FaceGroup {
                appearance: Appearance::fallback(),
                first_triangle: 0,
                triangle_count: 1,
            },
            FaceGroup {
                appearance: glass,
                first_triangle: 1,
                triangle_count: 1,
            },
        ];
        let mut scene = Scene::new();
        scene.push(node);
        scene.push(quad_node("b", Mat4::identity()));
        let doc = build_document(&scene).unwrap();

        assert_eq!(doc.root.materials.len(), 2);
        assert_eq!(doc.root.materials[0].alpha_mode, None);
        assert_eq!(doc.root.materials[1].alpha_mode.as_deref(), Some("BLEND"));
        assert_eq!(doc.root.meshes[0].primitives.len(), 2);
        assert_eq!(doc.root.meshes[1].primitives[0].material, 0);
        // Second primitive starts one triangle into the index view.
        let second = doc.root.meshes[0].primitives[1].indices as usize;
        assert_eq!(doc.root.accessors[second].byte_offset, 12);
        assert_eq!(doc.root.accessors[second].count, 3);
    }

    #[test]
    fn ungrouped_node_gets_one_whole_mesh_primitive() {
        let steel = Appearance::from_rgba([0.6, 0.6, 0.6, 1.0]).with_name("steel");
        let mut node = quad_node("loose", Mat4::identity());
        node.appearance = steel.clone();
        node.face_groups.clear();
        let mut scene = Scene::new();
        scene.push(node);
        let doc = build_document(&scene).unwrap();

        let primitives = &doc.root.meshes[0].primitives;
        assert_eq!(primitives.len(), 1);
        let indices = &doc.root.accessors[primitives[0].indices as usize];
        assert_eq!(indices.byte_offset, 0);
        assert_eq!(indices.count, 6);
        assert_eq!(doc.root.materials.len(), 1);
        assert_eq!(doc.root.materials[0].name.as_deref(), Some("steel"));
    }

    #[test]
    fn embedded_json_uses_gltf_field_names() {
        let mut scene = Scene::new();
        scene.push(quad_node("a", Mat4::identity()));
        let bytes = to_gltf(&scene).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["asset"]["version"], "2.0");
        assert_eq!(json["bufferViews"][0]["byteLength"], 48);
        assert_eq!(json["accessors"][0]["componentType"], COMPONENT_FLOAT);
        assert_eq!(json["accessors"][0]["type"], "VEC3");
        assert_eq!(
            json["materials"][0]["pbrMetallicRoughness"]["baseColorFactor"][0],
            1.0
        );
        let uri = json["buffers"][0]["uri"].as_str().unwrap();
        assert!(uri.starts_with("data:application/octet-stream;base64,"));
    }
}
