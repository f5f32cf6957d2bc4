use scene_types::Scene;

use crate::errors::FormatError;
use crate::gltf::build_document;

/// `glTF` in little-endian.
pub const GLB_MAGIC: u32 = 0x4654_6C67;
pub const GLB_VERSION: u32 = 2;
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
pub const CHUNK_BIN: u32 = 0x004E_4942;
pub const HEADER_LEN: usize = 12;
pub const CHUNK_HEADER_LEN: usize = 8;

/// Convert a scene to a binary glTF container.
///
/// Layout:
/// - 12 bytes: magic, version, total length (3 × u32 LE)
/// - JSON chunk: length, type, document padded with spaces to 4 bytes
/// - BIN chunk: length, type, buffer padded with zeros to 4 bytes
pub fn to_glb(scene: &Scene) -> Result<Vec<u8>, FormatError> {
    let doc = build_document(scene)?;
    let mut json = serde_json::to_vec(&doc.root)?;
    pad_to_four(&mut json, b' ');
    let mut bin = doc.bin;
    pad_to_four(&mut bin, 0);

    let mut total = HEADER_LEN + CHUNK_HEADER_LEN + json.len();
    if !bin.is_empty() {
        total += CHUNK_HEADER_LEN + bin.len();
    }
    let total_u32 = u32::try_from(total).map_err(|_| FormatError::Serialize {
        reason: format!("GLB size {total} exceeds the 32-bit limit"),
    })?;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&total_u32.to_le_bytes());

    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json);

    if !bin.is_empty() {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(&bin);
    }
    Ok(out)
}

fn pad_to_four(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_types::{Appearance, IndexedMesh, Mat4, SceneNode};

    fn read_u32(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn triangle_scene() -> Scene {
        let mesh = IndexedMesh {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            triangles: vec![[0, 1, 2]],
        };
        let mut scene = Scene::new();
        scene.push(SceneNode::uniform(
            "tri",
            mesh,
            Appearance::fallback(),
            Mat4::identity(),
        ));
        scene
    }

    #[test]
    fn header_and_chunks_are_laid_out() {
        let glb = to_glb(&triangle_scene()).unwrap();
        assert_eq!(&glb[0..4], b"glTF");
        assert_eq!(read_u32(&glb, 4), 2);
        assert_eq!(read_u32(&glb, 8) as usize, glb.len());

        let json_len = read_u32(&glb, 12) as usize;
        assert_eq!(json_len % 4, 0);
        assert_eq!(read_u32(&glb, 16), CHUNK_JSON);
        let json = &glb[20..20 + json_len];
        assert!(serde_json::from_slice::<serde_json::Value>(json).is_ok());

        let bin_at = 20 + json_len;
        // 36 bytes of positions + 12 bytes of indices.
        assert_eq!(read_u32(&glb, bin_at), 48);
        assert_eq!(read_u32(&glb, bin_at + 4), CHUNK_BIN);
        assert_eq!(glb.len(), bin_at + 8 + 48);
    }

    #[test]
    fn json_chunk_has_no_buffer_uri() {
        let glb = to_glb(&triangle_scene()).unwrap();
        let json_len = read_u32(&glb, 12) as usize;
        let json: serde_json::Value = serde_json::from_slice(&glb[20..20 + json_len]).unwrap();
        assert!(json["buffers"][0].get("uri").is_none());
        assert_eq!(json["buffers"][0]["byteLength"], 48);
    }

    #[test]
    fn padding_uses_spaces_then_zeros() {
        let mut json = b"{}".to_vec();
        pad_to_four(&mut json, b' ');
        assert_eq!(json, b"{}  ");
        let mut bin = vec![1u8; 5];
        pad_to_four(&mut bin, 0);
        assert_eq!(bin, vec![1, 1, 1, 1, 1, 0, 0, 0]);
    }
}
