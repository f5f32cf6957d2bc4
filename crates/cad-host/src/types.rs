use std::fmt;

use serde::{Deserialize, Serialize};

/// Host identifier of a face within its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceId(pub u32);

/// Tessellation facet identifier. Valid only for the tessellation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacetId(pub u32);

/// Tessellation fin (directed facet edge) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinId(pub u32);

/// Tessellation vertex identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u32);

/// The kind of document open in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Part,
    Assembly,
    Drawing,
    Layout,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Part => "part",
            DocumentKind::Assembly => "assembly",
            DocumentKind::Drawing => "drawing",
            DocumentKind::Layout => "layout",
        };
        f.write_str(name)
    }
}

/// Component suppression state in the active configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionState {
    #[default]
    Resolved,
    FullyResolved,
    Suppressed,
    LightweightSuppressed,
}

impl SuppressionState {
    /// Only resolved components carry exportable geometry.
    pub fn is_exportable(self) -> bool {
        matches!(
            self,
            SuppressionState::Resolved | SuppressionState::FullyResolved
        )
    }
}

/// How the host reports component transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformConvention {
    /// Each component transform is already relative to the top-level assembly.
    #[default]
    Cumulative,
    /// Each component transform is relative to its parent component.
    ParentRelative,
}

/// How the tessellator treats facets on either side of a shared edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchType {
    #[default]
    None,
    /// Facets on both sides of an edge share the same edge subdivision.
    FacetTopology,
}

/// Settings handed to the host tessellator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TessellationRequest {
    pub need_face_facet_map: bool,
    pub need_vertex_normals: bool,
    pub need_vertex_params: bool,
    pub improved_quality: bool,
    pub match_type: MatchType,
}

/// Slot layout of a host material value array.
///
/// Full layout: `[R, G, B, Ambient, Diffuse, Specular, Shininess, Transparency, Emission]`.
/// A plain base-color array is `[R, G, B, A]`. Only the slots the exporter
/// reads are named.
pub mod material_slot {
    pub const RED: usize = 0;
    pub const GREEN: usize = 1;
    pub const BLUE: usize = 2;
    /// Alpha of a 4-channel base-color array.
    pub const ALPHA: usize = 3;
    pub const TRANSPARENCY: usize = 7;

    /// Length of a fully populated array.
    pub const COUNT: usize = 9;
}

/// Errors reported by the host.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("tessellation unavailable: {reason}")]
    TessellationUnavailable { reason: String },

    #[error("invalid document description: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_resolved_states_export() {
        assert!(SuppressionState::Resolved.is_exportable());
        assert!(SuppressionState::FullyResolved.is_exportable());
        assert!(!SuppressionState::Suppressed.is_exportable());
        assert!(!SuppressionState::LightweightSuppressed.is_exportable());
    }

    #[test]
    fn document_kind_display() {
        assert_eq!(DocumentKind::Drawing.to_string(), "drawing");
        assert_eq!(DocumentKind::Assembly.to_string(), "assembly");
    }
}
