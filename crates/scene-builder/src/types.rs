use cad_host::DocumentKind;
use scene_types::Scene;
use serde::{Deserialize, Serialize};

/// Default weld tolerance, in model units (L1 distance).
pub const DEFAULT_WELD_EPSILON: f32 = 1e-5;

/// Host tessellation quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Standard,
    Improved,
}

/// Which host material arrays count as a usable override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialPolicy {
    /// Require the full 9-channel array.
    #[default]
    Extended,
    /// Accept a plain RGBA array.
    BaseColor,
}

impl MaterialPolicy {
    pub fn min_channels(self) -> usize {
        match self {
            MaterialPolicy::Extended => cad_host::material_slot::COUNT,
            MaterialPolicy::BaseColor => 4,
        }
    }
}

/// Settings for one assembly run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyOptions {
    pub quality: Quality,
    pub weld_epsilon: f32,
    pub material_policy: MaterialPolicy,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            quality: Quality::Standard,
            weld_epsilon: DEFAULT_WELD_EPSILON,
            material_policy: MaterialPolicy::Extended,
        }
    }
}

/// Assembler state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyState {
    Start,
    WalkingTree,
    PerBodyExtraction,
    Assembled,
    Finished,
    Failed,
}

/// Errors from the tessellation adapter. Always recoverable per body.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TessellationError {
    #[error("tessellation engine unavailable for body '{body}': {reason}")]
    EngineUnavailable { body: String, reason: String },
}

/// Why a body was left out of the scene.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error("body produced no triangles")]
    NoTriangles,
}

/// A body dropped during extraction; the walk continued past it.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedBody {
    pub name: String,
    pub reason: SkipReason,
}

/// Fatal assembly errors. The whole export stops.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("unsupported document kind: {0}")]
    UnsupportedDocumentKind(DocumentKind),

    #[error("document produced no exportable geometry")]
    EmptyScene,

    #[error("invalid assembly options: {reason}")]
    InvalidOptions { reason: String },

    #[error("export cancelled")]
    Cancelled,
}

/// Result of a successful assembly run.
#[derive(Debug, Clone)]
pub struct AssembledScene {
    pub scene: Scene,
    /// Bodies that were skipped, in walk order.
    pub skipped: Vec<SkippedBody>,
    /// Bodies visited, exported or not.
    pub bodies_total: usize,
}

impl AssembledScene {
    pub fn bodies_exported(&self) -> usize {
        self.scene.len()
    }
}
