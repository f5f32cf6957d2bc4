//! Scene assembly: turns a host document into a flat list of scene nodes.
//!
//! Per body the pipeline is tessellate -> weld -> resolve appearance ->
//! compose transform. [`SceneAssembler`] drives the walk over the document
//! tree and owns the state machine.

pub mod assembler;
pub mod material;
pub mod tessellate;
pub mod transform;
pub mod types;
pub mod weld;

pub use assembler::SceneAssembler;
pub use material::MaterialResolver;
pub use tessellate::{tessellate, tessellate_faces, BodyTessellation, FaceTriangles};
pub use transform::{to_world_transform, Affine};
pub use types::*;
pub use weld::{weld, Welder};
