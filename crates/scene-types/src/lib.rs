pub mod appearance;
pub mod matrix;
pub mod mesh;
pub mod progress;
pub mod scene;

pub use appearance::*;
pub use matrix::*;
pub use mesh::*;
pub use progress::*;
pub use scene::*;
