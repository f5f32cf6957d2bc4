pub mod mock_host;
pub mod primitives;
pub mod traits;
pub mod types;

pub use mock_host::{MockBody, MockComponent, MockDocument, MockFace, MockTessellation};
pub use traits::*;
pub use types::*;
