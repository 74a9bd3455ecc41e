pub mod arena;
pub mod bench;
pub mod boxed;
pub mod error;
pub mod timer;
pub mod tree;

pub use arena::{Arena, Node, NodeRef};
pub use error::ArenaError;
pub use tree::Tree;
