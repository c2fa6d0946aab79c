mod bucket;
mod build;
mod chunk;
mod tree;

pub use bucket::*;
pub use build::*;
pub use chunk::*;
pub use tree::*;
