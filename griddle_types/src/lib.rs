pub mod assemble;
pub mod codec;
pub mod format;
