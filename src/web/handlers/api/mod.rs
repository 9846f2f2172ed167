//! API 处理器

pub mod stats;
pub mod translation;

pub use stats::*;
pub use translation::*;
