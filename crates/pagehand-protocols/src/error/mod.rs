//! Error types for the pagehand protocol layer.

mod tool;

pub use tool::*;
