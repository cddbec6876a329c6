//! Tool protocol definitions.
//!
//! Every operation the engine exposes to its caller is a tool.

mod context;
mod definition;
mod result;
mod traits;

pub use context::*;
pub use definition::*;
pub use result::*;
pub use traits::*;
