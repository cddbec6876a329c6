//! Common types used across pagehand crates.

mod common;

pub use common::*;
