//! Small utilities shared across the crate.

pub mod text;
pub mod unit;
pub mod xml;
