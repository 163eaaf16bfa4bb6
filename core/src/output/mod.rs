//! Serialization of comparison results for downstream consumers.

pub mod json;
pub mod json_lines;
