//! The two migration pipelines and their extraction/output helpers.

pub mod dump;
pub mod emit;
pub mod media;
pub mod remap;
