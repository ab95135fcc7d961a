//! Declarative description of the directory layout to materialize.
//!
//! A layout is a tree of [`StructureNode`]s: named directories holding further
//! nodes, flat groups of empty files, and single empty-file leaves. The tree is
//! read from a YAML manifest and consumed read-only by the materializer.

mod manifest;
mod node;

pub use manifest::{LAYOUT_FILE_NAME, Manifest, ManifestError};
pub use node::StructureNode;
