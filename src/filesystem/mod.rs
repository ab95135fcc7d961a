//! Filesystem realization of a declared layout.
//!
//! The materializer turns a [`StructureNode`](crate::layout::StructureNode)
//! tree into real directories and empty files; the renderer walks the result
//! back into printable tree lines. The two are coupled only through the
//! filesystem and are sequenced by the caller.

mod materialize;
mod render;

pub use materialize::{MaterializeError, Materializer};
pub use render::{RenderError, TreeLine, render};
