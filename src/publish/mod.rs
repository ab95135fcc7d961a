//! Collaborators that turn a materialized tree into a published repository.
//!
//! Thin wrappers with no traversal logic of their own: `git` shells out for
//! the version-control bootstrap, `remote` provisions the GitHub repository
//! over HTTP. Both run only after the core pipeline has succeeded.

mod git;
mod remote;

pub use git::{GitBootstrap, GitError};
pub use remote::{PublishError, RemotePublisher};
