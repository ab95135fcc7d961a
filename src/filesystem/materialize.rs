use std::path::{Path, PathBuf};

use compio::fs;
use futures::future::LocalBoxFuture;
use snafu::prelude::*;
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::layout::StructureNode;

/// Creates directories and empty files to match a declared layout.
///
/// Directories are created with create-if-absent semantics, so repeated runs
/// against the same base path succeed. Files are created empty and truncate
/// whatever was there before, matching the reference behavior; `overwrite:
/// false` opts out of the truncation and leaves existing files untouched.
/// Materialization is additive and never deletes unrelated entries, and there
/// is no rollback: entries created before a failing step remain on disk.
#[derive(Debug, Clone)]
pub struct Materializer {
    overwrite: bool,
}

impl Materializer {
    pub fn new(overwrite: bool) -> Self {
        Self { overwrite }
    }

    pub fn materialize<'a>(
        &'a self,
        base_path: &'a Path,
        node: &'a StructureNode,
    ) -> LocalBoxFuture<'a, Result<(), MaterializeError>> {
        Box::pin(async move {
            match node {
                StructureNode::Directory { children } => {
                    self.ensure_directory(base_path).await?;
                    for (name, child) in children {
                        let child_path = base_path.join(name);
                        self.materialize(&child_path, child).await?;
                    }
                }
                StructureNode::FileGroup { names } => {
                    self.ensure_directory(base_path).await?;
                    for name in names {
                        let file_path = base_path.join(name);
                        self.create_empty_file(&file_path).await?;
                    }
                }
                StructureNode::EmptyFile => {
                    // The enclosing directory was created by the parent call
                    self.create_empty_file(base_path).await?;
                }
            }
            Ok(())
        })
    }

    async fn ensure_directory(&self, path: &Path) -> Result<(), MaterializeError> {
        debug!("Ensuring directory: {}", path.best_effort_path_display());
        fs::create_dir_all(path).await.context(CreateDirSnafu {
            path: path.to_path_buf(),
        })
    }

    async fn create_empty_file(&self, path: &Path) -> Result<(), MaterializeError> {
        if !self.overwrite
            && let Ok(metadata) = fs::metadata(path).await
            && metadata.is_file()
        {
            debug!(
                "Keeping existing file: {}",
                path.best_effort_path_display()
            );
            return Ok(());
        }
        debug!("Creating empty file: {}", path.best_effort_path_display());
        let file = fs::File::create(path).await.context(CreateFileSnafu {
            path: path.to_path_buf(),
        })?;
        drop(file);
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum MaterializeError {
    #[snafu(display("Failed to create directory {}", path.best_effort_path_display()))]
    CreateDirError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to create file {}", path.best_effort_path_display()))]
    CreateFileError {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashlink::LinkedHashMap;
    use tempfile::TempDir;

    fn scaffold() -> StructureNode {
        let mut children = LinkedHashMap::new();
        children.insert(
            "pkg".to_string(),
            StructureNode::FileGroup {
                names: vec!["a.py".to_string(), "b.py".to_string()],
            },
        );
        children.insert("README.md".to_string(), StructureNode::EmptyFile);
        StructureNode::Directory { children }
    }

    #[compio::test]
    async fn materializes_file_groups_as_empty_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("x");

        Materializer::new(true)
            .materialize(&root, &scaffold())
            .await
            .expect("Materialization failed");

        for file in ["pkg/a.py", "pkg/b.py", "README.md"] {
            let metadata = std::fs::metadata(root.join(file)).expect("Declared file is missing");
            assert!(metadata.is_file());
            assert_eq!(metadata.len(), 0, "{file} should be empty");
        }
    }

    #[compio::test]
    async fn truncates_files_that_gained_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("x");
        let materializer = Materializer::new(true);

        materializer
            .materialize(&root, &scaffold())
            .await
            .expect("First materialization failed");
        std::fs::write(root.join("pkg/a.py"), "hello").expect("Failed to write file");

        materializer
            .materialize(&root, &scaffold())
            .await
            .expect("Second materialization failed");

        let metadata = std::fs::metadata(root.join("pkg/a.py")).unwrap();
        assert_eq!(metadata.len(), 0, "re-materialization should truncate");
    }

    #[compio::test]
    async fn keep_files_mode_preserves_existing_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("x");

        Materializer::new(true)
            .materialize(&root, &scaffold())
            .await
            .expect("First materialization failed");
        std::fs::write(root.join("pkg/a.py"), "hello").expect("Failed to write file");

        Materializer::new(false)
            .materialize(&root, &scaffold())
            .await
            .expect("Second materialization failed");

        let content = std::fs::read_to_string(root.join("pkg/a.py")).unwrap();
        assert_eq!(content, "hello");
    }

    #[compio::test]
    async fn directory_materialization_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("x");
        let materializer = Materializer::new(true);

        materializer
            .materialize(&root, &scaffold())
            .await
            .expect("First materialization failed");
        materializer
            .materialize(&root, &scaffold())
            .await
            .expect("Second materialization failed");

        assert!(root.join("pkg").is_dir());
    }

    #[compio::test]
    async fn materialization_is_additive() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("x");
        std::fs::create_dir_all(root.join("pkg")).unwrap();
        std::fs::write(root.join("pkg/unrelated.txt"), "keep me").unwrap();

        Materializer::new(true)
            .materialize(&root, &scaffold())
            .await
            .expect("Materialization failed");

        let content = std::fs::read_to_string(root.join("pkg/unrelated.txt")).unwrap();
        assert_eq!(content, "keep me");
    }

    #[compio::test]
    async fn errors_when_a_file_blocks_a_declared_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("x");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("pkg"), "a file, not a directory").unwrap();

        let result = Materializer::new(true).materialize(&root, &scaffold()).await;

        assert!(matches!(
            result,
            Err(MaterializeError::CreateDirError { .. })
        ));
    }

    #[compio::test]
    async fn errors_when_a_directory_blocks_a_declared_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("x");
        std::fs::create_dir_all(root.join("pkg/a.py")).unwrap();

        let result = Materializer::new(true).materialize(&root, &scaffold()).await;

        assert!(matches!(
            result,
            Err(MaterializeError::CreateFileError { .. })
        ));
    }
}
