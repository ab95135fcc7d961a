use std::fs;
use std::path::{Path, PathBuf};

use derive_more::Display;
use snafu::prelude::*;

use crate::ext::BestEffortPathExt;

const INDENT: &str = "    ";

/// One rendered row: an indentation depth and a label.
///
/// Directories carry a trailing `/` in their label; files do not. Display
/// matches the reference output: four spaces per depth level and a `+-- `
/// marker before the label.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{}+-- {}", INDENT.repeat(*depth), label)]
pub struct TreeLine {
    pub depth: usize,
    pub label: String,
}

impl TreeLine {
    pub fn is_directory(&self) -> bool {
        self.label.ends_with('/')
    }

    pub fn indent(&self) -> String {
        INDENT.repeat(self.depth)
    }
}

/// Walks the directory subtree under `root_path` and produces one line per
/// entry, depth-first, the root itself first at depth zero.
///
/// Within a directory, subdirectories are listed before files; inside each
/// class the order is whatever the platform's directory listing yields.
/// Symbolic links are listed but never followed, so link cycles cannot hang
/// the walk. Read-only: the traversal has no side effects.
pub fn render(root_path: &Path) -> Result<Vec<TreeLine>, RenderError> {
    let metadata = fs::symlink_metadata(root_path).context(MissingRootSnafu {
        path: root_path.to_path_buf(),
    })?;
    ensure!(
        metadata.is_dir(),
        NotADirectorySnafu {
            path: root_path.to_path_buf(),
        }
    );

    let name = root_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root_path.display().to_string());
    let mut lines = vec![TreeLine {
        depth: 0,
        label: format!("{name}/"),
    }];
    walk(root_path, 1, &mut lines)?;
    Ok(lines)
}

fn walk(dir: &Path, depth: usize, lines: &mut Vec<TreeLine>) -> Result<(), RenderError> {
    let mut subdirs: Vec<(String, PathBuf, bool)> = Vec::new();
    let mut files: Vec<String> = Vec::new();

    let entries = fs::read_dir(dir).context(ListSnafu {
        path: dir.to_path_buf(),
    })?;
    for entry in entries {
        let entry = entry.context(ListSnafu {
            path: dir.to_path_buf(),
        })?;
        let file_type = entry.file_type().context(ListSnafu {
            path: entry.path(),
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if file_type.is_dir() {
            subdirs.push((name, entry.path(), true));
        } else if file_type.is_symlink() {
            // A symlink pointing at a directory is listed as one but never
            // descended into, which bounds the walk against link cycles.
            let points_to_dir = fs::metadata(entry.path())
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if points_to_dir {
                subdirs.push((name, entry.path(), false));
            } else {
                files.push(name);
            }
        } else {
            files.push(name);
        }
    }

    for (name, path, descend) in subdirs {
        lines.push(TreeLine {
            depth,
            label: format!("{name}/"),
        });
        if descend {
            walk(&path, depth + 1, lines)?;
        }
    }
    for name in files {
        lines.push(TreeLine { depth, label: name });
    }

    Ok(())
}

#[derive(Debug, Snafu)]
pub enum RenderError {
    #[snafu(display("Render root {} does not exist", path.best_effort_path_display()))]
    MissingRoot {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Render root {} is not a directory", path.best_effort_path_display()))]
    NotADirectory { path: PathBuf },
    #[snafu(display("Failed to list directory {}", path.best_effort_path_display()))]
    ListError {
        path: PathBuf,
        source: std::io::Error,
    },
}
