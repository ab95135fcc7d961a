use std::path::{Path, PathBuf};

/// Absolute path rendering for error messages and logs.
///
/// Canonicalization fails for paths that do not exist yet, which is the
/// common case while materializing; fall back to anchoring at the current
/// directory and, failing that, to the path as given.
pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        if let Ok(canonical) = self.canonicalize() {
            return canonical.display().to_string();
        }
        if self.is_absolute() {
            return self.display().to_string();
        }
        match std::env::current_dir() {
            Ok(current_dir) => current_dir.join(self).display().to_string(),
            Err(_) => self.display().to_string(),
        }
    }
}

impl BestEffortPathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        self.as_path().best_effort_path_display()
    }
}
