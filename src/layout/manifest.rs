use std::borrow::Cow;
use std::path::PathBuf;

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::layout::StructureNode;

pub const LAYOUT_FILE_NAME: &str = "layout.yaml";

/// Parsed layout manifest.
///
/// The top level of the manifest is a mapping with a `layout` key; underneath
/// it, mappings become directories, sequences of strings become file groups,
/// and null or empty-string values become empty files. Everything else is
/// rejected at parse time, before any filesystem entry is touched.
#[derive(Debug, Clone)]
pub struct Manifest {
    root: StructureNode,
}

impl Manifest {
    pub async fn from_path(path: PathBuf) -> Result<Self, ManifestError> {
        debug!("Reading layout manifest: {}", path.best_effort_path_display());
        let bytes = fs::read(&path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        let contents = String::from_utf8(bytes).ok().context(NotUtf8Snafu {
            file_path: path.best_effort_path_display(),
        })?;
        contents.as_str().try_into()
    }

    pub fn root(&self) -> &StructureNode {
        &self.root
    }
}

impl TryFrom<&str> for Manifest {
    type Error = ManifestError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents =
            Yaml::load_from_str(contents).map_err(|e| ManifestError::ParseError { source: e })?;
        let document = documents.first().ok_or(ManifestError::EmptyManifest)?;

        let top_level = document
            .as_mapping()
            .ok_or(ManifestError::TopLevelNotMap)?;

        let layout_key = Yaml::Value(Scalar::String(Cow::Borrowed("layout")));
        let root = match top_level.get(&layout_key) {
            None | Some(Yaml::Value(Scalar::Null)) => StructureNode::empty_directory(),
            Some(Yaml::Mapping(entries)) => directory_from_yaml("layout", entries)?,
            Some(_) => return Err(ManifestError::LayoutNotMap),
        };

        Ok(Manifest { root })
    }
}

fn directory_from_yaml(
    name: &str,
    entries: &LinkedHashMap<Yaml, Yaml>,
) -> Result<StructureNode, ManifestError> {
    let mut children = LinkedHashMap::new();
    for (key, value) in entries {
        let child_name = match key {
            Yaml::Value(Scalar::String(child_name)) => child_name.to_string(),
            _ => {
                return Err(ManifestError::NonStringName {
                    directory: name.to_string(),
                });
            }
        };
        let child = node_from_yaml(&child_name, value)?;
        // Unreachable for now, as saphyr already rejects duplicate keys
        if children.insert(child_name.clone(), child).is_some() {
            return Err(ManifestError::DuplicateName { name: child_name });
        }
    }
    Ok(StructureNode::Directory { children })
}

fn node_from_yaml(name: &str, value: &Yaml) -> Result<StructureNode, ManifestError> {
    match value {
        Yaml::Mapping(entries) => directory_from_yaml(name, entries),
        Yaml::Sequence(items) => {
            let names = items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        ManifestError::InvalidFileEntry {
                            directory: name.to_string(),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(StructureNode::FileGroup { names })
        }
        Yaml::Value(Scalar::Null) => Ok(StructureNode::EmptyFile),
        Yaml::Value(Scalar::String(s)) if s.is_empty() => Ok(StructureNode::EmptyFile),
        _ => Err(ManifestError::UnsupportedValue {
            name: name.to_string(),
        }),
    }
}

#[derive(Debug, Snafu)]
pub enum ManifestError {
    #[snafu(display("Failed to read the layout manifest: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Layout manifest {} is not valid UTF-8", file_path))]
    NotUtf8 { file_path: String },
    #[snafu(display("Failed to parse the layout manifest"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Layout manifest contains no document"))]
    EmptyManifest,
    #[snafu(display("Top level of the manifest should be a map"))]
    TopLevelNotMap,
    #[snafu(display("The layout section should be a map"))]
    LayoutNotMap,
    #[snafu(display("Directory '{}' has a non-string entry name", directory))]
    NonStringName { directory: String },
    #[snafu(display("'{}' is declared more than once in its directory", name))]
    DuplicateName { name: String },
    #[snafu(display("File group '{}' contains a non-string entry", directory))]
    InvalidFileEntry { directory: String },
    #[snafu(display(
        "Entry '{}' should be a map, a list of file names, or empty",
        name
    ))]
    UnsupportedValue { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[compio::test]
    async fn manifest_returns_error_on_nonexistent_file() {
        let result = Manifest::from_path(PathBuf::from("nonexistent.yaml")).await;
        assert!(matches!(result, Err(ManifestError::ReadError { .. })));
    }

    #[test]
    fn manifest_returns_error_on_invalid_yaml() {
        let invalid_yaml = "layout: [unclosed";
        let result: Result<Manifest, _> = invalid_yaml.try_into();
        assert!(matches!(result, Err(ManifestError::ParseError { .. })));
    }

    #[test]
    fn manifest_returns_error_on_empty_file() {
        let result: Result<Manifest, _> = "".try_into();
        assert!(matches!(result, Err(ManifestError::EmptyManifest)));
    }

    #[test]
    fn manifest_returns_error_when_top_level_is_not_map() {
        let result: Result<Manifest, _> = "- item1\n- item2".try_into();
        assert!(matches!(result, Err(ManifestError::TopLevelNotMap)));
    }

    #[test]
    fn manifest_returns_error_when_layout_is_scalar() {
        let result: Result<Manifest, _> = "layout: just a string".try_into();
        assert!(matches!(result, Err(ManifestError::LayoutNotMap)));
    }

    #[test]
    fn manifest_handles_missing_layout_section() {
        let manifest: Manifest = "other_section: value".try_into().unwrap();
        assert_eq!(manifest.root(), &StructureNode::empty_directory());
    }

    #[test]
    fn manifest_handles_empty_layout_section() {
        let manifest: Manifest = "layout:".try_into().unwrap();
        assert_eq!(manifest.root(), &StructureNode::empty_directory());
    }

    #[test]
    fn null_and_empty_string_values_become_empty_files() {
        let manifest: Manifest = "layout:\n  README.md:\n  .gitignore: \"\"\n"
            .try_into()
            .unwrap();
        let StructureNode::Directory { children } = manifest.root() else {
            panic!("Expected a directory at the root");
        };
        assert_eq!(children.get("README.md"), Some(&StructureNode::EmptyFile));
        assert_eq!(children.get(".gitignore"), Some(&StructureNode::EmptyFile));
    }

    #[test]
    fn sequences_become_file_groups() {
        let manifest: Manifest = "layout:\n  src:\n    - main.rs\n    - lib.rs\n"
            .try_into()
            .unwrap();
        let StructureNode::Directory { children } = manifest.root() else {
            panic!("Expected a directory at the root");
        };
        assert_eq!(
            children.get("src"),
            Some(&StructureNode::FileGroup {
                names: vec!["main.rs".to_string(), "lib.rs".to_string()],
            })
        );
    }

    #[test]
    fn nested_mappings_become_directories() {
        let manifest: Manifest = "layout:\n  docs:\n    guide:\n      - intro.md\n"
            .try_into()
            .unwrap();
        let StructureNode::Directory { children } = manifest.root() else {
            panic!("Expected a directory at the root");
        };
        let Some(StructureNode::Directory { children: docs }) = children.get("docs") else {
            panic!("Expected 'docs' to be a directory");
        };
        assert!(matches!(
            docs.get("guide"),
            Some(StructureNode::FileGroup { .. })
        ));
    }

    #[test]
    fn declaration_order_is_preserved() {
        let manifest: Manifest = "layout:\n  b:\n  a:\n  c:\n".try_into().unwrap();
        let StructureNode::Directory { children } = manifest.root() else {
            panic!("Expected a directory at the root");
        };
        let names: Vec<_> = children.keys().cloned().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn file_group_with_non_string_entry_is_rejected() {
        let result: Result<Manifest, _> = "layout:\n  src:\n    - main.rs\n    - 42\n".try_into();
        assert!(matches!(
            result,
            Err(ManifestError::InvalidFileEntry { .. })
        ));
    }

    #[test]
    fn non_string_entry_name_is_rejected() {
        let result: Result<Manifest, _> = "layout:\n  123:\n".try_into();
        assert!(matches!(result, Err(ManifestError::NonStringName { .. })));
    }

    #[test]
    fn non_empty_scalar_value_is_rejected() {
        let result: Result<Manifest, _> = "layout:\n  README.md: some content\n".try_into();
        assert!(matches!(
            result,
            Err(ManifestError::UnsupportedValue { .. })
        ));
    }
}
