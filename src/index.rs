//! File name index over a document directory tree

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use crate::error::{Error, Result};

/// Two files sharing a bare name; `kept` replaced `replaced` in the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub name: String,
    pub replaced: PathBuf,
    pub kept: PathBuf,
}

/// Mapping from bare file name to absolute path
///
/// Built once per run by walking the whole tree. When two files share a name
/// the one walked last wins; entries are visited in file-name order so the
/// winner is the same on every run.
#[derive(Debug, Default)]
pub struct FileIndex {
    entries: HashMap<String, PathBuf>,
    collisions: Vec<Collision>,
}

impl FileIndex {
    /// Walk `root` recursively and register every regular file
    pub fn build(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::CorpusNotFound(root.to_path_buf()));
        }
        let root = std::path::absolute(root)?;

        let mut index = FileIndex::default();

        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            index.insert(name, entry.into_path());
        }

        for collision in &index.collisions {
            warn!(
                "Duplicate file name '{}': using {} instead of {}",
                collision.name,
                collision.kept.display(),
                collision.replaced.display()
            );
        }
        info!("Indexed {} files under {}", index.len(), root.display());

        Ok(index)
    }

    fn insert(&mut self, name: String, path: PathBuf) {
        debug!("Indexing {} -> {}", name, path.display());
        if let Some(replaced) = self.entries.insert(name.clone(), path.clone()) {
            self.collisions.push(Collision {
                name,
                replaced,
                kept: path,
            });
        }
    }

    /// Look up a bare file name
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    /// Number of distinct file names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name collisions seen while building, in walk order
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }
}
