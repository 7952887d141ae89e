use std::sync::Arc;
use std::path::{Path, PathBuf};
use std::fs;

use rustc_hash::FxHashMap;

use crate::error::Result;

/// Answers whether a template exists under one theme root.
pub trait Probe: Send + Sync {
    /// The full path of the file called `name` (relative, `/`-separated), if
    /// such a file exists under this root.
    fn probe(&self, name: &str) -> Option<Arc<Path>>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

#[derive(Debug)]
pub struct Entry {
    pub id: EntryId,
    pub path: Arc<Path>,
    pub file_type: fs::FileType,
    pub depth: usize,
}

/// An in-memory index of every file and directory under a theme root,
/// built once so that probing is a hash lookup.
#[derive(Debug)]
pub struct ThemeTree {
    entries: Vec<Entry>,
    map: FxHashMap<Arc<Path>, EntryId>,
}

impl ThemeTree {
    pub fn build<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let walker = jwalk::WalkDir::new(root).follow_links(true);

        let mut tree = ThemeTree { entries: vec![], map: FxHashMap::default() };
        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let id = EntryId(tree.entries.len());
            let path: Arc<Path> = Arc::from(entry.path().into_boxed_path());
            let entry = Entry {
                id,
                path: path.clone(),
                file_type: entry.file_type,
                depth: entry.depth,
            };

            tree.map.insert(path, id);
            tree.entries.push(entry);
        }

        if tree.entries.is_empty() {
            return err! {
                "theme root could not be read",
                "theme root" => root.display(),
            }
        }

        tracing::debug!(root = %root.display(), entries = tree.len(), "indexed theme root");
        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn root(&self) -> &Entry {
        &self.entries[0]
    }

    pub fn get_id<P: AsRef<Path>>(&self, path: P) -> Option<EntryId> {
        let full_path = self.root().path.join(path.as_ref());
        self.map.get(&*full_path).copied()
    }

    pub fn get_file_id<P: AsRef<Path>>(&self, path: P) -> Option<EntryId> {
        let id = self.get_id(path)?;
        self[id].file_type.is_file().then_some(id)
    }

    /// Every file in the tree, as paths relative to the root.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter()
            .filter(|e| e.file_type.is_file())
            .filter_map(|e| e.relative_path())
    }
}

impl Entry {
    /// Path relative to the tree's root.
    pub fn relative_path(&self) -> Option<&Path> {
        let mut components = self.path.components();
        let skip = self.path.components().count().checked_sub(self.depth)?;
        for _ in 0..skip {
            components.next();
        }

        Some(components.as_path())
    }
}

impl std::ops::Index<EntryId> for ThemeTree {
    type Output = Entry;

    fn index(&self, index: EntryId) -> &Self::Output {
        &self.entries[index.0]
    }
}

impl Probe for ThemeTree {
    fn probe(&self, name: &str) -> Option<Arc<Path>> {
        let id = self.get_file_id(name)?;
        Some(self[id].path.clone())
    }
}

/// Probes the file system directly, without an index.
impl Probe for PathBuf {
    fn probe(&self, name: &str) -> Option<Arc<Path>> {
        let path = self.join(name);
        path.is_file().then(|| Arc::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("parts")).unwrap();
        fs::write(dir.path().join("index.html"), "index").unwrap();
        fs::write(dir.path().join("parts/content.html"), "content").unwrap();
        dir
    }

    #[test]
    fn indexes_files_relative_to_root() {
        let dir = theme();
        let tree = ThemeTree::build(dir.path()).unwrap();

        assert!(tree.probe("index.html").is_some());
        assert!(tree.probe("parts/content.html").is_some());
        assert!(tree.probe("parts").is_none());
        assert!(tree.probe("parts/missing.html").is_none());

        let mut files: Vec<_> = tree.files().map(|p| p.to_path_buf()).collect();
        files.sort();
        assert_eq!(files, [PathBuf::from("index.html"), PathBuf::from("parts/content.html")]);
    }

    #[test]
    fn direct_probe_matches_index() {
        let dir = theme();
        let root = dir.path().to_path_buf();
        let tree = ThemeTree::build(&root).unwrap();

        for name in ["index.html", "parts/content.html", "nope.html", "parts"] {
            assert_eq!(root.probe(name).is_some(), tree.probe(name).is_some(), "{name}");
        }
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = ThemeTree::build(dir.path().join("absent")).unwrap_err();
        assert_eq!(error.message(), "theme root could not be read");
    }
}
