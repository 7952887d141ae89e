use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::hooks::{Hooks, PartCandidates};
use crate::template::{Probe, ThemeTree};

/// A template that was found: its name relative to the theme root that
/// holds it, and its full path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub name: Arc<str>,
    pub path: Arc<Path>,
}

/// Candidate names for `base` qualified by `qualifiers`, most specific first.
///
/// Qualifiers are applied as a prefix chain, empty ones skipped. The bare
/// `base` is always the last candidate, so the list is never empty.
///
/// ```
/// use slimline::template::candidates;
///
/// assert_eq!(candidates("content", &["single", "post", "", "video"]), [
///     "content-single-post-video",
///     "content-single-post",
///     "content-single",
///     "content",
/// ]);
///
/// assert_eq!(candidates("content", &[] as &[&str]), ["content"]);
/// ```
pub fn candidates<S: AsRef<str>>(base: &str, qualifiers: &[S]) -> Vec<String> {
    let qualifiers: Vec<&str> = qualifiers.iter()
        .map(|q| q.as_ref().trim())
        .filter(|q| !q.is_empty())
        .collect();

    let mut candidates = Vec::with_capacity(qualifiers.len() + 1);
    for n in (1..=qualifiers.len()).rev() {
        candidates.push(format!("{base}-{}", qualifiers[..n].join("-")));
    }

    candidates.push(base.to_string());
    candidates
}

/// Resolves template names across an ordered list of theme roots (a child
/// theme first, then its parent) and memoizes every answer, misses included,
/// for the lifetime of the locator.
#[derive(Debug)]
pub struct Locator<P = ThemeTree> {
    roots: Vec<P>,
    extension: String,
    cache: Mutex<FxHashMap<Box<str>, Option<Resolved>>>,
}

impl<P: Probe> Locator<P> {
    pub fn new(roots: Vec<P>, extension: &str) -> Self {
        Locator {
            roots,
            extension: extension.trim_start_matches('.').to_string(),
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn roots(&self) -> &[P] {
        &self.roots
    }

    /// Resolves the most specific existing candidate for `base` and
    /// `qualifiers` at the top of the theme roots.
    pub fn locate<S: AsRef<str>>(&self, base: &str, qualifiers: &[S], hooks: &Hooks) -> Option<Resolved> {
        self.locate_in("", base, qualifiers, hooks)
    }

    /// Resolves the most specific existing candidate for `base` and
    /// `qualifiers` inside `dir`. The candidate list passes through
    /// [`PartCandidates`] tagged with `base`; the directory and extension are
    /// applied afterwards.
    pub fn locate_in<S>(&self, dir: &str, base: &str, qualifiers: &[S], hooks: &Hooks) -> Option<Resolved>
        where S: AsRef<str>
    {
        let dir = dir.trim_matches('/');
        let mut key = format!("{dir}\0{base}");
        for qualifier in qualifiers {
            key.push('\0');
            key.push_str(qualifier.as_ref());
        }

        if let Some(hit) = self.cache.lock().get(key.as_str()) {
            tracing::trace!(dir, base, "template cache hit");
            return hit.clone();
        }

        let candidates = candidates(base, qualifiers);
        let candidates = hooks.apply_tagged(PartCandidates, &[base], candidates, base);
        let resolved = candidates.iter()
            .map(|candidate| self.file_name(dir, candidate))
            .find_map(|name| self.probe(&name));

        match &resolved {
            Some(r) => tracing::debug!(base, name = &*r.name, "resolved template"),
            None => tracing::debug!(dir, base, ?candidates, "no template candidate exists"),
        }

        self.cache.lock().insert(key.into_boxed_str(), resolved.clone());
        resolved
    }

    /// Resolves a literal template name, extension included.
    pub fn find(&self, name: &str) -> Option<Resolved> {
        let key = format!("\u{1}{name}");
        if let Some(hit) = self.cache.lock().get(key.as_str()) {
            return hit.clone();
        }

        let resolved = self.probe(name);
        self.cache.lock().insert(key.into_boxed_str(), resolved.clone());
        resolved
    }

    /// The number of memoized lookups.
    pub fn cached(&self) -> usize {
        self.cache.lock().len()
    }

    fn file_name(&self, dir: &str, candidate: &str) -> String {
        let mut name = if dir.is_empty() {
            candidate.to_string()
        } else {
            format!("{dir}/{candidate}")
        };

        if !self.extension.is_empty() {
            name.push('.');
            name.push_str(&self.extension);
        }

        name
    }

    fn probe(&self, name: &str) -> Option<Resolved> {
        let name = name.trim_start_matches('/');
        if name.split('/').any(|c| c == "..") {
            tracing::warn!(name, "refusing to resolve template outside of theme roots");
            return None;
        }

        self.roots.iter()
            .find_map(|root| root.probe(name))
            .map(|path| Resolved { name: name.into(), path })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::hooks::DEFAULT_PRIORITY;

    /// A root with a fixed set of files that counts how often it is probed.
    pub struct MemoryProbe {
        root: PathBuf,
        files: Vec<&'static str>,
        probes: AtomicUsize,
    }

    impl MemoryProbe {
        pub fn new(root: &str, files: &[&'static str]) -> Self {
            MemoryProbe { root: root.into(), files: files.to_vec(), probes: AtomicUsize::new(0) }
        }

        pub fn probes(&self) -> usize {
            self.probes.load(Ordering::SeqCst)
        }
    }

    impl Probe for MemoryProbe {
        fn probe(&self, name: &str) -> Option<Arc<Path>> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            self.files.iter().any(|f| *f == name).then(|| Arc::from(self.root.join(name)))
        }
    }

    #[test]
    fn most_specific_candidate_wins() {
        let root = MemoryProbe::new("/theme", &["content.html", "content-single.html"]);
        let locator = Locator::new(vec![root], "html");
        let hooks = Hooks::new();

        let found = locator.locate("content", &["single", "post"], &hooks).unwrap();
        assert_eq!(&*found.name, "content-single.html");
        assert_eq!(&*found.path, Path::new("/theme/content-single.html"));

        let found = locator.locate("content", &["archive"], &hooks).unwrap();
        assert_eq!(&*found.name, "content.html");
    }

    #[test]
    fn repeated_lookups_hit_the_cache() {
        let locator = Locator::new(vec![MemoryProbe::new("/t", &["parts/content.html"])], ".html");
        let hooks = Hooks::new();

        let first = locator.locate_in("parts", "content", &["single", "post"], &hooks);
        assert_eq!(first.as_ref().map(|r| &*r.name), Some("parts/content.html"));
        let probes = locator.roots()[0].probes();
        assert_eq!(probes, 3);

        let second = locator.locate_in("parts", "content", &["single", "post"], &hooks);
        assert_eq!(first, second);
        assert_eq!(locator.roots()[0].probes(), probes);
        assert_eq!(locator.cached(), 1);

        // Different qualifiers, or a different directory, are a different key.
        locator.locate_in("parts", "content", &["single"], &hooks);
        locator.locate("content", &["single", "post"], &hooks);
        assert_eq!(locator.cached(), 3);
    }

    #[test]
    fn misses_are_cached_too() {
        let locator = Locator::new(vec![MemoryProbe::new("/t", &[])], "html");
        let hooks = Hooks::new();

        assert!(locator.locate("content", &[] as &[&str], &hooks).is_none());
        assert!(locator.locate("content", &[] as &[&str], &hooks).is_none());
        assert_eq!(locator.roots()[0].probes(), 1);
    }

    #[test]
    fn child_roots_shadow_parents() {
        let child = MemoryProbe::new("/child", &["index.html"]);
        let parent = MemoryProbe::new("/parent", &["index.html", "index-home.html"]);
        let locator = Locator::new(vec![child, parent], "html");
        let hooks = Hooks::new();

        let found = locator.locate("index", &["home"], &hooks).unwrap();
        assert_eq!(&*found.path, Path::new("/parent/index-home.html"));

        let found = locator.find("index.html").unwrap();
        assert_eq!(&*found.path, Path::new("/child/index.html"));
        assert!(locator.find("../secrets.html").is_none());
    }

    #[test]
    fn candidates_are_filterable() {
        let locator = Locator::new(vec![MemoryProbe::new("/t", &["content-legacy.html"])], "html");
        let mut hooks = Hooks::new();
        hooks.add_tagged_filter(PartCandidates, "content", DEFAULT_PRIORITY, |mut c, base: &str| {
            c.push(format!("{base}-legacy"));
            c
        });

        let found = locator.locate("content", &["single"], &hooks).unwrap();
        assert_eq!(&*found.name, "content-legacy.html");
    }
}
