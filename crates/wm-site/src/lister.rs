//! Glob-based page listing.
//!
//! Templates use [`PageLister::list`] to build indexes of other pages, e.g.
//! every post under `content/posts`. Metadata comes from the shared
//! [`PageLoader`], so pages listed here are not re-read when they are
//! rendered later.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::{MatchOptions, Paths, Pattern};
use serde::Serialize;
use wm_meta::PageMetadata;

use crate::loader::{LoadError, PageLoader};
use crate::paths::relative_location;

/// Error returned while listing pages.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    /// The glob pattern is malformed.
    #[error("invalid page pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A matched entry could not be inspected.
    #[error("{0}")]
    Glob(#[from] glob::GlobError),

    /// A matched page failed to load.
    #[error("{0}")]
    Load(#[from] LoadError),
}

/// One listed page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageSummary {
    /// Validated page metadata.
    pub meta: PageMetadata,
    /// Path relative to the project root, `/`-separated.
    pub file_path: String,
}

/// Lists content pages matching glob patterns.
#[derive(Clone, Debug)]
pub struct PageLister {
    root_dir: PathBuf,
    content_dir: PathBuf,
    loader: Arc<PageLoader>,
}

impl PageLister {
    /// Create a lister for `root_dir/content_dir`.
    pub fn new(
        content_dir: impl Into<PathBuf>,
        loader: Arc<PageLoader>,
        root_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root_dir: root_dir.into(),
            content_dir: content_dir.into(),
            loader,
        }
    }

    /// Lazily list pages matching `pattern`, relative to the content
    /// directory. `**` matches any number of directories.
    ///
    /// Wildcards do not match hidden (dot) entries, mirroring the build walk.
    /// Directories that match are skipped. Every call globs the filesystem
    /// anew.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Pattern`] if the pattern is malformed.
    pub fn list(&self, pattern: &str) -> Result<Pages<'_>, ListError> {
        let base = self.root_dir.join(&self.content_dir);
        let full = format!("{}/{pattern}", Pattern::escape(&base.to_string_lossy()));
        tracing::debug!(pattern = %full, "Listing pages");

        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };
        let paths = glob::glob_with(&full, options).map_err(|source| ListError::Pattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Pages {
            paths,
            lister: self,
        })
    }

    fn summarize(&self, path: &Path) -> Result<PageSummary, ListError> {
        let meta = self.loader.get_metadata(path)?;
        Ok(PageSummary {
            meta,
            file_path: relative_location(&self.root_dir, path),
        })
    }
}

/// Create a page lister; `root_dir` defaults to the current directory.
pub fn create_list_pages(
    content_dir: impl Into<PathBuf>,
    loader: Arc<PageLoader>,
    root_dir: Option<&Path>,
) -> PageLister {
    PageLister::new(content_dir, loader, root_dir.unwrap_or(Path::new(".")))
}

/// Iterator over listed pages, returned by [`PageLister::list`].
#[derive(Debug)]
pub struct Pages<'a> {
    paths: Paths,
    lister: &'a PageLister,
}

impl Iterator for Pages<'_> {
    type Item = Result<PageSummary, ListError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = match self.paths.next()? {
                Ok(path) => path,
                Err(e) => return Some(Err(e.into())),
            };
            if path.is_file() {
                return Some(self.lister.summarize(&path));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn site(root: &Path) {
        fs::create_dir_all(root.join("content/posts/old.md")).unwrap();
        fs::write(root.join("content/index.md"), "---\ntitle: Home\n---\n").unwrap();
        fs::write(root.join("content/posts/b.md"), "---\ntitle: B\n---\n").unwrap();
        fs::write(root.join("content/posts/a.md"), "# no front matter\n").unwrap();
        fs::write(root.join("content/posts/notes.txt"), "text").unwrap();
    }

    fn collect(lister: &PageLister, pattern: &str) -> Vec<PageSummary> {
        let mut pages: Vec<_> = lister
            .list(pattern)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        pages.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        pages
    }

    #[test]
    fn test_list_top_level() {
        let temp_dir = tempfile::tempdir().unwrap();
        site(temp_dir.path());

        let loader = Arc::new(PageLoader::new());
        let lister = create_list_pages("content", loader, Some(temp_dir.path()));
        let pages = collect(&lister, "*.md");

        assert_eq!(
            pages,
            vec![PageSummary {
                meta: PageMetadata {
                    title: "Home".to_owned(),
                    ..PageMetadata::default()
                },
                file_path: "content/index.md".to_owned(),
            }]
        );
    }

    #[test]
    fn test_list_recursive_skips_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        site(temp_dir.path());

        let loader = Arc::new(PageLoader::new());
        let lister = create_list_pages("content", loader, Some(temp_dir.path()));
        let paths: Vec<_> = collect(&lister, "**/*.md")
            .into_iter()
            .map(|page| page.file_path)
            .collect();

        assert_eq!(
            paths,
            vec![
                "content/index.md",
                "content/posts/a.md",
                "content/posts/b.md"
            ]
        );
    }

    #[test]
    fn test_list_skips_hidden_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        site(temp_dir.path());
        fs::write(temp_dir.path().join("content/.draft.md"), "# draft\n").unwrap();
        fs::create_dir(temp_dir.path().join("content/.git")).unwrap();
        fs::write(temp_dir.path().join("content/.git/x.md"), "").unwrap();

        let loader = Arc::new(PageLoader::new());
        let lister = create_list_pages("content", loader, Some(temp_dir.path()));
        let paths: Vec<_> = collect(&lister, "**/*.md")
            .into_iter()
            .map(|page| page.file_path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "content/index.md",
                "content/posts/a.md",
                "content/posts/b.md"
            ]
        );

        // An explicit leading dot still matches
        let hidden: Vec<_> = collect(&lister, ".*.md")
            .into_iter()
            .map(|page| page.file_path)
            .collect();
        assert_eq!(hidden, vec!["content/.draft.md"]);
    }

    #[test]
    fn test_list_within_directory_is_sorted() {
        let temp_dir = tempfile::tempdir().unwrap();
        site(temp_dir.path());

        let loader = Arc::new(PageLoader::new());
        let lister = create_list_pages("content", loader, Some(temp_dir.path()));
        let titles: Vec<_> = lister
            .list("posts/*.md")
            .unwrap()
            .map(|page| page.unwrap().meta.title)
            .collect();

        assert_eq!(titles, vec!["page", "B"]);
    }

    #[test]
    fn test_list_populates_shared_cache() {
        let temp_dir = tempfile::tempdir().unwrap();
        site(temp_dir.path());

        let loader = Arc::new(PageLoader::new());
        let lister = create_list_pages("content", Arc::clone(&loader), Some(temp_dir.path()));
        collect(&lister, "posts/*.md");

        assert!(loader.is_cached(temp_dir.path().join("content/posts/a.md")));
        assert!(!loader.is_cached(temp_dir.path().join("content/index.md")));
    }

    #[test]
    fn test_list_is_lazy() {
        let temp_dir = tempfile::tempdir().unwrap();
        site(temp_dir.path());

        let loader = Arc::new(PageLoader::new());
        let lister = create_list_pages("content", Arc::clone(&loader), Some(temp_dir.path()));
        let mut pages = lister.list("posts/*.md").unwrap();
        assert!(loader.is_empty());

        pages.next().unwrap().unwrap();
        assert_eq!(loader.len(), 1);
    }

    #[test]
    fn test_list_reglobs_on_each_call() {
        let temp_dir = tempfile::tempdir().unwrap();
        site(temp_dir.path());

        let loader = Arc::new(PageLoader::new());
        let lister = create_list_pages("content", loader, Some(temp_dir.path()));
        assert_eq!(collect(&lister, "*.md").len(), 1);

        fs::write(temp_dir.path().join("content/about.md"), "").unwrap();
        assert_eq!(collect(&lister, "*.md").len(), 2);
    }

    #[test]
    fn test_list_no_matches() {
        let temp_dir = tempfile::tempdir().unwrap();
        site(temp_dir.path());

        let loader = Arc::new(PageLoader::new());
        let lister = create_list_pages("content", loader, Some(temp_dir.path()));
        assert!(collect(&lister, "drafts/*.md").is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();

        let loader = Arc::new(PageLoader::new());
        let lister = create_list_pages("content", loader, Some(temp_dir.path()));
        let err = lister.list("***.md").unwrap_err();
        assert!(matches!(err, ListError::Pattern { .. }), "{err:?}");
    }

    #[test]
    fn test_invalid_page_is_load_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("content")).unwrap();
        fs::write(
            temp_dir.path().join("content/bad.md"),
            "---\ndraft: sometimes\n---\n",
        )
        .unwrap();

        let loader = Arc::new(PageLoader::new());
        let lister = create_list_pages("content", loader, Some(temp_dir.path()));
        let results: Vec<_> = lister.list("*.md").unwrap().collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(ListError::Load(_))));
    }

    #[test]
    fn test_root_dir_is_escaped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("site[1]");
        site(&root);

        let loader = Arc::new(PageLoader::new());
        let lister = create_list_pages("content", loader, Some(&root));
        let paths: Vec<_> = collect(&lister, "*.md")
            .into_iter()
            .map(|page| page.file_path)
            .collect();
        assert_eq!(paths, vec!["content/index.md"]);
    }
}
