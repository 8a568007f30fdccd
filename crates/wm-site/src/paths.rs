//! Pure path and file name helpers.
//!
//! Nothing here touches the filesystem. Paths are compared segment by
//! segment, never as raw substrings, so `content` is not a prefix of
//! `contents/page.md`.

use std::path::{Component, Path, PathBuf, is_separator};

/// Error returned for missing arguments.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A required argument was absent.
    #[error("{0} is None")]
    InvalidArgument(&'static str),
}

/// Split a path into its segments.
///
/// `.` segments are dropped; a leading root becomes a `/` segment.
pub fn path_segments(path: impl AsRef<Path>) -> Vec<String> {
    path.as_ref()
        .components()
        .filter_map(|c| match c {
            Component::CurDir => None,
            Component::RootDir => Some("/".to_owned()),
            Component::ParentDir => Some("..".to_owned()),
            Component::Prefix(p) => Some(p.as_os_str().to_string_lossy().into_owned()),
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
        })
        .collect()
}

/// Strip `prefix` segments from the front of `path`.
///
/// Returns the remaining segments joined with `/`, or `None` if `prefix`
/// does not match.
pub(crate) fn strip_segments(prefix: &[String], path: &str) -> Option<String> {
    let segments = path_segments(path);
    segments
        .starts_with(prefix)
        .then(|| segments[prefix.len()..].join("/"))
}

/// Remove a leading directory prefix from a path.
///
/// Returns the rest of the path joined with `/`, an empty string if nothing is
/// left, or `path` unchanged if the prefix does not match.
///
/// ```
/// use wm_site::paths::subtract_prefix;
///
/// assert_eq!(subtract_prefix(Some("foo/bar"), Some("foo/bar/baz")).unwrap(), "baz");
/// assert_eq!(subtract_prefix(Some("other"), Some("foo/bar")).unwrap(), "foo/bar");
/// ```
///
/// # Errors
///
/// Returns [`PathError::InvalidArgument`] if either argument is `None`.
pub fn subtract_prefix(prefix: Option<&str>, path: Option<&str>) -> Result<String, PathError> {
    let prefix = prefix.ok_or(PathError::InvalidArgument("prefix"))?;
    let path = path.ok_or(PathError::InvalidArgument("path"))?;

    Ok(strip_segments(&path_segments(prefix), path).unwrap_or_else(|| path.to_owned()))
}

/// Byte offset where the final path segment starts.
fn file_name_start(name: &str) -> usize {
    name.rfind(is_separator).map_or(0, |i| i + 1)
}

/// Byte offset of the extension dot in `name`, if it has an extension.
///
/// A hidden-file leading dot never counts, and neither does a trailing dot.
fn extension_dot(name: &str) -> Option<usize> {
    let start = file_name_start(name);
    let file_name = &name[start..];
    let skip = usize::from(file_name.starts_with('.'));

    let dot = start + skip + file_name[skip..].rfind('.')?;
    (dot + 1 < name.len()).then_some(dot)
}

/// Extension of the final path segment, without the dot.
///
/// ```
/// use wm_site::paths::extract_extension;
///
/// assert_eq!(extract_extension("a.b/index.md"), Some("md"));
/// assert_eq!(extract_extension(".profile"), None);
/// ```
pub fn extract_extension(name: &str) -> Option<&str> {
    extension_dot(name).map(|dot| &name[dot + 1..])
}

/// Replace the extension of the final path segment.
///
/// Names without an extension are returned unchanged.
pub fn replace_extension(name: &str, new_ext: &str) -> String {
    match extension_dot(name) {
        Some(dot) => format!("{}{new_ext}", &name[..=dot]),
        None => name.to_owned(),
    }
}

/// Lexically normalize a path.
///
/// Drops `.` segments and collapses `dir/..` pairs without consulting the
/// filesystem. An empty result becomes `.`.
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// `path` relative to `root`, normalized and `/`-separated.
///
/// Paths outside `root` are returned normalized but otherwise whole.
///
/// ```
/// use std::path::Path;
/// use wm_site::paths::relative_location;
///
/// assert_eq!(relative_location(Path::new("/site"), Path::new("/site/content/./a.md")), "content/a.md");
/// ```
pub fn relative_location(root: &Path, path: &Path) -> String {
    let root = normalize_path(root);
    let path = normalize_path(path);
    let relative = if root == Path::new(".") {
        path.as_path()
    } else {
        path.strip_prefix(&root).unwrap_or(&path)
    };
    relative.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_extension() {
        assert_eq!(extract_extension("index.md"), Some("md"));
        assert_eq!(extract_extension("unknown"), None);
        assert_eq!(extract_extension("content/index.md"), Some("md"));
        assert_eq!(extract_extension("a.b/index.md"), Some("md"));
    }

    #[test]
    fn test_extract_extension_hidden_files() {
        assert_eq!(extract_extension(".index"), None);
        assert_eq!(extract_extension(".index.md"), Some("md"));
        assert_eq!(extract_extension("dir/.hidden"), None);
    }

    #[test]
    fn test_extract_extension_multiple_dots() {
        assert_eq!(extract_extension("archive.tar.gz"), Some("gz"));
        assert_eq!(extract_extension("index."), None);
    }

    #[test]
    fn test_replace_extension() {
        assert_eq!(replace_extension("index.md", "html"), "index.html");
        assert_eq!(
            replace_extension("content/index.md", "html"),
            "content/index.html"
        );
        assert_eq!(replace_extension("index", "html"), "index");
    }

    #[test]
    fn test_replace_extension_hidden_files() {
        assert_eq!(replace_extension(".index.md", "html"), ".index.html");
        assert_eq!(replace_extension(".index", "html"), ".index");
    }

    #[test]
    fn test_replace_extension_only_touches_file_name() {
        assert_eq!(replace_extension("a.b/index", "html"), "a.b/index");
        assert_eq!(replace_extension("a.b/page.md", "html"), "a.b/page.html");
    }

    #[test]
    fn test_subtract_prefix() {
        assert_eq!(
            subtract_prefix(Some("foo/bar"), Some("foo/bar/baz")).unwrap(),
            "baz"
        );
        assert_eq!(subtract_prefix(Some("foo/bar"), Some("foo/bar")).unwrap(), "");
        assert_eq!(
            subtract_prefix(Some("mismatched"), Some("foo/bar")).unwrap(),
            "foo/bar"
        );
    }

    #[test]
    fn test_subtract_prefix_compares_segments() {
        assert_eq!(
            subtract_prefix(Some("foo/ba"), Some("foo/bar/baz")).unwrap(),
            "foo/bar/baz"
        );
        assert_eq!(
            subtract_prefix(Some("./foo/"), Some("foo/bar")).unwrap(),
            "bar"
        );
    }

    #[test]
    fn test_subtract_prefix_absolute_paths() {
        assert_eq!(
            subtract_prefix(Some("/site/content"), Some("/site/content/posts/a.md")).unwrap(),
            "posts/a.md"
        );
    }

    #[test]
    fn test_subtract_prefix_invalid_input() {
        assert_eq!(
            subtract_prefix(None, Some("foo/bar/baz")),
            Err(PathError::InvalidArgument("prefix"))
        );
        assert_eq!(
            subtract_prefix(Some("foo/bar"), None),
            Err(PathError::InvalidArgument("path"))
        );
    }

    #[test]
    fn test_path_segments() {
        assert_eq!(path_segments("content/"), vec!["content"]);
        assert_eq!(path_segments("./a/b.md"), vec!["a", "b.md"]);
        assert_eq!(path_segments("/a"), vec!["/", "a"]);
        assert!(path_segments("").is_empty());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("a/./b"), PathBuf::from("a/b"));
        assert_eq!(normalize_path("a/b/../c"), PathBuf::from("a/c"));
        assert_eq!(normalize_path("a//b/"), PathBuf::from("a/b"));
        assert_eq!(normalize_path("../a"), PathBuf::from("../a"));
        assert_eq!(normalize_path("/.."), PathBuf::from("/"));
        assert_eq!(normalize_path("a/.."), PathBuf::from("."));
        assert_eq!(normalize_path(""), PathBuf::from("."));
    }

    #[test]
    fn test_relative_location() {
        assert_eq!(
            relative_location(Path::new("/site"), Path::new("/site/content/a.md")),
            "content/a.md"
        );
        assert_eq!(
            relative_location(Path::new("."), Path::new("./content/./a.md")),
            "content/a.md"
        );
        assert_eq!(
            relative_location(Path::new("site/"), Path::new("site/content")),
            "content"
        );
        assert_eq!(
            relative_location(Path::new("/site"), Path::new("/other/a.md")),
            "/other/a.md"
        );
    }
}
