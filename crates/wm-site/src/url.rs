//! Content path to site URL resolution.
//!
//! A [`UrlLookup`] strips a configured directory root from a project file
//! path, rewrites the extension (`md` to `html`), and resolves the result
//! against the site's base URL:
//!
//! ```
//! use wm_site::create_url_lookup;
//!
//! let url = create_url_lookup(Some("https://example.com/"), ["content/"], [("md", "html")])
//!     .unwrap();
//! assert_eq!(url.resolve("content/posts/first.md"), "https://example.com/posts/first.html");
//! ```
//!
//! Resolution follows RFC 3986: a base URL without a trailing slash treats
//! its last segment as a file, so `https://example.com/blog` + `a.html` gives
//! `https://example.com/a.html`. Callers are expected to configure the base
//! URL accordingly.

use std::collections::HashMap;

use url::Url;

use crate::paths::{extract_extension, path_segments, replace_extension};

/// Invalid URL lookup construction parameters.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// No base URL was given.
    #[error("base_url is None")]
    MissingBaseUrl,

    /// The base URL is not an absolute URL.
    #[error("invalid base_url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// An extension map entry starts with a period.
    #[error("extension map entry {ext:?} -> {replacement:?} must not start with a period")]
    LeadingPeriod { ext: String, replacement: String },
}

/// Translates project file paths into absolute site URLs.
///
/// Deterministic and free of I/O once constructed.
#[derive(Clone, Debug)]
pub struct UrlLookup {
    base: Url,
    roots: Vec<Vec<String>>,
    ext_map: HashMap<String, String>,
}

impl UrlLookup {
    /// Create a lookup.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Absolute base URL; mind the trailing slash
    /// * `directory_roots` - Path prefixes to strip, tried in order
    /// * `ext_map` - Extension rewrites without the leading period
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if `base_url` is `None` or not an
    /// absolute URL, or if an extension map entry starts with a period.
    pub fn new<R, K, V>(
        base_url: Option<&str>,
        directory_roots: impl IntoIterator<Item = R>,
        ext_map: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, ConfigurationError>
    where
        R: AsRef<str>,
        K: Into<String>,
        V: Into<String>,
    {
        let base_url = base_url.ok_or(ConfigurationError::MissingBaseUrl)?;
        let base = Url::parse(base_url).map_err(|source| ConfigurationError::InvalidBaseUrl {
            url: base_url.to_owned(),
            source,
        })?;

        let roots = directory_roots
            .into_iter()
            .map(|root| path_segments(root.as_ref()))
            .collect();

        let ext_map = ext_map
            .into_iter()
            .map(|(from, to)| {
                let (from, to) = (from.into(), to.into());
                if from.starts_with('.') || to.starts_with('.') {
                    return Err(ConfigurationError::LeadingPeriod {
                        ext: from,
                        replacement: to,
                    });
                }
                Ok((from, to))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            base,
            roots,
            ext_map,
        })
    }

    /// Resolve a project file path to its site URL.
    ///
    /// The first matching directory root is stripped; paths under no root are
    /// used as-is. Extensions missing from the map are left alone.
    pub fn resolve(&self, file_location: &str) -> String {
        let segments = path_segments(file_location);
        let mut location = self
            .roots
            .iter()
            .find(|root| segments.starts_with(root))
            .map_or_else(
                || file_location.to_owned(),
                |root| segments[root.len()..].join("/"),
            );

        let new_ext = extract_extension(&location).and_then(|ext| self.ext_map.get(ext));
        if let Some(new_ext) = new_ext {
            location = replace_extension(&location, new_ext);
        }

        match self.base.join(&location) {
            Ok(url) => url.into(),
            Err(e) => {
                tracing::warn!(location = %location, error = %e, "Unresolvable URL path");
                format!("{}{location}", self.base)
            }
        }
    }
}

/// Create a URL lookup; see [`UrlLookup::new`].
///
/// # Errors
///
/// Returns [`ConfigurationError`] on invalid parameters.
pub fn create_url_lookup<R, K, V>(
    base_url: Option<&str>,
    directory_roots: impl IntoIterator<Item = R>,
    ext_map: impl IntoIterator<Item = (K, V)>,
) -> Result<UrlLookup, ConfigurationError>
where
    R: AsRef<str>,
    K: Into<String>,
    V: Into<String>,
{
    UrlLookup::new(base_url, directory_roots, ext_map)
}
