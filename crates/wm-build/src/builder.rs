//! Static site builder.
//!
//! Walks the content directory and turns every file into an HTML page:
//!
//! 1. load metadata and raw bytes through the shared [`PageLoader`]
//! 2. strip the front matter and render the body as a template
//! 3. convert the result from Markdown to HTML
//! 4. render the page template (`template` key or the configured default)
//! 5. write it to the mirrored location under the output directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use minijinja::Environment;
use wm_config::Config;
use wm_meta::strip_front_matter;
use wm_site::paths::{relative_location, replace_extension, subtract_prefix};
use wm_site::{ConfigurationError, LoadError, PageLoader, PathError};

use crate::markdown::render_markdown;
use crate::model::{PageData, create_environment, page_context};

/// Configuration for static site building.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildConfig {
    /// Keep building after a page fails, reporting all failures at the end.
    pub keep_going: bool,
}

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Reading the content tree or writing output failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A content file could not be loaded.
    #[error("{0}")]
    Load(#[from] LoadError),

    /// A template failed to load or render.
    #[error("Template error in {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// A content file is not UTF-8.
    #[error("{} is not valid UTF-8: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    /// The site configuration is unusable for URL generation.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// Output path computation failed.
    #[error("{0}")]
    Path(#[from] PathError),

    /// One or more pages failed with `keep_going` enabled.
    #[error("{} page(s) failed to build", .0.len())]
    Pages(Vec<PageFailure>),
}

/// A page that failed to build.
#[derive(Debug)]
pub struct PageFailure {
    /// Source file.
    pub path: PathBuf,
    /// What went wrong.
    pub error: BuildError,
}

/// Summary of a successful build.
#[derive(Debug, Clone, Copy)]
pub struct BuildReport {
    /// Number of pages written.
    pub pages: usize,
    /// Wall-clock build time.
    pub elapsed: Duration,
}

/// Builds a static site from a content directory.
pub struct SiteBuilder<'a> {
    config: &'a Config,
    build_config: BuildConfig,
}

impl<'a> SiteBuilder<'a> {
    /// Create a builder for the given site.
    #[must_use]
    pub fn new(config: &'a Config, build_config: BuildConfig) -> Self {
        Self {
            config,
            build_config,
        }
    }

    /// Build the whole site.
    ///
    /// # Errors
    ///
    /// Returns the first page error, or [`BuildError::Pages`] with every
    /// failure when `keep_going` is set.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let paths = &self.config.paths;

        tracing::info!("Building content");
        tracing::info!(path = %paths.dist_dir.display(), "Output directory");

        let loader = Arc::new(PageLoader::new());
        let env = create_environment(self.config, &loader)?;

        let mut files = Vec::new();
        walk_dir(&paths.content_dir, &mut files).map_err(|source| BuildError::Io {
            path: paths.content_dir.clone(),
            source,
        })?;

        let mut pages = 0;
        let mut failures = Vec::new();
        for file in files {
            match self.build_page(&env, &loader, &file) {
                Ok(()) => pages += 1,
                Err(error) if self.build_config.keep_going => {
                    tracing::error!(path = %file.display(), error = %error, "Page failed");
                    failures.push(PageFailure { path: file, error });
                }
                Err(error) => return Err(error),
            }
        }

        let elapsed = start.elapsed();
        tracing::info!("Done");
        tracing::info!("Time taken: {:.2}ms", elapsed.as_secs_f64() * 1000.0);

        if !failures.is_empty() {
            return Err(BuildError::Pages(failures));
        }
        Ok(BuildReport { pages, elapsed })
    }

    fn build_page(
        &self,
        env: &Environment<'static>,
        loader: &PageLoader,
        file: &Path,
    ) -> Result<(), BuildError> {
        let paths = &self.config.paths;
        tracing::info!(path = %file.display(), "Processing");

        let meta = loader.get_metadata(file)?;
        let raw = loader.load_raw(file)?;
        let text = std::str::from_utf8(&raw).map_err(|source| BuildError::Encoding {
            path: file.to_path_buf(),
            source,
        })?;

        let file_location = relative_location(&paths.root_dir, file);
        let body = env
            .render_named_str(&file_location, strip_front_matter(text), page_context(&meta, None))
            .map_err(|source| BuildError::Template {
                name: file_location.clone(),
                source,
            })?;
        let content = render_markdown(&body);

        let target_dir = match file.parent() {
            Some(dir) => paths.dist_dir.join(subtract_prefix(
                Some(&*paths.content_dir.to_string_lossy()),
                Some(&*dir.to_string_lossy()),
            )?),
            None => paths.dist_dir.clone(),
        };
        fs::create_dir_all(&target_dir).map_err(|source| BuildError::Io {
            path: target_dir.clone(),
            source,
        })?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let target = target_dir.join(replace_extension(&file_name, "html"));

        let template_name = meta
            .template
            .as_deref()
            .unwrap_or(&self.config.default_template);
        tracing::info!(template = template_name, "Load template");
        let page = PageData {
            meta: &meta,
            content: &content,
            file_location: &file_location,
        };
        let html = env
            .get_template(template_name)
            .and_then(|template| template.render(page_context(&meta, Some(&page))))
            .map_err(|source| BuildError::Template {
                name: template_name.to_owned(),
                source,
            })?;

        tracing::debug!(path = %target.display(), "Writing");
        fs::write(&target, html).map_err(|source| BuildError::Io {
            path: target,
            source,
        })
    }
}

/// Collect files under `dir`, sorted, each directory's files before its
/// subdirectories. Hidden entries are skipped.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    tracing::debug!(path = %dir.display(), "Walking");

    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.retain(|path| {
        !path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'))
    });
    entries.sort();

    let (dirs, regular): (Vec<_>, Vec<_>) = entries.into_iter().partition(|p| p.is_dir());
    files.extend(regular);
    for sub in dirs {
        walk_dir(&sub, files)?;
    }
    Ok(())
}
