//! Template environment and helper functions.
//!
//! Every template, page bodies included, sees:
//!
//! - all configuration values as globals (`site_name`, `html_base_url`, ...)
//! - `url(path)`: public URL of a project file
//! - `list_pages(pattern)`: metadata of content pages matching a glob
//! - `inline_file(path)`: contents of a project file
//! - `concat(sep, *parts)`: join values with a separator
//! - the `cssmin` and `first` filters
//!
//! Page templates additionally get `page` and `get_meta(name)`; see
//! [`page_context`].

use std::path::Path;
use std::sync::Arc;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use minijinja::value::Rest;
use minijinja::{AutoEscape, Environment, Error, ErrorKind, Value, context, path_loader};
use serde::Serialize;
use wm_config::Config;
use wm_meta::PageMetadata;
use wm_site::{ConfigurationError, PageLister, PageLoader, create_url_lookup};

/// Create the template environment shared by every page of a build.
///
/// # Errors
///
/// Returns [`ConfigurationError`] if the configured base URL is unusable.
pub fn create_environment(
    config: &Config,
    loader: &Arc<PageLoader>,
) -> Result<Environment<'static>, ConfigurationError> {
    let mut env = Environment::new();
    env.set_loader(path_loader(config.paths.template_dir.clone()));
    env.set_auto_escape_callback(|_| AutoEscape::None);

    for (key, value) in config.values() {
        env.add_global(key, value.to_owned());
    }

    let url = create_url_lookup(
        Some(config.html_base_url.as_str()),
        [
            config.content_path.clone(),
            config.paths.content_dir.to_string_lossy().into_owned(),
        ],
        [("md", "html")],
    )?;
    env.add_function("url", move |path: &str| url.resolve(path));

    let lister = PageLister::new(
        config.content_path.clone(),
        Arc::clone(loader),
        config.paths.root_dir.clone(),
    );
    env.add_function("list_pages", move |pattern: &str| list_pages(&lister, pattern));

    let root_dir = config.paths.root_dir.clone();
    env.add_function("inline_file", move |path: &str| inline_file(&root_dir, path));
    env.add_function("concat", concat);

    env.add_filter("cssmin", cssmin);
    env.add_filter("first", first);

    Ok(env)
}

/// The `page` object handed to page templates.
#[derive(Debug, Serialize)]
pub struct PageData<'a> {
    /// Page metadata.
    pub meta: &'a PageMetadata,
    /// Rendered HTML body.
    pub content: &'a str,
    /// Project-relative path of the source file.
    pub file_location: &'a str,
}

/// Per-page render context: `page` and `get_meta(name)`.
///
/// `page` is omitted while rendering the page body itself.
pub fn page_context(meta: &PageMetadata, page: Option<&PageData<'_>>) -> Value {
    let get_meta = {
        let meta = meta.clone();
        Value::from_function(move |name: &str| {
            meta.get(name)
                .map_or_else(|| Value::from(()), |value| Value::from_serialize(&value))
        })
    };

    match page {
        Some(page) => context! { page => Value::from_serialize(page), get_meta => get_meta },
        None => context! { get_meta => get_meta },
    }
}

/// Metadata of every content page matching `pattern`.
fn list_pages(lister: &PageLister, pattern: &str) -> Result<Value, Error> {
    let pages = lister
        .list(pattern)
        .and_then(|pages| pages.collect::<Result<Vec<_>, _>>())
        .map_err(|e| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("list_pages({pattern:?}) failed"),
            )
            .with_source(e)
        })?;
    Ok(Value::from_serialize(&pages))
}

/// Contents of a file; relative paths start at the project root.
fn inline_file(root_dir: &Path, path: &str) -> Result<String, Error> {
    let full = root_dir.join(path);
    std::fs::read_to_string(&full).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("cannot inline {}", full.display()),
        )
        .with_source(e)
    })
}

/// Join the string forms of `parts` with `sep`.
fn concat(sep: &str, parts: Rest<Value>) -> String {
    parts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

/// Minify a stylesheet.
fn cssmin(source: &str) -> Result<String, Error> {
    let invalid = |message: String| Error::new(ErrorKind::InvalidOperation, message);

    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| invalid(format!("cannot parse CSS: {e}")))?;
    let output = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| invalid(format!("cannot print CSS: {e}")))?;
    Ok(output.code)
}

/// First item of a sequence or string; `""` for empty or falsy values.
fn first(value: &Value) -> Result<Value, Error> {
    if !value.is_true() {
        return Ok(Value::from(""));
    }
    if let Some(s) = value.as_str() {
        return Ok(s.chars().next().map_or_else(|| Value::from(""), Value::from));
    }
    Ok(value.try_iter()?.next().unwrap_or_else(|| Value::from("")))
}
