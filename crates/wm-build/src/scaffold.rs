//! Project scaffolding and cleanup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use minijinja::{Environment, context};
use wm_config::CONFIG_FILENAME;

const CONFIG_TEMPLATE: &str = include_str!("../scaffold/wm.toml.j2");
const INDEX_PAGE: &str = include_str!("../scaffold/index.md");
const DEFAULT_TEMPLATE: &str = include_str!("../scaffold/default.html");
const STYLESHEET: &str = include_str!("../scaffold/style.css");

/// Error returned while creating a project.
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    /// The project directory already has files in it.
    #[error("directory must be empty: {}", .0.display())]
    NotEmpty(PathBuf),

    /// Writing a project file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Create a new project in `project_dir`, which must be empty or absent.
///
/// Writes `wm.toml`, a home page under `content/`, and a default page
/// template with its stylesheet under `templates/`.
///
/// # Errors
///
/// Returns [`ScaffoldError::NotEmpty`] if the directory has entries.
pub fn init_project(site_name: &str, project_dir: &Path) -> Result<(), ScaffoldError> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| ScaffoldError::Io { path, source }
    };

    fs::create_dir_all(project_dir).map_err(io_error(project_dir))?;
    if fs::read_dir(project_dir)
        .map_err(io_error(project_dir))?
        .next()
        .is_some()
    {
        return Err(ScaffoldError::NotEmpty(project_dir.to_path_buf()));
    }

    let mut env = Environment::new();
    env.add_template(CONFIG_FILENAME, CONFIG_TEMPLATE)?;
    let site_name = toml::Value::String(site_name.to_owned()).to_string();
    let config = env
        .get_template(CONFIG_FILENAME)?
        .render(context! { site_name => site_name })?;

    let files = [
        (PathBuf::from(CONFIG_FILENAME), config.as_str()),
        (Path::new("content").join("index.md"), INDEX_PAGE),
        (Path::new("templates").join("default.html"), DEFAULT_TEMPLATE),
        (Path::new("templates").join("style.css"), STYLESHEET),
    ];
    for (name, content) in files {
        let path = project_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        tracing::debug!(path = %path.display(), "Writing");
        fs::write(&path, content).map_err(io_error(&path))?;
    }

    tracing::info!(path = %project_dir.display(), "Project created");
    Ok(())
}

/// Delete the output directory.
///
/// Returns whether there was anything to delete.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be removed.
pub fn clean(dist_dir: &Path) -> io::Result<bool> {
    if !dist_dir.exists() {
        tracing::debug!(path = %dist_dir.display(), "Nothing to clean");
        return Ok(false);
    }
    fs::remove_dir_all(dist_dir)?;
    tracing::info!(path = %dist_dir.display(), "Removed output directory");
    Ok(true)
}
