//! `web-maker init` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the init command.
#[derive(Args)]
pub(crate) struct InitArgs {
    /// Project directory (default: current directory).
    dir: Option<PathBuf>,

    /// Site name (default: prompt, suggesting the directory name).
    #[arg(short, long)]
    name: Option<String>,
}

impl InitArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let project_dir = match self.dir {
            Some(dir) => std::path::absolute(dir)?,
            None => std::env::current_dir()?,
        };

        let site_name = match self.name {
            Some(name) => name,
            None => output.prompt("Site name", &default_site_name(&project_dir))?,
        };

        wm_build::init_project(&site_name, &project_dir)?;

        output.success(&format!(
            "Created project '{site_name}' in {}",
            project_dir.display()
        ));
        Ok(())
    }
}

/// The project directory's name, or `website` for a root path.
fn default_site_name(project_dir: &Path) -> String {
    project_dir
        .file_name()
        .map_or_else(|| "website".to_owned(), |name| name.to_string_lossy().into_owned())
}
