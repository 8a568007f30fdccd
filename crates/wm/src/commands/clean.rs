//! `web-maker clean` command implementation.

use std::path::PathBuf;

use clap::Args;
use wm_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the clean command.
#[derive(Args)]
pub(crate) struct CleanArgs {
    /// Path to configuration file (default: auto-discover wm.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CleanArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let dist_dir = &config.paths.dist_dir;

        if wm_build::clean(dist_dir)? {
            output.success(&format!("Removed {}", dist_dir.display()));
        } else {
            output.info(&format!("Nothing to clean at {}", dist_dir.display()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_clean_removes_dist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("wm.toml");
        fs::write(
            &config_path,
            r#"
content_path = "content"
template_path = "templates"
dist_path = "public"
default_template = "default.html"
html_base_url = "https://example.com/"
"#,
        )
        .unwrap();
        fs::create_dir_all(temp_dir.path().join("public/posts")).unwrap();
        fs::write(temp_dir.path().join("public/posts/a.html"), "<p>a</p>").unwrap();

        let args = CleanArgs {
            config: Some(config_path.clone()),
        };
        args.execute().unwrap();
        assert!(!temp_dir.path().join("public").exists());

        // Second run has nothing to do
        let args = CleanArgs {
            config: Some(config_path),
        };
        args.execute().unwrap();
    }

    #[test]
    fn test_clean_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let args = CleanArgs {
            config: Some(temp_dir.path().join("wm.toml")),
        };
        assert!(matches!(args.execute(), Err(CliError::Config(_))));
    }
}
