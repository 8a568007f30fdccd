//! `web-maker build` command implementation.

use std::path::PathBuf;

use clap::Args;
use wm_build::{BuildConfig, BuildError, SiteBuilder};
use wm_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover wm.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    dist: Option<PathBuf>,

    /// Public base URL of the site (overrides config).
    #[arg(long, env = "WM_BASE_URL")]
    base_url: Option<String>,

    /// Keep building after a page fails and report every failure at the end.
    #[arg(short, long)]
    keep_going: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or any page fails to build.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            dist_dir: self.dist,
            base_url: self.base_url,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(?config, "Loaded configuration");

        output.info(&format!("Source: {}", config.paths.content_dir.display()));
        output.info(&format!("Output: {}", config.paths.dist_dir.display()));

        let builder = SiteBuilder::new(
            &config,
            BuildConfig {
                keep_going: self.keep_going,
            },
        );

        match builder.build() {
            Ok(report) => {
                output.success(&format!(
                    "Built {} page(s) in {:.2}ms",
                    report.pages,
                    report.elapsed.as_secs_f64() * 1000.0
                ));
                Ok(())
            }
            Err(BuildError::Pages(failures)) => {
                for failure in &failures {
                    output.warning(&format!(
                        "  {}: {}",
                        failure.path.display(),
                        failure.error
                    ));
                }
                Err(BuildError::Pages(failures).into())
            }
            Err(err) => Err(err.into()),
        }
    }
}
