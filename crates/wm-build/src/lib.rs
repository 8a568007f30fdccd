//! Site generation for web-maker.
//!
//! [`SiteBuilder`] renders a content tree of Markdown pages through
//! minijinja templates into an output directory. [`init_project`] and
//! [`clean`] manage the project around it.

mod builder;
mod markdown;
mod model;
mod scaffold;

pub use builder::{BuildConfig, BuildError, BuildReport, PageFailure, SiteBuilder};
pub use markdown::render_markdown;
pub use model::{PageData, create_environment, page_context};
pub use scaffold::{ScaffoldError, clean, init_project};
