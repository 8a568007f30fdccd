//! Content site model for web-maker.
//!
//! This crate provides:
//! - [`PageLoader`]: cached reads of content files and their metadata
//! - [`UrlLookup`]: content path to public URL resolution
//! - [`PageLister`]: glob-based page listing for index pages
//! - [`paths`]: pure path and file name helpers
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wm_site::{PageLoader, create_list_pages};
//!
//! let loader = Arc::new(PageLoader::new());
//! let lister = create_list_pages("content", Arc::clone(&loader), None);
//! for page in lister.list("posts/**/*.md")? {
//!     let page = page?;
//!     println!("{}: {}", page.file_path, page.meta.title);
//! }
//! ```

mod lister;
mod loader;
pub mod paths;
mod url;

pub use lister::{ListError, PageLister, PageSummary, Pages, create_list_pages};
pub use loader::{LoadError, PageLoader};
pub use paths::PathError;
pub use url::{ConfigurationError, UrlLookup, create_url_lookup};
