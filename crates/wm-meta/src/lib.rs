//! Front matter extraction and page metadata for web-maker.
//!
//! Content files may start with a YAML metadata block between two `---`
//! marker lines. This crate locates that block ([`split_front_matter`]) and
//! validates it against the built-in schema ([`PageMetadata`]).
//!
//! # Example
//!
//! ```
//! use wm_meta::{PageMetadata, strip_front_matter};
//!
//! let text = "---\ntitle: Home\n---\n# Welcome\n";
//! let meta = PageMetadata::from_content(text.as_bytes()).unwrap();
//! assert_eq!(meta.title, "Home");
//! assert_eq!(strip_front_matter(text), "# Welcome\n");
//! ```

mod front_matter;
mod metadata;

pub use front_matter::{FrontMatter, extract_front_matter, split_front_matter, strip_front_matter};
pub use metadata::{DEFAULT_TITLE, MetadataError, PageMetadata};
