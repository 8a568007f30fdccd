//! Built-in page metadata schema.
//!
//! Provides [`PageMetadata`], the validated form of a page's front matter.
//!
//! # Recognized Keys
//!
//! - `title`: Page title (default `"page"`)
//! - `template`: Template name (default none, the site default applies)
//! - `draft`: Draft flag (default `false`); also accepts `yes`/`no`, `on`/`off`
//!   and friends in any case, and `0`/`1`
//! - `created`, `published`: Opaque scalars, usually dates
//!
//! Unrecognized keys are kept as-is in [`PageMetadata::extra`].

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

use crate::front_matter::extract_front_matter;

/// Title used when the front matter does not set one.
pub const DEFAULT_TITLE: &str = "page";

/// Page metadata parsed from front matter.
///
/// Serializes as a single flat mapping, so templates see `meta.title` and
/// `meta.author` side by side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Page title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Template to render the page with.
    #[serde(default)]
    pub template: Option<String>,

    /// Draft flag.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub draft: bool,

    /// Creation date (type inferred from the YAML value).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<serde_json::Value>,

    /// Publication date (type inferred from the YAML value).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<serde_json::Value>,

    /// Keys outside the built-in schema, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_owned()
}

/// Boolean that also takes the YAML 1.1 spellings (`yes`, `off`, ...) and
/// `0`/`1`, which YAML 1.2 parsers hand over as strings and integers.
fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    deserializer.deserialize_any(FlagVisitor)
}

struct FlagVisitor;

impl Visitor<'_> for FlagVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean (true/false, yes/no, on/off, y/n, 1/0)")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(E::invalid_value(Unexpected::Unsigned(v), &self)),
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
        match u64::try_from(v) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Err(E::invalid_value(Unexpected::Signed(v), &self)),
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        match v.to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Ok(true),
            "false" | "f" | "no" | "n" | "off" | "0" => Ok(false),
            _ => Err(E::invalid_value(Unexpected::Str(v), &self)),
        }
    }
}

impl Default for PageMetadata {
    fn default() -> Self {
        Self {
            title: default_title(),
            template: None,
            draft: false,
            created: None,
            published: None,
            extra: BTreeMap::new(),
        }
    }
}

impl PageMetadata {
    /// Parse and validate a front matter block.
    ///
    /// An empty block, or one holding only a YAML null, yields the defaults.
    ///
    /// # Errors
    ///
    /// - [`MetadataError::Encoding`] if the block is not UTF-8
    /// - [`MetadataError::Parse`] if the block is not valid YAML
    /// - [`MetadataError::Validation`] if a recognized key has the wrong type
    ///   or the document is not a mapping
    pub fn from_yaml(block: &[u8]) -> Result<Self, MetadataError> {
        let text = std::str::from_utf8(block)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(MetadataError::Parse)?;
        if value.is_null() {
            return Ok(Self::default());
        }

        serde_yaml::from_value(value).map_err(MetadataError::Validation)
    }

    /// Parse the metadata of a whole content file.
    ///
    /// Files without a balanced front matter block get the defaults.
    pub fn from_content(data: &[u8]) -> Result<Self, MetadataError> {
        match extract_front_matter(data) {
            Some(block) => Self::from_yaml(block),
            None => Ok(Self::default()),
        }
    }

    /// Look up a single key, recognized or not.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        match key {
            "title" => Some(serde_json::Value::String(self.title.clone())),
            "template" => Some(
                self.template
                    .clone()
                    .map_or(serde_json::Value::Null, serde_json::Value::String),
            ),
            "draft" => Some(serde_json::Value::Bool(self.draft)),
            "created" => self.created.clone(),
            "published" => self.published.clone(),
            _ => self.extra.get(key).cloned(),
        }
    }
}

/// Error type for metadata operations.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// Front matter is not UTF-8.
    #[error("metadata is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// YAML syntax error.
    #[error("invalid YAML: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// Built-in schema violation.
    #[error("built-in metadata validation failed: {0}")]
    Validation(#[source] serde_yaml::Error),
}
