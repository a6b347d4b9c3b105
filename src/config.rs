//! Runtime options
//!
//! Options control how a metadata file is located, bound and written back.
//! They can be built in code with the `with_*` methods or loaded from a
//! JSON file:
//!
//! ```json
//! {
//!   "root_tag": "metadata",
//!   "indent": 2,
//!   "document_extensions": ["xml"],
//!   "converter": {
//!     "import": { "program": "mdconvert", "args": ["--to-xml", "{source}", "{destination}"] },
//!     "export": { "program": "mdconvert", "args": ["--from-xml", "{source}", "{destination}"] }
//!   }
//! }
//! ```

use crate::converter::CommandConverter;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for loading, binding and saving metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    root_tag: String,
    indent: usize,
    document_extensions: Vec<String>,
    converter: Option<CommandConverter>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            root_tag: "metadata".to_string(),
            indent: 2,
            document_extensions: vec!["xml".to_string()],
            converter: None,
        }
    }
}

impl Options {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Options = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid options: {}", e)))?;
        options.check()?;
        Ok(options)
    }

    /// Load options from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read options from {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    fn check(&self) -> Result<()> {
        crate::names::validate_tag(&self.root_tag)
            .map_err(|e| Error::Config(format!("Invalid root_tag: {}", e)))
    }

    /// Tag expected on the document root
    pub fn root_tag(&self) -> &str {
        &self.root_tag
    }

    /// Indentation width used when writing; 0 writes compact XML
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Extensions of files parsed directly as XML
    pub fn document_extensions(&self) -> &[String] {
        &self.document_extensions
    }

    /// Configured external converter
    pub fn converter(&self) -> Option<&CommandConverter> {
        self.converter.as_ref()
    }

    /// Set the root tag
    pub fn with_root_tag(mut self, root_tag: impl Into<String>) -> Self {
        self.root_tag = root_tag.into();
        self
    }

    /// Set the output indentation
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set the document extensions
    pub fn with_document_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the external converter
    pub fn with_converter(mut self, converter: CommandConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Whether `path` is read and written as XML without conversion
    pub fn is_document_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| {
                self.document_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}
