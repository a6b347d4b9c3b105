//! Conversion between metadata documents and other file formats
//!
//! Files that are not XML documents (datasets, layer files, ...) carry
//! their metadata in a form only an external tool can read. A
//! [`FormatConverter`] moves that metadata into an XML document on load and
//! back out on save. [`CommandConverter`] runs an external program for
//! each direction.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::debug;

const SOURCE: &str = "{source}";
const DESTINATION: &str = "{destination}";

/// Moves metadata between an XML document and another format
pub trait FormatConverter {
    /// Export the metadata of `source` into the XML document `destination`
    fn to_document(&self, source: &Path, destination: &Path) -> Result<()>;

    /// Import the XML document `source` as the metadata of `destination`
    fn from_document(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// A program invocation with `{source}` and `{destination}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTemplate {
    program: String,
    #[serde(default)]
    args: Vec<String>,
}

impl CommandTemplate {
    /// Create a template
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Program to run
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument templates
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments with placeholders replaced by the given paths
    pub fn render(&self, source: &Path, destination: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match arg.as_str() {
                SOURCE => source.as_os_str().to_owned(),
                DESTINATION => destination.as_os_str().to_owned(),
                other => OsString::from(
                    other
                        .replace(SOURCE, &source.to_string_lossy())
                        .replace(DESTINATION, &destination.to_string_lossy()),
                ),
            })
            .collect()
    }

    /// Run the command and wait for it to finish
    pub fn run(&self, source: &Path, destination: &Path) -> Result<()> {
        let args = self.render(source, destination);
        debug!(program = %self.program, ?args, "running converter");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| Error::Conversion(format!("Cannot run '{}': {}", self.program, e)))?;

        if !output.status.success() {
            return Err(Error::Conversion(format!(
                "'{}' failed with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim_end()
            )));
        }
        Ok(())
    }
}

/// Converter backed by two external commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConverter {
    import: CommandTemplate,
    export: CommandTemplate,
}

impl CommandConverter {
    /// Create a converter; `import` produces XML, `export` consumes it
    pub fn new(import: CommandTemplate, export: CommandTemplate) -> Self {
        Self { import, export }
    }

    /// Command that writes the XML document
    pub fn import(&self) -> &CommandTemplate {
        &self.import
    }

    /// Command that reads the XML document
    pub fn export(&self) -> &CommandTemplate {
        &self.export
    }
}

impl FormatConverter for CommandConverter {
    fn to_document(&self, source: &Path, destination: &Path) -> Result<()> {
        self.import.run(source, destination)
    }

    fn from_document(&self, source: &Path, destination: &Path) -> Result<()> {
        self.export.run(source, destination)
    }
}
