//! Metadata files
//!
//! [`Metadata`] owns one document and the schema it is read through. It
//! binds the root container on demand and writes the document back either
//! directly as XML or through a [`FormatConverter`].

use crate::converter::FormatConverter;
use crate::config::Options;
use crate::documents::Document;
use crate::error::{Error, Result};
use crate::esri;
use crate::schema::FieldSpec;
use crate::values::Value;
use crate::wrappers::{Anchor, Container, Handle, List};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

const TEMP_DOCUMENT: &str = "metadata.xml";

/// A metadata document bound to a schema
pub struct Metadata {
    path: Option<PathBuf>,
    document: Rc<RefCell<Document>>,
    schema: Arc<FieldSpec>,
    options: Options,
    converter: Option<Box<dyn FormatConverter>>,
}

impl Metadata {
    /// Empty document with the ArcGIS schema and default options
    pub fn new() -> Self {
        Self::from_document(Document::new(), None, Options::default())
    }

    fn from_document(document: Document, path: Option<PathBuf>, options: Options) -> Self {
        let converter = options
            .converter()
            .cloned()
            .map(|c| Box::new(c) as Box<dyn FormatConverter>);
        Self {
            path,
            document: Rc::new(RefCell::new(document)),
            schema: esri::metadata_schema(),
            options,
            converter,
        }
    }

    /// Parse metadata from XML text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml: &str) -> Result<Self> {
        Ok(Self::from_document(
            Document::from_string(xml)?,
            None,
            Options::default(),
        ))
    }

    /// Open a metadata file with default options
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, Options::default())
    }

    /// Open a metadata file. XML documents are parsed directly; other files
    /// go through the converter configured in `options`.
    pub fn open_with(path: impl AsRef<Path>, options: Options) -> Result<Self> {
        let mut metadata = Self::from_document(Document::new(), None, options);
        metadata.load(path.as_ref())?;
        Ok(metadata)
    }

    /// Open a file through an explicit converter
    pub fn open_with_converter(
        path: impl AsRef<Path>,
        options: Options,
        converter: Box<dyn FormatConverter>,
    ) -> Result<Self> {
        let mut metadata =
            Self::from_document(Document::new(), None, options).with_converter(converter);
        metadata.load(path.as_ref())?;
        Ok(metadata)
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let document = if self.options.is_document_path(path) {
            debug!(path = %path.display(), "loading document");
            Document::from_file(path)?
        } else {
            let converter = self.require_converter(path)?;
            let dir = tempfile::tempdir()?;
            let temp = dir.path().join(TEMP_DOCUMENT);
            debug!(path = %path.display(), temp = %temp.display(), "converting to document");
            converter.to_document(path, &temp)?;
            Document::from_file(&temp)?
        };
        *self.document.borrow_mut() = document;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Use a different schema; it is validated first
    pub fn with_schema(mut self, schema: Arc<FieldSpec>) -> Result<Self> {
        schema.validate()?;
        if schema.mapping().is_none() {
            return Err(Error::Config(format!(
                "Root schema must be a container, found {}",
                schema.type_name()
            )));
        }
        self.schema = schema;
        Ok(self)
    }

    /// Use a converter for non-document paths
    pub fn with_converter(mut self, converter: Box<dyn FormatConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Path the metadata was opened from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Active options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Root schema
    pub fn schema(&self) -> &Arc<FieldSpec> {
        &self.schema
    }

    /// Borrow the underlying document
    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    /// Bind the root container. It is present only when the document root
    /// carries the configured root tag.
    pub fn root(&self) -> Container {
        let anchor = Anchor::root(self.options.root_tag(), &self.document);
        Container::root(Arc::clone(&self.schema), anchor)
    }

    /// Resolve a root field
    pub fn get(&self, name: &str) -> Result<Handle> {
        self.root().get(name)
    }

    /// Resolve a root field that must be a container
    pub fn container(&self, name: &str) -> Result<Container> {
        self.root().container(name)
    }

    /// Resolve a root field that must be a list
    pub fn list(&self, name: &str) -> Result<List> {
        self.root().list(name)
    }

    /// Resolve a root field that must be a value
    pub fn value(&self, name: &str) -> Result<Value> {
        self.root().value(name)
    }

    /// Resolve a dotted path from the root
    pub fn at(&self, path: &str) -> Result<Handle> {
        self.root().at(path)
    }

    /// Delete a root field
    pub fn remove(&self, name: &str) -> Result<()> {
        self.root().remove(name)
    }

    /// Serialize the document with the configured indentation
    pub fn to_xml_string(&self) -> Result<String> {
        self.document.borrow().to_string(self.options.indent())
    }

    /// Write the document to `destination`, or back to the opened path.
    /// Non-document destinations are written through the converter.
    pub fn save(&self, destination: Option<&Path>) -> Result<()> {
        let destination = destination
            .or(self.path.as_deref())
            .ok_or_else(|| Error::Config("No destination to save metadata to".to_string()))?;
        let document = self.document.borrow();

        if self.options.is_document_path(destination) {
            debug!(path = %destination.display(), "saving document");
            return document.write_to_file(destination, self.options.indent());
        }

        let converter = self.require_converter(destination)?;
        let dir = tempfile::tempdir()?;
        let temp = dir.path().join(TEMP_DOCUMENT);
        document.write_to_file(&temp, self.options.indent())?;
        debug!(path = %destination.display(), temp = %temp.display(), "converting from document");
        converter.from_document(&temp, destination)
    }

    fn require_converter(&self, path: &Path) -> Result<&dyn FormatConverter> {
        self.converter.as_deref().ok_or_else(|| {
            Error::Conversion(format!(
                "No converter configured for non-document path {}",
                path.display()
            ))
        })
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metadata")
            .field("path", &self.path)
            .field("schema", &self.schema.type_name())
            .field("options", &self.options)
            .field("converter", &self.converter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::ValueType;
    use crate::wrappers::Wrapper;

    #[test]
    fn test_new_is_empty() {
        let metadata = Metadata::new();
        assert!(metadata.root().is_missing());
        assert!(metadata.path().is_none());
        assert!(matches!(metadata.save(None), Err(Error::Config(_))));
    }

    #[test]
    fn test_root_requires_root_tag() {
        let metadata = Metadata::from_str("<other/>").unwrap();
        let mut root = metadata.root();
        assert!(root.is_missing());
        assert!(root.create().unwrap_err().is_invalid_structure());
    }

    #[test]
    fn test_create_root_on_empty_document() {
        let metadata = Metadata::new();
        metadata
            .at("dataIdInfo.idCitation.resTitle")
            .unwrap()
            .into_value()
            .unwrap()
            .set_value("Roads")
            .unwrap();
        assert!(metadata.root().is_present());
        assert!(metadata
            .to_xml_string()
            .unwrap()
            .contains("<resTitle>Roads</resTitle>"));
    }

    #[test]
    fn test_custom_schema() {
        let schema = FieldSpec::group([("title", FieldSpec::value(ValueType::String))]);
        let metadata = Metadata::from_str("<metadata><title>T</title></metadata>")
            .unwrap()
            .with_schema(schema)
            .unwrap();
        assert_eq!(
            metadata.value("title").unwrap().string().unwrap().as_deref(),
            Some("T")
        );

        let result = Metadata::new().with_schema(FieldSpec::value(ValueType::String));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_non_document_without_converter() {
        let err = Metadata::open("/nonexistent/roads.shp").unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));

        let metadata = Metadata::new();
        let err = metadata.save(Some(Path::new("roads.shp"))).unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
    }
}
