//! # esri_metadata
//!
//! Lazily bound, schema-driven read/write access to ArcGIS metadata XML
//! documents.
//!
//! A fixed schema describes the metadata sections as nested containers,
//! lists and typed scalar values. Accessing a field binds a fresh handle to
//! the current document; nothing is materialized until it is written, and
//! writing a value creates every missing element on the way down.
//!
//! ## Features
//!
//! - Named, typed navigation of the ArcGIS metadata layout
//! - Lazy creation of missing elements and attributes
//! - Typed scalars: string, integer, decimal, boolean, date, time, date-time
//! - List append, remove and deep copy between positions of the same type
//! - Save back to XML, or to other formats through an external converter
//! - JSON export of any bound subtree
//!
//! ## Example
//!
//! ```rust,no_run
//! use esri_metadata::{Metadata, Wrapper};
//!
//! # fn main() -> esri_metadata::Result<()> {
//! let metadata = Metadata::open("roads.xml")?;
//!
//! let mut title = metadata.at("dataIdInfo.idCitation.resTitle")?.into_value()?;
//! println!("{:?}", title.string()?);
//!
//! title.set_value("Roads")?;
//! metadata.remove("mdFileID").ok();
//! metadata.save(None)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod names;

// Document tree
pub mod documents;

// Schema and binding
pub mod schema;
pub mod esri;
pub mod values;
pub mod wrappers;

// Files, conversion and export
pub mod config;
pub mod converter;
pub mod metadata;
pub mod exports;

// Re-exports for convenience
pub use error::{Error, Result};
pub use metadata::Metadata;
pub use schema::{FieldKind, FieldSpec, ValuePosition};
pub use values::{Scalar, Value, ValueType};
pub use wrappers::{Container, Handle, List, Wrapper};

/// Version of the esri_metadata library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
