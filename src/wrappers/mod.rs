//! Schema-driven handles over the document tree
//!
//! Every handle is a transient view: it is built fresh on each access by
//! scanning the live document, so two handles obtained at different times
//! always reflect the latest mutations. The wrapper kinds differ in what
//! "present" means and in how they create and delete their position:
//!
//! - [`ElementWrapper`]: the unique child element carrying the field name
//! - [`AttributeWrapper`]: an attribute key on the parent element
//! - [`TextWrapper`]: the text of the parent element itself
//! - [`List`]: every child element carrying the field name, in order
//! - [`Container`]: an element whose children are declared by a schema
//!
//! [`Handle`] is the closed union of what a container field resolves to.

mod attribute;
mod binding;
mod container;
mod element;
mod handle;
mod list;
mod text;

pub use attribute::AttributeWrapper;
pub use container::Container;
pub use element::ElementWrapper;
pub use handle::Handle;
pub use list::{List, ListIter};
pub use text::TextWrapper;

pub(crate) use binding::Anchor;

use crate::error::Result;

/// Capabilities shared by every bound handle
pub trait Wrapper {
    /// Schema name this handle is addressed by
    fn name(&self) -> &str;

    /// Whether the handle is attached to a document position
    fn is_bound(&self) -> bool;

    /// Whether the position currently exists in the document
    fn is_present(&self) -> bool;

    /// Negation of [`Wrapper::is_present`]
    fn is_missing(&self) -> bool {
        !self.is_present()
    }

    /// Make the position exist, creating missing ancestors first.
    /// Creating a present position does nothing.
    fn create(&mut self) -> Result<()>;

    /// Remove the position from the document. Deleting an absent position
    /// is an error.
    fn delete(&mut self) -> Result<()>;
}
