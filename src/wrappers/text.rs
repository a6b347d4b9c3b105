use super::{Anchor, Wrapper};
use crate::documents::Element;
use crate::error::{Error, Result};
use std::rc::Rc;

/// Binds to the text of the parent element itself. It adds no node of its
/// own, so it is present exactly when the parent is.
#[derive(Debug, Clone)]
pub struct TextWrapper {
    name: String,
    parent: Rc<Anchor>,
}

impl TextWrapper {
    pub(crate) fn bind(name: &str, parent: &Rc<Anchor>) -> Self {
        Self {
            name: name.to_string(),
            parent: Rc::clone(parent),
        }
    }

    /// The element whose text this wrapper addresses
    pub fn parent_element(&self) -> Option<Element> {
        self.parent.element()
    }

    pub(crate) fn ensure_parent(&self) -> Result<Element> {
        self.parent.ensure()
    }
}

impl Wrapper for TextWrapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_bound(&self) -> bool {
        true
    }

    fn is_present(&self) -> bool {
        self.parent.is_present()
    }

    fn create(&mut self) -> Result<()> {
        self.parent.ensure().map(|_| ())
    }

    /// Clears the parent's text; the parent element stays
    fn delete(&mut self) -> Result<()> {
        let element = self
            .parent
            .element()
            .ok_or_else(|| Error::NotPresent(format!("{}.{}", self.parent.path(), self.name)))?;
        element.set_text(None);
        Ok(())
    }
}
