use super::{Anchor, Wrapper};
use crate::documents::Element;
use crate::error::{Error, Result};
use std::rc::Rc;

/// Binds to the unique child element named after the field
#[derive(Debug, Clone)]
pub struct ElementWrapper {
    anchor: Rc<Anchor>,
}

impl ElementWrapper {
    pub(crate) fn bind(name: &str, parent: &Rc<Anchor>) -> Result<Self> {
        Ok(Self::from_anchor(Anchor::bind_child(name, parent)?))
    }

    pub(crate) fn from_anchor(anchor: Rc<Anchor>) -> Self {
        Self { anchor }
    }

    /// Unbound wrapper with no element
    pub fn detached(name: &str) -> Self {
        Self::from_anchor(Anchor::detached(name, None))
    }

    /// Unbound wrapper around an existing element, e.g. one built by hand
    pub fn from_element(element: Element) -> Self {
        let name = element.tag();
        Self::from_anchor(Anchor::detached(&name, Some(element)))
    }

    pub(crate) fn anchor(&self) -> &Rc<Anchor> {
        &self.anchor
    }

    /// The element at this position, if present
    pub fn element(&self) -> Option<Element> {
        self.anchor.element()
    }

    /// Dotted schema path of this position
    pub fn path(&self) -> String {
        self.anchor.path()
    }

    /// Replace this position with a deep copy of `source`, renamed to this
    /// field's name. The source is left untouched.
    pub fn set(&mut self, source: &Element) -> Result<()> {
        let copy = source.deep_copy();
        copy.set_tag(self.anchor.name());
        self.anchor.replace(copy)
    }
}

impl Wrapper for ElementWrapper {
    fn name(&self) -> &str {
        self.anchor.name()
    }

    fn is_bound(&self) -> bool {
        self.anchor.is_bound()
    }

    fn is_present(&self) -> bool {
        self.anchor.is_bound() && self.anchor.is_present()
    }

    fn create(&mut self) -> Result<()> {
        if !self.is_bound() {
            return Err(Error::UnboundElement(format!(
                "Cannot create '{}' on an unbound element",
                self.name()
            )));
        }
        self.anchor.ensure().map(|_| ())
    }

    fn delete(&mut self) -> Result<()> {
        self.anchor.remove().map(|_| ())
    }
}
