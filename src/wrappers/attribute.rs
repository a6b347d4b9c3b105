use super::{Anchor, Wrapper};
use crate::error::{Error, Result};
use std::rc::Rc;
use tracing::trace;

/// Binds to a key on the parent element. There is no node of its own:
/// presence is membership of the key in the parent's attributes.
#[derive(Debug, Clone)]
pub struct AttributeWrapper {
    name: String,
    parent: Rc<Anchor>,
}

impl AttributeWrapper {
    pub(crate) fn bind(name: &str, parent: &Rc<Anchor>) -> Self {
        Self {
            name: name.to_string(),
            parent: Rc::clone(parent),
        }
    }

    /// Raw attribute value, `None` when the key or the parent is absent
    pub fn raw(&self) -> Option<String> {
        self.parent
            .element()
            .and_then(|element| element.attribute(&self.name))
    }

    /// Write the raw value, creating the parent element if needed
    pub fn set_raw(&mut self, value: impl Into<String>) -> Result<()> {
        let element = self.parent.ensure()?;
        element.set_attribute(self.name.clone(), value);
        trace!(parent = %self.parent.path(), key = %self.name, "set attribute");
        Ok(())
    }
}

impl Wrapper for AttributeWrapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_bound(&self) -> bool {
        true
    }

    fn is_present(&self) -> bool {
        self.parent
            .element()
            .map_or(false, |element| element.has_attribute(&self.name))
    }

    fn create(&mut self) -> Result<()> {
        if self.is_missing() {
            self.set_raw("")?;
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let removed = self
            .parent
            .element()
            .and_then(|element| element.remove_attribute(&self.name));
        match removed {
            Some(_) => {
                trace!(parent = %self.parent.path(), key = %self.name, "deleted attribute");
                Ok(())
            }
            None => Err(Error::NotPresent(format!(
                "{}@{}",
                self.parent.path(),
                self.name
            ))),
        }
    }
}
