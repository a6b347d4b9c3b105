use super::{Anchor, Handle, Wrapper};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::schema::{FieldKind, FieldSpec};
use std::rc::Rc;
use std::sync::Arc;
use tracing::trace;

/// Binds to the ordered run of same-named children of the parent element.
///
/// Matching elements are collected once, at bind time. Index `i` refers to
/// the `i`-th match as of that scan; mutations made through this list keep
/// the cache in step, mutations made elsewhere need a fresh list.
#[derive(Debug, Clone)]
pub struct List {
    name: String,
    spec: Arc<FieldSpec>,
    item: Arc<FieldSpec>,
    parent: Rc<Anchor>,
    elements: Vec<Element>,
}

impl List {
    pub(crate) fn bind(name: &str, spec: &Arc<FieldSpec>, parent: &Rc<Anchor>) -> Result<Self> {
        let item = match spec.kind() {
            FieldKind::List(item) if item.is_element_backed() => Arc::clone(item),
            _ => {
                return Err(Error::type_mismatch(
                    "list of element-backed items",
                    spec.type_name(),
                ))
            }
        };
        let elements = parent
            .element()
            .map(|element| element.find_children(name))
            .unwrap_or_default();

        Ok(Self {
            name: name.to_string(),
            spec: Arc::clone(spec),
            item,
            parent: Rc::clone(parent),
            elements,
        })
    }

    /// Schema spec of the list itself
    pub fn spec(&self) -> &Arc<FieldSpec> {
        &self.spec
    }

    /// Declared item spec
    pub fn item_spec(&self) -> &Arc<FieldSpec> {
        &self.item
    }

    /// Number of items found at bind time, adjusted by this list's own edits
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if there are no items
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Handle to item `index`
    pub fn get(&self, index: usize) -> Result<Handle> {
        let element = self.elements.get(index).ok_or_else(|| self.out_of_range(index))?;
        Ok(self.item_handle(element.clone()))
    }

    /// Handles to every item, in document order
    pub fn iter(&self) -> ListIter<'_> {
        ListIter {
            list: self,
            index: 0,
        }
    }

    /// Remove item `index`; later items shift down by one
    pub fn remove(&mut self, index: usize) -> Result<()> {
        if index >= self.elements.len() {
            return Err(self.out_of_range(index));
        }
        let parent = self
            .parent
            .element()
            .ok_or_else(|| Error::NotPresent(self.parent.path()))?;
        let element = self.elements.remove(index);
        if !parent.remove_child(&element) {
            return Err(Error::NotPresent(format!(
                "{}.{}[{}]",
                self.parent.path(),
                self.name,
                index
            )));
        }
        trace!(list = %self.name, index, "removed list item");
        Ok(())
    }

    /// Append a new item and return its handle.
    ///
    /// With a source, the source element is deep-copied and renamed to the
    /// list's name; the source must be of the declared item type. Without
    /// one, an empty element is appended.
    pub fn append(&mut self, source: Option<&Handle>) -> Result<Handle> {
        let copy = match source {
            Some(source) => {
                if !self.item.is_same_type(source.spec()) {
                    return Err(Error::type_mismatch(
                        self.item.type_name(),
                        source.spec().type_name(),
                    ));
                }
                let element = source
                    .element()
                    .ok_or_else(|| Error::NotPresent(source.name().to_string()))?;
                let copy = element.deep_copy();
                copy.set_tag(self.name.clone());
                Some(copy)
            }
            None => None,
        };

        let parent = self.parent.ensure()?;
        let element = copy.unwrap_or_else(|| Element::new(self.name.clone()));
        parent.append_child(&element);
        self.elements.push(element.clone());
        trace!(list = %self.name, len = self.elements.len(), "appended list item");

        Ok(self.item_handle(element))
    }

    fn item_handle(&self, element: Element) -> Handle {
        Handle::item(&self.item, Anchor::item(&self.name, element, &self.parent))
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::IndexOutOfRange {
            name: self.name.clone(),
            index,
            len: self.elements.len(),
        }
    }
}

impl Wrapper for List {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_bound(&self) -> bool {
        true
    }

    fn is_present(&self) -> bool {
        !self.elements.is_empty()
    }

    /// Makes the parent exist; a list has no node of its own
    fn create(&mut self) -> Result<()> {
        self.parent.ensure().map(|_| ())
    }

    /// Removes every item
    fn delete(&mut self) -> Result<()> {
        if self.elements.is_empty() {
            return Err(Error::NotPresent(format!("{}.{}", self.parent.path(), self.name)));
        }
        while !self.elements.is_empty() {
            self.remove(self.elements.len() - 1)?;
        }
        Ok(())
    }
}

/// Iterator over the items of a [`List`]
#[derive(Debug)]
pub struct ListIter<'a> {
    list: &'a List,
    index: usize,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = Handle;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.list.elements.get(self.index)?;
        self.index += 1;
        Some(self.list.item_handle(element.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.elements.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ListIter<'_> {}

impl<'a> IntoIterator for &'a List {
    type Item = Handle;
    type IntoIter = ListIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
