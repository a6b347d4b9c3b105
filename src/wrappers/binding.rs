//! Document positions shared by bound handles
//!
//! An [`Anchor`] is the resolved state of one element-kind position: its
//! name, the element currently found there (if any) and the link to its
//! parent position. Handles hold anchors through `Rc`, so a handle and the
//! handles of its descendants see the same ancestor state, and creating a
//! missing leaf fills in every ancestor the caller still holds.

use crate::documents::{Document, Element};
use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// What a position hangs off
pub(crate) enum Parent {
    /// Not attached to any document
    Detached,
    /// The document root slot
    Document(Rc<RefCell<Document>>),
    /// A child slot of another position
    Element(Rc<Anchor>),
}

pub(crate) struct Anchor {
    name: String,
    element: RefCell<Option<Element>>,
    parent: Parent,
    /// One of several same-named siblings (a list item)
    repeated: bool,
}

impl Anchor {
    /// Root position; present only when the document root carries `name`
    pub(crate) fn root(name: &str, document: &Rc<RefCell<Document>>) -> Rc<Self> {
        let element = document
            .borrow()
            .root()
            .filter(|root| root.has_tag(name))
            .cloned();
        Rc::new(Self {
            name: name.to_string(),
            element: RefCell::new(element),
            parent: Parent::Document(Rc::clone(document)),
            repeated: false,
        })
    }

    pub(crate) fn detached(name: &str, element: Option<Element>) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            element: RefCell::new(element),
            parent: Parent::Detached,
            repeated: false,
        })
    }

    /// Bind to the unique child of `parent` tagged `name`
    pub(crate) fn bind_child(name: &str, parent: &Rc<Anchor>) -> Result<Rc<Self>> {
        let element = match parent.element() {
            Some(parent_element) => unique_child(&parent_element, name)?,
            None => None,
        };
        Ok(Rc::new(Self {
            name: name.to_string(),
            element: RefCell::new(element),
            parent: Parent::Element(Rc::clone(parent)),
            repeated: false,
        }))
    }

    /// Position of a list item already found under `parent`
    pub(crate) fn item(name: &str, element: Element, parent: &Rc<Anchor>) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            element: RefCell::new(Some(element)),
            parent: Parent::Element(Rc::clone(parent)),
            repeated: true,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn element(&self) -> Option<Element> {
        self.element.borrow().clone()
    }

    fn set_element(&self, element: Option<Element>) {
        *self.element.borrow_mut() = element;
    }

    pub(crate) fn is_bound(&self) -> bool {
        !matches!(self.parent, Parent::Detached)
    }

    pub(crate) fn is_present(&self) -> bool {
        self.element.borrow().is_some()
    }

    /// Dotted path from the outermost position, for messages
    pub(crate) fn path(&self) -> String {
        let mut names = vec![self.name.as_str()];
        let mut current = &self.parent;
        while let Parent::Element(parent) = current {
            names.push(parent.name.as_str());
            current = &parent.parent;
        }
        names.reverse();
        names.join(".")
    }

    /// Return the element at this position, creating it and every missing
    /// ancestor first.
    ///
    /// The whole chain is re-resolved against the live tree from the top
    /// down, so elements created or deleted through other handles are
    /// picked up and the schema depth never grows the call stack.
    pub(crate) fn ensure(self: &Rc<Self>) -> Result<Element> {
        let mut chain: Vec<Rc<Anchor>> = Vec::new();
        let mut current = Rc::clone(self);

        let mut base = loop {
            let next = match &current.parent {
                Parent::Detached => {
                    break current.element().ok_or_else(|| {
                        Error::UnboundElement(format!(
                            "Cannot create '{}' on an unbound element",
                            current.path()
                        ))
                    })?
                }
                Parent::Document(document) => {
                    let root = ensure_root(&current.name, document)?;
                    current.set_element(Some(root.clone()));
                    break root;
                }
                Parent::Element(parent) => Rc::clone(parent),
            };
            chain.push(std::mem::replace(&mut current, next));
        };

        for anchor in chain.iter().rev() {
            let element = match anchor.find_in(&base)? {
                Some(existing) => existing,
                None => {
                    let element = Element::new(anchor.name.clone());
                    base.append_child(&element);
                    trace!(path = %anchor.path(), "created element");
                    element
                }
            };
            anchor.set_element(Some(element.clone()));
            base = element;
        }

        Ok(base)
    }

    /// This position's element among the live children of `parent`
    fn find_in(&self, parent: &Element) -> Result<Option<Element>> {
        if !self.repeated {
            return unique_child(parent, &self.name);
        }
        Ok(self.element().filter(|element| {
            parent
                .children()
                .iter()
                .any(|child| child.same_node(element))
        }))
    }

    /// Detach the element at this position from its parent
    pub(crate) fn remove(&self) -> Result<Element> {
        if !self.is_bound() {
            return Err(Error::UnboundElement(format!(
                "Cannot delete '{}' on an unbound element",
                self.name
            )));
        }
        let element = self
            .element()
            .ok_or_else(|| Error::NotPresent(self.path()))?;

        let removed = match &self.parent {
            Parent::Detached => false,
            Parent::Document(document) => {
                let mut document = document.borrow_mut();
                let is_root = document.root().map_or(false, |root| root.same_node(&element));
                if is_root {
                    document.set_root(None);
                }
                is_root
            }
            Parent::Element(parent) => parent
                .element()
                .map_or(false, |parent_element| parent_element.remove_child(&element)),
        };

        self.set_element(None);
        if !removed {
            return Err(Error::NotPresent(self.path()));
        }
        trace!(path = %self.path(), "deleted element");
        Ok(element)
    }

    /// Put `element` at this position, replacing whatever is there
    pub(crate) fn replace(self: &Rc<Self>, element: Element) -> Result<()> {
        if !self.is_bound() {
            return Err(Error::UnboundElement(format!(
                "Cannot set '{}' on an unbound element",
                self.name
            )));
        }
        if self.is_present() {
            self.remove()?;
        }

        match &self.parent {
            Parent::Detached => {}
            Parent::Document(document) => {
                let mut document = document.borrow_mut();
                if let Some(root) = document.root() {
                    return Err(Error::InvalidStructure(format!(
                        "Document root is '{}', cannot install '{}'",
                        root.tag(),
                        self.name
                    )));
                }
                document.set_root(Some(element.clone()));
            }
            Parent::Element(parent) => {
                parent.ensure()?.append_child(&element);
            }
        }

        trace!(path = %self.path(), "replaced element");
        self.set_element(Some(element));
        Ok(())
    }
}

impl fmt::Debug for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Anchor")
            .field("path", &self.path())
            .field("bound", &self.is_bound())
            .field("present", &self.is_present())
            .finish()
    }
}

/// At most one child may carry `tag`; more is a structural violation
fn unique_child(parent: &Element, tag: &str) -> Result<Option<Element>> {
    let mut found = None;
    for child in parent.children() {
        if child.has_tag(tag) {
            if found.is_some() {
                return Err(Error::InvalidStructure(format!(
                    "Multiple '{}' elements found in '{}' when expecting one",
                    tag,
                    parent.tag()
                )));
            }
            found = Some(child);
        }
    }
    Ok(found)
}

fn ensure_root(name: &str, document: &Rc<RefCell<Document>>) -> Result<Element> {
    let mut document = document.borrow_mut();
    let existing = document.root().cloned();
    match existing {
        Some(root) if root.has_tag(name) => Ok(root),
        Some(root) => Err(Error::InvalidStructure(format!(
            "Document root is '{}', expected '{}'",
            root.tag(),
            name
        ))),
        None => {
            let root = Element::new(name);
            document.set_root(Some(root.clone()));
            trace!(name, "created document root");
            Ok(root)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(xml: &str) -> Rc<RefCell<Document>> {
        Rc::new(RefCell::new(Document::from_string(xml).unwrap()))
    }

    #[test]
    fn test_root_requires_matching_tag() {
        let doc = document("<metadata/>");
        assert!(Anchor::root("metadata", &doc).is_present());

        let doc = document("<other/>");
        let root = Anchor::root("metadata", &doc);
        assert!(!root.is_present());
        assert!(root.ensure().unwrap_err().is_invalid_structure());
    }

    #[test]
    fn test_bind_child_rejects_duplicates() {
        let doc = document("<metadata><a/><a/><b/></metadata>");
        let root = Anchor::root("metadata", &doc);
        assert!(Anchor::bind_child("b", &root).unwrap().is_present());
        assert!(!Anchor::bind_child("c", &root).unwrap().is_present());
        assert!(Anchor::bind_child("a", &root).unwrap_err().is_invalid_structure());
    }

    #[test]
    fn test_ensure_creates_ancestors_top_down() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let root = Anchor::root("metadata", &doc);
        let a = Anchor::bind_child("a", &root).unwrap();
        let b = Anchor::bind_child("b", &a).unwrap();
        let c = Anchor::bind_child("c", &b).unwrap();

        let leaf = c.ensure().unwrap();
        assert_eq!(leaf.tag(), "c");
        assert!(root.is_present());
        assert!(a.is_present());
        assert!(b.is_present());
        assert_eq!(c.path(), "metadata.a.b.c");

        let xml = doc.borrow().to_string(0).unwrap();
        assert!(xml.contains("<metadata><a><b><c/></b></a></metadata>"));
    }

    #[test]
    fn test_ensure_reuses_element_created_elsewhere() {
        let doc = document("<metadata/>");
        let root = Anchor::root("metadata", &doc);
        let stale = Anchor::bind_child("a", &root).unwrap();
        let fresh = Anchor::bind_child("a", &root).unwrap();

        let created = fresh.ensure().unwrap();
        assert!(!stale.is_present());
        assert!(stale.ensure().unwrap().same_node(&created));
        assert_eq!(root.element().unwrap().find_children("a").len(), 1);
    }

    #[test]
    fn test_ensure_reuses_nested_elements_created_elsewhere() {
        let doc = document("<metadata/>");
        let root = Anchor::root("metadata", &doc);
        let stale_a = Anchor::bind_child("a", &root).unwrap();
        let stale_b = Anchor::bind_child("b", &stale_a).unwrap();
        let stale_c = Anchor::bind_child("c", &stale_b).unwrap();
        let fresh_a = Anchor::bind_child("a", &root).unwrap();
        let fresh_b = Anchor::bind_child("b", &fresh_a).unwrap();
        let fresh_d = Anchor::bind_child("d", &fresh_b).unwrap();

        fresh_d.ensure().unwrap();
        stale_c.ensure().unwrap();

        let xml = doc.borrow().to_string(0).unwrap();
        assert!(xml.contains("<metadata><a><b><d/><c/></b></a></metadata>"));
        assert!(stale_b.element().unwrap().same_node(&fresh_b.element().unwrap()));
    }

    #[test]
    fn test_ensure_recreates_deleted_ancestor() {
        let doc = document("<metadata><a><b/></a></metadata>");
        let root = Anchor::root("metadata", &doc);
        let a = Anchor::bind_child("a", &root).unwrap();
        let b = Anchor::bind_child("b", &a).unwrap();
        let removed = b.element().unwrap();

        Anchor::bind_child("a", &root).unwrap().remove().unwrap();
        let b_element = b.ensure().unwrap();

        assert!(!b_element.same_node(&removed));
        let xml = doc.borrow().to_string(0).unwrap();
        assert!(xml.contains("<metadata><a><b/></a></metadata>"));
    }

    #[test]
    fn test_ensure_keeps_attached_item() {
        let doc = document("<metadata><a/><a/></metadata>");
        let root = Anchor::root("metadata", &doc);
        let second = root.element().unwrap().children()[1].clone();
        let item = Anchor::item("a", second.clone(), &root);

        assert!(item.ensure().unwrap().same_node(&second));

        root.element().unwrap().remove_child(&second);
        let replacement = item.ensure().unwrap();
        assert!(!replacement.same_node(&second));
        assert_eq!(root.element().unwrap().find_children("a").len(), 2);
    }

    #[test]
    fn test_detached_cannot_be_created() {
        let anchor = Anchor::detached("contact", None);
        let child = Anchor::bind_child("name", &anchor).unwrap();
        assert!(child.ensure().unwrap_err().is_unbound());
        assert!(anchor.remove().unwrap_err().is_unbound());
    }

    #[test]
    fn test_remove_missing_is_an_error() {
        let doc = document("<metadata/>");
        let root = Anchor::root("metadata", &doc);
        let child = Anchor::bind_child("a", &root).unwrap();
        assert!(matches!(child.remove(), Err(Error::NotPresent(_))));
    }
}
