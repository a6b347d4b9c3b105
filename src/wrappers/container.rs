use super::{Anchor, ElementWrapper, Handle, List, Wrapper};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::schema::{FieldSpec, Mapping};
use crate::values::Value;
use std::rc::Rc;
use std::sync::Arc;

/// An element whose children are declared by a schema mapping.
///
/// Fields are resolved on access: [`Container::get`] looks the name up in
/// the mapping and binds a fresh handle to the current document. Nothing
/// is cached between two accesses.
#[derive(Debug, Clone)]
pub struct Container {
    spec: Arc<FieldSpec>,
    element: ElementWrapper,
}

impl Container {
    pub(crate) fn new(spec: Arc<FieldSpec>, element: ElementWrapper) -> Self {
        Self { spec, element }
    }

    pub(crate) fn root(spec: Arc<FieldSpec>, anchor: Rc<Anchor>) -> Self {
        Self::new(spec, ElementWrapper::from_anchor(anchor))
    }

    /// Unbound container; reading works, creating fails
    pub fn detached(spec: Arc<FieldSpec>, name: &str) -> Result<Self> {
        Self::check_spec(&spec)?;
        Ok(Self::new(spec, ElementWrapper::detached(name)))
    }

    /// Unbound container over a standalone element, usable as a copy source
    pub fn from_element(spec: Arc<FieldSpec>, element: Element) -> Result<Self> {
        Self::check_spec(&spec)?;
        Ok(Self::new(spec, ElementWrapper::from_element(element)))
    }

    fn check_spec(spec: &Arc<FieldSpec>) -> Result<()> {
        match spec.mapping() {
            Some(_) => Ok(()),
            None => Err(Error::type_mismatch("Container", spec.type_name())),
        }
    }

    /// Schema spec of this container
    pub fn spec(&self) -> &Arc<FieldSpec> {
        &self.spec
    }

    /// The element at this position, if present
    pub fn element(&self) -> Option<Element> {
        self.element.element()
    }

    /// Dotted schema path of this position
    pub fn path(&self) -> String {
        self.element.path()
    }

    /// Declared field names, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.mapping().into_iter().flat_map(|m| m.keys().map(String::as_str))
    }

    fn mapping(&self) -> Option<&Mapping> {
        self.spec.mapping()
    }

    /// Resolve a declared field against the current document
    pub fn get(&self, name: &str) -> Result<Handle> {
        let spec = self.spec.child(name).ok_or_else(|| Error::FieldNotFound {
            field: name.to_string(),
            container: self.name().to_string(),
        })?;
        Handle::bind(name, spec, self.element.anchor())
    }

    /// Resolve a field that must be a container
    pub fn container(&self, name: &str) -> Result<Container> {
        self.get(name)?.into_container()
    }

    /// Resolve a field that must be a list
    pub fn list(&self, name: &str) -> Result<List> {
        self.get(name)?.into_list()
    }

    /// Resolve a field that must be a value
    pub fn value(&self, name: &str) -> Result<Value> {
        self.get(name)?.into_value()
    }

    /// Delete a field's position from the document
    pub fn remove(&self, name: &str) -> Result<()> {
        self.get(name)?.delete()
    }

    /// Resolve a dotted path such as `dataIdInfo.tpCat[1].TopicCatCd.value`
    pub fn at(&self, path: &str) -> Result<Handle> {
        let mut current = Handle::Container(self.clone());
        for segment in path.split('.') {
            let (name, index) = parse_segment(segment)?;
            current = current.into_container()?.get(name)?;
            if let Some(index) = index {
                current = current.into_list()?.get(index)?;
            }
        }
        Ok(current)
    }

    /// Replace this position with a deep copy of another container of the
    /// same type
    pub fn set(&mut self, source: &Container) -> Result<()> {
        if !self.spec.is_same_type(&source.spec) {
            return Err(Error::type_mismatch(
                self.spec.type_name(),
                source.spec.type_name(),
            ));
        }
        let element = source
            .element()
            .ok_or_else(|| Error::NotPresent(source.path()))?;
        self.element.set(&element)
    }
}

impl Wrapper for Container {
    fn name(&self) -> &str {
        self.element.name()
    }

    fn is_bound(&self) -> bool {
        self.element.is_bound()
    }

    fn is_present(&self) -> bool {
        self.element.is_present()
    }

    fn create(&mut self) -> Result<()> {
        self.element.create()
    }

    fn delete(&mut self) -> Result<()> {
        self.element.delete()
    }
}

/// `name` or `name[index]`
fn parse_segment(segment: &str) -> Result<(&str, Option<usize>)> {
    let invalid = || Error::Name(format!("Invalid path segment: '{}'", segment));

    match segment.split_once('[') {
        None if !segment.is_empty() => Ok((segment, None)),
        None => Err(invalid()),
        Some((name, rest)) => {
            let index = rest
                .strip_suffix(']')
                .and_then(|digits| digits.parse::<usize>().ok())
                .ok_or_else(invalid)?;
            if name.is_empty() {
                return Err(invalid());
            }
            Ok((name, Some(index)))
        }
    }
}
