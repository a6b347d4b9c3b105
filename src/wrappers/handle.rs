use super::{Anchor, Container, ElementWrapper, List, Wrapper};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::schema::{FieldKind, FieldSpec};
use crate::values::Value;
use std::rc::Rc;
use std::sync::Arc;

/// What a container field resolves to
#[derive(Debug, Clone)]
pub enum Handle {
    /// Element with declared children
    Container(Container),
    /// Repeated elements
    List(List),
    /// Typed scalar
    Value(Value),
}

impl Handle {
    /// Bind `spec` under `name` below `parent`, scanning the live document
    pub(crate) fn bind(name: &str, spec: &Arc<FieldSpec>, parent: &Rc<Anchor>) -> Result<Self> {
        match spec.kind() {
            FieldKind::Container(_) => Ok(Handle::Container(Container::new(
                Arc::clone(spec),
                ElementWrapper::bind(name, parent)?,
            ))),
            FieldKind::List(_) => Ok(Handle::List(List::bind(name, spec, parent)?)),
            FieldKind::Value(position, value_type) => Ok(Handle::Value(Value::bind(
                name,
                Arc::clone(spec),
                *position,
                *value_type,
                parent,
            )?)),
        }
    }

    /// Handle for a list item already positioned by the list
    pub(crate) fn item(spec: &Arc<FieldSpec>, anchor: Rc<Anchor>) -> Self {
        let element = ElementWrapper::from_anchor(anchor);
        match spec.kind() {
            FieldKind::Value(_, value_type) => {
                Handle::Value(Value::from_element(Arc::clone(spec), *value_type, element))
            }
            _ => Handle::Container(Container::new(Arc::clone(spec), element)),
        }
    }

    /// Schema spec of the handle
    pub fn spec(&self) -> &Arc<FieldSpec> {
        match self {
            Handle::Container(c) => c.spec(),
            Handle::List(l) => l.spec(),
            Handle::Value(v) => v.spec(),
        }
    }

    /// Element at the position, for element-backed handles
    pub fn element(&self) -> Option<Element> {
        match self {
            Handle::Container(c) => c.element(),
            Handle::List(_) => None,
            Handle::Value(v) => v.element(),
        }
    }

    /// Convert into a container handle
    pub fn into_container(self) -> Result<Container> {
        match self {
            Handle::Container(c) => Ok(c),
            other => Err(Error::type_mismatch("Container", other.spec().type_name())),
        }
    }

    /// Convert into a list handle
    pub fn into_list(self) -> Result<List> {
        match self {
            Handle::List(l) => Ok(l),
            other => Err(Error::type_mismatch("List", other.spec().type_name())),
        }
    }

    /// Convert into a value handle
    pub fn into_value(self) -> Result<Value> {
        match self {
            Handle::Value(v) => Ok(v),
            other => Err(Error::type_mismatch("Value", other.spec().type_name())),
        }
    }
}

impl Wrapper for Handle {
    fn name(&self) -> &str {
        match self {
            Handle::Container(c) => c.name(),
            Handle::List(l) => l.name(),
            Handle::Value(v) => v.name(),
        }
    }

    fn is_bound(&self) -> bool {
        match self {
            Handle::Container(c) => c.is_bound(),
            Handle::List(l) => l.is_bound(),
            Handle::Value(v) => v.is_bound(),
        }
    }

    fn is_present(&self) -> bool {
        match self {
            Handle::Container(c) => c.is_present(),
            Handle::List(l) => l.is_present(),
            Handle::Value(v) => v.is_present(),
        }
    }

    fn create(&mut self) -> Result<()> {
        match self {
            Handle::Container(c) => c.create(),
            Handle::List(l) => l.create(),
            Handle::Value(v) => v.create(),
        }
    }

    fn delete(&mut self) -> Result<()> {
        match self {
            Handle::Container(c) => c.delete(),
            Handle::List(l) => l.delete(),
            Handle::Value(v) => v.delete(),
        }
    }
}

impl From<Container> for Handle {
    fn from(c: Container) -> Self {
        Handle::Container(c)
    }
}

impl From<List> for Handle {
    fn from(l: List) -> Self {
        Handle::List(l)
    }
}

impl From<Value> for Handle {
    fn from(v: Value) -> Self {
        Handle::Value(v)
    }
}
