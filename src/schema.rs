//! Schema prototypes
//!
//! A [`FieldSpec`] is the immutable description of one field's shape. It
//! knows nothing about document positions and carries no name: the name is
//! the key under which a parent mapping stores it, so one spec (a `Contact`,
//! say) can be reused under several names. Specs are shared through `Arc`
//! and never mutated after construction.

use crate::error::{Error, Result};
use crate::names::validate_tag;
use crate::values::ValueType;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Ordered mapping from child name to child spec
pub type Mapping = IndexMap<String, Arc<FieldSpec>>;

/// Where a scalar value is stored, relative to the field's parent element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValuePosition {
    /// Text of a child element named after the field
    Element,
    /// Text of the parent element itself
    Text,
    /// Attribute of the parent element named after the field
    Attribute,
}

impl ValuePosition {
    /// Returns true if values at this position own an element node
    pub fn is_element(self) -> bool {
        matches!(self, ValuePosition::Element)
    }
}

/// Structural kind of a field
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Element with a fixed set of named children
    Container(Mapping),
    /// Repeatable same-named sibling elements of one item type
    List(Arc<FieldSpec>),
    /// Typed scalar
    Value(ValuePosition, ValueType),
}

impl FieldKind {
    fn label(&self) -> &'static str {
        match self {
            FieldKind::Container(_) => "container",
            FieldKind::List(_) => "list",
            FieldKind::Value(ValuePosition::Element, _) => "element value",
            FieldKind::Value(ValuePosition::Text, _) => "text value",
            FieldKind::Value(ValuePosition::Attribute, _) => "attribute value",
        }
    }
}

/// Immutable description of one field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    type_name: Cow<'static, str>,
    kind: FieldKind,
}

impl FieldSpec {
    /// Named container type, e.g. `Contact`
    pub fn container<I, K>(type_name: impl Into<Cow<'static, str>>, fields: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (K, Arc<FieldSpec>)>,
        K: Into<String>,
    {
        Arc::new(Self {
            type_name: type_name.into(),
            kind: FieldKind::Container(
                fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ),
        })
    }

    /// Anonymous container
    pub fn group<I, K>(fields: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (K, Arc<FieldSpec>)>,
        K: Into<String>,
    {
        Self::container("Container", fields)
    }

    /// List of `item`
    pub fn list(item: Arc<FieldSpec>) -> Arc<Self> {
        Arc::new(Self {
            type_name: Cow::Owned(format!("List<{}>", item.type_name)),
            kind: FieldKind::List(item),
        })
    }

    /// Scalar stored as the text of a child element
    pub fn value(value_type: ValueType) -> Arc<Self> {
        Self::scalar(ValuePosition::Element, value_type)
    }

    /// Scalar stored as the text of the parent element
    pub fn text(value_type: ValueType) -> Arc<Self> {
        Self::scalar(ValuePosition::Text, value_type)
    }

    /// Scalar stored as an attribute of the parent element
    pub fn attribute(value_type: ValueType) -> Arc<Self> {
        Self::scalar(ValuePosition::Attribute, value_type)
    }

    /// Element whose own text holds the scalar, addressed as `{text: ...}`
    pub fn text_container(value_type: ValueType) -> Arc<Self> {
        Self::container(
            format!("Text{}ValueContainer", value_type.name()),
            [("text", Self::text(value_type))],
        )
    }

    fn scalar(position: ValuePosition, value_type: ValueType) -> Arc<Self> {
        let prefix = match position {
            ValuePosition::Element => "",
            ValuePosition::Text => "Text",
            ValuePosition::Attribute => "Attribute",
        };
        Arc::new(Self {
            type_name: Cow::Owned(format!("{}{}Value", prefix, value_type.name())),
            kind: FieldKind::Value(position, value_type),
        })
    }

    /// Type name used for type checks and messages
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Structural kind
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Child mapping of a container spec
    pub fn mapping(&self) -> Option<&Mapping> {
        match &self.kind {
            FieldKind::Container(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Look up a declared child
    pub fn child(&self, name: &str) -> Option<&Arc<FieldSpec>> {
        self.mapping().and_then(|m| m.get(name))
    }

    /// Returns true if handles of this spec own an element node
    pub fn is_element_backed(&self) -> bool {
        match &self.kind {
            FieldKind::Container(_) => true,
            FieldKind::List(_) => false,
            FieldKind::Value(position, _) => position.is_element(),
        }
    }

    /// Whether `other` may stand in for a value of this spec
    pub fn is_same_type(self: &Arc<Self>, other: &Arc<FieldSpec>) -> bool {
        if Arc::ptr_eq(self, other) {
            return true;
        }
        if self.type_name != other.type_name {
            return false;
        }
        match (&self.kind, &other.kind) {
            (FieldKind::Container(_), FieldKind::Container(_)) => true,
            (FieldKind::List(a), FieldKind::List(b)) => a.is_same_type(b),
            (FieldKind::Value(pa, ta), FieldKind::Value(pb, tb)) => pa == pb && ta == tb,
            _ => false,
        }
    }

    /// Check names and list item kinds through the whole schema tree
    pub fn validate(&self) -> Result<()> {
        let mut pending: Vec<(String, &FieldSpec)> = vec![(self.type_name.to_string(), self)];

        while let Some((path, spec)) = pending.pop() {
            match &spec.kind {
                FieldKind::Container(mapping) => {
                    for (name, child) in mapping {
                        validate_tag(name)?;
                        pending.push((format!("{}.{}", path, name), child.as_ref()));
                    }
                }
                FieldKind::List(item) => {
                    if !item.is_element_backed() {
                        return Err(Error::Config(format!(
                            "list '{}' cannot hold a {}",
                            path,
                            item.kind.label()
                        )));
                    }
                    pending.push((path, item.as_ref()));
                }
                FieldKind::Value(..) => {}
            }
        }

        Ok(())
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.type_name, self.kind.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> Arc<FieldSpec> {
        FieldSpec::container(
            "Contact",
            [
                ("rpIndName", FieldSpec::value(ValueType::String)),
                ("role", FieldSpec::group([("RoleCd", FieldSpec::group([("value", FieldSpec::attribute(ValueType::String))]))])),
            ],
        )
    }

    #[test]
    fn test_type_names() {
        assert_eq!(FieldSpec::value(ValueType::String).type_name(), "StringValue");
        assert_eq!(FieldSpec::text(ValueType::Date).type_name(), "TextDateValue");
        assert_eq!(
            FieldSpec::attribute(ValueType::String).type_name(),
            "AttributeStringValue"
        );
        assert_eq!(
            FieldSpec::text_container(ValueType::Integer).type_name(),
            "TextIntegerValueContainer"
        );
        assert_eq!(FieldSpec::list(contact()).type_name(), "List<Contact>");
    }

    #[test]
    fn test_mapping_keeps_declaration_order() {
        let spec = contact();
        let names: Vec<_> = spec.mapping().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["rpIndName", "role"]);
        assert!(spec.child("role").is_some());
        assert!(spec.child("rpCntInfo").is_none());
    }

    #[test]
    fn test_same_type() {
        let a = contact();
        let b = contact();
        let keywords = FieldSpec::container("Keywords", Vec::<(String, Arc<FieldSpec>)>::new());

        assert!(a.is_same_type(&a));
        assert!(a.is_same_type(&b));
        assert!(!a.is_same_type(&keywords));
        assert!(!FieldSpec::value(ValueType::String).is_same_type(&FieldSpec::value(ValueType::Integer)));
    }

    #[test]
    fn test_validate() {
        assert!(contact().validate().is_ok());

        let bad_name = FieldSpec::group([("not a tag", FieldSpec::value(ValueType::String))]);
        assert!(matches!(bad_name.validate(), Err(Error::Name(_))));

        let bad_item = FieldSpec::group([("codes", FieldSpec::list(FieldSpec::attribute(ValueType::String)))]);
        assert!(matches!(bad_item.validate(), Err(Error::Config(_))));
    }
}
