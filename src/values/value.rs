use super::{Scalar, ValueType};
use crate::documents::Element;
use crate::error::{Error, Result};
use crate::schema::{FieldSpec, ValuePosition};
use crate::wrappers::{Anchor, AttributeWrapper, ElementWrapper, TextWrapper, Wrapper};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::rc::Rc;
use std::sync::Arc;

/// Where the raw text of a value lives
#[derive(Debug, Clone)]
enum Slot {
    Element(ElementWrapper),
    Text(TextWrapper),
    Attribute(AttributeWrapper),
}

/// Handle to one typed scalar in the document.
///
/// The value type decides how raw text is parsed and formatted; the slot
/// decides where that text is read from and written to.
#[derive(Debug, Clone)]
pub struct Value {
    spec: Arc<FieldSpec>,
    value_type: ValueType,
    slot: Slot,
}

impl Value {
    pub(crate) fn bind(
        name: &str,
        spec: Arc<FieldSpec>,
        position: ValuePosition,
        value_type: ValueType,
        parent: &Rc<Anchor>,
    ) -> Result<Self> {
        let slot = match position {
            ValuePosition::Element => Slot::Element(ElementWrapper::bind(name, parent)?),
            ValuePosition::Text => Slot::Text(TextWrapper::bind(name, parent)),
            ValuePosition::Attribute => Slot::Attribute(AttributeWrapper::bind(name, parent)),
        };
        Ok(Self {
            spec,
            value_type,
            slot,
        })
    }

    pub(crate) fn from_element(
        spec: Arc<FieldSpec>,
        value_type: ValueType,
        element: ElementWrapper,
    ) -> Self {
        Self {
            spec,
            value_type,
            slot: Slot::Element(element),
        }
    }

    /// Schema spec of this value
    pub fn spec(&self) -> &Arc<FieldSpec> {
        &self.spec
    }

    /// Declared scalar type
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Own element, for element-text values
    pub fn element(&self) -> Option<Element> {
        match &self.slot {
            Slot::Element(wrapper) => wrapper.element(),
            Slot::Text(_) | Slot::Attribute(_) => None,
        }
    }

    /// Raw text at the position without parsing.
    ///
    /// Fails with `InvalidStructure` when the element holding the text has
    /// element children.
    pub fn raw(&self) -> Result<Option<String>> {
        match &self.slot {
            Slot::Element(wrapper) => match wrapper.element() {
                Some(element) => self.scalar_text(&element),
                None => Ok(None),
            },
            Slot::Text(wrapper) => match wrapper.parent_element() {
                Some(element) => self.scalar_text(&element),
                None => Ok(None),
            },
            Slot::Attribute(wrapper) => Ok(wrapper.raw()),
        }
    }

    /// Parsed value; `None` when the position is absent or holds no text
    pub fn value(&self) -> Result<Option<Scalar>> {
        match self.raw()? {
            Some(raw) => self.value_type.parse(&raw),
            None => Ok(None),
        }
    }

    /// Validate and store a value, creating the position if needed. Any
    /// element children at the position are dropped.
    pub fn set_value(&mut self, value: impl Into<Scalar>) -> Result<()> {
        let value = self.value_type.coerce(value.into())?;
        let text = self.value_type.format(&value)?;

        match &mut self.slot {
            Slot::Element(wrapper) => {
                let element = wrapper.anchor().ensure()?;
                write_scalar(&element, text);
            }
            Slot::Text(wrapper) => {
                let element = wrapper.ensure_parent()?;
                write_scalar(&element, text);
            }
            Slot::Attribute(wrapper) => wrapper.set_raw(text)?,
        }
        Ok(())
    }

    /// Read a string value
    pub fn string(&self) -> Result<Option<String>> {
        self.expect_type(ValueType::String)?;
        Ok(self.value()?.and_then(Scalar::into_string))
    }

    /// Read an integer value
    pub fn integer(&self) -> Result<Option<i64>> {
        self.expect_type(ValueType::Integer)?;
        Ok(self.value()?.and_then(Scalar::into_integer))
    }

    /// Read a decimal value
    pub fn decimal(&self) -> Result<Option<Decimal>> {
        self.expect_type(ValueType::Decimal)?;
        Ok(self.value()?.and_then(Scalar::into_decimal))
    }

    /// Read a boolean value
    pub fn boolean(&self) -> Result<Option<bool>> {
        self.expect_type(ValueType::Boolean)?;
        Ok(self.value()?.and_then(Scalar::into_boolean))
    }

    /// Read a date value
    pub fn date(&self) -> Result<Option<NaiveDate>> {
        self.expect_type(ValueType::Date)?;
        Ok(self.value()?.and_then(Scalar::into_date))
    }

    /// Read a time value
    pub fn time(&self) -> Result<Option<NaiveTime>> {
        self.expect_type(ValueType::Time)?;
        Ok(self.value()?.and_then(Scalar::into_time))
    }

    /// Read a date-time value
    pub fn datetime(&self) -> Result<Option<NaiveDateTime>> {
        self.expect_type(ValueType::DateTime)?;
        Ok(self.value()?.and_then(Scalar::into_datetime))
    }

    fn expect_type(&self, expected: ValueType) -> Result<()> {
        if self.value_type == expected {
            Ok(())
        } else {
            Err(Error::type_mismatch(expected.name(), self.value_type.name()))
        }
    }

    fn scalar_text(&self, element: &Element) -> Result<Option<String>> {
        if element.element_children_len() > 0 {
            return Err(Error::InvalidStructure(format!(
                "'{}' has child elements where a {} was expected",
                element.tag(),
                self.spec.type_name()
            )));
        }
        Ok(element.text())
    }
}

fn write_scalar(element: &Element, text: String) {
    element.set_text(Some(text));
    element.clear_children();
}

impl Wrapper for Value {
    fn name(&self) -> &str {
        match &self.slot {
            Slot::Element(w) => w.name(),
            Slot::Text(w) => w.name(),
            Slot::Attribute(w) => w.name(),
        }
    }

    fn is_bound(&self) -> bool {
        match &self.slot {
            Slot::Element(w) => w.is_bound(),
            Slot::Text(w) => w.is_bound(),
            Slot::Attribute(w) => w.is_bound(),
        }
    }

    fn is_present(&self) -> bool {
        match &self.slot {
            Slot::Element(w) => w.is_present(),
            Slot::Text(w) => w.is_present(),
            Slot::Attribute(w) => w.is_present(),
        }
    }

    fn create(&mut self) -> Result<()> {
        match &mut self.slot {
            Slot::Element(w) => w.create(),
            Slot::Text(w) => w.create(),
            Slot::Attribute(w) => w.create(),
        }
    }

    fn delete(&mut self) -> Result<()> {
        match &mut self.slot {
            Slot::Element(w) => w.delete(),
            Slot::Text(w) => w.delete(),
            Slot::Attribute(w) => w.delete(),
        }
    }
}
