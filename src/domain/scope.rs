use crate::error::{Result, WidgetError};
use std::collections::{BTreeSet, HashMap};

/// A single addressable element inside a rendered scope.
///
/// Carries the subset of element state the widgets act on: visible text,
/// input value, class list, and a visibility flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: String,
    pub classes: BTreeSet<String>,
    pub attrs: HashMap<String, String>,
    pub text: String,
    pub value: String,
    pub visible: bool,
}

impl Element {
    pub fn new(tag: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: id.into(),
            classes: BTreeSet::new(),
            attrs: HashMap::new(),
            text: String::new(),
            value: String::new(),
            visible: true,
        }
    }
}

/// An isolated set of elements produced by a [`Renderer`], indexed by id.
///
/// Each widget instance exclusively owns its scope; nothing outside the
/// scope is ever queried or mutated.
///
/// [`Renderer`]: crate::domain::ports::Renderer
#[derive(Debug, Default)]
pub struct Scope {
    elements: HashMap<String, Element>,
    stylesheet: String,
}

impl Scope {
    pub fn new(stylesheet: impl Into<String>) -> Self {
        Self {
            elements: HashMap::new(),
            stylesheet: stylesheet.into(),
        }
    }

    /// Adds an element to the scope. Ids must be unique within one scope.
    pub fn insert(&mut self, element: Element) -> Result<()> {
        if self.elements.contains_key(&element.id) {
            return Err(WidgetError::Template(format!(
                "duplicate element id: {}",
                element.id
            )));
        }
        self.elements.insert(element.id.clone(), element);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Result<&Element> {
        self.elements
            .get(id)
            .ok_or_else(|| WidgetError::UnknownElement(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Element> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| WidgetError::UnknownElement(id.to_string()))
    }

    pub fn text(&self, id: &str) -> Result<&str> {
        Ok(self.get(id)?.text.as_str())
    }

    pub fn set_text(&mut self, id: &str, text: &str) -> Result<()> {
        self.get_mut(id)?.text = text.to_string();
        Ok(())
    }

    pub fn value(&self, id: &str) -> Result<&str> {
        Ok(self.get(id)?.value.as_str())
    }

    pub fn set_value(&mut self, id: &str, value: &str) -> Result<()> {
        self.get_mut(id)?.value = value.to_string();
        Ok(())
    }

    pub fn has_class(&self, id: &str, class: &str) -> Result<bool> {
        Ok(self.get(id)?.classes.contains(class))
    }

    pub fn add_class(&mut self, id: &str, class: &str) -> Result<()> {
        self.get_mut(id)?.classes.insert(class.to_string());
        Ok(())
    }

    pub fn remove_class(&mut self, id: &str, class: &str) -> Result<()> {
        self.get_mut(id)?.classes.remove(class);
        Ok(())
    }

    pub fn is_visible(&self, id: &str) -> Result<bool> {
        Ok(self.get(id)?.visible)
    }

    pub fn show(&mut self, id: &str) -> Result<()> {
        self.get_mut(id)?.visible = true;
        Ok(())
    }

    pub fn hide(&mut self, id: &str) -> Result<()> {
        self.get_mut(id)?.visible = false;
        Ok(())
    }

    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
