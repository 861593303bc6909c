use crate::domain::ports::Renderer;
use crate::domain::scope::{Element, Scope};
use crate::error::Result;
use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([a-zA-Z][a-zA-Z0-9-]*)([^>]*)>").expect("tag pattern"));
static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([a-zA-Z-]+)="([^"]*)""#).expect("attribute pattern"));

/// Builds a [`Scope`] by scanning template markup for elements carrying
/// an `id` attribute.
///
/// Only id-addressed elements become scope handles; purely structural
/// markup is skipped. The stylesheet rides along with the scope but is
/// otherwise inert. Text content directly following an opening tag is
/// captured as the element's initial text.
pub struct TemplateRenderer;

impl Renderer for TemplateRenderer {
    fn mount(&self, markup: &str, stylesheet: &str) -> Result<Scope> {
        let mut scope = Scope::new(stylesheet);
        for captures in TAG_RE.captures_iter(markup) {
            let tag = &captures[1];
            let attr_src = &captures[2];

            let mut id = None;
            let mut element = Element::new(tag, "");
            for attr in ATTR_RE.captures_iter(attr_src) {
                let name = &attr[1];
                let value = &attr[2];
                match name {
                    "id" => id = Some(value.to_string()),
                    "class" => {
                        element
                            .classes
                            .extend(value.split_whitespace().map(str::to_string));
                    }
                    "value" => element.value = value.to_string(),
                    _ => {
                        element.attrs.insert(name.to_string(), value.to_string());
                    }
                }
            }

            let Some(id) = id else {
                continue;
            };
            element.id = id;

            let tag_end = captures.get(0).map(|m| m.end()).unwrap_or(markup.len());
            element.text = leading_text(&markup[tag_end..]);

            scope.insert(element)?;
        }
        Ok(scope)
    }
}

/// Text content between an opening tag and the next tag boundary.
fn leading_text(rest: &str) -> String {
    rest.split('<').next().unwrap_or("").trim().to_string()
}
