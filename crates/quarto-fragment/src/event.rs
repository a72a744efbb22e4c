/*
 * event.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template events.
//!
//! A template is represented as a flat, ordered sequence of events. Nesting
//! is never stored: it is derived by scanning open and close tags.

use std::fmt;

/// An element attribute as written in the source.
///
/// Values are kept in their source (escaped) form; see
/// [`crate::unescape::unescape_attribute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// The name and attributes of an open or standalone element tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTag {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl ElementTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Builder-style attribute addition.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Get an attribute value by its full name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Get a dialect attribute, accepting both `prefix:name` and
    /// `data-prefix-name` spellings.
    pub fn dialect_attribute(&self, prefix: &str, name: &str) -> Option<&str> {
        self.attribute(&format!("{}:{}", prefix, name))
            .or_else(|| self.attribute(&format!("data-{}-{}", prefix, name)))
    }
}

/// One structural unit of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateEvent {
    /// Start of a whole template (absent from selections).
    DocumentStart,

    /// End of a whole template.
    DocumentEnd,

    /// Opening tag of an element with a body.
    OpenTag(ElementTag),

    /// Element without a body, e.g. `<br/>`.
    StandaloneTag(ElementTag),

    /// Closing tag. `unmatched` is set when the corresponding open tag is
    /// not part of this model slice.
    CloseTag { name: String, unmatched: bool },

    /// Character data.
    Text(String),

    /// Comment (body only, without delimiters).
    Comment(String),
}

impl TemplateEvent {
    pub fn open(name: impl Into<String>) -> Self {
        TemplateEvent::OpenTag(ElementTag::new(name))
    }

    pub fn standalone(name: impl Into<String>) -> Self {
        TemplateEvent::StandaloneTag(ElementTag::new(name))
    }

    pub fn close(name: impl Into<String>) -> Self {
        TemplateEvent::CloseTag {
            name: name.into(),
            unmatched: false,
        }
    }

    pub fn unmatched_close(name: impl Into<String>) -> Self {
        TemplateEvent::CloseTag {
            name: name.into(),
            unmatched: true,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        TemplateEvent::Text(text.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        TemplateEvent::Comment(text.into())
    }

    /// The tag carried by an open or standalone element event.
    pub fn element_tag(&self) -> Option<&ElementTag> {
        match self {
            TemplateEvent::OpenTag(tag) | TemplateEvent::StandaloneTag(tag) => Some(tag),
            _ => None,
        }
    }
}

fn write_tag(f: &mut fmt::Formatter<'_>, tag: &ElementTag) -> fmt::Result {
    write!(f, "<{}", tag.name)?;
    for attr in &tag.attributes {
        write!(f, " {}=\"{}\"", attr.name, attr.value)?;
    }
    Ok(())
}

impl fmt::Display for TemplateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateEvent::DocumentStart | TemplateEvent::DocumentEnd => Ok(()),
            TemplateEvent::OpenTag(tag) => {
                write_tag(f, tag)?;
                f.write_str(">")
            }
            TemplateEvent::StandaloneTag(tag) => {
                write_tag(f, tag)?;
                f.write_str("/>")
            }
            TemplateEvent::CloseTag { name, .. } => write!(f, "</{}>", name),
            TemplateEvent::Text(text) => f.write_str(text),
            TemplateEvent::Comment(text) => write!(f, "<!--{}-->", text),
        }
    }
}
