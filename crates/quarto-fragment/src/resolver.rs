/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Fragment resolution and nested rendering.
//!
//! The expression evaluator and the renderer belong to the host engine.
//! This module defines the traits insertion talks to, plus small in-memory
//! implementations for tests and for embedding without a full expression
//! language.

use crate::classify::FRAGMENT_EXPRESSION_OPEN;
use crate::context::TemplateContext;
use crate::error::FragmentResult;
use crate::event::TemplateEvent;
use crate::fragment::{Fragment, FragmentArguments};
use crate::model::TemplateModel;
use crate::signature::{FRAGMENT_ATTR_NAME, parse_signature};
use crate::unescape::unescape_attribute;
use crate::value::{FragmentValue, split_top_level};
use std::collections::{BTreeMap, HashMap};

/// Evaluates an expression that is expected to produce a fragment.
pub trait ExpressionEvaluator: Send + Sync {
    /// Returns `None` for unparsable or non-fragment expressions.
    fn evaluate(&self, context: &dyn TemplateContext, expression: &str) -> Option<Fragment>;
}

/// Re-entry point into the full rendering pipeline.
pub trait TemplateRenderer: Send + Sync {
    /// Render `model` completely, appending the output to `sink`.
    fn render(
        &self,
        model: &TemplateModel,
        context: &mut dyn TemplateContext,
        sink: &mut String,
    ) -> FragmentResult<()>;
}

/// Evaluator over templates held in memory.
///
/// Understands only canonical fragment expressions with literal arguments:
///
/// - `~{page}`: the whole template;
/// - `~{page :: nav}`: the element declaring fragment `nav`;
/// - `~{page :: nav(x=1, y='a')}` or `~{page :: nav(1, 'a')}`.
#[derive(Debug, Clone)]
pub struct MemoryFragmentResolver {
    templates: HashMap<String, TemplateModel>,
    dialect_prefix: String,
}

impl MemoryFragmentResolver {
    pub fn new(dialect_prefix: impl Into<String>) -> Self {
        Self {
            templates: HashMap::new(),
            dialect_prefix: dialect_prefix.into(),
        }
    }

    /// Register a whole template under the name stored in its template data.
    pub fn add(&mut self, model: TemplateModel) -> &mut Self {
        self.templates
            .insert(model.template_data().template.clone(), model);
        self
    }

    /// Create a resolver with the given templates.
    pub fn with_templates(
        dialect_prefix: impl Into<String>,
        templates: impl IntoIterator<Item = TemplateModel>,
    ) -> Self {
        let mut resolver = Self::new(dialect_prefix);
        for model in templates {
            resolver.add(model);
        }
        resolver
    }

    /// Extract the element declaring fragment `selector` from `model`.
    pub fn select(&self, model: &TemplateModel, selector: &str) -> Option<TemplateModel> {
        let events = model.events();
        let start = events.iter().position(|event| {
            event
                .element_tag()
                .and_then(|tag| tag.dialect_attribute(&self.dialect_prefix, FRAGMENT_ATTR_NAME))
                .and_then(|raw| {
                    parse_signature(&unescape_attribute(model.template_mode(), raw)).ok()
                })
                .is_some_and(|signature| signature.name == selector)
        })?;

        let end = match &events[start] {
            TemplateEvent::OpenTag(_) => matching_close(events, start)?,
            _ => start,
        };

        let mut data = model.template_data().clone();
        data.selectors.push(selector.to_string());
        Some(TemplateModel::new(data, events[start..=end].to_vec()))
    }
}

impl Default for MemoryFragmentResolver {
    fn default() -> Self {
        Self::new("th")
    }
}

/// Index of the close tag matching the open tag at `open`.
fn matching_close(events: &[TemplateEvent], open: usize) -> Option<usize> {
    let mut level = 0usize;
    for (offset, event) in events[open..].iter().enumerate() {
        match event {
            TemplateEvent::OpenTag(_) => level += 1,
            TemplateEvent::CloseTag {
                unmatched: false, ..
            } => {
                level -= 1;
                if level == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse `(x=1, y='a')` or `(1, 'a')` argument list contents.
fn parse_arguments(spec: &str) -> Option<FragmentArguments> {
    let items = split_top_level(spec).ok()?;
    if items.is_empty() {
        return Some(FragmentArguments::None);
    }

    let mut named = BTreeMap::new();
    let mut positional = Vec::new();
    for item in items {
        let assignment = item
            .split_once('=')
            .filter(|(name, _)| !name.trim_start().starts_with('\''));
        match assignment {
            Some((name, value)) => {
                named.insert(name.trim().to_string(), FragmentValue::parse_literal(value).ok()?);
            }
            None => positional.push(FragmentValue::parse_literal(item).ok()?),
        }
    }

    match (named.is_empty(), positional.is_empty()) {
        (false, true) => Some(FragmentArguments::Named(named)),
        (true, false) => Some(FragmentArguments::Positional(positional)),
        // Mixing both forms is not allowed.
        _ => None,
    }
}

impl ExpressionEvaluator for MemoryFragmentResolver {
    fn evaluate(&self, _context: &dyn TemplateContext, expression: &str) -> Option<Fragment> {
        let content = expression
            .trim()
            .strip_prefix(FRAGMENT_EXPRESSION_OPEN)?
            .strip_suffix('}')?
            .trim();

        let (template_name, selection) = match content.split_once("::") {
            Some((template, selection)) => (template.trim(), Some(selection.trim())),
            None => (content, None),
        };
        let template = self.templates.get(template_name)?;

        let Some(selection) = selection else {
            return Some(Fragment::new(template.clone(), FragmentArguments::None));
        };

        let (selector, arguments) = match selection.find('(') {
            Some(open) => {
                let inner = selection[open + 1..].strip_suffix(')')?;
                (selection[..open].trim(), parse_arguments(inner)?)
            }
            None => (selection, FragmentArguments::None),
        };

        let model = self.select(template, selector)?;
        tracing::trace!(
            template = template_name,
            selector,
            events = model.len(),
            "Resolved fragment from memory"
        );
        Some(Fragment::new(model, arguments))
    }
}

/// Renderer that writes events back out as markup.
///
/// Text events may reference variables as `[[${name}]]`; these are replaced
/// with the variable's value from the context (empty when unbound).
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupRenderer;

impl MarkupRenderer {
    fn render_text(text: &str, context: &dyn TemplateContext, sink: &mut String) {
        let mut rest = text;
        while let Some(start) = rest.find("[[${") {
            let Some(len) = rest[start..].find("}]]") else {
                break;
            };
            sink.push_str(&rest[..start]);
            let name = rest[start + 4..start + len].trim();
            if let Some(value) = context.variable(name) {
                sink.push_str(&value.to_string());
            }
            rest = &rest[start + len + 3..];
        }
        sink.push_str(rest);
    }
}

impl TemplateRenderer for MarkupRenderer {
    fn render(
        &self,
        model: &TemplateModel,
        context: &mut dyn TemplateContext,
        sink: &mut String,
    ) -> FragmentResult<()> {
        for event in model.events() {
            match event {
                TemplateEvent::Text(text) => Self::render_text(text, context, sink),
                other => sink.push_str(&other.to_string()),
            }
        }
        Ok(())
    }
}
