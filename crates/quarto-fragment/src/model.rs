/*
 * model.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template models: event sequences plus the metadata of where they came from.

use crate::event::{ElementTag, TemplateEvent};
use crate::mode::TemplateMode;
use std::fmt;

/// Where a model was obtained from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateData {
    /// Name of the originating template.
    pub template: String,

    /// Selectors used to pick this model out of the template. Empty when the
    /// model is the whole template.
    pub selectors: Vec<String>,

    /// Mode the template was parsed in.
    pub template_mode: TemplateMode,
}

impl TemplateData {
    /// Data for a whole template.
    pub fn new(template: impl Into<String>, template_mode: TemplateMode) -> Self {
        Self {
            template: template.into(),
            selectors: Vec::new(),
            template_mode,
        }
    }

    /// Data for a selection inside a template.
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    /// True when the model is a sub-selection of its template.
    pub fn has_template_selectors(&self) -> bool {
        !self.selectors.is_empty()
    }
}

/// An ordered sequence of template events representing a (sub-)document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateModel {
    events: Vec<TemplateEvent>,
    template_data: TemplateData,
}

impl TemplateModel {
    pub fn new(template_data: TemplateData, events: Vec<TemplateEvent>) -> Self {
        Self {
            events,
            template_data,
        }
    }

    /// A model with the same metadata but different events.
    pub fn with_events(&self, events: Vec<TemplateEvent>) -> Self {
        Self {
            events,
            template_data: self.template_data.clone(),
        }
    }

    pub fn events(&self) -> &[TemplateEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn template_data(&self) -> &TemplateData {
        &self.template_data
    }

    pub fn template_mode(&self) -> TemplateMode {
        self.template_data.template_mode
    }

    /// The element that may hold the fragment's signature.
    ///
    /// This is the first event, unless the model starts with a
    /// [`TemplateEvent::DocumentStart`]; in that case it is the second one,
    /// provided the model has room for a start, an element and an end.
    pub fn root_element(&self) -> Option<&ElementTag> {
        let holder = match self.events.first() {
            Some(TemplateEvent::DocumentStart) if self.events.len() >= 3 => self.events.get(1),
            Some(TemplateEvent::DocumentStart) => None,
            first => first,
        };
        holder.and_then(TemplateEvent::element_tag)
    }
}

impl fmt::Display for TemplateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            write!(f, "{}", event)?;
        }
        Ok(())
    }
}
