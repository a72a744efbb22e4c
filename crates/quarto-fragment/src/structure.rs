/*
 * structure.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Structural mutations requested from the host engine.

use crate::model::{TemplateData, TemplateModel};
use crate::value::FragmentValue;

/// Content to splice into the host element.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertionContent {
    /// Events that may still need processing.
    Model(TemplateModel),
    /// Already rendered output.
    Text(String),
}

/// Mutations fragment insertion can apply to the host element.
///
/// `processable` tells the engine whether the content still has to go
/// through the processing pipeline (`true` for models) or is final
/// (`false` for rendered text).
pub trait StructureHandler {
    /// Replace the host element and its body with `content`.
    fn replace_with(&mut self, content: InsertionContent, processable: bool);

    /// Replace the host element's body, keeping the element itself.
    fn set_body(&mut self, content: InsertionContent, processable: bool);

    /// Bind a local variable for the processing of the inserted content.
    fn set_local_variable(&mut self, name: &str, value: FragmentValue);

    /// Process the inserted content with the given template data.
    fn set_template_data(&mut self, data: TemplateData);
}

/// A mutation as recorded by [`MutationRecorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    ReplaceWith {
        content: InsertionContent,
        processable: bool,
    },
    SetBody {
        content: InsertionContent,
        processable: bool,
    },
    SetLocalVariable {
        name: String,
        value: FragmentValue,
    },
    SetTemplateData(TemplateData),
}

/// Structure handler that only records the requested mutations.
///
/// Useful for testing, and for hosts that apply mutations after the
/// processor has returned.
#[derive(Debug, Clone, Default)]
pub struct MutationRecorder {
    mutations: Vec<Mutation>,
}

impl MutationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn into_mutations(self) -> Vec<Mutation> {
        self.mutations
    }

    /// The replace/set-body mutation, if one was issued.
    pub fn insertion(&self) -> Option<&Mutation> {
        self.mutations
            .iter()
            .find(|m| matches!(m, Mutation::ReplaceWith { .. } | Mutation::SetBody { .. }))
    }
}

impl StructureHandler for MutationRecorder {
    fn replace_with(&mut self, content: InsertionContent, processable: bool) {
        self.mutations.push(Mutation::ReplaceWith {
            content,
            processable,
        });
    }

    fn set_body(&mut self, content: InsertionContent, processable: bool) {
        self.mutations.push(Mutation::SetBody {
            content,
            processable,
        });
    }

    fn set_local_variable(&mut self, name: &str, value: FragmentValue) {
        self.mutations.push(Mutation::SetLocalVariable {
            name: name.to_string(),
            value,
        });
    }

    fn set_template_data(&mut self, data: TemplateData) {
        self.mutations.push(Mutation::SetTemplateData(data));
    }
}
