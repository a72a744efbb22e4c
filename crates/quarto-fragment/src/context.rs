/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Execution context seen by fragment insertion.
//!
//! The host engine owns the context. Insertion only needs its template mode,
//! the insertion depth (for recursion protection), and, for cross-mode
//! insertion of parameterized fragments, the ability to set local variables.
//! That last capability is optional and is obtained through
//! [`TemplateContext::local_variables`].

use crate::fragment::FragmentParameters;
use crate::mode::TemplateMode;
use crate::value::FragmentValue;
use std::collections::HashMap;

/// Capability for injecting transient local variables.
///
/// Bindings are scoped: every push is undone by the matching pop, restoring
/// whatever the names were bound to before.
pub trait LocalVariableScope {
    /// Bind every parameter as a local variable, shadowing existing bindings.
    fn push_local_variables(&mut self, parameters: &FragmentParameters);

    /// Undo the most recent [`push_local_variables`](Self::push_local_variables).
    fn pop_local_variables(&mut self);
}

/// The execution context of the template being rendered.
pub trait TemplateContext {
    /// Mode of the template currently being processed.
    fn template_mode(&self) -> TemplateMode;

    /// Look up a variable, including enclosing scopes.
    fn variable(&self, name: &str) -> Option<&FragmentValue>;

    /// Number of fragment insertions enclosing the current one.
    fn insertion_depth(&self) -> usize;

    fn set_insertion_depth(&mut self, depth: usize);

    /// Local-variable support, if this context has it.
    fn local_variables(&mut self) -> Option<&mut dyn LocalVariableScope> {
        None
    }
}

/// A scoped variable context with local-variable support.
#[derive(Debug, Clone)]
pub struct VariableContext {
    template_mode: TemplateMode,

    /// Variable bindings at this level.
    variables: HashMap<String, FragmentValue>,

    /// Enclosing scope.
    parent: Option<Box<VariableContext>>,

    insertion_depth: usize,

    /// Bindings shadowed by each pushed set of local variables.
    shadowed: Vec<Vec<(String, Option<FragmentValue>)>>,
}

impl VariableContext {
    pub fn new(template_mode: TemplateMode) -> Self {
        Self {
            template_mode,
            variables: HashMap::new(),
            parent: None,
            insertion_depth: 0,
            shadowed: Vec::new(),
        }
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FragmentValue>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Get a variable from the context, checking parent scopes.
    pub fn get(&self, key: &str) -> Option<&FragmentValue> {
        self.variables
            .get(key)
            .or_else(|| self.parent.as_ref().and_then(|p| p.get(key)))
    }

    /// Create a child scope, e.g. for rendering a fragment in another mode.
    ///
    /// The child sees parent variables; its own bindings shadow them and are
    /// discarded with it.
    pub fn child(&self, template_mode: TemplateMode) -> VariableContext {
        VariableContext {
            template_mode,
            variables: HashMap::new(),
            parent: Some(Box::new(self.clone())),
            insertion_depth: self.insertion_depth,
            shadowed: Vec::new(),
        }
    }
}

impl LocalVariableScope for VariableContext {
    fn push_local_variables(&mut self, parameters: &FragmentParameters) {
        let frame = parameters
            .iter()
            .map(|(name, value)| {
                let previous = self.variables.insert(name.clone(), value.clone());
                (name.clone(), previous)
            })
            .collect();
        self.shadowed.push(frame);
    }

    fn pop_local_variables(&mut self) {
        let Some(frame) = self.shadowed.pop() else {
            return;
        };
        for (name, previous) in frame {
            match previous {
                Some(value) => self.variables.insert(name, value),
                None => self.variables.remove(&name),
            };
        }
    }
}

impl TemplateContext for VariableContext {
    fn template_mode(&self) -> TemplateMode {
        self.template_mode
    }

    fn variable(&self, name: &str) -> Option<&FragmentValue> {
        self.get(name)
    }

    fn insertion_depth(&self) -> usize {
        self.insertion_depth
    }

    fn set_insertion_depth(&mut self, depth: usize) {
        self.insertion_depth = depth;
    }

    fn local_variables(&mut self) -> Option<&mut dyn LocalVariableScope> {
        Some(self)
    }
}
