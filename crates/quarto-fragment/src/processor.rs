/*
 * processor.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Fragment insertion processors.
//!
//! A [`FragmentInsertionProcessor`] handles one insertion attribute
//! (`th:insert`, `th:replace` or `th:include`). For each directive it:
//!
//! 1. shapes the directive and evaluates it into a [`Fragment`];
//! 2. reshapes the arguments against the fragment's signature;
//! 3. renders cross-mode fragments to text (see [`crate::reconcile`]);
//! 4. strips the envelope for include-contents-only insertion;
//! 5. issues exactly one replace or set-body mutation.
//!
//! [`Fragment`]: crate::fragment::Fragment

use crate::classify::shape_directive;
use crate::config::InsertionConfig;
use crate::context::TemplateContext;
use crate::error::{FragmentError, FragmentResult};
use crate::reconcile::{Reconciled, reconcile_modes};
use crate::resolver::{ExpressionEvaluator, TemplateRenderer};
use crate::signature::bind_arguments;
use crate::strip::strip_envelope;
use crate::structure::{InsertionContent, StructureHandler};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Precedence of the insertion processors among attribute processors.
pub const INSERTION_PRECEDENCE: i32 = 100;

/// The insertion variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertionMode {
    /// Insert the fragment as the host's body.
    Insert,
    /// Replace the host with the fragment.
    Replace,
    /// Insert only the fragment's contents (its envelope removed) as the
    /// host's body. Same-mode fragments only.
    IncludeContentsOnly,
}

impl InsertionMode {
    /// Attribute name without dialect prefix.
    pub fn attribute_name(self) -> &'static str {
        match self {
            InsertionMode::Insert => "insert",
            InsertionMode::Replace => "replace",
            InsertionMode::IncludeContentsOnly => "include",
        }
    }

    pub fn from_attribute_name(name: &str) -> Option<Self> {
        match name {
            "insert" => Some(InsertionMode::Insert),
            "replace" => Some(InsertionMode::Replace),
            "include" => Some(InsertionMode::IncludeContentsOnly),
            _ => None,
        }
    }

    pub fn replaces_host(self) -> bool {
        matches!(self, InsertionMode::Replace)
    }
}

impl fmt::Display for InsertionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_name())
    }
}

impl FromStr for InsertionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_attribute_name(s).ok_or_else(|| format!("unknown insertion attribute: {}", s))
    }
}

/// Processor for one insertion attribute.
#[derive(Clone)]
pub struct FragmentInsertionProcessor {
    mode: InsertionMode,
    config: InsertionConfig,
    evaluator: Arc<dyn ExpressionEvaluator>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl fmt::Debug for FragmentInsertionProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentInsertionProcessor")
            .field("mode", &self.mode)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FragmentInsertionProcessor {
    pub fn new(
        mode: InsertionMode,
        config: InsertionConfig,
        evaluator: Arc<dyn ExpressionEvaluator>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            mode,
            config,
            evaluator,
            renderer,
        }
    }

    /// One processor per insertion mode, sharing evaluator and renderer.
    pub fn standard_set(
        config: &InsertionConfig,
        evaluator: Arc<dyn ExpressionEvaluator>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Vec<FragmentInsertionProcessor> {
        [
            InsertionMode::Insert,
            InsertionMode::Replace,
            InsertionMode::IncludeContentsOnly,
        ]
        .into_iter()
        .map(|mode| Self::new(mode, config.clone(), evaluator.clone(), renderer.clone()))
        .collect()
    }

    pub fn mode(&self) -> InsertionMode {
        self.mode
    }

    pub fn config(&self) -> &InsertionConfig {
        &self.config
    }

    pub fn precedence(&self) -> i32 {
        INSERTION_PRECEDENCE
    }

    /// Full attribute name handled by this processor, e.g. `th:insert`.
    pub fn attribute_name(&self) -> String {
        format!("{}:{}", self.config.dialect_prefix, self.mode.attribute_name())
    }

    /// Resolve `directive` and splice the fragment into the host element.
    ///
    /// On error no mutation has been issued.
    pub fn process(
        &self,
        context: &mut dyn TemplateContext,
        directive: &str,
        handler: &mut dyn StructureHandler,
    ) -> FragmentResult<()> {
        let attribute = self.attribute_name();

        if context.insertion_depth() >= self.config.max_insertion_depth {
            return Err(FragmentError::RecursionLimit {
                directive: directive.to_string(),
                max_depth: self.config.max_insertion_depth,
            });
        }

        let unparsable = || FragmentError::UnparsableDirective {
            attribute: attribute.clone(),
            directive: directive.to_string(),
        };
        let expression = shape_directive(directive).ok_or_else(unparsable)?;
        let fragment = self
            .evaluator
            .evaluate(&*context, &expression)
            .ok_or_else(unparsable)?;

        let model = fragment.model;
        let parameters = bind_arguments(&model, &self.config.dialect_prefix, &fragment.arguments);

        tracing::debug!(
            attribute = %attribute,
            directive,
            template = %model.template_data().template,
            events = model.len(),
            parameters = parameters.len(),
            "Inserting fragment"
        );

        match reconcile_modes(
            self.mode,
            &attribute,
            directive,
            &model,
            &parameters,
            context,
            self.renderer.as_ref(),
        )? {
            Reconciled::Rendered(text) => {
                // Already processed: insert as final text.
                self.issue(handler, InsertionContent::Text(text), false);
                return Ok(());
            }
            Reconciled::SameMode => {}
        }

        handler.set_template_data(model.template_data().clone());
        for (name, value) in &parameters {
            handler.set_local_variable(name, value.clone());
        }

        let content = if self.mode == InsertionMode::IncludeContentsOnly
            && model.template_data().has_template_selectors()
        {
            let stripped = strip_envelope(model.events());
            tracing::trace!(
                before = model.len(),
                after = stripped.len(),
                "Stripped fragment envelope"
            );
            model.with_events(stripped)
        } else {
            model
        };

        self.issue(handler, InsertionContent::Model(content), true);
        Ok(())
    }

    fn issue(
        &self,
        handler: &mut dyn StructureHandler,
        content: InsertionContent,
        processable: bool,
    ) {
        if self.mode.replaces_host() {
            handler.replace_with(content, processable);
        } else {
            handler.set_body(content, processable);
        }
    }
}
