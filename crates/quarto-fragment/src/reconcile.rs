/*
 * reconcile.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Cross-mode reconciliation.
//!
//! Only models in the host's template mode can be spliced in as events. A
//! fragment in any other mode (say, a TEXT fragment inserted into an HTML
//! page) is rendered on its own, in full, and inserted as opaque text. The
//! whole output is buffered in memory, so this path is meant for small
//! fragments.

use crate::context::TemplateContext;
use crate::error::{FragmentError, FragmentResult};
use crate::fragment::FragmentParameters;
use crate::model::TemplateModel;
use crate::processor::InsertionMode;
use crate::resolver::TemplateRenderer;

const RENDER_BUFFER_CAPACITY: usize = 200;

/// Outcome of comparing host and fragment modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// Modes match; insert the model as events.
    SameMode,
    /// Modes differ; the fragment was rendered to this text.
    Rendered(String),
}

/// Compare modes and, for a cross-mode insertion, render the fragment.
///
/// Parameters are injected into the context as local variables for the
/// duration of the nested render, as is a raised insertion depth. Both are
/// restored afterwards, whether or not the render succeeds.
pub fn reconcile_modes(
    insertion_mode: InsertionMode,
    attribute: &str,
    directive: &str,
    model: &TemplateModel,
    parameters: &FragmentParameters,
    context: &mut dyn TemplateContext,
    renderer: &dyn TemplateRenderer,
) -> FragmentResult<Reconciled> {
    let host_mode = context.template_mode();
    let fragment_mode = model.template_mode();
    if host_mode == fragment_mode {
        return Ok(Reconciled::SameMode);
    }

    if insertion_mode == InsertionMode::IncludeContentsOnly {
        return Err(FragmentError::CrossModeDisallowed {
            attribute: attribute.to_string(),
            directive: directive.to_string(),
            host_mode,
            fragment_mode,
        });
    }

    let scoped = !parameters.is_empty();
    if scoped {
        let scope = context.local_variables().ok_or_else(|| {
            FragmentError::MissingLocalVariableCapability {
                attribute: attribute.to_string(),
                directive: directive.to_string(),
            }
        })?;
        scope.push_local_variables(parameters);
    }

    tracing::debug!(
        directive,
        %host_mode,
        %fragment_mode,
        parameters = parameters.len(),
        "Rendering cross-mode fragment"
    );

    let depth = context.insertion_depth();
    context.set_insertion_depth(depth + 1);
    let mut buffer = String::with_capacity(RENDER_BUFFER_CAPACITY);
    let result = renderer.render(model, context, &mut buffer);
    context.set_insertion_depth(depth);
    if scoped && let Some(scope) = context.local_variables() {
        scope.pop_local_variables();
    }
    result?;

    Ok(Reconciled::Rendered(buffer))
}
