/*
 * signature.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Fragment signatures and argument binding.
//!
//! A fragment root may declare its parameters, e.g.
//! `<div th:fragment="card(title, level=2)">`. When it does, the arguments
//! supplied by the directive are reshaped against that declaration before
//! they become local variables:
//!
//! - positional arguments are bound to declared names in order;
//! - declared names without an argument get their default, if any;
//! - supplied names that are not declared are dropped.

use crate::error::{FragmentError, FragmentResult};
use crate::fragment::{FragmentArguments, FragmentParameters};
use crate::model::TemplateModel;
use crate::unescape::unescape_attribute;
use crate::value::{FragmentValue, split_top_level};
use std::collections::HashSet;

/// Name of the attribute holding a fragment's signature (before prefixing).
pub const FRAGMENT_ATTR_NAME: &str = "fragment";

/// A declared fragment parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureParameter {
    pub name: String,
    pub default: Option<FragmentValue>,
}

/// A fragment's self-declared name and formal parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentSignature {
    pub name: String,
    pub parameters: Vec<SignatureParameter>,
}

impl FragmentSignature {
    /// Reshape supplied arguments against this signature.
    pub fn bind(&self, arguments: &FragmentArguments) -> FragmentParameters {
        let mut bound = FragmentParameters::new();

        match arguments {
            FragmentArguments::None => {}
            FragmentArguments::Positional(values) => {
                if values.len() > self.parameters.len() {
                    tracing::debug!(
                        fragment = %self.name,
                        supplied = values.len(),
                        declared = self.parameters.len(),
                        "Dropping surplus positional fragment arguments"
                    );
                }
                for (param, value) in self.parameters.iter().zip(values) {
                    bound.insert(param.name.clone(), value.clone());
                }
            }
            FragmentArguments::Named(values) => {
                for (name, value) in values {
                    if self.parameters.iter().any(|p| &p.name == name) {
                        bound.insert(name.clone(), value.clone());
                    } else {
                        tracing::debug!(
                            fragment = %self.name,
                            argument = %name,
                            "Dropping fragment argument not declared in signature"
                        );
                    }
                }
            }
        }

        for param in &self.parameters {
            if bound.contains_key(&param.name) {
                continue;
            }
            if let Some(default) = &param.default {
                bound.insert(param.name.clone(), default.clone());
            }
        }

        bound
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Parse a signature such as `card`, `card()` or `card(title, level=2)`.
pub fn parse_signature(spec: &str) -> FragmentResult<FragmentSignature> {
    let malformed = |message: String| FragmentError::MalformedSignature {
        spec: spec.to_string(),
        message,
    };

    let trimmed = spec.trim();
    let (name, params_spec) = match trimmed.find('(') {
        None => (trimmed, None),
        Some(open) => {
            let inner = trimmed[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| malformed("parameter list is not closed".to_string()))?;
            (trimmed[..open].trim_end(), Some(inner))
        }
    };

    if !is_identifier(name) {
        return Err(malformed(format!("invalid fragment name '{}'", name)));
    }

    let mut parameters = Vec::new();
    let mut seen = HashSet::new();
    if let Some(inner) = params_spec {
        for item in split_top_level(inner).map_err(malformed)? {
            let (param_name, default) = match item.split_once('=') {
                Some((n, d)) => (
                    n.trim(),
                    Some(FragmentValue::parse_literal(d).map_err(malformed)?),
                ),
                None => (item, None),
            };
            if !is_identifier(param_name) {
                return Err(malformed(format!("invalid parameter name '{}'", param_name)));
            }
            if !seen.insert(param_name) {
                return Err(malformed(format!("duplicate parameter '{}'", param_name)));
            }
            parameters.push(SignatureParameter {
                name: param_name.to_string(),
                default,
            });
        }
    }

    Ok(FragmentSignature {
        name: name.to_string(),
        parameters,
    })
}

/// Look up the signature declared on a fragment's root element.
///
/// Returns `None` when there is no root element, no signature attribute,
/// an empty attribute, or a malformed signature (logged, never fatal).
pub fn find_signature(model: &TemplateModel, dialect_prefix: &str) -> Option<FragmentSignature> {
    let root = model.root_element()?;
    let raw = root.dialect_attribute(dialect_prefix, FRAGMENT_ATTR_NAME)?;
    let spec = unescape_attribute(model.template_mode(), raw);
    if spec.trim().is_empty() {
        return None;
    }

    match parse_signature(&spec) {
        Ok(signature) => Some(signature),
        Err(err) => {
            tracing::warn!(
                template = %model.template_data().template,
                error = %err,
                "Ignoring malformed fragment signature"
            );
            None
        }
    }
}

/// Reshape the directive's arguments for insertion of `model`.
///
/// Without a signature, named arguments pass through unchanged. Positional
/// arguments cannot be named without one and are dropped.
pub fn bind_arguments(
    model: &TemplateModel,
    dialect_prefix: &str,
    arguments: &FragmentArguments,
) -> FragmentParameters {
    match find_signature(model, dialect_prefix) {
        Some(signature) => signature.bind(arguments),
        None => match arguments {
            FragmentArguments::None => FragmentParameters::new(),
            FragmentArguments::Named(values) => values.clone(),
            FragmentArguments::Positional(values) => {
                if !values.is_empty() {
                    tracing::warn!(
                        template = %model.template_data().template,
                        supplied = values.len(),
                        "Positional fragment arguments without a signature are ignored"
                    );
                }
                FragmentParameters::new()
            }
        },
    }
}
