/*
 * fragment.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Resolved fragments and their arguments.

use crate::model::TemplateModel;
use crate::value::FragmentValue;
use std::collections::BTreeMap;

/// Parameters after reshaping against a signature: parameter name to value.
///
/// Produced once by the signature binder and never mutated afterwards.
pub type FragmentParameters = BTreeMap<String, FragmentValue>;

/// Arguments as supplied by the directive.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FragmentArguments {
    /// No arguments, e.g. `page :: nav`.
    #[default]
    None,
    /// `page :: nav(x=1, y='a')`
    Named(BTreeMap<String, FragmentValue>),
    /// `page :: nav(1, 'a')`; names come from the fragment's signature.
    Positional(Vec<FragmentValue>),
}

impl FragmentArguments {
    /// Build named arguments from `(name, value)` pairs.
    pub fn named<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<FragmentValue>,
    {
        FragmentArguments::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A resolved reference to a document sub-tree plus its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub model: TemplateModel,
    pub arguments: FragmentArguments,
}

impl Fragment {
    pub fn new(model: TemplateModel, arguments: FragmentArguments) -> Self {
        Self { model, arguments }
    }
}
