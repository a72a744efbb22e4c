/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Fragment insertion for event-stream templates.
//!
//! This crate implements the `insert`, `replace` and `include` attribute
//! processors of a templating engine that represents documents as flat
//! sequences of [`TemplateEvent`]s. Given the directive on a host element
//! (e.g. `th:replace="page :: nav(active='home')"`) it:
//!
//! - decides whether the directive is a complete expression or bare
//!   `template :: selector` shorthand that needs wrapping in `~{...}`;
//! - evaluates it into a [`Fragment`] through the host's
//!   [`ExpressionEvaluator`];
//! - binds the supplied arguments to the fragment's declared signature
//!   (`th:fragment="nav(active, level=1)"`);
//! - renders fragments written in a different [`TemplateMode`] to text via
//!   a nested render;
//! - removes the fragment's envelope element for include-contents-only
//!   insertion;
//! - asks the host's [`StructureHandler`] to replace the host or its body.
//!
//! # Architecture
//!
//! The expression language, the template loader and the rendering pipeline
//! are **not** part of this crate. They are reached through the
//! [`ExpressionEvaluator`], [`TemplateRenderer`], [`TemplateContext`] and
//! [`StructureHandler`] traits. [`MemoryFragmentResolver`],
//! [`MarkupRenderer`], [`VariableContext`] and [`MutationRecorder`] are
//! small implementations for tests and simple embeddings.
//!
//! # Example
//!
//! ```ignore
//! use quarto_fragment::*;
//! use std::sync::Arc;
//!
//! let resolver = MemoryFragmentResolver::with_templates("th", [page_model]);
//! let processor = FragmentInsertionProcessor::new(
//!     InsertionMode::Replace,
//!     InsertionConfig::default(),
//!     Arc::new(resolver),
//!     Arc::new(MarkupRenderer),
//! );
//!
//! let mut ctx = VariableContext::new(TemplateMode::Html);
//! let mut handler = MutationRecorder::new();
//! processor.process(&mut ctx, "page :: nav(active='home')", &mut handler)?;
//! ```

pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod fragment;
pub mod mode;
pub mod model;
pub mod processor;
pub mod reconcile;
pub mod resolver;
pub mod signature;
pub mod strip;
pub mod structure;
pub mod unescape;
pub mod value;

// Re-export main types at crate root
pub use classify::{DirectiveShape, classify, shape_directive};
pub use config::InsertionConfig;
pub use context::{LocalVariableScope, TemplateContext, VariableContext};
pub use error::{FragmentError, FragmentResult};
pub use event::{Attribute, ElementTag, TemplateEvent};
pub use fragment::{Fragment, FragmentArguments, FragmentParameters};
pub use mode::TemplateMode;
pub use model::{TemplateData, TemplateModel};
pub use processor::{FragmentInsertionProcessor, INSERTION_PRECEDENCE, InsertionMode};
pub use reconcile::{Reconciled, reconcile_modes};
pub use resolver::{ExpressionEvaluator, MarkupRenderer, MemoryFragmentResolver, TemplateRenderer};
pub use signature::{FragmentSignature, SignatureParameter, bind_arguments, parse_signature};
pub use strip::strip_envelope;
pub use structure::{InsertionContent, Mutation, MutationRecorder, StructureHandler};
pub use unescape::unescape_attribute;
pub use value::FragmentValue;
