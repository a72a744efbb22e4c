/*
 * mode.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template modes (document dialects).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The dialect a template's events are interpreted under.
///
/// Two models can only be spliced into each other as structure when they
/// share a mode. Otherwise the inserted fragment has to be rendered to text
/// first (see [`crate::reconcile`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateMode {
    Html,
    Xml,
    Text,
    Javascript,
    Css,
    Raw,
}

impl TemplateMode {
    /// Markup modes have elements and attributes with entity escaping.
    pub fn is_markup(self) -> bool {
        matches!(self, TemplateMode::Html | TemplateMode::Xml)
    }

    /// Name used in messages, e.g. `HTML`.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateMode::Html => "HTML",
            TemplateMode::Xml => "XML",
            TemplateMode::Text => "TEXT",
            TemplateMode::Javascript => "JAVASCRIPT",
            TemplateMode::Css => "CSS",
            TemplateMode::Raw => "RAW",
        }
    }
}

impl fmt::Display for TemplateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(TemplateMode::Html),
            "xml" => Ok(TemplateMode::Xml),
            "text" => Ok(TemplateMode::Text),
            "javascript" | "js" => Ok(TemplateMode::Javascript),
            "css" => Ok(TemplateMode::Css),
            "raw" => Ok(TemplateMode::Raw),
            other => Err(format!("unknown template mode: {}", other)),
        }
    }
}
