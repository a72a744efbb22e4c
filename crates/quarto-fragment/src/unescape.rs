/*
 * unescape.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Mode-aware unescaping of attribute values.

use crate::mode::TemplateMode;
use std::borrow::Cow;

/// Unescape an attribute value as written in a template of the given mode.
///
/// - HTML/XML: character and predefined entity references (`&#39;`, `&amp;`).
///   Values with unknown or malformed entities are returned unchanged.
/// - JavaScript/CSS: backslash escapes.
/// - Text/raw: returned unchanged.
pub fn unescape_attribute(mode: TemplateMode, raw: &str) -> Cow<'_, str> {
    match mode {
        mode if mode.is_markup() => {
            if !raw.contains('&') {
                return Cow::Borrowed(raw);
            }
            match quick_xml::escape::unescape(raw) {
                Ok(unescaped) => unescaped,
                Err(err) => {
                    tracing::debug!(value = raw, error = %err, "Keeping attribute value escaped");
                    Cow::Borrowed(raw)
                }
            }
        }
        TemplateMode::Javascript | TemplateMode::Css => {
            if raw.contains('\\') {
                Cow::Owned(unescape_backslashes(raw))
            } else {
                Cow::Borrowed(raw)
            }
        }
        _ => Cow::Borrowed(raw),
    }
}

fn unescape_backslashes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        out.push(decoded);
                        chars.nth(3);
                    }
                    _ => out.push('u'),
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
