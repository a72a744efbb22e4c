/*
 * classify.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Directive classification.
//!
//! Insertion directives may hold a complete expression (`~{page :: nav}`,
//! `${cond} ? ~{a} : ~{b}`) or the bare shorthand `page :: nav(x=1)`. The
//! shorthand has to be wrapped into a fragment expression before it is
//! handed to the evaluator. The decision is a heuristic scan that ignores
//! anything inside string literals and nested brace groups.

/// Opening delimiter of a fragment expression.
pub const FRAGMENT_EXPRESSION_OPEN: &str = "~{";

const SELECTOR: char = '~';

/// How a directive string must be shaped before evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveShape {
    /// Already a complete expression (or contains a fragment expression).
    Complete,
    /// Fragment-expression content; needs wrapping in `~{...}`.
    Implicit,
}

/// Classify a trimmed, non-empty directive string.
pub fn classify(input: &str) -> DirectiveShape {
    if input.len() > 2 && input.starts_with(FRAGMENT_EXPRESSION_OPEN) {
        return DirectiveShape::Complete;
    }

    let chars: Vec<char> = input.chars().collect();
    let mut brace_level: i32 = 0;
    let mut param_level: i32 = 0;
    let mut in_literal = false;

    for (i, &c) in chars.iter().enumerate() {
        if c == '\'' {
            in_literal = !in_literal;
            continue;
        }
        if in_literal {
            continue;
        }
        let next = chars.get(i + 1).copied();
        match c {
            '{' => brace_level += 1,
            '}' => brace_level -= 1,
            _ if brace_level != 0 => {}
            '(' => param_level += 1,
            ')' => param_level -= 1,
            // Named argument inside the argument list of bare shorthand.
            '=' if param_level == 1 => return DirectiveShape::Implicit,
            SELECTOR if next == Some('{') => return DirectiveShape::Complete,
            ':' if next == Some(':') => return DirectiveShape::Implicit,
            _ => {}
        }
    }

    DirectiveShape::Implicit
}

/// Turn a raw directive into the expression text to evaluate.
///
/// Returns `None` for empty or whitespace-only input, which callers report
/// as an unparsable directive without consulting the evaluator.
pub fn shape_directive(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let shaped = match classify(trimmed) {
        DirectiveShape::Complete => trimmed.to_string(),
        DirectiveShape::Implicit => format!("{}{}}}", FRAGMENT_EXPRESSION_OPEN, trimmed),
    };
    tracing::trace!(directive = trimmed, expression = %shaped, "Shaped insertion directive");
    Some(shaped)
}
